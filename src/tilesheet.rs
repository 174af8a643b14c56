use crate::buffer::{FixedBuffer, FixedList, PixelBuffer};
use crate::parse::{decode_tilesheet_into, ParseOptions, TileLayout};
use crate::tile::{TileId, TileRegion, TileRegions};
use crate::{Result, Slice};

/// Square tiles cut from the slices of a file's first frame, laid out in a
/// single row.
///
/// Tile ids start at 1 and follow slice order, and within a slice run row
/// by row. Slice names and user data borrow from the file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSheet<'a> {
    layout: TileLayout,
    pixels: Vec<u8>,
    slices: Vec<Slice<'a>>,
}

impl<'a> TileSheet<'a> {
    /// Size and tile count of the sheet.
    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    /// Tile width and height in pixels.
    pub fn tile_size(&self) -> u16 {
        self.layout.tile_size
    }

    /// Number of tiles.
    pub fn tile_count(&self) -> u32 {
        self.layout.tile_count
    }

    /// Width of the tile strip in pixels.
    pub fn strip_width(&self) -> usize {
        self.layout.strip_width()
    }

    /// Row-major palette indices of the tile strip.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Slices in file order.
    pub fn slices(&self) -> &[Slice<'a>] {
        &self.slices
    }

    /// The first slice called `name`.
    pub fn slice_by_name(&self, name: &str) -> Option<&Slice<'a>> {
        self.slices.iter().find(|s| s.name == name)
    }

    /// The tiles of each slice.
    pub fn regions(&self) -> TileRegions<'_, 'a> {
        TileRegions::new(&self.slices, self.layout.tile_size)
    }

    /// The tiles of the first slice called `name`.
    pub fn region_by_name(&self, name: &str) -> Option<TileRegion<'_, 'a>> {
        self.regions().find(|r| r.slice.name == name)
    }

    /// Pixel (`x`, `y`) of tile `id`.
    pub fn tile_pixel(&self, id: TileId, x: u16, y: u16) -> Option<u8> {
        let index = self.layout.pixel_index(id, x, y)?;
        self.pixels.get(index).copied()
    }

    /// Consumes the sheet and returns its pixels.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Decodes a tilesheet with default options.
pub fn parse_tilesheet(bytes: &[u8], tile_size: u16) -> Result<TileSheet<'_>> {
    parse_tilesheet_with(bytes, tile_size, &ParseOptions::default())
}

/// Decodes a tilesheet.
///
/// Every slice must be a multiple of `tile_size` wide and high and lie
/// inside the frame, and at least one slice must exist.
pub fn parse_tilesheet_with<'a>(
    bytes: &'a [u8],
    tile_size: u16,
    options: &ParseOptions,
) -> Result<TileSheet<'a>> {
    let mut canvas: Vec<u8> = Vec::new();
    let mut scratch: Vec<u8> = Vec::new();
    let mut pixels = Vec::new();
    let mut slices = Vec::new();
    let layout = decode_tilesheet_into(
        bytes,
        tile_size,
        options,
        &mut canvas,
        &mut scratch,
        &mut pixels,
        &mut slices,
    )?;
    Ok(TileSheet {
        layout,
        pixels,
        slices,
    })
}

/// A [TileSheet] stored inline: at most `N` bytes of tile pixels and `S`
/// slices.
///
/// While decoding, the first frame is composited into an `F` byte canvas and
/// compressed cels are inflated into `C` bytes of scratch space, both on the
/// stack. Slices may overlap, so `N` is independent of `F`.
/// [TileLayout::scan] reports every capacity needed.
///
/// ```
/// # use asesheet::{FixedTileSheet, TileLayout};
/// # fn load(bytes: &[u8]) -> asesheet::Result<()> {
/// let layout = TileLayout::scan(bytes, 8)?;
/// assert!(layout.tiles_len() <= 4096 && layout.canvas_len() <= 4096);
/// assert!(layout.scratch_len <= 4096 && layout.slice_count <= 16);
/// let sheet = FixedTileSheet::<4096, 4096, 4096, 16>::parse(bytes, 8)?;
/// assert_eq!(sheet.layout(), &layout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FixedTileSheet<'a, const N: usize, const F: usize, const C: usize, const S: usize> {
    layout: TileLayout,
    pixels: FixedBuffer<N>,
    slices: FixedList<Slice<'a>, S>,
}

impl<'a, const N: usize, const F: usize, const C: usize, const S: usize>
    FixedTileSheet<'a, N, F, C, S>
{
    /// Decodes `bytes` with default options.
    pub fn parse(bytes: &'a [u8], tile_size: u16) -> Result<Self> {
        Self::parse_with(bytes, tile_size, &ParseOptions::default())
    }

    /// Decodes `bytes`.
    pub fn parse_with(bytes: &'a [u8], tile_size: u16, options: &ParseOptions) -> Result<Self> {
        let mut canvas = FixedBuffer::<F>::new();
        let mut scratch = FixedBuffer::<C>::new();
        let mut pixels = FixedBuffer::new();
        let mut slices = FixedList::new();
        let layout = decode_tilesheet_into(
            bytes,
            tile_size,
            options,
            &mut canvas,
            &mut scratch,
            &mut pixels,
            &mut slices,
        )?;
        Ok(FixedTileSheet {
            layout,
            pixels,
            slices,
        })
    }

    /// Decodes a tilesheet that ships with the program.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be decoded within the capacities.
    pub fn embed(bytes: &'a [u8], tile_size: u16) -> Self {
        match Self::parse(bytes, tile_size) {
            Ok(sheet) => sheet,
            Err(err) => panic!("cannot embed tilesheet: {}", err),
        }
    }

    /// Size and tile count of the sheet.
    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    /// Tile width and height in pixels.
    pub fn tile_size(&self) -> u16 {
        self.layout.tile_size
    }

    /// Number of tiles.
    pub fn tile_count(&self) -> u32 {
        self.layout.tile_count
    }

    /// Width of the tile strip in pixels.
    pub fn strip_width(&self) -> usize {
        self.layout.strip_width()
    }

    /// Row-major palette indices of the tile strip.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.pixels()
    }

    /// Slices in file order.
    pub fn slices(&self) -> &[Slice<'a>] {
        &self.slices
    }

    /// The first slice called `name`.
    pub fn slice_by_name(&self, name: &str) -> Option<&Slice<'a>> {
        self.slices.iter().find(|s| s.name == name)
    }

    /// The tiles of each slice.
    pub fn regions(&self) -> TileRegions<'_, 'a> {
        TileRegions::new(&self.slices, self.layout.tile_size)
    }

    /// Pixel (`x`, `y`) of tile `id`.
    pub fn tile_pixel(&self, id: TileId, x: u16, y: u16) -> Option<u8> {
        let index = self.layout.pixel_index(id, x, y)?;
        self.pixels().get(index).copied()
    }
}
