use crate::buffer::PixelBuffer;
use crate::{AsepriteParseError, Result, Slice};

/// A tile's position in a tilesheet strip. Ids start at 1; 0 means "no tile".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl TileId {
    /// The reserved id that never refers to a tile.
    pub const EMPTY: TileId = TileId(0);

    /// Returns `true` for the reserved id 0.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// The tiles cut from one slice: a `columns` x `rows` grid whose ids run
/// row-major from `first_tile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRegion<'s, 'a> {
    /// The slice the tiles were cut from.
    pub slice: &'s Slice<'a>,
    /// Id of the top-left tile.
    pub first_tile: TileId,
    /// Tiles per row.
    pub columns: u32,
    /// Tile rows.
    pub rows: u32,
}

impl<'s, 'a> TileRegion<'s, 'a> {
    /// Number of tiles in the region.
    pub fn tile_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// Id of the tile in grid cell (`column`, `row`), if the cell exists.
    pub fn tile_id(&self, column: u32, row: u32) -> Option<TileId> {
        if column < self.columns && row < self.rows {
            Some(TileId(self.first_tile.0 + row * self.columns + column))
        } else {
            None
        }
    }
}

/// Iterator over the [TileRegion]s of a tilesheet, in slice order.
#[derive(Debug, Clone)]
pub struct TileRegions<'s, 'a> {
    slices: std::slice::Iter<'s, Slice<'a>>,
    tile_size: u32,
    next_tile: u32,
}

impl<'s, 'a> TileRegions<'s, 'a> {
    pub(crate) fn new(slices: &'s [Slice<'a>], tile_size: u16) -> Self {
        TileRegions {
            slices: slices.iter(),
            tile_size: tile_size as u32,
            next_tile: 1,
        }
    }
}

impl<'s, 'a> Iterator for TileRegions<'s, 'a> {
    type Item = TileRegion<'s, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let slice = self.slices.next()?;
        let region = TileRegion {
            slice,
            first_tile: TileId(self.next_tile),
            columns: slice.width / self.tile_size,
            rows: slice.height / self.tile_size,
        };
        self.next_tile += region.tile_count();
        Some(region)
    }
}

/// Checks every slice and returns the total number of tiles.
pub(crate) fn count_tiles(
    slices: &[Slice<'_>],
    tile_size: u16,
    frame_width: u16,
    frame_height: u16,
) -> Result<u32> {
    if tile_size == 0 {
        return Err(AsepriteParseError::InvalidTileSize(tile_size));
    }
    if slices.is_empty() {
        return Err(AsepriteParseError::NoSlices);
    }
    let mut total: u32 = 0;
    for (index, slice) in slices.iter().enumerate() {
        let tiles = tiles_in(slice, index, tile_size, frame_width, frame_height)?;
        total = add_tiles(total, tiles)?;
    }
    Ok(total)
}

/// Number of tiles in one slice. `tile_size` must be nonzero.
pub(crate) fn tiles_in(
    slice: &Slice<'_>,
    index: usize,
    tile_size: u16,
    frame_width: u16,
    frame_height: u16,
) -> Result<u32> {
    let size = tile_size as u32;
    if slice.width % size != 0 || slice.height % size != 0 {
        return Err(AsepriteParseError::SliceNotTileAligned {
            index,
            width: slice.width,
            height: slice.height,
            tile_size,
        });
    }
    if !slice.fits_within(frame_width as u32, frame_height as u32) {
        return Err(AsepriteParseError::SliceOutOfBounds { index });
    }
    Ok((slice.width / size) * (slice.height / size))
}

pub(crate) fn add_tiles(total: u32, tiles: u32) -> Result<u32> {
    total
        .checked_add(tiles)
        .ok_or(AsepriteParseError::CapacityExceeded {
            needed: total as usize + tiles as usize,
            capacity: u32::MAX as usize,
        })
}

/// Cuts every slice of `frame` into tiles and lays them out in one row,
/// tile 1 leftmost.
///
/// `frame` is `frame_width` x `frame_height` indexed pixels. Returns the
/// number of tiles written to `out`, which holds `tile_count * tile_size`
/// by `tile_size` pixels afterwards.
pub(crate) fn rasterize<P: PixelBuffer>(
    frame: &[u8],
    frame_width: u16,
    frame_height: u16,
    slices: &[Slice<'_>],
    tile_size: u16,
    max_len: usize,
    out: &mut P,
) -> Result<u32> {
    let tile_count = count_tiles(slices, tile_size, frame_width, frame_height)?;
    let size = tile_size as usize;
    let strip_width = tile_count as usize * size;
    let needed = strip_width * size;
    if needed > max_len {
        return Err(AsepriteParseError::CapacityExceeded {
            needed,
            capacity: max_len,
        });
    }
    let strip = out.prepare(needed)?;
    let src_stride = frame_width as usize;

    for region in TileRegions::new(slices, tile_size) {
        for row in 0..region.rows {
            for column in 0..region.columns {
                let id = region.first_tile.0 + row * region.columns + column;
                let dst_x = (id as usize - 1) * size;
                let src_x = region.slice.x as usize + column as usize * size;
                let src_y = region.slice.y as usize + row as usize * size;
                for y in 0..size {
                    let src = (src_y + y) * src_stride + src_x;
                    let dst = y * strip_width + dst_x;
                    strip[dst..dst + size].copy_from_slice(&frame[src..src + size]);
                }
            }
        }
    }
    Ok(tile_count)
}
