use crate::buffer::{PixelBuffer, SliceList};
use crate::compose::FrameCanvas;
use crate::inflate::InflateOptions;
use crate::layer::{self, LayerTable};
use crate::reader::AseReader;
use crate::{cel, slice, tile, user_data, AsepriteParseError, Result};
use log::debug;

/// Configuration for parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Options for decompressing cels.
    pub inflate: InflateOptions,
    /// Largest pixel buffer (strip, canvas, cel or tile strip) the parser
    /// will ask for, in bytes. Larger declared sizes are rejected with
    /// [AsepriteParseError::CapacityExceeded] before anything is allocated.
    pub max_buffer_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            inflate: InflateOptions::default(),
            max_buffer_len: 64 << 20,
        }
    }
}

/// The file header: dimensions shared by all frames.
///
/// Reading only the header is enough to size fixed buffers ahead of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteHeader {
    /// Frame width in pixels.
    pub width: u16,
    /// Frame height in pixels.
    pub height: u16,
    /// Number of animation frames.
    pub num_frames: u16,
    /// Palette index Aseprite treats as transparent. Informational only:
    /// decoded pixels always use index 0 for transparency.
    pub transparent_index: u8,
}

impl SpriteHeader {
    /// Parses the 128-byte file header.
    ///
    /// Fails if the magic number is wrong or the color depth is not 8-bit
    /// indexed.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = AseReader::new(bytes);
        let _size = reader.dword()?;
        let magic_number = reader.word()?;
        if magic_number != FILE_MAGIC {
            return Err(AsepriteParseError::InvalidMagic {
                context: "file",
                expected: FILE_MAGIC,
                found: magic_number,
            });
        }

        let num_frames = reader.word()?;
        let width = reader.word()?;
        let height = reader.word()?;
        let color_depth = reader.word()?;
        let _flags = reader.dword()?;
        let _speed = reader.word()?;
        let _placeholder1 = reader.dword()?;
        let _placeholder2 = reader.dword()?;
        let transparent_index = reader.byte()?;
        reader.skip_reserved(3)?;
        let _num_colors = reader.word()?;
        let _pixel_width = reader.byte()?;
        let _pixel_height = reader.byte()?;
        let _grid_x = reader.short()?;
        let _grid_y = reader.short()?;
        let _grid_width = reader.word()?;
        let _grid_height = reader.word()?;
        reader.skip_reserved(84)?;

        if color_depth != 8 {
            return Err(AsepriteParseError::UnsupportedColorDepth(color_depth));
        }

        Ok(SpriteHeader {
            width,
            height,
            num_frames,
            transparent_index,
        })
    }

    /// Pixels in one frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Width of all frames side by side.
    pub fn strip_width(&self) -> usize {
        self.width as usize * self.num_frames as usize
    }

    /// Pixels in the strip of all frames.
    pub fn strip_len(&self) -> usize {
        self.frame_len() * self.num_frames as usize
    }
}

/// Buffer sizes needed to decode a sprite, found without decoding any
/// pixels.
///
/// Use this to pick the capacities of a [FixedSprite](crate::FixedSprite).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteLayout {
    /// The file header.
    pub header: SpriteHeader,
    /// Size of the largest compressed cel that gets composited. Cels may
    /// reach outside the frame, so this can exceed the frame size.
    pub scratch_len: usize,
}

impl SpriteLayout {
    /// Walks the file's chunks and reads cel headers only.
    pub fn scan(bytes: &[u8]) -> Result<Self> {
        let header = SpriteHeader::parse(bytes)?;
        let layers = scan_layers(bytes, &header)?;
        let scratch_len = largest_scratch(bytes, &header, &layers, header.num_frames)?;
        Ok(SpriteLayout {
            header,
            scratch_len,
        })
    }

    /// Pixels in the strip of all frames.
    pub fn strip_len(&self) -> usize {
        self.header.strip_len()
    }
}

/// Size of a decoded tilesheet.
///
/// [TileLayout::scan] computes it without decoding any pixels, which is
/// enough to pick the capacities of a
/// [FixedTileSheet](crate::FixedTileSheet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    /// Header of the file the tiles were cut from.
    pub header: SpriteHeader,
    /// Tile width and height in pixels.
    pub tile_size: u16,
    /// Number of tiles in the strip. Valid ids are `1..=tile_count`.
    pub tile_count: u32,
    /// Number of slices. Every slice yields at least one tile.
    pub slice_count: usize,
    /// Size of the largest compressed cel of the first frame that gets
    /// composited.
    pub scratch_len: usize,
}

impl TileLayout {
    /// Reads the header, layers, slices and cel headers and checks every
    /// slice against `tile_size`.
    ///
    /// Fails with the same errors as decoding the tilesheet would, except
    /// for corrupt pixel data.
    pub fn scan(bytes: &[u8], tile_size: u16) -> Result<Self> {
        let header = SpriteHeader::parse(bytes)?;
        let layers = scan_layers(bytes, &header)?;
        Self::scan_with(bytes, &header, &layers, tile_size)
    }

    fn scan_with(
        bytes: &[u8],
        header: &SpriteHeader,
        layers: &LayerTable<'_>,
        tile_size: u16,
    ) -> Result<Self> {
        if tile_size == 0 {
            return Err(AsepriteParseError::InvalidTileSize(tile_size));
        }
        let mut tile_count = 0;
        let mut slice_count = 0;
        for frame in Frames::new(bytes, header) {
            for chunk in frame?.chunks() {
                let chunk = chunk?;
                if chunk.chunk_type != ChunkType::Slice {
                    continue;
                }
                let slice = slice::parse_chunk(chunk.data)?;
                let tiles =
                    tile::tiles_in(&slice, slice_count, tile_size, header.width, header.height)?;
                tile_count = tile::add_tiles(tile_count, tiles)?;
                slice_count += 1;
            }
        }
        if slice_count == 0 {
            return Err(AsepriteParseError::NoSlices);
        }
        Ok(TileLayout {
            header: *header,
            tile_size,
            tile_count,
            slice_count,
            scratch_len: largest_scratch(bytes, header, layers, 1)?,
        })
    }

    /// Width of the tile strip in pixels.
    pub fn strip_width(&self) -> usize {
        self.tile_count as usize * self.tile_size as usize
    }

    /// Pixels in the tile strip.
    pub fn tiles_len(&self) -> usize {
        self.strip_width() * self.tile_size as usize
    }

    /// Pixels in the composited first frame the tiles are cut from.
    pub fn canvas_len(&self) -> usize {
        self.header.frame_len()
    }

    /// Index into the tile strip of pixel (`x`, `y`) of tile `id`.
    pub fn pixel_index(&self, id: tile::TileId, x: u16, y: u16) -> Option<usize> {
        if id.is_empty() || id.0 > self.tile_count || x >= self.tile_size || y >= self.tile_size {
            return None;
        }
        let column = (id.0 as usize - 1) * self.tile_size as usize + x as usize;
        Some(y as usize * self.strip_width() + column)
    }
}

const FILE_MAGIC: u16 = 0xA5E0;
const FRAME_MAGIC: u16 = 0xF1FA;
const HEADER_SIZE: usize = 128;
const FRAME_HEADER_SIZE: usize = 16;
const CHUNK_HEADER_SIZE: usize = 6;

/// Composites every frame of the file into `strip`, left to right.
///
/// Raw cels are read in place; compressed cels are inflated into `scratch`
/// one at a time. Both buffers may be heap-backed or fixed-capacity.
pub fn decode_sprite_into<P: PixelBuffer, S: PixelBuffer>(
    bytes: &[u8],
    options: &ParseOptions,
    strip: &mut P,
    scratch: &mut S,
) -> Result<SpriteHeader> {
    let header = SpriteHeader::parse(bytes)?;
    let layers = scan_layers(bytes, &header)?;
    compose_frames(
        bytes,
        &header,
        &layers,
        options,
        header.num_frames,
        strip,
        scratch,
    )?;
    Ok(header)
}

/// Composites the first frame into `canvas`, cuts every slice of it into
/// `tile_size` squares, and writes them to `tiles` as one row of tiles.
///
/// Slices are pushed to `slices` in file order.
pub fn decode_tilesheet_into<'a, C, S, T, L>(
    bytes: &'a [u8],
    tile_size: u16,
    options: &ParseOptions,
    canvas: &mut C,
    scratch: &mut S,
    tiles: &mut T,
    slices: &mut L,
) -> Result<TileLayout>
where
    C: PixelBuffer,
    S: PixelBuffer,
    T: PixelBuffer,
    L: SliceList<'a>,
{
    let header = SpriteHeader::parse(bytes)?;
    let layers = scan_layers(bytes, &header)?;
    let layout = TileLayout::scan_with(bytes, &header, &layers, tile_size)?;
    collect_slices(bytes, &header, slices)?;

    compose_frames(bytes, &header, &layers, options, 1, canvas, scratch)?;
    tile::rasterize(
        canvas.pixels(),
        header.width,
        header.height,
        slices.as_slice(),
        tile_size,
        options.max_buffer_len,
        tiles,
    )?;
    Ok(layout)
}

fn scan_layers<'a>(bytes: &'a [u8], header: &SpriteHeader) -> Result<LayerTable<'a>> {
    let mut layers = LayerTable::new();
    for frame in Frames::new(bytes, header) {
        for chunk in frame?.chunks() {
            let chunk = chunk?;
            match chunk.chunk_type {
                ChunkType::Layer => {
                    let layer = layer::parse_layer_chunk(chunk.data)?;
                    debug!(
                        "Layer {} '{}': {:?} {:?}",
                        layers.len(),
                        layer.name,
                        layer.layer_type,
                        layer.flags
                    );
                    layers.push(layer)?;
                }
                ChunkType::Cel | ChunkType::Slice | ChunkType::UserData => {}
                ignored => debug!("Ignoring chunk type: {:?}", ignored),
            }
        }
    }
    Ok(layers)
}

fn largest_scratch(
    bytes: &[u8],
    header: &SpriteHeader,
    layers: &LayerTable<'_>,
    frame_limit: u16,
) -> Result<usize> {
    let mut largest = 0;
    for frame in Frames::new(bytes, header).take(frame_limit as usize) {
        for chunk in frame?.chunks() {
            let chunk = chunk?;
            if chunk.chunk_type != ChunkType::Cel {
                continue;
            }
            let raw = cel::parse_chunk(chunk.data)?;
            if layers.is_visible(raw.data.layer_index)? {
                largest = largest.max(raw.scratch_len());
            }
        }
    }
    Ok(largest)
}

fn collect_slices<'a, L: SliceList<'a>>(
    bytes: &'a [u8],
    header: &SpriteHeader,
    slices: &mut L,
) -> Result<()> {
    for frame in Frames::new(bytes, header) {
        let mut after_slice = false;
        for chunk in frame?.chunks() {
            let Chunk { chunk_type, data } = chunk?;
            match chunk_type {
                ChunkType::Slice => {
                    slices.push(slice::parse_chunk(data)?)?;
                    after_slice = true;
                    continue;
                }
                ChunkType::UserData if after_slice => {
                    let user_data = user_data::parse_userdata_chunk(data)?;
                    if let (Some(text), Some(slice)) = (user_data.text, slices.last_mut()) {
                        slice.user_data = text;
                    }
                }
                ChunkType::UserData => {
                    debug!("Ignoring user data that does not follow a slice");
                }
                _ => {}
            }
            after_slice = false;
        }
    }
    Ok(())
}

fn compose_frames<P: PixelBuffer, S: PixelBuffer>(
    bytes: &[u8],
    header: &SpriteHeader,
    layers: &LayerTable<'_>,
    options: &ParseOptions,
    frame_limit: u16,
    strip: &mut P,
    scratch: &mut S,
) -> Result<()> {
    let needed = header.frame_len() * frame_limit as usize;
    if needed > options.max_buffer_len {
        return Err(AsepriteParseError::CapacityExceeded {
            needed,
            capacity: options.max_buffer_len,
        });
    }
    let pixels = strip.prepare(needed)?;

    for frame in Frames::new(bytes, header).take(frame_limit as usize) {
        let frame = frame?;
        let mut canvas = FrameCanvas::in_strip(
            &mut *pixels,
            header.width,
            header.height,
            frame.index,
        );
        for chunk in frame.chunks() {
            let chunk = chunk?;
            if chunk.chunk_type != ChunkType::Cel {
                continue;
            }
            let raw = cel::parse_chunk(chunk.data)?;
            let layer_index = raw.data.layer_index;
            if !layers.is_visible(layer_index)? {
                debug!(
                    "Skipping cel of hidden layer {} in frame {}",
                    layer_index, frame.index
                );
                continue;
            }
            let cel = raw.decode(scratch, &options.inflate, options.max_buffer_len)?;
            canvas.blit(&cel);
        }
    }
    Ok(())
}

struct Frames<'a> {
    data: &'a [u8],
    pos: usize,
    index: u16,
    count: u16,
}

impl<'a> Frames<'a> {
    fn new(data: &'a [u8], header: &SpriteHeader) -> Self {
        Frames {
            data,
            pos: HEADER_SIZE,
            index: 0,
            count: header.num_frames,
        }
    }

    fn read_frame(&mut self) -> Result<Frame<'a>> {
        let rest = self.data.get(self.pos..).unwrap_or(&[]);
        let mut reader = AseReader::new(rest);
        let num_bytes = reader.dword()?;
        let magic_number = reader.word()?;
        if magic_number != FRAME_MAGIC {
            return Err(AsepriteParseError::InvalidMagic {
                context: "frame",
                expected: FRAME_MAGIC,
                found: magic_number,
            });
        }
        let old_num_chunks = reader.word()?;
        let _frame_duration_ms = reader.word()?;
        reader.skip_reserved(2)?;
        let new_num_chunks = reader.dword()?;

        let size = num_bytes as usize;
        if size < FRAME_HEADER_SIZE || size > rest.len() {
            return Err(AsepriteParseError::InvalidFrameSize {
                frame: self.index,
                size: num_bytes,
            });
        }

        let num_chunks = if new_num_chunks == 0 {
            old_num_chunks as u32
        } else {
            new_num_chunks
        };

        let frame = Frame {
            index: self.index,
            num_chunks,
            body: &rest[FRAME_HEADER_SIZE..size],
        };
        self.pos += size;
        self.index += 1;
        Ok(frame)
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<Frame<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let frame = self.read_frame();
        if frame.is_err() {
            self.index = self.count;
        }
        Some(frame)
    }
}

struct Frame<'a> {
    index: u16,
    num_chunks: u32,
    body: &'a [u8],
}

impl<'a> Frame<'a> {
    fn chunks(&self) -> Chunks<'a> {
        Chunks {
            data: self.body,
            pos: 0,
            remaining: self.num_chunks,
        }
    }
}

struct Chunks<'a> {
    data: &'a [u8],
    pos: usize,
    remaining: u32,
}

impl<'a> Chunks<'a> {
    fn read_chunk(&mut self) -> Result<Chunk<'a>> {
        let rest = &self.data[self.pos..];
        let mut reader = AseReader::new(rest);
        let chunk_size = reader.dword()?;
        let chunk_type = parse_chunk_type(reader.word()?);

        check_chunk_bytes(chunk_size, rest.len())?;

        let data = &rest[CHUNK_HEADER_SIZE..chunk_size as usize];
        self.pos += chunk_size as usize;
        Ok(Chunk { chunk_type, data })
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let chunk = self.read_chunk();
        if chunk.is_err() {
            self.remaining = 0;
        }
        Some(chunk)
    }
}

struct Chunk<'a> {
    chunk_type: ChunkType,
    data: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkType {
    OldPalette04, // deprecated
    OldPalette11, // deprecated
    Palette,
    Layer,
    Cel,
    CelExtra,
    ColorProfile,
    ExternalFiles,
    Mask, // deprecated
    Path,
    Tags,
    UserData,
    Slice,
    Tileset,
    Unknown(u16),
}

fn parse_chunk_type(chunk_type: u16) -> ChunkType {
    match chunk_type {
        0x0004 => ChunkType::OldPalette04,
        0x0011 => ChunkType::OldPalette11,
        0x2004 => ChunkType::Layer,
        0x2005 => ChunkType::Cel,
        0x2006 => ChunkType::CelExtra,
        0x2007 => ChunkType::ColorProfile,
        0x2008 => ChunkType::ExternalFiles,
        0x2016 => ChunkType::Mask,
        0x2017 => ChunkType::Path,
        0x2018 => ChunkType::Tags,
        0x2019 => ChunkType::Palette,
        0x2020 => ChunkType::UserData,
        0x2022 => ChunkType::Slice,
        0x2023 => ChunkType::Tileset,
        other => ChunkType::Unknown(other),
    }
}

fn check_chunk_bytes(chunk_size: u32, bytes_available: usize) -> Result<()> {
    if (chunk_size as usize) < CHUNK_HEADER_SIZE || chunk_size as usize > bytes_available {
        return Err(AsepriteParseError::InvalidChunkSize {
            size: chunk_size,
            available: bytes_available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::AseBuilder;

    #[test]
    fn header_fields() {
        let bytes = AseBuilder::new(7, 5).frames(3).build();
        let header = SpriteHeader::parse(&bytes).unwrap();
        assert_eq!((header.width, header.height, header.num_frames), (7, 5, 3));
        assert_eq!(header.strip_width(), 21);
        assert_eq!(header.strip_len(), 105);
    }

    #[test]
    fn bad_file_magic() {
        let mut bytes = AseBuilder::new(4, 4).build();
        bytes[4] = 0x00;
        assert!(matches!(
            SpriteHeader::parse(&bytes),
            Err(AsepriteParseError::InvalidMagic {
                context: "file",
                expected: 0xA5E0,
                found: 0xA500,
            })
        ));
    }

    #[test]
    fn rgba_is_unsupported() {
        let bytes = AseBuilder::new(4, 4).color_depth(32).build();
        assert!(matches!(
            SpriteHeader::parse(&bytes),
            Err(AsepriteParseError::UnsupportedColorDepth(32))
        ));
    }

    #[test]
    fn truncated_header() {
        let bytes = AseBuilder::new(4, 4).build();
        assert!(matches!(
            SpriteHeader::parse(&bytes[..100]),
            Err(AsepriteParseError::IoError(_))
        ));
    }

    #[test]
    fn new_chunk_count_wins_over_old() {
        let bytes = AseBuilder::new(2, 2)
            .layer("a", true)
            .layer("b", true)
            .chunk_counts(1, 2)
            .build();
        let header = SpriteHeader::parse(&bytes).unwrap();
        let layers = scan_layers(&bytes, &header).unwrap();
        assert_eq!(layers.len(), 2);

        let bytes = AseBuilder::new(2, 2)
            .layer("a", true)
            .layer("b", true)
            .chunk_counts(1, 0)
            .build();
        let layers = scan_layers(&bytes, &header).unwrap();
        assert_eq!(layers.len(), 1);
    }

    #[test]
    fn oversized_chunk() {
        let mut bytes = AseBuilder::new(2, 2).layer("a", true).build();
        // First chunk size field sits right after the frame header.
        let at = HEADER_SIZE + FRAME_HEADER_SIZE;
        bytes[at..at + 4].copy_from_slice(&1000u32.to_le_bytes());
        let header = SpriteHeader::parse(&bytes).unwrap();
        assert!(matches!(
            scan_layers(&bytes, &header),
            Err(AsepriteParseError::InvalidChunkSize { size: 1000, .. })
        ));
    }

    #[test]
    fn undersized_chunk() {
        let mut bytes = AseBuilder::new(2, 2).layer("a", true).build();
        let at = HEADER_SIZE + FRAME_HEADER_SIZE;
        bytes[at..at + 4].copy_from_slice(&3u32.to_le_bytes());
        let header = SpriteHeader::parse(&bytes).unwrap();
        assert!(matches!(
            scan_layers(&bytes, &header),
            Err(AsepriteParseError::InvalidChunkSize { size: 3, .. })
        ));
    }

    #[test]
    fn bad_frame_magic_and_size() {
        let mut bytes = AseBuilder::new(2, 2).layer("a", true).build();
        bytes[HEADER_SIZE + 4] = 0;
        let header = SpriteHeader::parse(&bytes).unwrap();
        assert!(matches!(
            scan_layers(&bytes, &header),
            Err(AsepriteParseError::InvalidMagic {
                context: "frame",
                ..
            })
        ));

        let mut bytes = AseBuilder::new(2, 2).layer("a", true).build();
        bytes[HEADER_SIZE..HEADER_SIZE + 4].copy_from_slice(&8u32.to_le_bytes());
        assert!(matches!(
            scan_layers(&bytes, &header),
            Err(AsepriteParseError::InvalidFrameSize { frame: 0, size: 8 })
        ));
    }

    #[test]
    fn missing_frames() {
        let bytes = AseBuilder::new(2, 2).build();
        let mut header = SpriteHeader::parse(&bytes).unwrap();
        header.num_frames = 2;
        assert!(matches!(
            scan_layers(&bytes, &header),
            Err(AsepriteParseError::IoError(_))
        ));
    }

    #[test]
    fn user_data_attaches_only_after_slice() {
        let bytes = AseBuilder::new(8, 8)
            .slice("a", 0, 0, 8, 8)
            .user_data(Some("solid"))
            .layer("l", true)
            .user_data(Some("layer data"))
            .slice("b", 0, 0, 8, 8)
            .slice("c", 0, 0, 8, 8)
            .user_data(None)
            .build();
        let header = SpriteHeader::parse(&bytes).unwrap();
        let mut slices: Vec<crate::Slice<'_>> = Vec::new();
        collect_slices(&bytes, &header, &mut slices).unwrap();
        let data: Vec<(&str, &str)> = slices.iter().map(|s| (s.name, s.user_data)).collect();
        assert_eq!(data, vec![("a", "solid"), ("b", ""), ("c", "")]);
    }

    #[test]
    fn unknown_chunks_are_skipped() {
        let bytes = AseBuilder::new(2, 2)
            .raw_chunk(0x7777, &[1, 2, 3])
            .raw_chunk(0x2019, &[0; 20])
            .layer("a", true)
            .build();
        let header = SpriteHeader::parse(&bytes).unwrap();
        assert_eq!(scan_layers(&bytes, &header).unwrap().len(), 1);
    }

    #[test]
    fn tile_layout_indexing() {
        let layout = TileLayout {
            header: SpriteHeader {
                width: 16,
                height: 16,
                num_frames: 1,
                transparent_index: 0,
            },
            tile_size: 4,
            tile_count: 3,
            slice_count: 1,
            scratch_len: 0,
        };
        assert_eq!(layout.strip_width(), 12);
        assert_eq!(layout.tiles_len(), 48);
        assert_eq!(layout.canvas_len(), 256);
        assert_eq!(layout.pixel_index(tile::TileId(1), 0, 0), Some(0));
        assert_eq!(layout.pixel_index(tile::TileId(3), 1, 2), Some(2 * 12 + 9));
        assert_eq!(layout.pixel_index(tile::TileId::EMPTY, 0, 0), None);
        assert_eq!(layout.pixel_index(tile::TileId(4), 0, 0), None);
        assert_eq!(layout.pixel_index(tile::TileId(1), 4, 0), None);
    }

    thread_local! {
        static IGNORED_CHUNK_LOGS: std::cell::Cell<usize> = std::cell::Cell::new(0);
    }

    struct CountingLogger;

    impl log::Log for CountingLogger {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            if record.args().to_string().starts_with("Ignoring chunk type") {
                IGNORED_CHUNK_LOGS.with(|count| count.set(count.get() + 1));
            }
        }

        fn flush(&self) {}
    }

    fn ignored_chunk_logs(decode: impl FnOnce()) -> usize {
        static LOGGER: CountingLogger = CountingLogger;
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Trace);
            }
        });
        IGNORED_CHUNK_LOGS.with(|count| count.set(0));
        decode();
        IGNORED_CHUNK_LOGS.with(|count| count.get())
    }

    #[test]
    fn ignored_chunks_are_logged_once_per_decode() {
        let bytes = AseBuilder::new(2, 2)
            .raw_chunk(0x7777, &[1, 2, 3])
            .raw_chunk(0x2019, &[0; 20])
            .raw_cel(0, 0, 0, 2, 2, &[1, 2, 3, 4])
            .slice("all", 0, 0, 2, 2)
            .build();
        assert_eq!(
            ignored_chunk_logs(|| {
                crate::parse_tilesheet(&bytes, 2).unwrap();
            }),
            2
        );
        assert_eq!(
            ignored_chunk_logs(|| {
                crate::parse_sprite(&bytes).unwrap();
            }),
            2
        );
        assert_eq!(
            ignored_chunk_logs(|| {
                TileLayout::scan(&bytes, 2).unwrap();
            }),
            2
        );
    }
}
