use crate::buffer::FixedBuffer;
use crate::parse::{decode_sprite_into, ParseOptions, SpriteHeader};
use crate::Result;

/// All frames of a file composited into one indexed-color strip.
///
/// Frame `i` occupies columns `i * frame_width()` up to
/// `(i + 1) * frame_width()`. Pixel value 0 is transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    header: SpriteHeader,
    pixels: Vec<u8>,
}

impl Sprite {
    /// Width of a single frame in pixels.
    pub fn frame_width(&self) -> u16 {
        self.header.width
    }

    /// Height of the sprite in pixels.
    pub fn frame_height(&self) -> u16 {
        self.header.height
    }

    /// Number of frames in the strip.
    pub fn num_frames(&self) -> u16 {
        self.header.num_frames
    }

    /// Width of the whole strip in pixels.
    pub fn strip_width(&self) -> usize {
        self.header.strip_width()
    }

    /// The file header.
    pub fn header(&self) -> &SpriteHeader {
        &self.header
    }

    /// Row-major palette indices of the strip.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Strip pixel at (`x`, `y`), if inside the strip.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        strip_pixel(&self.header, &self.pixels, x, y)
    }

    /// Pixel at (`x`, `y`) of frame `frame`.
    pub fn frame_pixel(&self, frame: u16, x: u16, y: u16) -> Option<u8> {
        frame_pixel(&self.header, &self.pixels, frame, x, y)
    }

    /// Consumes the sprite and returns its pixels.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Decodes a file into a heap-allocated [Sprite] with default options.
pub fn parse_sprite(bytes: &[u8]) -> Result<Sprite> {
    parse_sprite_with(bytes, &ParseOptions::default())
}

/// Decodes a file into a heap-allocated [Sprite].
pub fn parse_sprite_with(bytes: &[u8], options: &ParseOptions) -> Result<Sprite> {
    let mut pixels = Vec::new();
    let mut scratch: Vec<u8> = Vec::new();
    let header = decode_sprite_into(bytes, options, &mut pixels, &mut scratch)?;
    Ok(Sprite { header, pixels })
}

/// A [Sprite] whose strip lives inline in at most `N` bytes.
///
/// Compressed cels are inflated into `C` bytes of stack scratch space while
/// decoding, so the heap is never touched. Cels may reach past the frame
/// edges, so `C` can need to be larger than a frame. Files that do not fit
/// are rejected with
/// [AsepriteParseError::CapacityExceeded](crate::AsepriteParseError::CapacityExceeded).
/// [SpriteLayout::scan](crate::SpriteLayout::scan) reports both sizes.
///
/// ```
/// # use asesheet::{FixedSprite, SpriteLayout};
/// # fn load(bytes: &[u8]) -> asesheet::Result<()> {
/// let layout = SpriteLayout::scan(bytes)?;
/// assert!(layout.strip_len() <= 4096 && layout.scratch_len <= 1024);
/// let sprite = FixedSprite::<4096, 1024>::parse(bytes)?;
/// assert_eq!(sprite.pixels().len(), layout.strip_len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FixedSprite<const N: usize, const C: usize> {
    header: SpriteHeader,
    pixels: FixedBuffer<N>,
}

impl<const N: usize, const C: usize> FixedSprite<N, C> {
    /// Decodes `bytes` with default options.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::parse_with(bytes, &ParseOptions::default())
    }

    /// Decodes `bytes`.
    pub fn parse_with(bytes: &[u8], options: &ParseOptions) -> Result<Self> {
        let mut pixels = FixedBuffer::new();
        let mut scratch = FixedBuffer::<C>::new();
        let header = decode_sprite_into(bytes, options, &mut pixels, &mut scratch)?;
        Ok(FixedSprite { header, pixels })
    }

    /// Decodes an asset that ships with the program.
    ///
    /// Meant for build scripts and one-time initialization of embedded
    /// assets, where a broken asset should stop the build.
    ///
    /// # Panics
    ///
    /// Panics if the file does not fit the capacities.
    pub fn embed(bytes: &[u8]) -> Self {
        match Self::parse(bytes) {
            Ok(sprite) => sprite,
            Err(err) => panic!("cannot embed sprite: {}", err),
        }
    }

    /// Width of a single frame in pixels.
    pub fn frame_width(&self) -> u16 {
        self.header.width
    }

    /// Height of the sprite in pixels.
    pub fn frame_height(&self) -> u16 {
        self.header.height
    }

    /// Number of frames in the strip.
    pub fn num_frames(&self) -> u16 {
        self.header.num_frames
    }

    /// Width of the whole strip in pixels.
    pub fn strip_width(&self) -> usize {
        self.header.strip_width()
    }

    /// The file header.
    pub fn header(&self) -> &SpriteHeader {
        &self.header
    }

    /// Row-major palette indices of the strip.
    pub fn pixels(&self) -> &[u8] {
        crate::buffer::PixelBuffer::pixels(&self.pixels)
    }

    /// Strip pixel at (`x`, `y`), if inside the strip.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        strip_pixel(&self.header, self.pixels(), x, y)
    }

    /// Pixel at (`x`, `y`) of frame `frame`.
    pub fn frame_pixel(&self, frame: u16, x: u16, y: u16) -> Option<u8> {
        frame_pixel(&self.header, self.pixels(), frame, x, y)
    }
}

fn strip_pixel(header: &SpriteHeader, pixels: &[u8], x: usize, y: usize) -> Option<u8> {
    let width = header.strip_width();
    if x >= width || y >= header.height as usize {
        return None;
    }
    pixels.get(y * width + x).copied()
}

fn frame_pixel(header: &SpriteHeader, pixels: &[u8], frame: u16, x: u16, y: u16) -> Option<u8> {
    if frame >= header.num_frames || x >= header.width {
        return None;
    }
    let column = frame as usize * header.width as usize + x as usize;
    strip_pixel(header, pixels, column, y as usize)
}
