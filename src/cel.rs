use crate::buffer::PixelBuffer;
use crate::inflate::{zlib_decompress_into, InflateOptions};
use crate::reader::AseReader;
use crate::{AsepriteParseError, Result};
use log::trace;
use std::fmt;
use std::ops::Deref;

/// Fields common to every cel type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CelData {
    pub layer_index: u16,
    pub x: i16,
    pub y: i16,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ImageSize {
    pub width: u16,
    pub height: u16,
}

impl ImageSize {
    fn parse(reader: &mut AseReader<'_>) -> Result<Self> {
        let width = reader.word()?;
        let height = reader.word()?;
        Ok(Self { width, height })
    }

    pub(crate) fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Pixel payload of a cel as it sits in the file.
pub(crate) enum CelContent<'a> {
    Raw(&'a [u8]),
    Compressed(&'a [u8]),
}

impl fmt::Debug for CelContent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CelContent::Raw(data) => write!(f, "Raw(<{} bytes>)", data.len()),
            CelContent::Compressed(data) => write!(f, "Compressed(<{} bytes>)", data.len()),
        }
    }
}

#[derive(Debug)]
pub(crate) struct RawCel<'a> {
    pub data: CelData,
    pub size: ImageSize,
    pub content: CelContent<'a>,
}

/// Indexed pixels of a cel: either borrowed straight from the file, or
/// decompressed into a scratch buffer owned by the caller.
#[derive(Debug, Clone, Copy)]
pub(crate) enum CelPixels<'a, 's> {
    Borrowed(&'a [u8]),
    Decoded(&'s [u8]),
}

impl Deref for CelPixels<'_, '_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            CelPixels::Borrowed(pixels) => pixels,
            CelPixels::Decoded(pixels) => pixels,
        }
    }
}

/// A cel ready to be composited.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cel<'a, 's> {
    pub x: i16,
    pub y: i16,
    pub size: ImageSize,
    pub pixels: CelPixels<'a, 's>,
}

impl<'a> RawCel<'a> {
    /// Scratch bytes needed to decode the cel. Raw cels need none.
    pub(crate) fn scratch_len(&self) -> usize {
        match self.content {
            CelContent::Raw(_) => 0,
            CelContent::Compressed(_) => self.size.pixel_count(),
        }
    }

    /// Resolves the pixel data. Compressed cels are inflated into `scratch`.
    pub(crate) fn decode<'s, S: PixelBuffer>(
        &self,
        scratch: &'s mut S,
        options: &InflateOptions,
        max_len: usize,
    ) -> Result<Cel<'a, 's>> {
        let pixel_count = self.size.pixel_count();
        let pixels = match self.content {
            CelContent::Raw(pixels) => {
                if pixels.len() < pixel_count {
                    return Err(AsepriteParseError::eof());
                }
                CelPixels::Borrowed(&pixels[..pixel_count])
            }
            CelContent::Compressed(stream) => {
                if pixel_count > max_len {
                    return Err(AsepriteParseError::CapacityExceeded {
                        needed: pixel_count,
                        capacity: max_len,
                    });
                }
                zlib_decompress_into(stream, scratch.prepare(pixel_count)?, options)?;
                let scratch: &'s S = scratch;
                trace!(
                    "inflated {} bytes into {} pixels for layer {}",
                    stream.len(),
                    pixel_count,
                    self.data.layer_index
                );
                CelPixels::Decoded(scratch.pixels())
            }
        };
        Ok(Cel {
            x: self.data.x,
            y: self.data.y,
            size: self.size,
            pixels,
        })
    }
}

pub(crate) fn parse_chunk(data: &[u8]) -> Result<RawCel<'_>> {
    let mut reader = AseReader::new(data);
    let layer_index = reader.word()?;
    let x = reader.short()?;
    let y = reader.short()?;
    let _opacity = reader.byte()?;
    let cel_type = reader.word()?;
    let _z_index = reader.short()?;
    reader.skip_reserved(5)?;

    let size = match cel_type {
        0 | 2 => ImageSize::parse(&mut reader)?,
        _ => return Err(AsepriteParseError::UnsupportedCelType(cel_type)),
    };
    let content = if cel_type == 0 {
        CelContent::Raw(reader.rest())
    } else {
        CelContent::Compressed(reader.rest())
    };

    Ok(RawCel {
        data: CelData { layer_index, x, y },
        size,
        content,
    })
}
