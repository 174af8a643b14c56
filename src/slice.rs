use crate::{reader::AseReader, AsepriteParseError, Result};
use bitflags::bitflags;

bitflags! {
    struct SliceFlags: u32 {
        /// Keys carry 9-patch center rectangles.
        const NINE_PATCH = 0x0001;
        /// Keys carry pivot points.
        const PIVOT = 0x0002;
    }
}

/// A named rectangle of the sprite, taken from the slice's first key.
///
/// Strings borrow from the file buffer the slice was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slice<'a> {
    /// Slice name as entered in Aseprite.
    pub name: &'a str,
    /// Frame the first key starts at.
    pub from_frame: u32,
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Text of the user data chunk attached to this slice, or `""`.
    pub user_data: &'a str,
}

impl<'a> Slice<'a> {
    /// Returns `true` if the slice lies inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

pub(crate) fn parse_chunk(data: &[u8]) -> Result<Slice<'_>> {
    let mut reader = AseReader::new(data);

    let num_slice_keys = reader.dword()?;
    let flags = SliceFlags::from_bits_truncate(reader.dword()?);
    let _reserved = reader.dword()?;
    let name = reader.string()?;

    if num_slice_keys == 0 {
        return Err(AsepriteParseError::SliceWithoutKeys);
    }
    // Only the first key is used. Later keys and the optional 9-patch and
    // pivot fields of the first key are left unread.
    let from_frame = reader.dword()?;
    let x = reader.long()?;
    let y = reader.long()?;
    let width = reader.dword()?;
    let height = reader.dword()?;
    if flags.contains(SliceFlags::NINE_PATCH) {
        reader.skip_reserved(16)?;
    }
    if flags.contains(SliceFlags::PIVOT) {
        reader.skip_reserved(8)?;
    }

    Ok(Slice {
        name,
        from_frame,
        x,
        y,
        width,
        height,
        user_data: "",
    })
}
