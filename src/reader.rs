use crate::{AsepriteParseError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

fn to_ase(e: std::io::Error) -> AsepriteParseError {
    e.into()
}

/// Little-endian field reader over a byte slice. Strings and byte runs are
/// handed out as borrows of the input, never copied.
pub(crate) struct AseReader<'a> {
    input: Cursor<&'a [u8]>,
}

impl<'a> AseReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        AseReader {
            input: Cursor::new(data),
        }
    }

    pub(crate) fn byte(&mut self) -> Result<u8> {
        self.input.read_u8().map_err(to_ase)
    }

    pub(crate) fn word(&mut self) -> Result<u16> {
        self.input.read_u16::<LittleEndian>().map_err(to_ase)
    }

    pub(crate) fn short(&mut self) -> Result<i16> {
        self.input.read_i16::<LittleEndian>().map_err(to_ase)
    }

    pub(crate) fn dword(&mut self) -> Result<u32> {
        self.input.read_u32::<LittleEndian>().map_err(to_ase)
    }

    pub(crate) fn long(&mut self) -> Result<i32> {
        self.input.read_i32::<LittleEndian>().map_err(to_ase)
    }

    pub(crate) fn position(&self) -> usize {
        self.input.position() as usize
    }

    fn data(&self) -> &'a [u8] {
        *self.input.get_ref()
    }

    /// The next `len` bytes.
    pub(crate) fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let data = self.data();
        let start = self.position().min(data.len());
        let end = start
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or_else(AsepriteParseError::eof)?;
        self.input.set_position(end as u64);
        Ok(&data[start..end])
    }

    /// Everything that has not been read yet.
    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let data = self.data();
        let start = self.position().min(data.len());
        self.input.set_position(data.len() as u64);
        &data[start..]
    }

    pub(crate) fn string(&mut self) -> Result<&'a str> {
        let str_len = self.word()?;
        let bytes = self.bytes(str_len as usize)?;
        Ok(std::str::from_utf8(bytes)?)
    }

    pub(crate) fn skip_reserved(&mut self, count: usize) -> Result<()> {
        self.bytes(count).map(|_| ())
    }
}
