//! zlib (RFC 1950) and DEFLATE (RFC 1951) decompression.
//!
//! The decoder writes into a caller-provided buffer whose length is the
//! exact expected output size. It never allocates, which lets the same code
//! serve both heap-backed and fixed-capacity callers.

use crate::bits::BitReader;
use crate::huffman::Huffman;
use crate::InflateError;
use log::trace;

const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];
const DIST_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];
const DIST_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];
const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

const MAX_LITERAL_CODES: usize = 286;
const MAX_DISTANCE_CODES: usize = 30;
const END_OF_BLOCK: u16 = 256;

/// Knobs for the DEFLATE decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateOptions {
    /// Reject stored blocks whose NLEN field is not the one's complement of
    /// LEN. Well-formed producers always write it correctly.
    pub verify_stored_len: bool,
}

impl Default for InflateOptions {
    fn default() -> Self {
        InflateOptions {
            verify_stored_len: true,
        }
    }
}

/// Computes the Adler-32 checksum of `data`.
pub fn adler32(data: &[u8]) -> u32 {
    const MOD: u32 = 65521;
    // Largest run of bytes before `b` can overflow 32 bits.
    const NMAX: usize = 5552;
    let mut a: u32 = 1;
    let mut b: u32 = 0;
    for chunk in data.chunks(NMAX) {
        for &byte in chunk {
            a += byte as u32;
            b += a;
        }
        a %= MOD;
        b %= MOD;
    }
    (b << 16) | a
}

/// Decompresses a zlib stream into `out`, which must be exactly as long as
/// the decompressed data.
///
/// Fails if the header is invalid, if the stream is corrupt, if it decodes to
/// any other length than `out.len()`, or if the Adler-32 trailer does not
/// match.
pub fn zlib_decompress_into(
    data: &[u8],
    out: &mut [u8],
    options: &InflateOptions,
) -> Result<(), InflateError> {
    let mut bits = BitReader::new(data);
    let cmf = bits.read(8)? as u8;
    let flg = bits.read(8)? as u8;
    if cmf & 0x0F != 8 {
        return Err(InflateError::UnsupportedMethod(cmf & 0x0F));
    }
    if u16::from_be_bytes([cmf, flg]) % 31 != 0 {
        return Err(InflateError::HeaderChecksum);
    }
    if flg & 0x20 != 0 {
        return Err(InflateError::PresetDictionary);
    }

    let mut output = Output::new(out);
    inflate_blocks(&mut bits, &mut output, options)?;
    let actual_len = output.pos;
    let expected_len = output.buf.len();
    if actual_len != expected_len {
        return Err(InflateError::SizeMismatch {
            expected: expected_len,
            actual: actual_len,
        });
    }

    let trailer = bits.read_bytes(4)?;
    let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let actual = adler32(out);
    if expected != actual {
        return Err(InflateError::ChecksumMismatch { expected, actual });
    }
    Ok(())
}

/// Decompresses a zlib stream that is declared to hold exactly
/// `expected_len` bytes.
pub fn zlib_decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>, InflateError> {
    let mut out = vec![0u8; expected_len];
    zlib_decompress_into(data, &mut out, &InflateOptions::default())?;
    Ok(out)
}

/// Decompresses a raw DEFLATE stream (no zlib wrapper) into `out` and
/// returns the number of bytes written.
pub fn inflate_into(
    data: &[u8],
    out: &mut [u8],
    options: &InflateOptions,
) -> Result<usize, InflateError> {
    let mut bits = BitReader::new(data);
    let mut output = Output::new(out);
    inflate_blocks(&mut bits, &mut output, options)?;
    Ok(output.pos)
}

struct Output<'o> {
    buf: &'o mut [u8],
    pos: usize,
}

impl<'o> Output<'o> {
    fn new(buf: &'o mut [u8]) -> Self {
        Output { buf, pos: 0 }
    }

    fn overflow(&self) -> InflateError {
        InflateError::OutputOverflow {
            expected: self.buf.len(),
        }
    }

    fn push(&mut self, byte: u8) -> Result<(), InflateError> {
        if self.pos >= self.buf.len() {
            return Err(self.overflow());
        }
        self.buf[self.pos] = byte;
        self.pos += 1;
        Ok(())
    }

    fn extend(&mut self, bytes: &[u8]) -> Result<(), InflateError> {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(self.overflow());
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    // Byte by byte: `distance` may be shorter than `length`, in which case the
    // copy reads bytes it has just written.
    fn copy_match(&mut self, distance: usize, length: usize) -> Result<(), InflateError> {
        if distance > self.pos {
            return Err(InflateError::DistanceTooFar {
                distance,
                available: self.pos,
            });
        }
        if self.pos + length > self.buf.len() {
            return Err(self.overflow());
        }
        for _ in 0..length {
            self.buf[self.pos] = self.buf[self.pos - distance];
            self.pos += 1;
        }
        Ok(())
    }
}

fn inflate_blocks(
    bits: &mut BitReader<'_>,
    out: &mut Output<'_>,
    options: &InflateOptions,
) -> Result<(), InflateError> {
    loop {
        let is_final = bits.read(1)? == 1;
        match bits.read(2)? {
            0 => {
                trace!("stored block at output offset {}", out.pos);
                stored_block(bits, out, options)?;
            }
            1 => {
                trace!("fixed block at output offset {}", out.pos);
                let (literals, distances) = fixed_tables()?;
                compressed_block(bits, out, &literals, &distances)?;
            }
            2 => {
                trace!("dynamic block at output offset {}", out.pos);
                let (literals, distances) = dynamic_tables(bits)?;
                compressed_block(bits, out, &literals, &distances)?;
            }
            _ => return Err(InflateError::ReservedBlockType),
        }
        if is_final {
            return Ok(());
        }
    }
}

fn stored_block(
    bits: &mut BitReader<'_>,
    out: &mut Output<'_>,
    options: &InflateOptions,
) -> Result<(), InflateError> {
    let header = bits.read_bytes(4)?;
    let len = u16::from_le_bytes([header[0], header[1]]);
    let nlen = u16::from_le_bytes([header[2], header[3]]);
    if options.verify_stored_len && len != !nlen {
        return Err(InflateError::StoredLengthMismatch { len, nlen });
    }
    let payload = bits.read_bytes(len as usize)?;
    out.extend(payload)
}

fn fixed_tables() -> Result<(Huffman, Huffman), InflateError> {
    let mut lengths = [0u8; 288];
    lengths[..144].iter_mut().for_each(|l| *l = 8);
    lengths[144..256].iter_mut().for_each(|l| *l = 9);
    lengths[256..280].iter_mut().for_each(|l| *l = 7);
    lengths[280..].iter_mut().for_each(|l| *l = 8);
    let literals = Huffman::from_lengths(&lengths)?;
    let distances = Huffman::from_lengths(&[5u8; 32])?;
    Ok((literals, distances))
}

fn dynamic_tables(bits: &mut BitReader<'_>) -> Result<(Huffman, Huffman), InflateError> {
    let num_literals = bits.read(5)? as usize + 257;
    let num_distances = bits.read(5)? as usize + 1;
    let num_code_lengths = bits.read(4)? as usize + 4;
    if num_literals > MAX_LITERAL_CODES || num_distances > MAX_DISTANCE_CODES {
        return Err(InflateError::TooManyCodes {
            literals: num_literals,
            distances: num_distances,
        });
    }

    let mut code_lengths = [0u8; 19];
    for &symbol in &CODE_LENGTH_ORDER[..num_code_lengths] {
        code_lengths[symbol] = bits.read(3)? as u8;
    }
    let code_length_table = Huffman::from_lengths(&code_lengths)?;

    let total = num_literals + num_distances;
    let mut lengths = [0u8; MAX_LITERAL_CODES + MAX_DISTANCE_CODES];
    let mut filled = 0;
    while filled < total {
        let symbol = code_length_table.decode(bits)?;
        let (value, repeat) = match symbol {
            0..=15 => (symbol as u8, 1),
            16 => {
                if filled == 0 {
                    return Err(InflateError::RepeatWithoutPrevious);
                }
                (lengths[filled - 1], 3 + bits.read(2)? as usize)
            }
            17 => (0, 3 + bits.read(3)? as usize),
            _ => (0, 11 + bits.read(7)? as usize),
        };
        if filled + repeat > total {
            return Err(InflateError::TooManyLengths);
        }
        lengths[filled..filled + repeat]
            .iter_mut()
            .for_each(|l| *l = value);
        filled += repeat;
    }

    if lengths[END_OF_BLOCK as usize] == 0 {
        return Err(InflateError::MissingEndOfBlock);
    }
    let literals = Huffman::from_lengths(&lengths[..num_literals])?;
    let distances = Huffman::from_lengths(&lengths[num_literals..total])?;
    Ok((literals, distances))
}

fn compressed_block(
    bits: &mut BitReader<'_>,
    out: &mut Output<'_>,
    literals: &Huffman,
    distances: &Huffman,
) -> Result<(), InflateError> {
    loop {
        let symbol = literals.decode(bits)?;
        if symbol < END_OF_BLOCK {
            out.push(symbol as u8)?;
            continue;
        }
        if symbol == END_OF_BLOCK {
            return Ok(());
        }

        let index = (symbol - 257) as usize;
        if index >= LENGTH_BASE.len() {
            return Err(InflateError::InvalidLengthSymbol(symbol));
        }
        let length =
            LENGTH_BASE[index] as usize + bits.read(LENGTH_EXTRA[index] as u32)? as usize;

        let dist_symbol = distances.decode(bits)?;
        let dist_index = dist_symbol as usize;
        if dist_index >= DIST_BASE.len() {
            return Err(InflateError::InvalidDistanceSymbol(dist_symbol));
        }
        let distance =
            DIST_BASE[dist_index] as usize + bits.read(DIST_EXTRA[dist_index] as u32)? as usize;

        out.copy_match(distance, length)?;
    }
}
