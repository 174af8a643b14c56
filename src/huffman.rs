use crate::bits::BitReader;
use crate::InflateError;

/// Longest code DEFLATE allows.
pub(crate) const MAX_BITS: usize = 15;

/// Largest alphabet used by DEFLATE (fixed literal/length code).
const MAX_SYMBOLS: usize = 288;

/// A canonical Huffman code stored as per-length counts plus the symbols in
/// (length, code) order. Code values are never stored; they follow from the
/// counts.
pub(crate) struct Huffman {
    counts: [u16; MAX_BITS + 1],
    symbols: [u16; MAX_SYMBOLS],
}

impl Huffman {
    /// Builds the table from one code length per symbol (0 = unused).
    ///
    /// Incomplete codes are accepted; decoding an unassigned bit pattern then
    /// fails with [InflateError::InvalidCode].
    pub(crate) fn from_lengths(lengths: &[u8]) -> Result<Self, InflateError> {
        debug_assert!(lengths.len() <= MAX_SYMBOLS);
        let mut counts = [0u16; MAX_BITS + 1];
        for &len in lengths {
            if len as usize > MAX_BITS {
                return Err(InflateError::CodeLengthTooLong(len));
            }
            counts[len as usize] += 1;
        }
        counts[0] = 0;

        let mut left: i32 = 1;
        for &count in &counts[1..] {
            left = (left << 1) - count as i32;
            if left < 0 {
                return Err(InflateError::OversubscribedCode);
            }
        }

        // Counting sort: offsets[len] is the first slot for codes of `len` bits.
        let mut offsets = [0u16; MAX_BITS + 1];
        for len in 1..MAX_BITS {
            offsets[len + 1] = offsets[len] + counts[len];
        }
        let mut symbols = [0u16; MAX_SYMBOLS];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len != 0 {
                symbols[offsets[len as usize] as usize] = symbol as u16;
                offsets[len as usize] += 1;
            }
        }

        Ok(Huffman { counts, symbols })
    }

    /// Reads one symbol, growing the candidate code a bit at a time.
    pub(crate) fn decode(&self, bits: &mut BitReader<'_>) -> Result<u16, InflateError> {
        let mut code: i32 = 0;
        let mut first: i32 = 0;
        let mut index: i32 = 0;
        for len in 1..=MAX_BITS {
            code |= bits.read(1)? as i32;
            let count = self.counts[len] as i32;
            if code - first < count {
                return Ok(self.symbols[(index + code - first) as usize]);
            }
            index += count;
            first = (first + count) << 1;
            code <<= 1;
        }
        Err(InflateError::InvalidCode)
    }
}
