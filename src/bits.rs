use crate::InflateError;

/// Reads DEFLATE's least-significant-bit-first bit stream from a byte slice.
pub(crate) struct BitReader<'a> {
    input: &'a [u8],
    byte_pos: usize,
    // Only the low `bit_count` bits are valid. Holds at most 39 bits.
    bit_buf: u64,
    bit_count: u32,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        BitReader {
            input,
            byte_pos: 0,
            bit_buf: 0,
            bit_count: 0,
        }
    }

    fn refill(&mut self, need: u32) -> Result<(), InflateError> {
        while self.bit_count < need {
            let byte = *self
                .input
                .get(self.byte_pos)
                .ok_or(InflateError::UnexpectedEof)?;
            self.byte_pos += 1;
            self.bit_buf |= (byte as u64) << self.bit_count;
            self.bit_count += 8;
        }
        Ok(())
    }

    /// Reads `n` bits (at most 32), first bit in the least significant position.
    pub(crate) fn read(&mut self, n: u32) -> Result<u32, InflateError> {
        debug_assert!(n <= 32);
        if n == 0 {
            return Ok(0);
        }
        self.refill(n)?;
        let value = (self.bit_buf & ((1u64 << n) - 1)) as u32;
        self.bit_buf >>= n;
        self.bit_count -= n;
        Ok(value)
    }

    /// Discards the bits left in the current byte.
    pub(crate) fn align_to_byte(&mut self) {
        let partial = self.bit_count % 8;
        self.bit_buf >>= partial;
        self.bit_count -= partial;
    }

    /// Byte-aligns and returns the next `len` input bytes unchanged.
    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], InflateError> {
        self.align_to_byte();
        // Whole bytes still sitting in the accumulator have not been used.
        self.byte_pos -= (self.bit_count / 8) as usize;
        self.bit_buf = 0;
        self.bit_count = 0;

        let end = self
            .byte_pos
            .checked_add(len)
            .filter(|&end| end <= self.input.len())
            .ok_or(InflateError::UnexpectedEof)?;
        let bytes = &self.input[self.byte_pos..end];
        self.byte_pos = end;
        Ok(bytes)
    }
}
