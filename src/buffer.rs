//! Storage used by the decoder.
//!
//! The decoder never decides where its output lives. It asks a
//! [PixelBuffer] for zeroed space and a [SliceList] for slice records, so the
//! same code fills heap-backed `Vec`s or inline fixed-capacity arrays.

use crate::{AsepriteParseError, Result, Slice};
use std::fmt;

/// Somewhere to put decoded pixels.
pub trait PixelBuffer {
    /// Replaces the contents with exactly `len` zero bytes and returns them.
    ///
    /// Fails with [AsepriteParseError::CapacityExceeded] if `len` bytes
    /// cannot be provided.
    fn prepare(&mut self, len: usize) -> Result<&mut [u8]>;

    /// The bytes made available by the last call to `prepare`.
    fn pixels(&self) -> &[u8];
}

impl PixelBuffer for Vec<u8> {
    fn prepare(&mut self, len: usize) -> Result<&mut [u8]> {
        self.clear();
        self.resize(len, 0);
        Ok(self.as_mut_slice())
    }

    fn pixels(&self) -> &[u8] {
        self.as_slice()
    }
}

/// A pixel buffer with a capacity of `N` bytes stored inline.
#[derive(Clone)]
pub struct FixedBuffer<const N: usize> {
    data: [u8; N],
    len: usize,
}

impl<const N: usize> FixedBuffer<N> {
    /// An empty buffer.
    pub fn new() -> Self {
        FixedBuffer {
            data: [0; N],
            len: 0,
        }
    }

    /// Maximum number of bytes this buffer can hold.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for FixedBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PixelBuffer for FixedBuffer<N> {
    fn prepare(&mut self, len: usize) -> Result<&mut [u8]> {
        if len > N {
            return Err(AsepriteParseError::CapacityExceeded {
                needed: len,
                capacity: N,
            });
        }
        self.len = len;
        let pixels = &mut self.data[..len];
        pixels.iter_mut().for_each(|p| *p = 0);
        Ok(pixels)
    }

    fn pixels(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl<const N: usize> fmt::Debug for FixedBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} of {} bytes>", self.len, N)
    }
}

/// Somewhere to put parsed slices.
pub trait SliceList<'a> {
    /// Appends a slice, failing if there is no room left.
    fn push(&mut self, slice: Slice<'a>) -> Result<()>;

    /// The most recently pushed slice.
    fn last_mut(&mut self) -> Option<&mut Slice<'a>>;

    /// All slices in the order they were pushed.
    fn as_slice(&self) -> &[Slice<'a>];
}

impl<'a> SliceList<'a> for Vec<Slice<'a>> {
    fn push(&mut self, slice: Slice<'a>) -> Result<()> {
        Vec::push(self, slice);
        Ok(())
    }

    fn last_mut(&mut self) -> Option<&mut Slice<'a>> {
        <[Slice<'a>]>::last_mut(self)
    }

    fn as_slice(&self) -> &[Slice<'a>] {
        Vec::as_slice(self)
    }
}

/// A list of at most `N` items stored inline.
#[derive(Clone)]
pub struct FixedList<T, const N: usize> {
    items: [T; N],
    len: usize,
}

impl<T: Copy + Default, const N: usize> FixedList<T, N> {
    /// An empty list.
    pub fn new() -> Self {
        FixedList {
            items: [T::default(); N],
            len: 0,
        }
    }

    fn try_push(&mut self, item: T) -> Result<()> {
        let slot = self
            .items
            .get_mut(self.len)
            .ok_or(AsepriteParseError::CapacityExceeded {
                needed: self.len + 1,
                capacity: N,
            })?;
        *slot = item;
        self.len += 1;
        Ok(())
    }
}

impl<T: Copy + Default, const N: usize> Default for FixedList<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> std::ops::Deref for FixedList<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items[..self.len]
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for FixedList<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, const N: usize> SliceList<'a> for FixedList<Slice<'a>, N> {
    fn push(&mut self, slice: Slice<'a>) -> Result<()> {
        self.try_push(slice)
    }

    fn last_mut(&mut self) -> Option<&mut Slice<'a>> {
        match self.len {
            0 => None,
            len => Some(&mut self.items[len - 1]),
        }
    }

    fn as_slice(&self) -> &[Slice<'a>] {
        self
    }
}
