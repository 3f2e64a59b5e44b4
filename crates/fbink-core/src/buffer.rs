//! 16-byte aligned pixel storage
//!
//! Scaled images are written with 4-lane vector stores, so their storage
//! starts on a 16-byte boundary. The buffer is backed by a `Vec` of
//! aligned blocks and exposes exactly `len` bytes.

use crate::error::{Error, Result};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Alignment of every [`AlignedBuf`], in bytes.
pub const BUFFER_ALIGN: usize = 16;

#[derive(Clone, Copy, Default)]
#[repr(C, align(16))]
struct Block([u8; BUFFER_ALIGN]);

/// Zero-initialized byte buffer whose first byte is 16-byte aligned
#[derive(Clone, Default)]
pub struct AlignedBuf {
    blocks: Vec<Block>,
    len: usize,
}

impl AlignedBuf {
    /// Allocate a zeroed buffer of `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the allocator refuses the
    /// request. Nothing is leaked on failure.
    pub fn try_zeroed(len: usize) -> Result<Self> {
        let count = len.div_ceil(BUFFER_ALIGN);
        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(count)
            .map_err(|_| Error::AllocationFailed(len))?;
        blocks.resize(count, Block::default());
        Ok(Self { blocks, len })
    }

    /// Allocate a buffer holding a copy of `data`.
    pub fn try_from_slice(data: &[u8]) -> Result<Self> {
        let mut buf = Self::try_zeroed(data.len())?;
        buf.copy_from_slice(data);
        Ok(buf)
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// View the buffer as bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `Block` is a `repr(C)` wrapper around `[u8; 16]` with no
        // padding, the vector holds `len.div_ceil(16)` initialized blocks,
        // so the first `len` bytes are initialized and in bounds.
        unsafe { std::slice::from_raw_parts(self.blocks.as_ptr().cast::<u8>(), self.len) }
    }

    /// View the buffer as mutable bytes.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: see `as_slice`; the exclusive borrow of `self` guarantees
        // uniqueness of the returned slice.
        unsafe { std::slice::from_raw_parts_mut(self.blocks.as_mut_ptr().cast::<u8>(), self.len) }
    }
}

impl Deref for AlignedBuf {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl DerefMut for AlignedBuf {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl PartialEq for AlignedBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for AlignedBuf {}

impl fmt::Debug for AlignedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuf").field("len", &self.len).finish()
    }
}
