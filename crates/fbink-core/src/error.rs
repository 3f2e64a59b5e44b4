//! Error types for fbink-core
//!
//! Provides a unified error type for the shared data structures.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// fbink-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid bitmap dimensions
    #[error("invalid bitmap dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Unsupported number of color components
    #[error("unsupported component count: {0} (expected 1, 2 or 4)")]
    UnsupportedComponents(u32),

    /// Pixel buffer does not match the declared geometry
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Coordinates outside the bitmap
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height}")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Memory allocation failed
    #[error("memory allocation failed ({0} bytes)")]
    AllocationFailed(usize),
}

/// Result type alias for fbink-core operations
pub type Result<T> = std::result::Result<T, Error>;
