//! Error types for fbink-scale
//!
//! Every variant is a plain value: building an error never allocates, so
//! rejected requests leave the allocator untouched.

use thiserror::Error;

/// Errors that can occur while scaling
#[derive(Debug, Error)]
pub enum ScaleError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] fbink_core::Error),

    /// The source buffer is empty
    #[error("empty source buffer")]
    EmptySource,

    /// The source buffer is shorter than its declared geometry
    #[error("source buffer too small: expected {expected} bytes, got {actual}")]
    SourceTooSmall { expected: usize, actual: usize },

    /// Source width or height is zero
    #[error("invalid source dimensions: {width}x{height}")]
    InvalidSourceDimension { width: u32, height: u32 },

    /// Destination width or height has a zero magnitude, or is too large
    #[error("invalid destination dimensions: {width}x{height}")]
    InvalidDestDimension { width: i32, height: i32 },

    /// Component count other than 1, 2 or 4
    #[error("unsupported component count: {0}")]
    UnsupportedComponents(u32),

    /// A lookup table or the destination buffer could not be allocated
    #[error("allocation of {what} failed ({bytes} bytes)")]
    AllocationFailed { what: &'static str, bytes: usize },
}

impl ScaleError {
    /// Whether the request itself was malformed (as opposed to running out
    /// of memory while serving it).
    pub fn is_invalid_input(&self) -> bool {
        !matches!(
            self,
            ScaleError::AllocationFailed { .. }
                | ScaleError::Core(fbink_core::Error::AllocationFailed(_))
        )
    }
}

/// Result type for scale operations
pub type ScaleResult<T> = Result<T, ScaleError>;
