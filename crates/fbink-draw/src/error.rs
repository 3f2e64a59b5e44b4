//! Error types for fbink-draw

use thiserror::Error;

/// Errors that can occur while drawing into a framebuffer
#[derive(Debug, Error)]
pub enum DrawError {
    /// Framebuffer geometry that cannot be drawn into
    #[error("invalid framebuffer info: {0}")]
    InvalidInfo(String),

    /// The mapped memory is smaller than the geometry requires
    #[error("framebuffer too small: expected {expected} bytes, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    /// Scaling the image failed
    #[error("scale error: {0}")]
    Scale(#[from] fbink_scale::ScaleError),

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] fbink_core::Error),
}

/// Result type for drawing operations
pub type DrawResult<T> = Result<T, DrawError>;
