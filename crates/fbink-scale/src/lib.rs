//! fbink-scale - Fixed-point image scaling for fbink
//!
//! This crate rescales decoded bitmaps to the size they are drawn at,
//! without floating point:
//!
//! - Area averaging on axes that shrink, bilinear blending on axes that grow
//! - Gray, gray + alpha and RGBA layouts
//! - Mirroring through negative destination sizes
//! - NEON and SSE4.1 accumulation kernels, byte-identical to the scalar one

mod accum;
mod dispatch;
mod error;
pub mod info;
pub mod scale;
pub mod simd;

pub use error::{ScaleError, ScaleResult};
pub use info::{ScaleCase, ScaleInfo};
pub use scale::{ScaleOptions, scale, scale_bitmap, scale_raw, scale_with_options};
pub use simd::Backend;
