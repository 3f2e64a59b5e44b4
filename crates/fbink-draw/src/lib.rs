//! fbink-draw - Framebuffer compositing for e-ink panels
//!
//! This crate plots into a caller-owned framebuffer:
//!
//! - [`Surface`] - Pixel access for 4, 8, 16, 24 and 32 bpp framebuffers
//! - [`Region`] - The dirty rectangle reported by every drawing call
//! - [`draw_image`] / [`draw_image_scaled`] - Image blitting with
//!   clipping, inversion, alpha blending and optional rescaling

mod error;
pub mod image;
pub mod region;
pub mod surface;

pub use error::{DrawError, DrawResult};
pub use image::{ImageOptions, draw_image, draw_image_scaled};
pub use region::Region;
pub use surface::{FbInfo, Surface};
