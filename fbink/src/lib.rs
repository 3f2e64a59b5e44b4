//! fbink - E-ink framebuffer rendering for Rust
//!
//! # Overview
//!
//! fbink draws decoded images into the mapped framebuffer of an e-ink
//! panel:
//!
//! - Image I/O (PNG)
//! - Fixed-point area-sampling scaler for gray, gray+alpha and RGBA
//!   images, with NEON and SSE4.1 kernels
//! - Compositing into 4, 8, 16, 24 and 32 bpp framebuffers with clipping,
//!   inversion and alpha blending
//!
//! # Example
//!
//! ```
//! use fbink::{Bitmap, PixelLayout};
//! use fbink::draw::{FbInfo, ImageOptions, Region, Surface, draw_image_scaled};
//!
//! let info = FbInfo::new(16, 16, 8).unwrap();
//! let mut fb = vec![0u8; info.required_len()];
//! let mut surface = Surface::new(&mut fb, info).unwrap();
//!
//! let image = Bitmap::from_data(2, 2, PixelLayout::Gray, &[0, 85, 170, 255]).unwrap();
//! let opts = ImageOptions::at(4, 4).scaled(8, 0);
//! let region = draw_image_scaled(&mut surface, &image, &opts).unwrap();
//! assert_eq!(region, Region::new(4, 4, 8, 8));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use fbink_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use fbink_draw as draw;
pub use fbink_io as io;
pub use fbink_scale as scale;
