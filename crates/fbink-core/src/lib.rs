//! fbink Core - Basic data structures for e-ink rendering
//!
//! This crate provides the fundamental data structures shared by the
//! fbink crates:
//!
//! - [`Bitmap`] - Decoded image container
//! - [`PixelLayout`] - Supported pixel layouts (gray, gray+alpha, RGBA)
//! - [`AlignedBuf`] - 16-byte aligned pixel storage
//! - [`Color`] and the [`color`] helpers - channel math shared by the
//!   scaler and the framebuffer compositor

pub mod bitmap;
pub mod buffer;
pub mod error;
pub mod layout;

pub use bitmap::Bitmap;
pub use buffer::{AlignedBuf, BUFFER_ALIGN};
pub use error::{Error, Result};
pub use layout::PixelLayout;

/// An opaque 24-bit color, as plotted into the framebuffer.
///
/// On grayscale framebuffers only `r` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Pure black.
    pub const BLACK: Color = Color::gray(0x00);
    /// Pure white.
    pub const WHITE: Color = Color::gray(0xff);

    /// Create a color from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a gray color.
    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Gray value of this color.
    pub fn luma(self) -> u8 {
        color::luma(self.r, self.g, self.b)
    }

    /// Color with every channel inverted.
    pub fn inverted(self) -> Self {
        Self {
            r: self.r ^ 0xff,
            g: self.g ^ 0xff,
            b: self.b ^ 0xff,
        }
    }
}

/// Channel math shared by the scaler and the compositor.
///
/// Pixels are handled as byte slices in `R G B A` order.
pub mod color {
    /// Fully opaque alpha.
    pub const OPAQUE: u8 = 0xff;

    /// Fast rounding division by 255 for values up to `255 * 255`.
    #[inline]
    pub fn div255(v: u32) -> u32 {
        let v = v + 128;
        ((v >> 8) + v) >> 8
    }

    /// Integer luma of an RGB triplet.
    #[inline]
    pub fn luma(r: u8, g: u8, b: u8) -> u8 {
        ((r as u32 * 77 + g as u32 * 150 + b as u32 * 29) >> 8) as u8
    }

    /// Composite `fg` over `bg` with coverage `alpha`.
    #[inline]
    pub fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
        div255(fg as u32 * alpha as u32 + bg as u32 * (0xff - alpha as u32)) as u8
    }

    /// Pack an RGB triplet into RGB565.
    #[inline]
    pub fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
        (((r as u16) >> 3) << 11) | (((g as u16) >> 2) << 5) | ((b as u16) >> 3)
    }

    /// Unpack RGB565 into an RGB triplet, replicating the high bits.
    #[inline]
    pub fn unpack_rgb565(v: u16) -> (u8, u8, u8) {
        let r = (v >> 11) as u8;
        let g = ((v >> 5) & 0x3f) as u8;
        let b = (v & 0x1f) as u8;
        ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }

    /// Expand a 4-bit gray level to 8 bits.
    #[inline]
    pub fn expand_gray4(nibble: u8) -> u8 {
        (nibble & 0x0f) * 0x11
    }
}
