//! Pixel layouts
//!
//! Decoded images reach the renderer in one of three packed, unpadded
//! layouts. The layout is identified by its component count, which is also
//! its size in bytes.

use crate::error::{Error, Result};

/// Pixel layout of a decoded bitmap
///
/// | Layout | Components | Byte order |
/// |---|---|---|
/// | `Gray` | 1 | `Y` |
/// | `GrayAlpha` | 2 | `Y A` |
/// | `Rgba` | 4 | `R G B A` |
///
/// 24-bit RGB is deliberately absent: it has to be widened to `Rgba`
/// first (see [`crate::Bitmap::from_rgb24`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelLayout {
    /// 8-bit grayscale
    Gray = 1,
    /// 8-bit grayscale followed by 8-bit alpha
    GrayAlpha = 2,
    /// 32-bit packed RGBA
    Rgba = 4,
}

impl PixelLayout {
    /// Create a `PixelLayout` from a raw component count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedComponents`] for anything but 1, 2 or 4.
    pub fn from_components(components: u32) -> Result<Self> {
        match components {
            1 => Ok(PixelLayout::Gray),
            2 => Ok(PixelLayout::GrayAlpha),
            4 => Ok(PixelLayout::Rgba),
            n => Err(Error::UnsupportedComponents(n)),
        }
    }

    /// Number of bytes per pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        self as usize
    }

    /// Whether the layout carries an alpha channel.
    #[inline]
    pub fn has_alpha(self) -> bool {
        !matches!(self, PixelLayout::Gray)
    }

    /// Whether the layout carries color (as opposed to a single gray value).
    #[inline]
    pub fn is_color(self) -> bool {
        matches!(self, PixelLayout::Rgba)
    }
}
