//! Bitmap - decoded image container
//!
//! A `Bitmap` is an unpadded, row-major pixel buffer in one of the
//! [`PixelLayout`]s. It is what the image decoder produces, what the
//! scaler returns, and what the compositor plots into the framebuffer.
//!
//! # Layout conversions
//!
//! Conversions follow the usual "request N channels" rules of image
//! loaders:
//!
//! - color to gray uses the integer luma `(77 R + 150 G + 29 B) >> 8`
//! - gray to color replicates the gray value into R, G and B
//! - an added alpha channel is fully opaque, a dropped one is discarded

use crate::buffer::AlignedBuf;
use crate::color;
use crate::error::{Error, Result};
use crate::layout::PixelLayout;

/// Owned, 16-byte aligned bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: AlignedBuf,
}

/// Compute `width * height * bpp`, rejecting empty or overflowing geometry.
fn byte_len(width: u32, height: u32, layout: PixelLayout) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(layout.bytes_per_pixel()))
        .ok_or(Error::InvalidDimension { width, height })
}

impl Bitmap {
    /// Create a zero-filled bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either dimension is zero, or
    /// [`Error::AllocationFailed`] if the pixel buffer cannot be allocated.
    pub fn new(width: u32, height: u32, layout: PixelLayout) -> Result<Self> {
        let len = byte_len(width, height, layout)?;
        Ok(Self {
            width,
            height,
            layout,
            data: AlignedBuf::try_zeroed(len)?,
        })
    }

    /// Create a bitmap from raw pixel bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] unless `data` holds exactly
    /// `width * height * layout.bytes_per_pixel()` bytes.
    pub fn from_data(width: u32, height: u32, layout: PixelLayout, data: &[u8]) -> Result<Self> {
        let expected = byte_len(width, height, layout)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data: AlignedBuf::try_from_slice(data)?,
        })
    }

    /// Wrap an already filled buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if the buffer length does not match.
    pub fn from_buffer(
        width: u32,
        height: u32,
        layout: PixelLayout,
        data: AlignedBuf,
    ) -> Result<Self> {
        let expected = byte_len(width, height, layout)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Widen packed 24-bit RGB into an opaque `Rgba` bitmap.
    pub fn from_rgb24(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or(Error::InvalidDimension { width, height })?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        let mut out = Self::new(width, height, PixelLayout::Rgba)?;
        for (dst, src) in out.data.chunks_exact_mut(4).zip(data.chunks_exact(3)) {
            dst[..3].copy_from_slice(src);
            dst[3] = 0xff;
        }
        Ok(out)
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel layout.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Number of bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.layout.bytes_per_pixel()
    }

    /// Raw pixel bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the bitmap, returning its storage.
    pub fn into_buffer(self) -> AlignedBuf {
        self.data
    }

    /// Bytes of row `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        Some(&self.data[start..start + stride])
    }

    /// Bytes of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.layout.bytes_per_pixel();
        let start = y as usize * self.stride() + x as usize * bpp;
        Some(&self.data[start..start + bpp])
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] outside the bitmap and
    /// [`Error::BufferSize`] if `value` is not one pixel long.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: &[u8]) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let bpp = self.layout.bytes_per_pixel();
        if value.len() != bpp {
            return Err(Error::BufferSize {
                expected: bpp,
                actual: value.len(),
            });
        }
        let start = y as usize * self.stride() + x as usize * bpp;
        self.data[start..start + bpp].copy_from_slice(value);
        Ok(())
    }

    /// Fill every pixel with `value`.
    pub fn fill(&mut self, value: &[u8]) -> Result<()> {
        let bpp = self.layout.bytes_per_pixel();
        if value.len() != bpp {
            return Err(Error::BufferSize {
                expected: bpp,
                actual: value.len(),
            });
        }
        for px in self.data.chunks_exact_mut(bpp) {
            px.copy_from_slice(value);
        }
        Ok(())
    }

    /// Convert to another layout.
    ///
    /// Returns a copy when the layout already matches.
    pub fn to_layout(&self, layout: PixelLayout) -> Result<Bitmap> {
        if layout == self.layout {
            return Ok(self.clone());
        }
        let mut out = Bitmap::new(self.width, self.height, layout)?;
        let src_bpp = self.layout.bytes_per_pixel();
        let dst_bpp = layout.bytes_per_pixel();
        for (src, dst) in self
            .data
            .chunks_exact(src_bpp)
            .zip(out.data.chunks_exact_mut(dst_bpp))
        {
            convert_pixel(self.layout, src, layout, dst);
        }
        Ok(out)
    }
}

fn convert_pixel(from: PixelLayout, src: &[u8], to: PixelLayout, dst: &mut [u8]) {
    let (r, g, b, a) = match from {
        PixelLayout::Gray => (src[0], src[0], src[0], 0xff),
        PixelLayout::GrayAlpha => (src[0], src[0], src[0], src[1]),
        PixelLayout::Rgba => (src[0], src[1], src[2], src[3]),
    };
    match to {
        PixelLayout::Gray => {
            dst[0] = if from.is_color() {
                color::luma(r, g, b)
            } else {
                r
            };
        }
        PixelLayout::GrayAlpha => {
            dst[0] = if from.is_color() {
                color::luma(r, g, b)
            } else {
                r
            };
            dst[1] = a;
        }
        PixelLayout::Rgba => {
            dst.copy_from_slice(&[r, g, b, a]);
        }
    }
}
