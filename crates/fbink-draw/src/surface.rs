//! Framebuffer surfaces
//!
//! A [`Surface`] borrows the caller's mapping of the framebuffer together
//! with its geometry, and plots pixels in the framebuffer's native format:
//!
//! | Depth | Format | Byte order |
//! |---|---|---|
//! | 4 | gray, two pixels per byte | even x in the high nibble |
//! | 8 | gray | `Y` |
//! | 16 | RGB565 | native-endian `u16` |
//! | 24 | RGB | `B G R` |
//! | 32 | RGB | `B G R A`, alpha always `0xFF` |
//!
//! Off-screen coordinates are silently discarded.

use crate::error::{DrawError, DrawResult};
use crate::region::Region;
use fbink_core::{Color, color};

/// Framebuffer pixel formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FbFormat {
    /// 4-bit gray
    Gray4,
    /// 8-bit gray
    Gray8,
    /// 16-bit RGB565
    Rgb565,
    /// 24-bit BGR
    Rgb24,
    /// 32-bit BGRA
    Rgb32,
}

impl FbFormat {
    /// Format for a bit depth, if supported.
    pub(crate) fn from_bpp(bits_per_pixel: u32) -> Option<Self> {
        match bits_per_pixel {
            4 => Some(FbFormat::Gray4),
            8 => Some(FbFormat::Gray8),
            16 => Some(FbFormat::Rgb565),
            24 => Some(FbFormat::Rgb24),
            32 => Some(FbFormat::Rgb32),
            _ => None,
        }
    }

    /// Whether the format stores gray levels only.
    pub(crate) fn is_grayscale(self) -> bool {
        matches!(self, FbFormat::Gray4 | FbFormat::Gray8)
    }
}

/// Framebuffer geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FbInfo {
    /// Visible width in pixels
    pub width: u32,
    /// Visible height in pixels
    pub height: u32,
    /// Bytes per scanline, padding included
    pub line_length: u32,
    /// Bit depth
    pub bits_per_pixel: u32,
}

impl FbInfo {
    /// Geometry with unpadded scanlines.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::InvalidInfo`] for empty geometry or an
    /// unsupported depth.
    pub fn new(width: u32, height: u32, bits_per_pixel: u32) -> DrawResult<Self> {
        let line_length = (width as u64 * bits_per_pixel as u64).div_ceil(8);
        let info = Self {
            width,
            height,
            line_length: u32::try_from(line_length)
                .map_err(|_| DrawError::InvalidInfo(format!("scanline too long for width {}", width)))?,
            bits_per_pixel,
        };
        info.validate()?;
        Ok(info)
    }

    /// Same geometry with padded scanlines.
    pub fn with_line_length(mut self, line_length: u32) -> DrawResult<Self> {
        self.line_length = line_length;
        self.validate()?;
        Ok(self)
    }

    /// Check that the geometry can be drawn into.
    pub fn validate(&self) -> DrawResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DrawError::InvalidInfo(format!(
                "empty resolution {}x{}",
                self.width, self.height
            )));
        }
        if FbFormat::from_bpp(self.bits_per_pixel).is_none() {
            return Err(DrawError::InvalidInfo(format!(
                "unsupported depth {} bpp",
                self.bits_per_pixel
            )));
        }
        let min = self.min_line_length();
        if (self.line_length as u64) < min {
            return Err(DrawError::InvalidInfo(format!(
                "line length {} is shorter than {} bytes",
                self.line_length, min
            )));
        }
        Ok(())
    }

    fn min_line_length(&self) -> u64 {
        (self.width as u64 * self.bits_per_pixel as u64).div_ceil(8)
    }

    /// Whether the framebuffer stores gray levels only.
    pub fn is_grayscale(&self) -> bool {
        FbFormat::from_bpp(self.bits_per_pixel).is_some_and(FbFormat::is_grayscale)
    }

    /// Bytes of mapped memory the geometry addresses.
    pub fn required_len(&self) -> usize {
        self.line_length as usize * self.height as usize
    }
}

/// Mutable view of a mapped framebuffer
pub struct Surface<'a> {
    info: FbInfo,
    format: FbFormat,
    buf: &'a mut [u8],
}

impl<'a> Surface<'a> {
    /// Wrap mapped framebuffer memory.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::InvalidInfo`] if `info` is invalid and
    /// [`DrawError::BufferTooSmall`] if `buf` cannot hold it.
    pub fn new(buf: &'a mut [u8], info: FbInfo) -> DrawResult<Self> {
        info.validate()?;
        let format = FbFormat::from_bpp(info.bits_per_pixel).ok_or_else(|| {
            DrawError::InvalidInfo(format!("unsupported depth {} bpp", info.bits_per_pixel))
        })?;
        let expected = info.required_len();
        if buf.len() < expected {
            return Err(DrawError::BufferTooSmall {
                expected,
                actual: buf.len(),
            });
        }
        log::debug!(
            "Surface: {}x{} @ {} bpp, {} bytes per line",
            info.width,
            info.height,
            info.bits_per_pixel,
            info.line_length
        );
        Ok(Self { info, format, buf })
    }

    /// Framebuffer geometry.
    pub fn info(&self) -> &FbInfo {
        &self.info
    }

    /// Raw framebuffer bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..]
    }

    fn on_screen(&self, x: u32, y: u32) -> bool {
        x < self.info.width && y < self.info.height
    }

    /// Byte offset of the byte holding pixel `(x, y)`.
    fn offset(&self, x: u32, y: u32) -> usize {
        let row = y as usize * self.info.line_length as usize;
        match self.format {
            FbFormat::Gray4 => row + (x as usize >> 1),
            FbFormat::Gray8 => row + x as usize,
            FbFormat::Rgb565 => row + x as usize * 2,
            FbFormat::Rgb24 => row + x as usize * 3,
            FbFormat::Rgb32 => row + x as usize * 4,
        }
    }

    /// Plot one pixel. Off-screen pixels are discarded.
    ///
    /// Gray framebuffers use the red channel only.
    pub fn put_pixel(&mut self, x: u32, y: u32, c: Color) {
        if !self.on_screen(x, y) {
            return;
        }
        let off = self.offset(x, y);
        match self.format {
            FbFormat::Gray4 => {
                let b = &mut self.buf[off];
                if x & 1 == 0 {
                    *b = (*b & 0x0f) | (c.r & 0xf0);
                } else {
                    *b = (*b & 0xf0) | (c.r >> 4);
                }
            }
            FbFormat::Gray8 => self.buf[off] = c.r,
            FbFormat::Rgb565 => {
                let v = color::pack_rgb565(c.r, c.g, c.b);
                self.buf[off..off + 2].copy_from_slice(&v.to_ne_bytes());
            }
            FbFormat::Rgb24 => self.buf[off..off + 3].copy_from_slice(&[c.b, c.g, c.r]),
            FbFormat::Rgb32 => {
                self.buf[off..off + 4].copy_from_slice(&[c.b, c.g, c.r, color::OPAQUE])
            }
        }
    }

    /// Read one pixel back, or `None` off-screen.
    ///
    /// Gray framebuffers return a gray color.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if !self.on_screen(x, y) {
            return None;
        }
        let off = self.offset(x, y);
        let c = match self.format {
            FbFormat::Gray4 => {
                let b = self.buf[off];
                let nibble = if x & 1 == 0 { b >> 4 } else { b };
                Color::gray(color::expand_gray4(nibble))
            }
            FbFormat::Gray8 => Color::gray(self.buf[off]),
            FbFormat::Rgb565 => {
                let v = u16::from_ne_bytes([self.buf[off], self.buf[off + 1]]);
                let (r, g, b) = color::unpack_rgb565(v);
                Color::new(r, g, b)
            }
            FbFormat::Rgb24 | FbFormat::Rgb32 => {
                Color::new(self.buf[off + 2], self.buf[off + 1], self.buf[off])
            }
        };
        Some(c)
    }

    /// Fill the whole mapping with byte `v`.
    pub fn clear(&mut self, v: u8) {
        self.buf.fill(v);
        log::debug!("Cleared the screen to {:#04x}", v);
    }

    /// Fill a rectangle, clipped to the screen.
    ///
    /// # Returns
    ///
    /// The region actually touched.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, c: Color) -> Region {
        let region = Region::new(x, y, w, h).clamp_to(self.info.width, self.info.height);
        for py in region.top..region.bottom() {
            for px in region.left..region.right() {
                self.put_pixel(px, py, c);
            }
        }
        if region.width != w || region.height != h {
            log::debug!(
                "Clipped a {}x{} rectangle @ ({}, {}) to {}x{}",
                w,
                h,
                x,
                y,
                region.width,
                region.height
            );
        }
        log::debug!("Filled a {}x{} rectangle @ ({}, {})", region.width, region.height, x, y);
        region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(buf: &mut [u8], bpp: u32) -> Surface<'_> {
        Surface::new(buf, FbInfo::new(4, 3, bpp).unwrap()).unwrap()
    }

    #[test]
    fn test_info_validation() {
        assert!(FbInfo::new(0, 10, 8).is_err());
        assert!(FbInfo::new(10, 10, 12).is_err());
        assert_eq!(FbInfo::new(5, 2, 4).unwrap().line_length, 3);
        assert_eq!(FbInfo::new(5, 2, 24).unwrap().required_len(), 30);
        let info = FbInfo::new(10, 10, 16).unwrap();
        assert!(info.with_line_length(19).is_err());
        assert_eq!(info.with_line_length(32).unwrap().required_len(), 320);
        assert!(!info.is_grayscale());
        assert!(FbInfo::new(10, 10, 4).unwrap().is_grayscale());
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = vec![0u8; 11];
        assert!(matches!(
            Surface::new(&mut buf, FbInfo::new(4, 3, 8).unwrap()),
            Err(DrawError::BufferTooSmall {
                expected: 12,
                actual: 11
            })
        ));
    }

    #[test]
    fn test_gray4_nibbles() {
        let mut buf = vec![0u8; 6];
        let mut s = surface(&mut buf, 4);
        s.put_pixel(1, 0, Color::gray(0xab));
        s.put_pixel(0, 0, Color::gray(0xcd));
        assert_eq!(s.as_bytes()[0], 0xca);
        assert_eq!(s.get_pixel(0, 0), Some(Color::gray(0xcc)));
        assert_eq!(s.get_pixel(1, 0), Some(Color::gray(0xaa)));
    }

    #[test]
    fn test_roundtrip_per_depth() {
        for bpp in [8, 16, 24, 32] {
            let info = FbInfo::new(4, 3, bpp).unwrap();
            let mut buf = vec![0u8; info.required_len()];
            let mut s = Surface::new(&mut buf, info).unwrap();
            let c = if info.is_grayscale() {
                Color::gray(0x5a)
            } else {
                // Exactly representable in RGB565.
                Color::new(0xff, 0x82, 0x00)
            };
            s.put_pixel(3, 2, c);
            assert_eq!(s.get_pixel(3, 2), Some(c), "{} bpp", bpp);
            assert_eq!(s.get_pixel(2, 2), Some(Color::BLACK), "{} bpp", bpp);
        }
    }

    #[test]
    fn test_byte_order() {
        let mut buf = vec![0u8; 48];
        let mut s = surface(&mut buf, 32);
        s.put_pixel(0, 0, Color::new(1, 2, 3));
        assert_eq!(&s.as_bytes()[..4], &[3, 2, 1, 0xff]);

        let mut buf = vec![0u8; 36];
        let mut s = surface(&mut buf, 24);
        s.put_pixel(1, 0, Color::new(1, 2, 3));
        assert_eq!(&s.as_bytes()[3..6], &[3, 2, 1]);
    }

    #[test]
    fn test_off_screen_discarded() {
        let mut buf = vec![0u8; 12];
        let mut s = surface(&mut buf, 8);
        s.put_pixel(4, 0, Color::WHITE);
        s.put_pixel(0, 3, Color::WHITE);
        assert!(s.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(s.get_pixel(4, 0), None);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut buf = vec![0u8; 12];
        let mut s = surface(&mut buf, 8);
        let region = s.fill_rect(2, 1, 10, 10, Color::gray(7));
        assert_eq!(region, Region::new(2, 1, 2, 2));
        assert_eq!(s.as_bytes(), &[0, 0, 0, 0, 0, 0, 7, 7, 0, 0, 7, 7]);
    }

    #[test]
    fn test_clear() {
        let mut buf = vec![0u8; 12];
        let mut s = surface(&mut buf, 8);
        s.clear(0xff);
        assert_eq!(s.get_pixel(3, 2), Some(Color::WHITE));
    }
}
