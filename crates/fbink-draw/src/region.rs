//! Dirty regions
//!
//! Every drawing operation reports the rectangle of the framebuffer it
//! touched, so that only that part of the e-ink panel needs refreshing.

use crate::surface::FbInfo;

/// Rectangle of the framebuffer, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    /// Left edge
    pub left: u32,
    /// Top edge
    pub top: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Region {
    /// Create a region.
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The whole screen described by `info`.
    pub fn fullscreen(info: &FbInfo) -> Self {
        Self::new(0, 0, info.width, info.height)
    }

    /// Whether the region covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the rightmost column.
    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// Part of this region that lies on a `width x height` screen.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let left = self.left.min(width);
        let top = self.top.min(height);
        Self {
            left,
            top,
            width: self.right().min(width) - left,
            height: self.bottom().min(height) - top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let r = Region::new(8, 2, 10, 10).clamp_to(12, 20);
        assert_eq!(r, Region::new(8, 2, 4, 10));
        assert!(Region::new(30, 0, 5, 5).clamp_to(12, 20).is_empty());
        assert_eq!(Region::new(1, 1, u32::MAX, 3).right(), u32::MAX);
    }

    #[test]
    fn test_fullscreen() {
        let info = FbInfo::new(600, 800, 8).unwrap();
        assert_eq!(Region::fullscreen(&info), Region::new(0, 0, 600, 800));
        assert!(!Region::fullscreen(&info).is_empty());
        assert!(Region::default().is_empty());
    }
}
