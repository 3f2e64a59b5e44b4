//! Scaling entry points
//!
//! All entry points validate the whole request before touching the
//! allocator, build the coordinate tables, and only then allocate the
//! destination. A rejected request allocates nothing.

use crate::dispatch;
use crate::info::ScaleInfo;
use crate::simd::Backend;
use crate::{ScaleError, ScaleResult};
use fbink_core::{Bitmap, PixelLayout};

/// Options for [`scale_with_options`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaleOptions {
    /// Treat RGBA sources as opaque: accumulate color only and write
    /// alpha 255 on area-sampled axes. Ignored for gray layouts.
    pub ignore_alpha: bool,
    /// Kernel for the RGBA accumulator
    pub backend: Backend,
}

impl ScaleOptions {
    /// Create options with a specific backend
    pub fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            ..Default::default()
        }
    }

    /// Set whether to ignore the alpha channel
    pub fn ignore_alpha(mut self, ignore_alpha: bool) -> Self {
        self.ignore_alpha = ignore_alpha;
        self
    }

    /// Set the accumulator backend
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

/// Scale a packed pixel buffer.
///
/// # Arguments
/// * `src` - Source pixels, row-major and unpadded
/// * `src_width`, `src_height` - Source geometry in pixels
/// * `layout` - Pixel layout of `src`, also used for the result
/// * `ignore_alpha` - See [`ScaleOptions::ignore_alpha`]
/// * `dst_width`, `dst_height` - Output size; a negative value mirrors
///   that axis
///
/// # Errors
///
/// Invalid geometry, a short source, or an allocation failure. See
/// [`ScaleError`].
///
/// # Examples
///
/// ```
/// use fbink_core::PixelLayout;
/// use fbink_scale::scale;
///
/// let src = [100u8; 16];
/// let out = scale(&src, 4, 4, PixelLayout::Gray, false, 2, 2).unwrap();
/// assert_eq!(out.data(), &[100, 100, 100, 100]);
/// ```
pub fn scale(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    layout: PixelLayout,
    ignore_alpha: bool,
    dst_width: i32,
    dst_height: i32,
) -> ScaleResult<Bitmap> {
    let options = ScaleOptions::default().ignore_alpha(ignore_alpha);
    scale_with_options(src, src_width, src_height, layout, dst_width, dst_height, &options)
}

/// Scale a packed pixel buffer described by its component count (1, 2
/// or 4).
///
/// # Errors
///
/// Returns [`ScaleError::UnsupportedComponents`] for any other count, and
/// otherwise fails like [`scale`].
pub fn scale_raw(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    components: u32,
    ignore_alpha: bool,
    dst_width: i32,
    dst_height: i32,
) -> ScaleResult<Bitmap> {
    if src.is_empty() {
        return Err(ScaleError::EmptySource);
    }
    let layout = PixelLayout::from_components(components)
        .map_err(|_| ScaleError::UnsupportedComponents(components))?;
    scale(src, src_width, src_height, layout, ignore_alpha, dst_width, dst_height)
}

/// Scale a bitmap.
pub fn scale_bitmap(
    bitmap: &Bitmap,
    dst_width: i32,
    dst_height: i32,
    options: &ScaleOptions,
) -> ScaleResult<Bitmap> {
    scale_with_options(
        bitmap.data(),
        bitmap.width(),
        bitmap.height(),
        bitmap.layout(),
        dst_width,
        dst_height,
        options,
    )
}

/// Scale a packed pixel buffer with explicit options.
///
/// # Errors
///
/// See [`scale`].
pub fn scale_with_options(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    layout: PixelLayout,
    dst_width: i32,
    dst_height: i32,
    options: &ScaleOptions,
) -> ScaleResult<Bitmap> {
    validate(src, src_width, src_height, layout, dst_width, dst_height)?;

    let info = ScaleInfo::new(src_width, src_height, dst_width, dst_height)?;
    let mut out = Bitmap::new(
        dst_width.unsigned_abs(),
        dst_height.unsigned_abs(),
        layout,
    )
    .map_err(|e| match e {
        fbink_core::Error::AllocationFailed(bytes) => ScaleError::AllocationFailed {
            what: "destination buffer",
            bytes,
        },
        other => ScaleError::Core(other),
    })?;

    let dst = out.data_mut();
    match layout {
        PixelLayout::Rgba => {
            dispatch::scale_rgba_on(options.backend, &info, src, dst, options.ignore_alpha)
        }
        PixelLayout::Gray => dispatch::scale_gray(&info, src, dst),
        PixelLayout::GrayAlpha => dispatch::scale_gray_alpha(&info, src, dst),
    }
    Ok(out)
}

fn validate(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    layout: PixelLayout,
    dst_width: i32,
    dst_height: i32,
) -> ScaleResult<()> {
    if src.is_empty() {
        return Err(ScaleError::EmptySource);
    }
    if src_width == 0 || src_height == 0 {
        return Err(ScaleError::InvalidSourceDimension {
            width: src_width,
            height: src_height,
        });
    }
    let bpp = layout.bytes_per_pixel();
    let expected = (src_width as usize)
        .checked_mul(src_height as usize)
        .and_then(|n| n.checked_mul(bpp))
        .ok_or(ScaleError::InvalidSourceDimension {
            width: src_width,
            height: src_height,
        })?;
    if src.len() < expected {
        return Err(ScaleError::SourceTooSmall {
            expected,
            actual: src.len(),
        });
    }

    let invalid_dst = ScaleError::InvalidDestDimension {
        width: dst_width,
        height: dst_height,
    };
    if dst_width == 0 || dst_height == 0 {
        return Err(invalid_dst);
    }
    (dst_width.unsigned_abs() as usize)
        .checked_mul(dst_height.unsigned_abs() as usize)
        .and_then(|n| n.checked_mul(bpp))
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or(invalid_dst)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let src: Vec<u8> = (0..5 * 3 * 2).map(|i| (i * 11) as u8).collect();
        let out = scale(&src, 5, 3, PixelLayout::GrayAlpha, false, 5, 3).unwrap();
        assert_eq!(out.data(), &src[..]);
        assert_eq!((out.width(), out.height()), (5, 3));
    }

    #[test]
    fn test_mirror_x() {
        let src = [1u8, 2, 3, 4, 5, 6];
        let out = scale(&src, 3, 2, PixelLayout::Gray, false, -3, 2).unwrap();
        assert_eq!(out.data(), &[3, 2, 1, 6, 5, 4]);
        let out = scale(&src, 3, 2, PixelLayout::Gray, false, 3, -2).unwrap();
        assert_eq!(out.data(), &[4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_rejects_bad_requests() {
        let src = [0u8; 16];
        assert!(matches!(
            scale(&[], 1, 1, PixelLayout::Gray, false, 1, 1),
            Err(ScaleError::EmptySource)
        ));
        assert!(matches!(
            scale(&src, 0, 4, PixelLayout::Gray, false, 1, 1),
            Err(ScaleError::InvalidSourceDimension { .. })
        ));
        assert!(matches!(
            scale(&src, 4, 4, PixelLayout::Gray, false, 0, 1),
            Err(ScaleError::InvalidDestDimension { width: 0, height: 1 })
        ));
        assert!(matches!(
            scale(&src, 4, 4, PixelLayout::Gray, false, 3, 0),
            Err(ScaleError::InvalidDestDimension { .. })
        ));
        assert!(matches!(
            scale(&src, 4, 4, PixelLayout::Rgba, false, 2, 2),
            Err(ScaleError::SourceTooSmall {
                expected: 64,
                actual: 16
            })
        ));
        assert!(matches!(
            scale_raw(&src, 2, 2, 3, false, 1, 1),
            Err(ScaleError::UnsupportedComponents(3))
        ));
        assert!(scale_raw(&src, 2, 2, 4, false, 1, 1).is_ok());
    }

    #[test]
    fn test_errors_are_invalid_input() {
        let err = scale(&[0u8; 4], 2, 2, PixelLayout::Gray, false, 0, 0).unwrap_err();
        assert!(err.is_invalid_input());
        let err = ScaleError::AllocationFailed {
            what: "destination buffer",
            bytes: 1,
        };
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_scale_bitmap() {
        let bmp = Bitmap::from_data(2, 2, PixelLayout::Rgba, &[200; 16]).unwrap();
        let options = ScaleOptions::with_backend(Backend::Scalar).ignore_alpha(true);
        let out = scale_bitmap(&bmp, 1, 1, &options).unwrap();
        assert_eq!(out.data(), &[200, 200, 200, 255]);
        assert_eq!(out.layout(), PixelLayout::Rgba);
    }

    #[test]
    fn test_output_is_aligned() {
        let src = [7u8; 9];
        let out = scale(&src, 3, 3, PixelLayout::Gray, false, 17, 5).unwrap();
        assert_eq!(out.data().as_ptr() as usize % fbink_core::BUFFER_ALIGN, 0);
    }
}
