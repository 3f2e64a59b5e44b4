//! Image compositing
//!
//! Blits a decoded [`Bitmap`] into a [`Surface`]:
//!
//! - The image may hang off any edge of the screen; only its visible part
//!   is plotted, starting at its first visible pixel.
//! - Color images on gray framebuffers are reduced to luma, gray images
//!   on color framebuffers are replicated into every channel.
//! - Images with alpha are blended against what is already on screen
//!   (`div255(img * a + bg * (255 - a))`), unless alpha is ignored.
//! - Inversion flips the image channels before blending.

use crate::error::DrawResult;
use crate::region::Region;
use crate::surface::Surface;
use fbink_core::{Bitmap, Color, PixelLayout, color};
use fbink_scale::{Backend, ScaleOptions, scale_bitmap};

/// Options for [`draw_image`] and [`draw_image_scaled`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageOptions {
    /// Horizontal position of the image's left edge; may be negative
    pub x_off: i32,
    /// Vertical position of the image's top edge; may be negative
    pub y_off: i32,
    /// Invert the image's colors
    pub invert: bool,
    /// Plot the image as opaque even if it has an alpha channel
    pub ignore_alpha: bool,
    /// Clear the screen first (to white, or black when inverted)
    pub clear_first: bool,
    /// Width to scale to before drawing (0 keeps the aspect ratio, negative
    /// mirrors)
    pub scaled_width: i32,
    /// Height to scale to before drawing (0 keeps the aspect ratio,
    /// negative mirrors)
    pub scaled_height: i32,
    /// Scaler kernel
    pub backend: Backend,
}

impl ImageOptions {
    /// Create options drawing at `(x_off, y_off)`
    pub fn at(x_off: i32, y_off: i32) -> Self {
        Self {
            x_off,
            y_off,
            ..Default::default()
        }
    }

    /// Set whether to invert the image
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Set whether to ignore the alpha channel
    pub fn ignore_alpha(mut self, ignore_alpha: bool) -> Self {
        self.ignore_alpha = ignore_alpha;
        self
    }

    /// Set whether to clear the screen first
    pub fn clear_first(mut self, clear_first: bool) -> Self {
        self.clear_first = clear_first;
        self
    }

    /// Set the size to scale to
    pub fn scaled(mut self, width: i32, height: i32) -> Self {
        self.scaled_width = width;
        self.scaled_height = height;
        self
    }

    /// Set the scaler kernel
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

/// Visible span `[start, end)` of an image axis of length `len` placed at
/// `off` on a screen axis of length `view`, in image coordinates.
///
/// `start <= end <= len`, and when the span is non-empty its screen
/// position `off + start .. off + end` lies within `[0, view]`. An empty
/// span has no screen position; callers report [`Region::default`].
fn visible_span(off: i32, len: u32, view: u32) -> (u32, u32) {
    let off = off as i64;
    let start = (-off).clamp(0, len as i64);
    let end = (view as i64 - off).clamp(start, len as i64);
    (start as u32, end as u32)
}

/// Draw a bitmap at its natural size.
///
/// # Returns
///
/// The region of the screen that changed: the visible part of the image,
/// or the whole screen when `clear_first` is set.
pub fn draw_image(surface: &mut Surface<'_>, bitmap: &Bitmap, opts: &ImageOptions) -> DrawResult<Region> {
    let info = *surface.info();
    if opts.clear_first {
        surface.clear(if opts.invert { 0x00 } else { 0xff });
    }

    let layout = bitmap.layout();
    let fb_is_grayscale = info.is_grayscale();
    let blend = layout.has_alpha() && !opts.ignore_alpha;
    if layout.has_alpha() {
        if opts.ignore_alpha {
            log::debug!("Ignoring the image's alpha channel.");
        } else {
            log::debug!("Image has an alpha channel, we'll have to do alpha blending.");
        }
    }

    let (x0, x1) = visible_span(opts.x_off, bitmap.width(), info.width);
    let (y0, y1) = visible_span(opts.y_off, bitmap.height(), info.height);
    let region = if x0 == x1 || y0 == y1 {
        Region::default()
    } else {
        // A non-empty span starts on screen, so both edges are in [0, view).
        Region::new(
            (opts.x_off as i64 + x0 as i64) as u32,
            (opts.y_off as i64 + y0 as i64) as u32,
            x1 - x0,
            y1 - y0,
        )
    };
    log::debug!(
        "Region: top={}, left={}, width={}, height={}",
        region.top,
        region.left,
        region.width,
        region.height
    );

    if region.is_empty() {
        log::warn!(
            "{}x{} image @ ({}, {}) is entirely off-screen",
            bitmap.width(),
            bitmap.height(),
            opts.x_off,
            opts.y_off
        );
    } else {
        log::debug!(
            "Image becomes visible @ ({}, {}), looping 'til ({}, {}) out of {}x{} pixels",
            x0,
            y0,
            x1,
            y1,
            bitmap.width(),
            bitmap.height()
        );
    }

    let bpp = layout.bytes_per_pixel();
    for (j, row) in (y0..y1).zip(bitmap.data().chunks_exact(bitmap.stride()).skip(y0 as usize)) {
        let y = region.top + (j - y0);
        let pixels = row[x0 as usize * bpp..x1 as usize * bpp].chunks_exact(bpp);
        for (x, px) in (region.left..).zip(pixels) {
            let (r, g, b, a) = match layout {
                PixelLayout::Gray => (px[0], px[0], px[0], color::OPAQUE),
                PixelLayout::GrayAlpha => (px[0], px[0], px[0], px[1]),
                PixelLayout::Rgba => (px[0], px[1], px[2], px[3]),
            };
            let mut img = Color::new(r, g, b);
            if fb_is_grayscale && layout.is_color() {
                img = Color::gray(img.luma());
            }
            if opts.invert {
                img = img.inverted();
            }
            let out = if blend {
                let bg = surface.get_pixel(x, y).unwrap_or(Color::WHITE);
                Color::new(
                    color::blend(img.r, bg.r, a),
                    color::blend(img.g, bg.g, a),
                    color::blend(img.b, bg.b, a),
                )
            } else {
                img
            };
            surface.put_pixel(x, y, out);
        }
    }

    if opts.clear_first {
        Ok(Region::fullscreen(&info))
    } else {
        Ok(region)
    }
}

/// Target size for `scaled_width x scaled_height`, filling in a zero axis
/// from the image's aspect ratio. `None` when no scaling is requested.
fn target_size(bitmap: &Bitmap, scaled_width: i32, scaled_height: i32) -> Option<(i32, i32)> {
    let (w, h) = (bitmap.width() as i64, bitmap.height() as i64);
    let keep = |len: i64, other: i32, other_len: i64| -> i32 {
        let v = (len * other.unsigned_abs() as i64 + other_len / 2) / other_len;
        v.clamp(1, i32::MAX as i64) as i32
    };
    match (scaled_width, scaled_height) {
        (0, 0) => None,
        (0, sh) => Some((keep(w, sh, h), sh)),
        (sw, 0) => Some((sw, keep(h, sw, w))),
        (sw, sh) => Some((sw, sh)),
    }
}

/// Draw a bitmap, scaling it first when `scaled_width` or `scaled_height`
/// is set.
///
/// # Errors
///
/// Returns [`crate::DrawError::Scale`] if the scaler rejects the request or
/// runs out of memory.
pub fn draw_image_scaled(
    surface: &mut Surface<'_>,
    bitmap: &Bitmap,
    opts: &ImageOptions,
) -> DrawResult<Region> {
    let Some((dw, dh)) = target_size(bitmap, opts.scaled_width, opts.scaled_height) else {
        return draw_image(surface, bitmap, opts);
    };
    log::debug!(
        "Scaling {}x{} image to {}x{}",
        bitmap.width(),
        bitmap.height(),
        dw,
        dh
    );
    let scale_opts = ScaleOptions::with_backend(opts.backend).ignore_alpha(opts.ignore_alpha);
    let scaled = scale_bitmap(bitmap, dw, dh, &scale_opts)?;
    draw_image(surface, &scaled, opts)
}
