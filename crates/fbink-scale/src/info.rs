//! Fixed-point coordinate mapper
//!
//! For each destination column and row the scaler needs two things: the
//! first source sample it reads, and how much each sample weighs. Both are
//! computed once per call, in 16.16 fixed point, into four parallel tables
//! owned by a [`ScaleInfo`].
//!
//! # Weight encoding
//!
//! - Scaling **up** on an axis, the weight is an 8-bit blend factor between
//!   the sample and its successor (0 means "copy the sample").
//! - Scaling **down**, the weight packs the per-sample coverage `Cp` and the
//!   coverage of the first, partial sample as `(Cp << 16) | first`, both in
//!   14-bit fixed point.

use crate::{ScaleError, ScaleResult};

/// Bit set in [`ScaleInfo::xup_yup`] when the x axis is scaled up.
pub const SCALE_UP_X: u8 = 1;
/// Bit set in [`ScaleInfo::xup_yup`] when the y axis is scaled up.
pub const SCALE_UP_Y: u8 = 2;

/// The four structurally different scaling paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleCase {
    /// Destination at least as large as the source on both axes
    UpXY,
    /// Wider, but shorter
    UpXDownY,
    /// Narrower, but taller
    DownXUpY,
    /// Smaller on both axes
    DownXY,
}

/// Per-call coordinate and weight tables
///
/// All four tables are owned together: if building any one of them fails,
/// the ones already built are dropped with the half-constructed value.
#[derive(Debug, Clone)]
pub struct ScaleInfo {
    pub(crate) xpoints: Vec<usize>,
    pub(crate) ypoints: Vec<usize>,
    pub(crate) xapoints: Vec<u32>,
    pub(crate) yapoints: Vec<u32>,
    pub(crate) xup_yup: u8,
    pub(crate) src_width: usize,
    pub(crate) dst_width: usize,
    pub(crate) dst_height: usize,
}

impl ScaleInfo {
    /// Build the tables for scaling `src_width x src_height` to
    /// `dst_width x dst_height`.
    ///
    /// A negative destination dimension mirrors that axis; its magnitude is
    /// the output size.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::InvalidSourceDimension`] or
    /// [`ScaleError::InvalidDestDimension`] for zero extents, and
    /// [`ScaleError::AllocationFailed`] if a table cannot be allocated.
    pub fn new(src_width: u32, src_height: u32, dst_width: i32, dst_height: i32) -> ScaleResult<Self> {
        if src_width == 0 || src_height == 0 {
            return Err(ScaleError::InvalidSourceDimension {
                width: src_width,
                height: src_height,
            });
        }
        if dst_width == 0 || dst_height == 0 {
            return Err(ScaleError::InvalidDestDimension {
                width: dst_width,
                height: dst_height,
            });
        }

        let dw = dst_width.unsigned_abs();
        let dh = dst_height.unsigned_abs();
        let up_x = dw >= src_width;
        let up_y = dh >= src_height;
        let xup_yup = (up_x as u8 * SCALE_UP_X) | (up_y as u8 * SCALE_UP_Y);

        let mut xpoints = calc_points(src_width, dw)?;
        let mut ypoints = calc_points(src_height, dh)?;
        for row in ypoints.iter_mut() {
            *row *= src_width as usize;
        }
        let mut xapoints = calc_apoints(src_width, dw, up_x)?;
        let mut yapoints = calc_apoints(src_height, dh, up_y)?;

        if dst_width < 0 {
            mirror(&mut xpoints);
            mirror(&mut xapoints);
        }
        if dst_height < 0 {
            mirror(&mut ypoints);
            mirror(&mut yapoints);
        }

        Ok(Self {
            xpoints,
            ypoints,
            xapoints,
            yapoints,
            xup_yup,
            src_width: src_width as usize,
            dst_width: dw as usize,
            dst_height: dh as usize,
        })
    }

    /// Source x offset of every destination column.
    pub fn xpoints(&self) -> &[usize] {
        &self.xpoints
    }

    /// Source pixel index of the row start for every destination row.
    pub fn ypoints(&self) -> &[usize] {
        &self.ypoints
    }

    /// Horizontal weights.
    pub fn xapoints(&self) -> &[u32] {
        &self.xapoints
    }

    /// Vertical weights.
    pub fn yapoints(&self) -> &[u32] {
        &self.yapoints
    }

    /// Up/down flags, a combination of [`SCALE_UP_X`] and [`SCALE_UP_Y`].
    pub fn xup_yup(&self) -> u8 {
        self.xup_yup
    }

    /// Output width in pixels.
    pub fn dst_width(&self) -> usize {
        self.dst_width
    }

    /// Output height in pixels.
    pub fn dst_height(&self) -> usize {
        self.dst_height
    }

    /// Which scaling path this geometry takes.
    pub fn case(&self) -> ScaleCase {
        match self.xup_yup {
            3 => ScaleCase::UpXY,
            SCALE_UP_X => ScaleCase::UpXDownY,
            SCALE_UP_Y => ScaleCase::DownXUpY,
            _ => ScaleCase::DownXY,
        }
    }
}

fn alloc_table<T>(len: usize, what: &'static str) -> ScaleResult<Vec<T>> {
    let mut table = Vec::new();
    table
        .try_reserve_exact(len)
        .map_err(|_| ScaleError::AllocationFailed {
            what,
            bytes: len.saturating_mul(size_of::<T>()),
        })?;
    Ok(table)
}

/// Map each of `d` destination coordinates to a source offset in `[0, s)`.
///
/// Upscaling centers the sampling grid (the running value starts at
/// `0x8000 * s / d - 0x8000`); downscaling starts at 0 so that the first
/// destination pixel's coverage begins at the first source pixel.
pub fn calc_points(s: u32, d: u32) -> ScaleResult<Vec<usize>> {
    let mut points = alloc_table(d as usize, "offset table")?;
    let s = s as i64;
    let d = d as i64;
    let mut val = if d >= s { 0x8000 * s / d - 0x8000 } else { 0 };
    let inc = (s << 16) / d;
    for _ in 0..d {
        points.push((val >> 16).max(0) as usize);
        val += inc;
    }
    Ok(points)
}

/// Compute the per-coordinate weights for one axis.
///
/// See the module documentation for the encoding.
pub fn calc_apoints(s: u32, d: u32, up: bool) -> ScaleResult<Vec<u32>> {
    let mut points = alloc_table(d as usize, "weight table")?;
    let s = s as i64;
    let d = d as i64;
    let inc = (s << 16) / d;
    if up {
        let mut val = 0x8000 * s / d - 0x8000;
        for _ in 0..d {
            let pos = val >> 16;
            if pos < 0 || pos >= s - 1 {
                points.push(0);
            } else {
                points.push(((val >> 8) & 0xff) as u32);
            }
            val += inc;
        }
    } else {
        let cp = ((d << 14) + s - 1) / s;
        let mut val = 0i64;
        for _ in 0..d {
            let ap = ((0x10000 - (val & 0xffff)) * cp) >> 16;
            points.push((ap | (cp << 16)) as u32);
            val += inc;
        }
    }
    Ok(points)
}

/// Reverse a table in place, turning it into the table of the mirrored axis.
pub fn mirror<T>(table: &mut [T]) {
    table.reverse();
}
