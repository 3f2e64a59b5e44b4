//! Scaling paths
//!
//! Every axis is either scaled up (bilinear blend of two neighbours with an
//! 8-bit weight) or down (area average through an accumulator), which gives
//! four paths selected by [`ScaleInfo::case`]. Each path is written once,
//! generic over bytes per pixel (`BPP`) and accumulated channels (`N`);
//! channels `N..BPP` of the output are set opaque.
//!
//! | Path | Horizontal | Vertical | Final shift |
//! |---|---|---|---|
//! | up x, up y | blend | blend | 8 per blend |
//! | up x, down y | blend of two columns | accumulate | 14 |
//! | down x, up y | accumulate | blend of two rows | 14 |
//! | down x, down y | accumulate, `>> 4` | accumulate | 24 |

use std::array;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
use crate::simd::Neon;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::simd::Sse41;
use crate::accum::{self, COVERAGE_ONE, Coverage};
use crate::info::{ScaleCase, ScaleInfo};
use crate::simd::{Backend, RgbaKernel, Scalar};
use fbink_core::color;

#[inline(always)]
fn pixel<const BPP: usize>(src: &[u8], pos: usize) -> [u8; BPP] {
    let mut px = [0u8; BPP];
    px.copy_from_slice(&src[pos * BPP..pos * BPP + BPP]);
    px
}

/// `(a * (256 - w) + b * w) >> 8` on every channel.
#[inline(always)]
fn interpolate<const BPP: usize>(a: [u8; BPP], b: [u8; BPP], w: u32) -> [u8; BPP] {
    array::from_fn(|i| ((a[i] as u32 * (256 - w) + b[i] as u32 * w) >> 8) as u8)
}

#[inline(always)]
fn blend_sums<const N: usize>(sum: &mut [u32; N], next: [u32; N], w: u32) {
    for (s, n) in sum.iter_mut().zip(next) {
        *s = (*s * (256 - w) + n * w) >> 8;
    }
}

#[inline(always)]
fn store<const N: usize>(out: &mut [u8], sum: [u32; N], shift: u32) {
    for (o, s) in out.iter_mut().zip(sum) {
        *o = (s >> shift) as u8;
    }
    for o in &mut out[N..] {
        *o = color::OPAQUE;
    }
}

/// Run the path for `info` over `src`, writing `dst`.
///
/// `acc(pos, coverage, step)` returns the area sums starting at pixel
/// `pos`, walking `step` pixels per sample.
pub(crate) fn run<const BPP: usize, const N: usize, A>(
    info: &ScaleInfo,
    src: &[u8],
    dst: &mut [u8],
    acc: &A,
) where
    A: Fn(usize, Coverage, usize) -> [u32; N],
{
    match info.case() {
        ScaleCase::UpXY => up_xy::<BPP>(info, src, dst),
        ScaleCase::UpXDownY => up_x_down_y::<BPP, N, A>(info, dst, acc),
        ScaleCase::DownXUpY => down_x_up_y::<BPP, N, A>(info, dst, acc),
        ScaleCase::DownXY => down_xy::<BPP, N, A>(info, dst, acc),
    }
}

fn up_xy<const BPP: usize>(info: &ScaleInfo, src: &[u8], dst: &mut [u8]) {
    let sow = info.src_width;
    let rows = dst
        .chunks_exact_mut(info.dst_width * BPP)
        .zip(&info.ypoints)
        .zip(&info.yapoints);
    for ((row, &ypoint), &yap) in rows {
        let cols = row
            .chunks_exact_mut(BPP)
            .zip(&info.xpoints)
            .zip(&info.xapoints);
        for ((out, &xpoint), &xap) in cols {
            let pos = ypoint + xpoint;
            let mut px = pixel::<BPP>(src, pos);
            if xap > 0 {
                px = interpolate(px, pixel(src, pos + 1), xap);
                if yap > 0 {
                    let below = interpolate(pixel(src, pos + sow), pixel(src, pos + sow + 1), xap);
                    px = interpolate(px, below, yap);
                }
            } else if yap > 0 {
                px = interpolate(px, pixel(src, pos + sow), yap);
            }
            out.copy_from_slice(&px);
        }
    }
}

fn up_x_down_y<const BPP: usize, const N: usize, A>(info: &ScaleInfo, dst: &mut [u8], acc: &A)
where
    A: Fn(usize, Coverage, usize) -> [u32; N],
{
    let sow = info.src_width;
    let rows = dst
        .chunks_exact_mut(info.dst_width * BPP)
        .zip(&info.ypoints)
        .zip(&info.yapoints);
    for ((row, &ypoint), &yap) in rows {
        let cov = Coverage::from_packed(yap);
        let cols = row
            .chunks_exact_mut(BPP)
            .zip(&info.xpoints)
            .zip(&info.xapoints);
        for ((out, &xpoint), &xap) in cols {
            let pos = ypoint + xpoint;
            let mut sum = acc(pos, cov, sow);
            if xap > 0 {
                blend_sums(&mut sum, acc(pos + 1, cov, sow), xap);
            }
            store(out, sum, 14);
        }
    }
}

fn down_x_up_y<const BPP: usize, const N: usize, A>(info: &ScaleInfo, dst: &mut [u8], acc: &A)
where
    A: Fn(usize, Coverage, usize) -> [u32; N],
{
    let sow = info.src_width;
    let rows = dst
        .chunks_exact_mut(info.dst_width * BPP)
        .zip(&info.ypoints)
        .zip(&info.yapoints);
    for ((row, &ypoint), &yap) in rows {
        let cols = row
            .chunks_exact_mut(BPP)
            .zip(&info.xpoints)
            .zip(&info.xapoints);
        for ((out, &xpoint), &xap) in cols {
            let cov = Coverage::from_packed(xap);
            let pos = ypoint + xpoint;
            let mut sum = acc(pos, cov, 1);
            if yap > 0 {
                blend_sums(&mut sum, acc(pos + sow, cov, 1), yap);
            }
            store(out, sum, 14);
        }
    }
}

fn down_xy<const BPP: usize, const N: usize, A>(info: &ScaleInfo, dst: &mut [u8], acc: &A)
where
    A: Fn(usize, Coverage, usize) -> [u32; N],
{
    // Row sums are pre-shifted by 4 so that the product with the vertical
    // coverage fits in 32 bits.
    fn add_row<const N: usize>(sum: &mut [u32; N], row: [u32; N], weight: u32) {
        for (s, r) in sum.iter_mut().zip(row) {
            *s += (r >> 4) * weight;
        }
    }

    let sow = info.src_width;
    let rows = dst
        .chunks_exact_mut(info.dst_width * BPP)
        .zip(&info.ypoints)
        .zip(&info.yapoints);
    for ((row, &ypoint), &yap) in rows {
        let cov_y = Coverage::from_packed(yap);
        let cols = row
            .chunks_exact_mut(BPP)
            .zip(&info.xpoints)
            .zip(&info.xapoints);
        for ((out, &xpoint), &xap) in cols {
            let cov_x = Coverage::from_packed(xap);
            let mut pos = ypoint + xpoint;
            let mut sum = [0u32; N];
            add_row(&mut sum, acc(pos, cov_x, 1), cov_y.first);
            let mut j = COVERAGE_ONE - cov_y.first;
            while j > cov_y.step {
                pos += sow;
                add_row(&mut sum, acc(pos, cov_x, 1), cov_y.step);
                j -= cov_y.step;
            }
            pos += sow;
            add_row(&mut sum, acc(pos, cov_x, 1), j);
            store(out, sum, 24);
        }
    }
}

/// RGBA pipeline on one kernel.
///
/// With `ignore_alpha`, only the color channels are accumulated and the
/// area-sampled paths write an opaque alpha.
fn scale_rgba<K: RgbaKernel>(info: &ScaleInfo, src: &[u8], dst: &mut [u8], kernel: K, ignore_alpha: bool) {
    if ignore_alpha {
        run::<4, 3, _>(info, src, dst, &|pos: usize, cov: Coverage, step: usize| {
            kernel.accumulate_rgb(src, pos, cov, step)
        });
    } else {
        run::<4, 4, _>(info, src, dst, &|pos: usize, cov: Coverage, step: usize| {
            kernel.accumulate(src, pos, cov, step)
        });
    }
}

/// RGBA pipeline on the kernel `backend` resolves to.
pub(crate) fn scale_rgba_on(
    backend: Backend,
    info: &ScaleInfo,
    src: &[u8],
    dst: &mut [u8],
    ignore_alpha: bool,
) {
    match backend.resolve() {
        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        Backend::Neon => scale_rgba(info, src, dst, Neon, ignore_alpha),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        Backend::Sse41 => match Sse41::detect() {
            Some(kernel) => scale_rgba(info, src, dst, kernel, ignore_alpha),
            None => scale_rgba(info, src, dst, Scalar, ignore_alpha),
        },
        _ => scale_rgba(info, src, dst, Scalar, ignore_alpha),
    }
}

/// Gray pipeline.
pub(crate) fn scale_gray(info: &ScaleInfo, src: &[u8], dst: &mut [u8]) {
    run::<1, 1, _>(info, src, dst, &|pos: usize, cov: Coverage, step: usize| {
        accum::accumulate_gray(src, pos, cov, step)
    });
}

/// Gray + alpha pipeline.
pub(crate) fn scale_gray_alpha(info: &ScaleInfo, src: &[u8], dst: &mut [u8]) {
    run::<2, 2, _>(info, src, dst, &|pos: usize, cov: Coverage, step: usize| {
        accum::accumulate_gray_alpha(src, pos, cov, step)
    });
}
