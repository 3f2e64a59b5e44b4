//! Per-format area accumulators
//!
//! An accumulator walks consecutive source samples along one axis (step 1
//! for a row, the row stride for a column) and sums each channel weighted
//! by how much of the sample falls inside the destination pixel. Weights
//! are 14-bit fixed point and always total exactly `1 << 14`; the sums are
//! left unnormalized for the dispatcher to shift.
//!
//! The layouts share one implementation parameterized by bytes per pixel
//! (`BPP`) and accumulated channels (`N`):
//!
//! | Variant | `BPP` | `N` |
//! |---|---|---|
//! | RGBA | 4 | 4 |
//! | RGBA, alpha ignored | 4 | 3 |
//! | gray | 1 | 1 |
//! | gray + alpha | 2 | 2 |

/// Full coverage of one destination pixel, in 14-bit fixed point.
pub const COVERAGE_ONE: u32 = 1 << 14;

/// Coverage of a destination pixel along one down-scaled axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    /// Weight of the first (partially covered) sample
    pub first: u32,
    /// Weight of every fully covered sample
    pub step: u32,
}

impl Coverage {
    /// Unpack a down-scaling weight table entry.
    #[inline]
    pub fn from_packed(packed: u32) -> Self {
        Self {
            first: packed & 0xffff,
            step: packed >> 16,
        }
    }
}

#[inline(always)]
fn add_sample<const BPP: usize, const N: usize>(
    sum: &mut [u32; N],
    src: &[u8],
    pos: usize,
    weight: u32,
) {
    let start = pos * BPP;
    for (s, &c) in sum.iter_mut().zip(&src[start..start + N]) {
        *s += c as u32 * weight;
    }
}

/// Area-weighted channel sums starting at sample `pos`.
///
/// # Arguments
/// * `src` - Source pixels
/// * `pos` - Pixel index of the first covered sample
/// * `cov` - Coverage of the destination pixel on this axis
/// * `step` - Distance between consecutive samples, in pixels
#[inline(always)]
pub fn accumulate<const BPP: usize, const N: usize>(
    src: &[u8],
    mut pos: usize,
    cov: Coverage,
    step: usize,
) -> [u32; N] {
    let mut sum = [0u32; N];
    add_sample::<BPP, N>(&mut sum, src, pos, cov.first);
    let mut j = COVERAGE_ONE - cov.first;
    while j > cov.step {
        pos += step;
        add_sample::<BPP, N>(&mut sum, src, pos, cov.step);
        j -= cov.step;
    }
    pos += step;
    add_sample::<BPP, N>(&mut sum, src, pos, j);
    sum
}

/// RGBA sums.
#[inline]
pub fn accumulate_rgba(src: &[u8], pos: usize, cov: Coverage, step: usize) -> [u32; 4] {
    accumulate::<4, 4>(src, pos, cov, step)
}

/// RGB sums of RGBA pixels, skipping alpha.
#[inline]
pub fn accumulate_rgb(src: &[u8], pos: usize, cov: Coverage, step: usize) -> [u32; 3] {
    accumulate::<4, 3>(src, pos, cov, step)
}

/// Gray sums.
#[inline]
pub fn accumulate_gray(src: &[u8], pos: usize, cov: Coverage, step: usize) -> [u32; 1] {
    accumulate::<1, 1>(src, pos, cov, step)
}

/// Gray and alpha sums.
#[inline]
pub fn accumulate_gray_alpha(src: &[u8], pos: usize, cov: Coverage, step: usize) -> [u32; 2] {
    accumulate::<2, 2>(src, pos, cov, step)
}
