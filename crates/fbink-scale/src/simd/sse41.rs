//! SSE4.1 kernel

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{RgbaKernel, load_pixel};
use crate::accum::{COVERAGE_ONE, Coverage};

/// SSE4.1 kernel
///
/// Only [`Sse41::detect`] creates one, so holding a value proves the CPU
/// supports the instructions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sse41(());

impl Sse41 {
    /// Probe the CPU.
    pub(crate) fn detect() -> Option<Self> {
        if is_x86_feature_detected!("sse4.1") {
            Some(Self(()))
        } else {
            None
        }
    }
}

impl RgbaKernel for Sse41 {
    #[inline(always)]
    fn accumulate(self, src: &[u8], pos: usize, cov: Coverage, step: usize) -> [u32; 4] {
        // SAFETY: `self` was produced by `detect`, which checked for SSE4.1.
        unsafe { accumulate_sse41(src, pos, cov, step) }
    }
}

/// Zero-extend the four channels of a pixel into 32-bit lanes.
#[inline]
#[target_feature(enable = "sse4.1")]
fn widen(px: [u8; 4]) -> __m128i {
    _mm_cvtepu8_epi32(_mm_cvtsi32_si128(i32::from_le_bytes(px)))
}

#[target_feature(enable = "sse4.1")]
fn accumulate_sse41(src: &[u8], mut pos: usize, cov: Coverage, step: usize) -> [u32; 4] {
    // Products stay below 255 << 14, so signed 32-bit lanes never overflow.
    let mut sum = _mm_mullo_epi32(widen(load_pixel(src, pos)), _mm_set1_epi32(cov.first as i32));
    let full = _mm_set1_epi32(cov.step as i32);
    let mut j = COVERAGE_ONE - cov.first;
    while j > cov.step {
        pos += step;
        sum = _mm_add_epi32(sum, _mm_mullo_epi32(widen(load_pixel(src, pos)), full));
        j -= cov.step;
    }
    pos += step;
    sum = _mm_add_epi32(
        sum,
        _mm_mullo_epi32(widen(load_pixel(src, pos)), _mm_set1_epi32(j as i32)),
    );
    let mut out = [0u32; 4];
    // SAFETY: `out` is 16 bytes and the store is unaligned.
    unsafe { _mm_storeu_si128(out.as_mut_ptr().cast(), sum) };
    out
}
