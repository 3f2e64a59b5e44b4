//! NEON kernel

use core::arch::aarch64::*;

use super::{RgbaKernel, load_pixel};
use crate::accum::{COVERAGE_ONE, Coverage};

/// NEON kernel, available whenever the target enables `neon`
#[derive(Debug, Clone, Copy)]
pub(crate) struct Neon;

/// Zero-extend the four channels of a pixel into 16-bit lanes.
#[inline(always)]
unsafe fn widen(px: [u8; 4]) -> uint16x4_t {
    unsafe { vget_low_u16(vmovl_u8(vcreate_u8(u32::from_le_bytes(px) as u64))) }
}

impl RgbaKernel for Neon {
    #[inline(always)]
    fn accumulate(self, src: &[u8], mut pos: usize, cov: Coverage, step: usize) -> [u32; 4] {
        let mut out = [0u32; 4];
        // SAFETY: this module only exists when the target enables neon, and
        // the store writes exactly the four lanes of `out`.
        unsafe {
            let mut sum = vmull_n_u16(widen(load_pixel(src, pos)), cov.first as u16);
            let mut j = COVERAGE_ONE - cov.first;
            while j > cov.step {
                pos += step;
                sum = vmlal_n_u16(sum, widen(load_pixel(src, pos)), cov.step as u16);
                j -= cov.step;
            }
            pos += step;
            sum = vmlal_n_u16(sum, widen(load_pixel(src, pos)), j as u16);
            vst1q_u32(out.as_mut_ptr(), sum);
        }
        out
    }
}
