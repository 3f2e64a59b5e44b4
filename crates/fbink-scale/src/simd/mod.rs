//! Vectorized accumulation kernels
//!
//! The down-scaling paths of the RGBA pipelines spend nearly all their
//! time in the 4-channel accumulator. A kernel computes it with the four
//! channels in the lanes of one vector register; the arithmetic is the same
//! integer math as the scalar accumulator, so every kernel produces the same
//! bytes.
//!
//! - **NEON** (aarch64): selected at build time, NEON is part of the
//!   aarch64 baseline.
//! - **SSE4.1** (x86, x86_64): selected at runtime through CPU feature
//!   detection.
//!
//! The scalar kernel is always available and is the reference in tests.

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
mod neon;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod sse41;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub(crate) use neon::Neon;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) use sse41::Sse41;

use crate::accum::{self, Coverage};

/// Accumulator implementation for 32-bit RGBA sources
///
/// Selects which kernel the RGBA pipelines use for their area-sampled
/// axes. Requests for an instruction set the CPU lacks fall back to
/// [`Backend::Scalar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Best kernel available on this CPU
    #[default]
    Auto,
    /// Portable scalar code
    Scalar,
    /// ARM NEON
    Neon,
    /// x86 SSE4.1
    Sse41,
}

impl Backend {
    /// Whether this backend can run on the current CPU.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Auto | Backend::Scalar => true,
            Backend::Neon => cfg!(all(target_arch = "aarch64", target_feature = "neon")),
            Backend::Sse41 => sse41_detected(),
        }
    }

    /// The backend that will actually run when this one is requested.
    pub fn resolve(self) -> Backend {
        match self {
            Backend::Auto => {
                if Backend::Neon.is_available() {
                    Backend::Neon
                } else if Backend::Sse41.is_available() {
                    Backend::Sse41
                } else {
                    Backend::Scalar
                }
            }
            backend if backend.is_available() => backend,
            _ => Backend::Scalar,
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn sse41_detected() -> bool {
    Sse41::detect().is_some()
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn sse41_detected() -> bool {
    false
}

/// Area accumulator over 32-bit RGBA samples.
pub(crate) trait RgbaKernel: Copy {
    /// Weighted sums of all four channels.
    fn accumulate(self, src: &[u8], pos: usize, cov: Coverage, step: usize) -> [u32; 4];

    /// Weighted sums of the color channels only.
    #[inline(always)]
    fn accumulate_rgb(self, src: &[u8], pos: usize, cov: Coverage, step: usize) -> [u32; 3] {
        let [r, g, b, _] = self.accumulate(src, pos, cov, step);
        [r, g, b]
    }
}

/// Portable kernel
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scalar;

impl RgbaKernel for Scalar {
    #[inline(always)]
    fn accumulate(self, src: &[u8], pos: usize, cov: Coverage, step: usize) -> [u32; 4] {
        accum::accumulate_rgba(src, pos, cov, step)
    }

    #[inline(always)]
    fn accumulate_rgb(self, src: &[u8], pos: usize, cov: Coverage, step: usize) -> [u32; 3] {
        accum::accumulate_rgb(src, pos, cov, step)
    }
}

/// Copy the pixel at `pos` out of a 32-bit RGBA buffer.
#[cfg(any(
    all(target_arch = "aarch64", target_feature = "neon"),
    target_arch = "x86",
    target_arch = "x86_64"
))]
#[inline(always)]
pub(crate) fn load_pixel(src: &[u8], pos: usize) -> [u8; 4] {
    let mut px = [0u8; 4];
    px.copy_from_slice(&src[pos * 4..pos * 4 + 4]);
    px
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 37 % 251) as u8).collect()
    }

    #[test]
    fn test_resolve() {
        assert_eq!(Backend::Scalar.resolve(), Backend::Scalar);
        assert!(Backend::Auto.resolve().is_available());
        assert_ne!(Backend::Auto.resolve(), Backend::Auto);
        if !Backend::Neon.is_available() {
            assert_eq!(Backend::Neon.resolve(), Backend::Scalar);
        }
        if !Backend::Sse41.is_available() {
            assert_eq!(Backend::Sse41.resolve(), Backend::Scalar);
        }
    }

    #[test]
    fn test_scalar_kernel_matches_accumulator() {
        let src = pattern(64 * 4);
        let cov = Coverage::from_packed((5000 << 16) | 1234);
        assert_eq!(
            Scalar.accumulate(&src, 3, cov, 5),
            accum::accumulate_rgba(&src, 3, cov, 5)
        );
        assert_eq!(
            Scalar.accumulate_rgb(&src, 3, cov, 5),
            accum::accumulate_rgb(&src, 3, cov, 5)
        );
    }

    #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
    #[test]
    fn test_neon_matches_scalar() {
        let src = pattern(64 * 4);
        for packed in [(5000u32 << 16) | 1234, (8192 << 16) | 8192, (16384 << 16) | 100] {
            let cov = Coverage::from_packed(packed);
            for (pos, step) in [(0, 1), (3, 5), (10, 8)] {
                assert_eq!(
                    Neon.accumulate(&src, pos, cov, step),
                    Scalar.accumulate(&src, pos, cov, step)
                );
            }
        }
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[test]
    fn test_sse41_matches_scalar() {
        let Some(kernel) = Sse41::detect() else {
            return;
        };
        let src = pattern(64 * 4);
        for packed in [(5000u32 << 16) | 1234, (8192 << 16) | 8192, (16384 << 16) | 100] {
            let cov = Coverage::from_packed(packed);
            for (pos, step) in [(0, 1), (3, 5), (10, 8)] {
                assert_eq!(
                    kernel.accumulate(&src, pos, cov, step),
                    Scalar.accumulate(&src, pos, cov, step)
                );
            }
        }
    }
}
