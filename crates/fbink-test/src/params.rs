//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use fbink_core::Bitmap;
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Check results (default)
    #[default]
    Compare,
    /// Check results and also dump written bitmaps for visual inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the state of a regression test: the test name, the current
/// check index, the mode, and every failure seen so far. Checks never
/// panic; call [`RegParams::cleanup`] at the end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "scale")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "scale")
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two numeric values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two bitmaps for exact equality
    pub fn compare_bitmaps(&mut self, expected: &Bitmap, actual: &Bitmap) -> bool {
        self.compare_bitmaps_within(expected, actual, 0)
    }

    /// Compare two bitmaps, allowing every byte to differ by up to `delta`
    ///
    /// # Returns
    ///
    /// `true` if geometry and layout match and no byte differs by more
    /// than `delta`, `false` otherwise.
    pub fn compare_bitmaps_within(&mut self, expected: &Bitmap, actual: &Bitmap, delta: u8) -> bool {
        self.index += 1;

        if expected.width() != actual.width()
            || expected.height() != actual.height()
            || expected.layout() != actual.layout()
        {
            let msg = format!(
                "Failure in {}_reg: bitmap comparison for index {} - geometry mismatch\n\
                 expected {}x{} {:?}, actual {}x{} {:?}",
                self.test_name,
                self.index,
                expected.width(),
                expected.height(),
                expected.layout(),
                actual.width(),
                actual.height(),
                actual.layout()
            );
            return self.fail(msg);
        }

        let bpp = expected.layout().bytes_per_pixel();
        let mismatch = expected
            .data()
            .iter()
            .zip(actual.data())
            .position(|(&e, &a)| e.abs_diff(a) > delta);
        if let Some(offset) = mismatch {
            let px = offset / bpp;
            let x = px % expected.width() as usize;
            let y = px / expected.width() as usize;
            let msg = format!(
                "Failure in {}_reg: bitmap comparison for index {} - pixel mismatch at ({}, {})\n\
                 channel {}: expected {}, actual {}, allowed delta = {}",
                self.test_name,
                self.index,
                x,
                y,
                offset % bpp,
                expected.data()[offset],
                actual.data()[offset],
                delta
            );
            return self.fail(msg);
        }

        true
    }

    /// Compare two byte arrays
    pub fn compare_bytes(&mut self, expected: &[u8], actual: &[u8]) -> bool {
        self.index += 1;

        if expected != actual {
            let msg = format!(
                "Failure in {}_reg: byte comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                expected.len(),
                actual.len()
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Dump a bitmap as PNG for visual inspection
    ///
    /// Only writes in display mode; the file is
    /// `tests/regout/<test_name>.<index>.png` under the workspace root.
    pub fn write_bitmap(&mut self, bitmap: &Bitmap) -> TestResult<()> {
        self.index += 1;
        if !self.display() {
            return Ok(());
        }

        let dir = regout_dir();
        fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        let local_path = format!("{}/{}.{:02}.png", dir, self.test_name, self.index);
        fbink_io::write_png_file(bitmap, &local_path).map_err(|e| TestError::BitmapWrite {
            path: local_path.clone(),
            message: e.to_string(),
        })?;
        eprintln!("Wrote: {}", local_path);
        Ok(())
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbink_core::PixelLayout;

    #[test]
    fn test_compare_values() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.index(), 3);
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_bitmaps() {
        let a = Bitmap::from_data(2, 1, PixelLayout::GrayAlpha, &[10, 20, 30, 40]).unwrap();
        let b = Bitmap::from_data(2, 1, PixelLayout::GrayAlpha, &[10, 20, 31, 40]).unwrap();
        let c = Bitmap::from_data(1, 1, PixelLayout::Rgba, &[10, 20, 30, 40]).unwrap();

        let mut rp = RegParams::new("test");
        assert!(rp.compare_bitmaps(&a, &a));
        assert!(rp.compare_bitmaps_within(&a, &b, 1));
        assert!(rp.is_success());
        assert!(!rp.compare_bitmaps(&a, &b));
        assert!(rp.failures()[0].contains("(1, 0)"));
        assert!(!rp.compare_bitmaps(&a, &c));
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_compare_bytes() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_bytes(b"abc", b"abc"));
        assert!(!rp.compare_bytes(b"abc", b"abd"));
    }
}
