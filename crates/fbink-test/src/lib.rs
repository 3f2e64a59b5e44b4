//! fbink-test - Regression test framework for fbink
//!
//! Every crate's `tests/*_reg.rs` drives a [`RegParams`], which records
//! each check instead of panicking and reports all failures at the end.
//! Two modes are supported:
//!
//! - **Compare**: run the checks (default)
//! - **Display**: run the checks and dump bitmaps passed to
//!   [`RegParams::write_bitmap`] as PNG for visual inspection
//!
//! # Usage
//!
//! ```ignore
//! use fbink_test::RegParams;
//!
//! let mut rp = RegParams::new("scale");
//! rp.compare_values(100.0, out.data()[0] as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
pub fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // fbink-test is at crates/fbink-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
