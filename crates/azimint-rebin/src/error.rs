//! Error types for azimint-rebin

use thiserror::Error;

/// Errors that can occur while setting up an integration run
///
/// All of these are raised during input validation, before any pixel is
/// processed. Per-pixel anomalies (degenerate quads, out-of-grid bounding
/// boxes) never error; they are skipped.
#[derive(Debug, Error)]
pub enum RebinError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] azimint_core::Error),

    /// A per-pixel array does not match the pixel count
    #[error("length mismatch for '{name}': expected {expected}, got {actual}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Bin count is zero
    #[error("bin count must be positive")]
    InvalidBinCount,

    /// An explicit range is empty or inverted
    #[error("empty range: [{lo}, {hi})")]
    EmptyRange { lo: f64, hi: f64 },
}

/// Result type for rebinning operations
pub type RebinResult<T> = Result<T, RebinError>;
