//! Error types for azimint-core
//!
//! Provides a unified error type for input validation in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// Azimint core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Flat corner buffer cannot be reshaped to N x 4 x 2
    #[error("corner buffer of {len} values is not a whole number of pixels (8 values per pixel)")]
    ShapeMismatch { len: usize },
}

/// Result type alias for azimint-core operations
pub type Result<T> = std::result::Result<T, Error>;
