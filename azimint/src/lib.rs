//! Azimint - Azimuthal integration engine for Rust
//!
//! Rebins 2D detector images into intensity histograms over scattering
//! angle (1D) or scattering angle and azimuth (2D), splitting each pixel
//! across output bins by the geometric overlap of its quadrilateral
//! footprint. The per-pixel corner coordinates come from an external
//! geometry layer; this crate only rebins.
//!
//! # Overview
//!
//! - Full pixel splitting in 1D and 2D, with azimuthal wrap-around at
//!   the +-pi cut
//! - Detector corrections: mask, dummy sentinel, dark, flat,
//!   polarization, solid angle
//! - Plain centroid histogramming as the cheap alternative
//! - Sequential reference kernels plus a deterministic rayon path
//!
//! # Example
//!
//! ```
//! use azimint::{Integration1d, PixelQuad};
//!
//! // One pixel covering [0.5, 1.5] in the radial coordinate
//! let quads = [PixelQuad::from_corners([
//!     [0.5, 0.0],
//!     [1.5, 0.0],
//!     [1.5, 1.0],
//!     [0.5, 1.0],
//! ])];
//! let hist = Integration1d::new(&quads, &[10.0], 3)
//!     .radial_range(0.0, 3.0)
//!     .run()
//!     .unwrap();
//! assert!((hist.sum_count[0] - 0.5).abs() < 1e-6);
//! assert!((hist.sum_count[1] - 0.5).abs() < 1e-6);
//! ```

// Re-export the public API
pub use azimint_core::*;
pub use azimint_rebin::*;
