//! Pixel quadrilaterals in angular space
//!
//! A detector pixel, mapped through the instrument geometry, becomes a
//! quadrilateral in (radial, azimuth) coordinates. The four corners are
//! produced by an external geometry layer; this module only carries them.

use crate::error::{Error, Result};

/// One corner of a pixel quadrilateral.
///
/// `radial` is the first angular axis (2-theta or q), `azimuth` the second
/// (chi, periodic with period 2*pi).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Corner {
    /// Radial coordinate
    pub radial: f64,
    /// Azimuthal coordinate
    pub azimuth: f64,
}

impl Corner {
    /// Create a new corner.
    pub fn new(radial: f64, azimuth: f64) -> Self {
        Self { radial, azimuth }
    }
}

/// One detector pixel as a quadrilateral in angular space.
///
/// Corners are stored in ring order (A, B, C, D), clockwise or
/// counter-clockwise; all area computations downstream take absolute
/// values, so the orientation does not matter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelQuad {
    corners: [Corner; 4],
}

impl PixelQuad {
    /// Create a quad from four corners in ring order.
    pub fn new(a: Corner, b: Corner, c: Corner, d: Corner) -> Self {
        Self {
            corners: [a, b, c, d],
        }
    }

    /// Create a quad from `[[radial, azimuth]; 4]`.
    pub fn from_corners(corners: [[f64; 2]; 4]) -> Self {
        Self {
            corners: corners.map(|[r, a]| Corner::new(r, a)),
        }
    }

    /// Reshape a flat corner buffer into pixel quads.
    ///
    /// The buffer is the row-major flattening of an N x 4 x 2 array:
    /// for each pixel, four corners, each a (radial, azimuth) pair. A
    /// detector image of shape (H, W, 4, 2) reshapes to N = H * W first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the length is not a multiple
    /// of 8.
    pub fn from_flat(buf: &[f64]) -> Result<Vec<PixelQuad>> {
        if buf.len() % 8 != 0 {
            return Err(Error::ShapeMismatch { len: buf.len() });
        }
        Ok(buf
            .chunks_exact(8)
            .map(|c| {
                Self::from_corners([[c[0], c[1]], [c[2], c[3]], [c[4], c[5]], [c[6], c[7]]])
            })
            .collect())
    }

    /// The four corners in ring order.
    #[inline]
    pub fn corners(&self) -> &[Corner; 4] {
        &self.corners
    }

    /// The four radial coordinates in ring order.
    #[inline]
    pub fn radials(&self) -> [f64; 4] {
        self.corners.map(|c| c.radial)
    }

    /// The four azimuthal coordinates in ring order.
    #[inline]
    pub fn azimuths(&self) -> [f64; 4] {
        self.corners.map(|c| c.azimuth)
    }

    /// Minimum radial coordinate over the four corners.
    pub fn radial_min(&self) -> f64 {
        self.radials().into_iter().fold(f64::INFINITY, f64::min)
    }

    /// Maximum radial coordinate over the four corners.
    pub fn radial_max(&self) -> f64 {
        self.radials().into_iter().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Minimum azimuthal coordinate over the four corners.
    pub fn azimuth_min(&self) -> f64 {
        self.azimuths().into_iter().fold(f64::INFINITY, f64::min)
    }

    /// Maximum azimuthal coordinate over the four corners.
    pub fn azimuth_max(&self) -> f64 {
        self.azimuths().into_iter().fold(f64::NEG_INFINITY, f64::max)
    }
}
