//! Binning coordinate transform
//!
//! Maps angular coordinates to fractional bin indices and back, and
//! resolves the azimuthal wrap-around at the +-pi cut.

use crate::error::{RebinError, RebinResult};

/// A uniform 1D binning of a half-open coordinate range.
///
/// The upper bound is expanded by one float32 ulp so the maximum input
/// coordinate maps strictly below `bins`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    lo: f64,
    delta: f64,
    bins: usize,
}

impl Grid {
    /// Build a grid over an explicit `[lo, hi)` range.
    ///
    /// # Errors
    ///
    /// [`RebinError::InvalidBinCount`] when `bins == 0`,
    /// [`RebinError::EmptyRange`] when `lo >= hi`.
    pub fn from_range(lo: f64, hi: f64, bins: usize) -> RebinResult<Self> {
        if bins == 0 {
            return Err(RebinError::InvalidBinCount);
        }
        if !(lo < hi) {
            return Err(RebinError::EmptyRange { lo, hi });
        }
        let hi = expand_upper(hi);
        Ok(Self {
            lo,
            delta: (hi - lo) / bins as f64,
            bins,
        })
    }

    /// Build a grid from observed data extrema.
    ///
    /// Falls back to `[0, 1)` when the data is empty or degenerate
    /// (`min >= max`), so that runs over zero pixels still produce a
    /// well-formed output axis.
    pub fn from_data(min: f64, max: f64, bins: usize) -> RebinResult<Self> {
        if bins == 0 {
            return Err(RebinError::InvalidBinCount);
        }
        if min.is_finite() && max.is_finite() && min < max {
            Self::from_range(min, max, bins)
        } else {
            Self::from_range(0.0, 1.0, bins)
        }
    }

    /// Number of bins.
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Lower bound of the range.
    #[inline]
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Width of one bin.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Fractional bin index of a coordinate.
    #[inline]
    pub fn coord(&self, x: f64) -> f64 {
        (x - self.lo) / self.delta
    }

    /// Coordinate of the center of bin `k`.
    #[inline]
    pub fn center(&self, k: usize) -> f64 {
        self.lo + (k as f64 + 0.5) * self.delta
    }

    /// Coordinates of all bin centers.
    pub fn centers(&self) -> Vec<f64> {
        (0..self.bins).map(|k| self.center(k)).collect()
    }
}

/// Expand an inclusive upper bound by one float32 ulp.
///
/// Guarantees `coord(max) < bins` for the maximum input coordinate.
pub(crate) fn expand_upper(x: f64) -> f64 {
    const EPS32: f64 = f32::EPSILON as f64;
    if x > 0.0 {
        x * (1.0 + EPS32)
    } else if x < 0.0 {
        x * (1.0 - EPS32)
    } else {
        f32::MIN_POSITIVE as f64
    }
}

/// Does a quadrilateral's azimuth set straddle the +-pi cut?
///
/// True iff at least one corner lies above +pi/2 and at least one below
/// -pi/2. Quads whose corners all sit in the same half never trigger a
/// shift, and 3-versus-1 corner splits across the cut do.
pub(crate) fn crosses_seam(azimuths: &[f64; 4]) -> bool {
    let mut high = false;
    let mut low = false;
    for &a in azimuths {
        high |= a > std::f64::consts::FRAC_PI_2;
        low |= a < -std::f64::consts::FRAC_PI_2;
    }
    high && low
}

/// Shift a negative azimuth up by one period.
///
/// Applied to every corner of a seam-crossing quad so the quad stays
/// contiguous in bin space; the resulting bin coordinates may exceed the
/// grid and are clipped by the splitter.
#[inline]
pub(crate) fn unwrap_azimuth(a: f64) -> f64 {
    if a < 0.0 {
        a + 2.0 * std::f64::consts::PI
    } else {
        a
    }
}
