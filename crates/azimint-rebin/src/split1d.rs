//! 1D pixel splitting
//!
//! Distributes each pixel's corrected intensity across radial bins in
//! proportion to the overlap area between the pixel quadrilateral and
//! each bin column. The overlap is obtained by summing the signed line
//! integrals of the four quad edges restricted to the column's x-span
//! (Green's theorem); the magnitude of the sum is the area of the quad
//! clipped to the column.

use std::ops::Range;

use azimint_core::{BinPoint, EdgeLine, PixelQuad, quad_signed_area};

use crate::accum::{Accumulator, RunStats};
use crate::correct::Corrector;
use crate::grid::Grid;

/// What happened to one pixel in a splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Deposited into at least zero bins (degenerate quads deposit nothing)
    Deposited,
    /// Bounding box entirely outside the output grid
    OutOfRange,
    /// Discarded by the azimuth window
    Windowed,
}

/// Split one corrected pixel over the radial grid.
///
/// `window` is the optional azimuth acceptance interval; a pixel is
/// discarded only when its azimuth extent lies entirely outside it.
pub(crate) fn split_pixel(
    grid: &Grid,
    quad: &PixelQuad,
    window: Option<(f64, f64)>,
    intensity: f64,
    acc: &mut Accumulator,
) -> Outcome {
    let bins = grid.bins();
    let radials = quad.radials();
    let coords = radials.map(|r| grid.coord(r));
    let min0 = coords.into_iter().fold(f64::INFINITY, f64::min);
    let max0 = coords.into_iter().fold(f64::NEG_INFINITY, f64::max);

    if max0 < 0.0 || min0 >= bins as f64 {
        return Outcome::OutOfRange;
    }
    if let Some((lo, hi)) = window
        && (quad.azimuth_max() < lo || quad.azimuth_min() > hi)
    {
        return Outcome::Windowed;
    }

    let k_lo = min0.floor() as i64;
    let k_hi = max0.floor() as i64;

    if k_lo == k_hi {
        // Bounding-box filter above guarantees 0 <= k_lo < bins here.
        acc.deposit(k_lo as usize, 1.0, intensity);
        return Outcome::Deposited;
    }

    // Columns are swept in coordinates translated so the lowest touched
    // bin starts at 0. The y values only enter through edge differences,
    // so the raw azimuths serve directly.
    let azimuths = quad.azimuths();
    let mut pts = [BinPoint::default(); 4];
    for (i, p) in pts.iter_mut().enumerate() {
        *p = BinPoint::new(coords[i] - k_lo as f64, azimuths[i]);
    }
    let area = quad_signed_area(pts[0], pts[1], pts[2], pts[3]).abs();
    if area == 0.0 {
        return Outcome::Deposited;
    }
    let inv_area = 1.0 / area;

    let edges = [
        EdgeLine::through(pts[0], pts[1]),
        EdgeLine::through(pts[1], pts[2]),
        EdgeLine::through(pts[2], pts[3]),
        EdgeLine::through(pts[3], pts[0]),
    ];

    for k in k_lo..=k_hi {
        if k < 0 || k >= bins as i64 {
            continue;
        }
        let u = (k - k_lo) as f64;
        let lim = pts.map(|p| p.x.clamp(u, u + 1.0));
        let partial = edges[0].integrate(lim[0], lim[1])
            + edges[1].integrate(lim[1], lim[2])
            + edges[2].integrate(lim[2], lim[3])
            + edges[3].integrate(lim[3], lim[0]);
        let w = partial.abs() * inv_area;
        acc.deposit(k as usize, w, intensity * w);
    }
    Outcome::Deposited
}

/// Process a contiguous pixel index range into an accumulator.
pub(crate) fn run_range(
    quads: &[PixelQuad],
    weights: &[f64],
    grid: &Grid,
    window: Option<(f64, f64)>,
    corrector: &Corrector<'_>,
    range: Range<usize>,
    acc: &mut Accumulator,
) -> RunStats {
    let mut stats = RunStats::default();
    for idx in range {
        let Some(intensity) = corrector.accept(idx, weights[idx]) else {
            stats.rejected += 1;
            continue;
        };
        match split_pixel(grid, &quads[idx], window, intensity, acc) {
            Outcome::Deposited => stats.accepted += 1,
            Outcome::OutOfRange => stats.out_of_range += 1,
            Outcome::Windowed => stats.windowed += 1,
        }
    }
    stats
}
