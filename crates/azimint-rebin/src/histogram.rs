//! Plain histogramming without pixel splitting
//!
//! The cheap scheme: each accepted pixel deposits its whole corrected
//! intensity into the single bin containing its corner centroid. Shares
//! the correction pipeline, grids and accumulator with the splitting
//! paths, and serves as a coarse cross-check for them.

use azimint_core::PixelQuad;

use crate::accum::{Accumulator, RunStats};
use crate::correct::Corrector;
use crate::grid::{Grid, crosses_seam, unwrap_azimuth};

/// Centroid of the four corner radial coordinates.
fn radial_centroid(quad: &PixelQuad) -> f64 {
    quad.radials().into_iter().sum::<f64>() * 0.25
}

/// Centroid of the four corner azimuths, unwrapped across the seam.
fn azimuth_centroid(quad: &PixelQuad) -> f64 {
    let azimuths = quad.azimuths();
    if crosses_seam(&azimuths) {
        azimuths.into_iter().map(unwrap_azimuth).sum::<f64>() * 0.25
    } else {
        azimuths.into_iter().sum::<f64>() * 0.25
    }
}

/// Bin index of a coordinate, or `None` when it falls off the grid.
fn bin_index(grid: &Grid, x: f64) -> Option<usize> {
    let c = grid.coord(x);
    if c < 0.0 || c >= grid.bins() as f64 {
        None
    } else {
        Some(c as usize)
    }
}

/// Centroid-histogram every pixel onto the radial grid.
pub(crate) fn run_1d(
    quads: &[PixelQuad],
    weights: &[f64],
    grid: &Grid,
    window: Option<(f64, f64)>,
    corrector: &Corrector<'_>,
    acc: &mut Accumulator,
) -> RunStats {
    let mut stats = RunStats::default();
    for (idx, quad) in quads.iter().enumerate() {
        let Some(intensity) = corrector.accept(idx, weights[idx]) else {
            stats.rejected += 1;
            continue;
        };
        if let Some((lo, hi)) = window
            && (quad.azimuth_max() < lo || quad.azimuth_min() > hi)
        {
            stats.windowed += 1;
            continue;
        }
        match bin_index(grid, radial_centroid(quad)) {
            Some(k) => {
                acc.deposit(k, 1.0, intensity);
                stats.accepted += 1;
            }
            None => stats.out_of_range += 1,
        }
    }
    stats
}

/// Centroid-histogram every pixel onto the 2D grid.
pub(crate) fn run_2d(
    quads: &[PixelQuad],
    weights: &[f64],
    grid0: &Grid,
    grid1: &Grid,
    corrector: &Corrector<'_>,
    acc: &mut Accumulator,
) -> RunStats {
    let mut stats = RunStats::default();
    for (idx, quad) in quads.iter().enumerate() {
        let Some(intensity) = corrector.accept(idx, weights[idx]) else {
            stats.rejected += 1;
            continue;
        };
        let k0 = bin_index(grid0, radial_centroid(quad));
        let k1 = bin_index(grid1, azimuth_centroid(quad));
        match (k0, k1) {
            (Some(i), Some(j)) => {
                acc.deposit(i * grid1.bins() + j, 1.0, intensity);
                stats.accepted += 1;
            }
            _ => stats.out_of_range += 1,
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correct::Corrections;

    fn rect(r0: f64, r1: f64, a0: f64, a1: f64) -> PixelQuad {
        PixelQuad::from_corners([[r0, a0], [r1, a0], [r1, a1], [r0, a1]])
    }

    #[test]
    fn test_centroid_binning() {
        let grid = Grid::from_range(0.0, 4.0, 4).unwrap();
        let corrector = Corrector::new(Corrections::default(), None, 2).unwrap();
        let quads = [rect(0.4, 0.6, 0.0, 0.1), rect(2.4, 2.6, 0.0, 0.1)];
        let weights = [3.0, 5.0];
        let mut acc = Accumulator::new(4);
        let stats = run_1d(&quads, &weights, &grid, None, &corrector, &mut acc);
        assert_eq!(stats.accepted, 2);
        let (_, data, count) = acc.finalize(0.0);
        assert_eq!(count, vec![1.0, 0.0, 1.0, 0.0]);
        assert_eq!(data, vec![3.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_straddling_pixel_lands_in_one_bin() {
        // A pixel split 50/50 over bins 0 and 1 lands wholly in bin 1:
        // its centroid is exactly on the boundary, which bin 1 owns.
        let grid = Grid::from_range(0.0, 2.0, 2).unwrap();
        let corrector = Corrector::new(Corrections::default(), None, 1).unwrap();
        let quads = [rect(0.5, 1.5, 0.0, 1.0)];
        let mut acc = Accumulator::new(2);
        run_1d(&quads, &[2.0], &grid, None, &corrector, &mut acc);
        let (_, _, count) = acc.finalize(0.0);
        assert_eq!(count, vec![0.0, 1.0]);
    }

    #[test]
    fn test_seam_centroid() {
        use std::f64::consts::PI;
        let grid0 = Grid::from_range(0.0, 1.0, 1).unwrap();
        let grid1 = Grid::from_range(-PI, PI, 8).unwrap();
        let corrector = Corrector::new(Corrections::default(), None, 1).unwrap();
        // Corners straddling the cut; the unwrapped centroid sits just
        // past +pi and is dropped rather than smeared to 0.
        let quads = [rect(0.2, 0.4, 3.1, -3.1)];
        let mut acc = Accumulator::new(8);
        let stats = run_2d(&quads, &[1.0], &grid0, &grid1, &corrector, &mut acc);
        let (_, _, count) = acc.finalize(0.0);
        // Nothing lands in the interior bins around azimuth 0.
        for j in 2..6 {
            assert_eq!(count[j], 0.0);
        }
        assert_eq!(stats.accepted + stats.out_of_range, 1);
    }
}
