//! 2D pixel splitting
//!
//! Distributes each pixel over a (radial, azimuth) grid of cells by
//! polygon-rectangle clipping. Three fast paths cover the common cases
//! (pixel inside one cell, one bin column, one bin row); the general
//! path classifies every cell of the pixel's bounding box through a
//! lattice point-in-quad table and clips only the partially covered
//! cells. Cells are unit squares in bin coordinates, so a fully covered
//! cell contributes `1 / |quad area|` without a cell-area factor.

use std::ops::Range;

use azimint_core::{BinPoint, ClipPoly, EdgeLine, PixelQuad, quad_signed_area, side_of_line};

use crate::accum::{Accumulator, RunStats};
use crate::correct::Corrector;
use crate::grid::{Grid, crosses_seam, unwrap_azimuth};
use crate::split1d::Outcome;

/// Split one corrected pixel over the 2D grid.
///
/// `scratch` is the lattice inside-table buffer, reused across pixels;
/// it grows to at most `(bins0 + 1) * (bins1 + 1)` entries because the
/// cell sweep is clamped to the output grid.
pub(crate) fn split_pixel(
    grid0: &Grid,
    grid1: &Grid,
    quad: &PixelQuad,
    intensity: f64,
    acc: &mut Accumulator,
    scratch: &mut Vec<i8>,
) -> Outcome {
    let bins0 = grid0.bins();
    let bins1 = grid1.bins();

    let azimuths = quad.azimuths();
    let wrap = crosses_seam(&azimuths);
    let radials = quad.radials();
    let c0 = radials.map(|r| grid0.coord(r));
    let c1 = azimuths.map(|a| grid1.coord(if wrap { unwrap_azimuth(a) } else { a }));

    let min0 = c0.into_iter().fold(f64::INFINITY, f64::min);
    let max0 = c0.into_iter().fold(f64::NEG_INFINITY, f64::max);
    let min1 = c1.into_iter().fold(f64::INFINITY, f64::min);
    let max1 = c1.into_iter().fold(f64::NEG_INFINITY, f64::max);

    if max0 < 0.0 || min0 >= bins0 as f64 || max1 < 0.0 {
        return Outcome::OutOfRange;
    }
    // High azimuth overflow happens routinely for seam-crossing pixels
    // shifted by one period; the overflowing part is dropped without a
    // warning.
    if min1 >= bins1 as f64 {
        return Outcome::Deposited;
    }

    let k0_lo = min0.floor() as i64;
    let k0_hi = max0.floor() as i64;
    let k1_lo = min1.floor() as i64;
    let k1_hi = max1.floor() as i64;

    if k0_lo == k0_hi && k1_lo == k1_hi {
        // The range filters above pin both indices inside the grid.
        let idx = k0_lo as usize * bins1 + k1_lo as usize;
        acc.deposit(idx, 1.0, intensity);
        return Outcome::Deposited;
    }

    if k0_lo == k0_hi {
        return split_single_column(
            k0_lo as usize,
            k1_lo,
            k1_hi,
            &c0,
            &c1,
            bins1,
            intensity,
            acc,
        );
    }
    if k1_lo == k1_hi {
        return split_single_row(
            k1_lo as usize,
            k0_lo,
            k0_hi,
            &c0,
            &c1,
            bins0,
            bins1,
            intensity,
            acc,
        );
    }

    // General path, clamped to the output grid.
    let i_start = k0_lo.max(0);
    let i_end = k0_hi.min(bins0 as i64 - 1);
    let j_start = k1_lo.max(0);
    let j_end = k1_hi.min(bins1 as i64 - 1);
    if i_start > i_end || j_start > j_end {
        return Outcome::Deposited;
    }

    let mut pts = [BinPoint::default(); 4];
    for (i, p) in pts.iter_mut().enumerate() {
        *p = BinPoint::new(c0[i] - i_start as f64, c1[i] - j_start as f64);
    }
    let area = quad_signed_area(pts[0], pts[1], pts[2], pts[3]).abs();
    if area == 0.0 {
        return Outcome::Deposited;
    }
    let inv_area = 1.0 / area;

    let n0 = (i_end - i_start + 1) as usize;
    let n1 = (j_end - j_start + 1) as usize;

    // Lattice table: is_inside[i * (n1 + 1) + j] = 1 when the lattice
    // point (i, j) lies strictly inside the quad.
    let stride = n1 + 1;
    scratch.clear();
    scratch.resize((n0 + 1) * stride, 0);
    for i in 0..=n0 {
        for j in 0..=n1 {
            let p = BinPoint::new(i as f64, j as f64);
            let sum = side_of_line(pts[0], pts[1], p)
                + side_of_line(pts[1], pts[2], p)
                + side_of_line(pts[2], pts[3], p)
                + side_of_line(pts[3], pts[0], p);
            scratch[i * stride + j] = (sum.abs() == 4) as i8;
        }
    }

    let poly = ClipPoly::from_quad(pts[0], pts[1], pts[2], pts[3]);
    let mut buf_a = ClipPoly::new();
    let mut buf_b = ClipPoly::new();

    for i in 0..n0 {
        for j in 0..n1 {
            let s = scratch[i * stride + j]
                + scratch[i * stride + j + 1]
                + scratch[(i + 1) * stride + j]
                + scratch[(i + 1) * stride + j + 1];
            let w = match s {
                4 => inv_area,
                1..=3 => {
                    poly.clip_min_x(i as f64, &mut buf_a);
                    buf_a.clip_max_y((j + 1) as f64, &mut buf_b);
                    buf_b.clip_max_x((i + 1) as f64, &mut buf_a);
                    buf_a.clip_min_y(j as f64, &mut buf_b);
                    buf_b.area() * inv_area
                }
                // A cell with no inside corner can still be grazed by a
                // thin sliver of the quad; that residue is dropped, as
                // is a cell the quad misses entirely.
                _ => continue,
            };
            let gi = i_start as usize + i;
            let gj = j_start as usize + j;
            acc.deposit(gi * bins1 + gj, w, intensity * w);
        }
    }
    Outcome::Deposited
}

/// Pixel confined to one bin column: 1D line-integral sweep along the
/// azimuth axis, edges taken as `radial = slope * azimuth + intercept`.
#[allow(clippy::too_many_arguments)]
fn split_single_column(
    k0: usize,
    k1_lo: i64,
    k1_hi: i64,
    c0: &[f64; 4],
    c1: &[f64; 4],
    bins1: usize,
    intensity: f64,
    acc: &mut Accumulator,
) -> Outcome {
    let mut pts = [BinPoint::default(); 4];
    for (i, p) in pts.iter_mut().enumerate() {
        *p = BinPoint::new(c1[i] - k1_lo as f64, c0[i]);
    }
    sweep_columns(&pts, k1_lo, k1_hi, bins1, intensity, acc, |j| {
        k0 * bins1 + j
    })
}

/// Pixel confined to one bin row: 1D sweep along the radial axis.
#[allow(clippy::too_many_arguments)]
fn split_single_row(
    k1: usize,
    k0_lo: i64,
    k0_hi: i64,
    c0: &[f64; 4],
    c1: &[f64; 4],
    bins0: usize,
    bins1: usize,
    intensity: f64,
    acc: &mut Accumulator,
) -> Outcome {
    let mut pts = [BinPoint::default(); 4];
    for (i, p) in pts.iter_mut().enumerate() {
        *p = BinPoint::new(c0[i] - k0_lo as f64, c1[i]);
    }
    sweep_columns(&pts, k0_lo, k0_hi, bins0, intensity, acc, |i| {
        i * bins1 + k1
    })
}

/// Shared column sweep for the single-row / single-column fast paths.
///
/// `pts` are translated so the first swept column starts at x = 0;
/// `cell` maps the global bin index along the swept axis to a flat
/// accumulator index.
fn sweep_columns(
    pts: &[BinPoint; 4],
    k_lo: i64,
    k_hi: i64,
    bins: usize,
    intensity: f64,
    acc: &mut Accumulator,
    cell: impl Fn(usize) -> usize,
) -> Outcome {
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
        acc.deposit(cell(k as usize), w, intensity * w);
    }
    Outcome::Deposited
}

/// Process a contiguous pixel index range into an accumulator.
pub(crate) fn run_range(
    quads: &[PixelQuad],
    weights: &[f64],
    grid0: &Grid,
    grid1: &Grid,
    corrector: &Corrector<'_>,
    range: Range<usize>,
    acc: &mut Accumulator,
    scratch: &mut Vec<i8>,
) -> RunStats {
    let mut stats = RunStats::default();
    for idx in range {
        let Some(intensity) = corrector.accept(idx, weights[idx]) else {
            stats.rejected += 1;
            continue;
        };
        match split_pixel(grid0, grid1, &quads[idx], intensity, acc, scratch) {
            Outcome::Deposited => stats.accepted += 1,
            Outcome::OutOfRange => stats.out_of_range += 1,
            Outcome::Windowed => stats.windowed += 1,
        }
    }
    stats
}
