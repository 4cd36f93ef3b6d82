//! Chunked parallel execution
//!
//! Pixels are partitioned into fixed-size disjoint index chunks; each
//! chunk is reduced on the rayon pool into a private accumulator, and
//! the partials are merged in chunk order on the calling thread. For a
//! fixed chunk size the result is reproducible run-to-run; against the
//! sequential reference it may differ by a few ULPs per bin, because
//! floating-point accumulation order changes at chunk boundaries.

use rayon::prelude::*;
use std::ops::Range;

use azimint_core::PixelQuad;

use crate::accum::{Accumulator, RunStats};
use crate::correct::Corrector;
use crate::grid::Grid;
use crate::{split1d, split2d};

/// Pixels per parallel work unit.
pub(crate) const CHUNK: usize = 4096;

fn chunk_ranges(n: usize) -> Vec<Range<usize>> {
    (0..n)
        .step_by(CHUNK)
        .map(|start| start..(start + CHUNK).min(n))
        .collect()
}

fn merge(bins: usize, partials: Vec<(Accumulator, RunStats)>) -> (Accumulator, RunStats) {
    let mut acc = Accumulator::new(bins);
    let mut stats = RunStats::default();
    for (partial, partial_stats) in &partials {
        acc.merge(partial);
        stats.absorb(*partial_stats);
    }
    (acc, stats)
}

/// Parallel counterpart of [`split1d::run_range`] over all pixels.
pub(crate) fn run_1d(
    quads: &[PixelQuad],
    weights: &[f64],
    grid: &Grid,
    window: Option<(f64, f64)>,
    corrector: &Corrector<'_>,
) -> (Accumulator, RunStats) {
    let partials: Vec<(Accumulator, RunStats)> = chunk_ranges(quads.len())
        .into_par_iter()
        .map(|range| {
            let mut acc = Accumulator::new(grid.bins());
            let stats = split1d::run_range(quads, weights, grid, window, corrector, range, &mut acc);
            (acc, stats)
        })
        .collect();
    merge(grid.bins(), partials)
}

/// Parallel counterpart of [`split2d::run_range`] over all pixels.
pub(crate) fn run_2d(
    quads: &[PixelQuad],
    weights: &[f64],
    grid0: &Grid,
    grid1: &Grid,
    corrector: &Corrector<'_>,
) -> (Accumulator, RunStats) {
    let bins = grid0.bins() * grid1.bins();
    let partials: Vec<(Accumulator, RunStats)> = chunk_ranges(quads.len())
        .into_par_iter()
        .map(|range| {
            let mut acc = Accumulator::new(bins);
            let mut scratch = Vec::new();
            let stats = split2d::run_range(
                quads, weights, grid0, grid1, corrector, range, &mut acc, &mut scratch,
            );
            (acc, stats)
        })
        .collect();
    merge(bins, partials)
}
