//! Per-bin accumulation and finalization
//!
//! Both splitters deposit `(weight, weight * intensity)` pairs into an
//! [`Accumulator`]; at the end of a run the accumulator is divided out
//! into the normalized intensity, with empty bins receiving the dummy
//! value. The parallel path reduces one accumulator per pixel chunk and
//! merges them in chunk order.

/// Bins with a weight sum at or below this are considered empty.
pub(crate) const EPSILON: f64 = 1e-10;

/// Zero-initialized per-bin sums.
#[derive(Debug, Clone)]
pub(crate) struct Accumulator {
    sum_weighted: Vec<f64>,
    sum_count: Vec<f64>,
}

impl Accumulator {
    pub fn new(bins: usize) -> Self {
        Self {
            sum_weighted: vec![0.0; bins],
            sum_count: vec![0.0; bins],
        }
    }

    /// Add an overlap weight and its weighted intensity to bin `k`.
    #[inline]
    pub fn deposit(&mut self, k: usize, weight: f64, weighted: f64) {
        self.sum_count[k] += weight;
        self.sum_weighted[k] += weighted;
    }

    /// Fold another accumulator of the same size into this one.
    pub fn merge(&mut self, other: &Accumulator) {
        debug_assert_eq!(self.sum_count.len(), other.sum_count.len());
        for (dst, src) in self.sum_count.iter_mut().zip(&other.sum_count) {
            *dst += src;
        }
        for (dst, src) in self.sum_weighted.iter_mut().zip(&other.sum_weighted) {
            *dst += src;
        }
    }

    /// Divide out the sums.
    ///
    /// Returns `(intensity, sum_weighted, sum_count)`; bins whose weight
    /// sum is at or below [`EPSILON`] get `empty` as their intensity.
    pub fn finalize(self, empty: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let intensity = self
            .sum_weighted
            .iter()
            .zip(&self.sum_count)
            .map(|(&data, &count)| if count > EPSILON { data / count } else { empty })
            .collect();
        (intensity, self.sum_weighted, self.sum_count)
    }
}

/// Pixel bookkeeping for one run (or one chunk of a parallel run).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunStats {
    /// Pixels that reached a splitter and deposited (possibly zero area)
    pub accepted: usize,
    /// Pixels removed by mask or dummy match
    pub rejected: usize,
    /// Pixels whose bounding box missed the output grid entirely
    pub out_of_range: usize,
    /// Pixels discarded by the 1D azimuth window
    pub windowed: usize,
}

impl RunStats {
    pub fn absorb(&mut self, other: RunStats) {
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.out_of_range += other.out_of_range;
        self.windowed += other.windowed;
    }

    /// Emit the per-run log lines.
    pub fn report(&self, label: &str) {
        if self.out_of_range > 0 {
            log::warn!(
                "{label}: {} pixel(s) outside the output grid were skipped",
                self.out_of_range
            );
        }
        log::debug!(
            "{label}: accepted {} pixel(s), rejected {} (mask/dummy), windowed {}",
            self.accepted,
            self.rejected,
            self.windowed
        );
    }
}
