//! Property regression tests on randomized pixel sets
//!
//! Conservation, per-pixel partition of unity, linearity in intensity,
//! mask composition, correction ordering and 1D/2D consistency, all on
//! seeded random quads so failures reproduce.

use azimint_core::PixelQuad;
use azimint_rebin::{Corrections, Integration1d, Integration2d};
use azimint_test::RegParams;
use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};

/// Convex quad: a rectangle with corners jittered by under a fifth of
/// each side, which keeps all four turns convex.
fn jittered_quad(rng: &mut StdRng, lo: f64, hi: f64) -> PixelQuad {
    let w = rng.random_range(0.2..1.5);
    let h = rng.random_range(0.2..1.5);
    let x = rng.random_range(lo..hi - w);
    let y = rng.random_range(-1.0..1.0);
    let jx = w / 5.0;
    let jy = h / 5.0;
    let mut corner = |cx: f64, cy: f64| {
        [
            cx + rng.random_range(-jx..jx),
            cy + rng.random_range(-jy..jy),
        ]
    };
    PixelQuad::from_corners([
        corner(x, y),
        corner(x + w, y),
        corner(x + w, y + h),
        corner(x, y + h),
    ])
}

/// Axis-aligned rectangle with corners away from the bin lattice.
fn random_rect(rng: &mut StdRng, lo0: f64, hi0: f64, lo1: f64, hi1: f64) -> PixelQuad {
    let w = rng.random_range(0.3..2.0);
    let h = rng.random_range(0.3..2.0);
    let x = rng.random_range(lo0..hi0 - w);
    let y = rng.random_range(lo1..hi1 - h);
    PixelQuad::from_corners([[x, y], [x + w, y], [x + w, y + h], [x, y + h]])
}

#[test]
fn conservation_reg() {
    let mut rp = RegParams::new("conservation");
    let mut rng = StdRng::seed_from_u64(20260801);

    // --- Test 1: 1D, every quad strictly inside the range ---
    let n = 300;
    let quads: Vec<PixelQuad> = (0..n).map(|_| jittered_quad(&mut rng, 1.0, 9.0)).collect();
    let weights: Vec<f64> = (0..n).map(|_| rng.random_range(-2.0..20.0)).collect();
    let hist = Integration1d::new(&quads, &weights, 16)
        .radial_range(0.0, 10.0)
        .run()
        .expect("1d run");
    let total_count: f64 = hist.sum_count.iter().sum();
    let total_data: f64 = hist.sum_weighted.iter().sum();
    let total_intensity: f64 = weights.iter().sum();
    let intensity_scale: f64 = weights.iter().map(|w| w.abs()).sum();
    rp.compare_values(n as f64, total_count, 1e-9 * n as f64);
    rp.compare_values(total_data, total_intensity, 1e-9 * intensity_scale);
    eprintln!("  1D: sum(count) = {total_count} over {n} pixels");

    // --- Test 2: 2D, axis-aligned rectangles inside the box ---
    let n = 200;
    let quads: Vec<PixelQuad> = (0..n)
        .map(|_| random_rect(&mut rng, 0.1, 7.9, 0.1, 7.9))
        .collect();
    let weights: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..10.0)).collect();
    let hist = Integration2d::new(&quads, &weights, (8, 8))
        .radial_range(0.0, 8.0)
        .azimuth_range(0.0, 8.0)
        .run()
        .expect("2d run");
    let total_count: f64 = hist.sum_count.iter().sum();
    let total_data: f64 = hist.sum_weighted.iter().sum();
    rp.compare_values(n as f64, total_count, 1e-9 * n as f64);
    rp.compare_values(
        weights.iter().sum::<f64>(),
        total_data,
        1e-9 * weights.iter().sum::<f64>(),
    );
    eprintln!("  2D: sum(count) = {total_count} over {n} pixels");

    assert!(rp.cleanup(), "conservation regression test failed");
}

#[test]
fn partition_of_unity_reg() {
    let mut rp = RegParams::new("partition_of_unity");
    let mut rng = StdRng::seed_from_u64(42);

    // Single quads anywhere around the range, including hanging off
    // either end: per-pixel weight never exceeds 1.
    for _ in 0..100 {
        let quad = jittered_quad(&mut rng, -2.0, 12.0);
        let hist = Integration1d::new(std::slice::from_ref(&quad), &[1.0], 10)
            .radial_range(0.0, 10.0)
            .run()
            .expect("single quad run");
        let total: f64 = hist.sum_count.iter().sum();
        rp.compare_values(1.0, (total <= 1.0 + 1e-12) as u8 as f64, 0.0);
        // Fully inside: exactly one
        if quad.radial_min() > 0.0 && quad.radial_max() < 10.0 {
            rp.compare_values(1.0, total, 1e-9);
        }
    }

    assert!(rp.cleanup(), "partition of unity regression test failed");
}

#[test]
fn linearity_reg() {
    let mut rp = RegParams::new("linearity");
    let mut rng = StdRng::seed_from_u64(7);

    let n = 150;
    let quads: Vec<PixelQuad> = (0..n).map(|_| jittered_quad(&mut rng, 0.5, 9.5)).collect();
    let a: Vec<f64> = (0..n).map(|_| rng.random_range(-5.0..5.0)).collect();
    let b: Vec<f64> = (0..n).map(|_| rng.random_range(-5.0..5.0)).collect();
    let (alpha, beta) = (2.5, -1.25);
    let combined: Vec<f64> = a
        .iter()
        .zip(&b)
        .map(|(&x, &y)| alpha * x + beta * y)
        .collect();

    let run = |w: &[f64]| {
        Integration1d::new(&quads, w, 12)
            .radial_range(0.0, 10.0)
            .run()
            .expect("linearity run")
    };
    let ha = run(&a);
    let hb = run(&b);
    let hc = run(&combined);

    let expected: Vec<f64> = ha
        .sum_weighted
        .iter()
        .zip(&hb.sum_weighted)
        .map(|(&x, &y)| alpha * x + beta * y)
        .collect();
    rp.compare_slices(&expected, &hc.sum_weighted, 1e-9);
    // Counts do not depend on intensity at all
    rp.compare_slices(&ha.sum_count, &hc.sum_count, 0.0);

    assert!(rp.cleanup(), "linearity regression test failed");
}

#[test]
fn mask_composition_reg() {
    let mut rp = RegParams::new("mask_composition");
    let mut rng = StdRng::seed_from_u64(99);

    let n = 120;
    let quads: Vec<PixelQuad> = (0..n).map(|_| jittered_quad(&mut rng, 0.5, 9.5)).collect();
    let weights: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..10.0)).collect();
    let mask: Vec<u8> = (0..n).map(|_| (rng.random_range(0..4) == 0) as u8).collect();
    let masked_count = mask.iter().filter(|&&m| m != 0).count();

    let hist_masked = Integration1d::new(&quads, &weights, 10)
        .radial_range(0.0, 10.0)
        .corrections(Corrections {
            mask: Some(&mask),
            ..Default::default()
        })
        .run()
        .expect("masked run");

    let zeroed: Vec<f64> = weights
        .iter()
        .zip(&mask)
        .map(|(&w, &m)| if m != 0 { 0.0 } else { w })
        .collect();
    let hist_zeroed = Integration1d::new(&quads, &zeroed, 10)
        .radial_range(0.0, 10.0)
        .run()
        .expect("zeroed run");

    // Weighted sums agree; weight sums differ by the masked pixels,
    // which still count when merely zeroed.
    rp.compare_slices(&hist_zeroed.sum_weighted, &hist_masked.sum_weighted, 1e-9);
    let count_gap: f64 = hist_zeroed.sum_count.iter().sum::<f64>()
        - hist_masked.sum_count.iter().sum::<f64>();
    rp.compare_values(masked_count as f64, count_gap, 1e-9 * n as f64);
    eprintln!("  masked {masked_count} of {n}; count gap = {count_gap}");

    assert!(rp.cleanup(), "mask composition regression test failed");
}

#[test]
fn correction_order_reg() {
    let mut rp = RegParams::new("correction_order");
    let mut rng = StdRng::seed_from_u64(5);

    let n = 80;
    let quads: Vec<PixelQuad> = (0..n).map(|_| jittered_quad(&mut rng, 0.5, 9.5)).collect();
    let weights: Vec<f64> = (0..n).map(|_| rng.random_range(1.0..100.0)).collect();
    let dark: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..5.0)).collect();
    let flat: Vec<f64> = (0..n).map(|_| rng.random_range(0.5..2.0)).collect();
    let polarization: Vec<f64> = (0..n).map(|_| rng.random_range(0.5..2.0)).collect();
    let solid_angle: Vec<f64> = (0..n).map(|_| rng.random_range(0.5..2.0)).collect();

    let hist = Integration1d::new(&quads, &weights, 10)
        .radial_range(0.0, 10.0)
        .corrections(Corrections {
            mask: None,
            dark: Some(&dark),
            flat: Some(&flat),
            polarization: Some(&polarization),
            solid_angle: Some(&solid_angle),
        })
        .run()
        .expect("corrected run");

    let precorrected: Vec<f64> = (0..n)
        .map(|i| ((weights[i] - dark[i]) / flat[i]) / polarization[i] / solid_angle[i])
        .collect();
    let hist_pre = Integration1d::new(&quads, &precorrected, 10)
        .radial_range(0.0, 10.0)
        .run()
        .expect("precorrected run");

    rp.compare_slices(&hist_pre.sum_weighted, &hist.sum_weighted, 1e-12);
    rp.compare_slices(&hist_pre.sum_count, &hist.sum_count, 0.0);

    assert!(rp.cleanup(), "correction order regression test failed");
}

#[test]
fn consistency_1d_2d_reg() {
    let mut rp = RegParams::new("consistency_1d_2d");
    let mut rng = StdRng::seed_from_u64(314);

    let n = 150;
    let quads: Vec<PixelQuad> = (0..n)
        .map(|_| random_rect(&mut rng, 0.1, 9.9, 0.1, 5.9))
        .collect();
    let weights: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..10.0)).collect();

    let hist1 = Integration1d::new(&quads, &weights, 10)
        .radial_range(0.0, 10.0)
        .run()
        .expect("1d run");
    let hist2 = Integration2d::new(&quads, &weights, (10, 6))
        .radial_range(0.0, 10.0)
        .azimuth_range(0.0, 6.0)
        .run()
        .expect("2d run");

    // Summing the 2D grid over azimuth reproduces the 1D histogram.
    for i in 0..10 {
        let count: f64 = (0..6).map(|j| hist2.sum_count_at(i, j)).sum();
        let data: f64 = (0..6).map(|j| hist2.sum_weighted_at(i, j)).sum();
        rp.compare_values(hist1.sum_count[i], count, 1e-9);
        rp.compare_values(hist1.sum_weighted[i], data, 1e-8);
    }

    assert!(rp.cleanup(), "1d/2d consistency regression test failed");
}
