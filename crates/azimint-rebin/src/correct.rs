//! Per-pixel correction pipeline
//!
//! Before a pixel reaches a splitter its raw intensity passes through the
//! detector corrections: mask and dummy rejection, dark-current
//! subtraction, then division by the flat field, polarization and solid
//! angle factors. Corrected intensities may be negative; nothing clamps.

use crate::error::{RebinError, RebinResult};

/// Optional per-pixel correction arrays, each of length N when present.
#[derive(Debug, Clone, Copy, Default)]
pub struct Corrections<'a> {
    /// Nonzero byte = skip the pixel
    pub mask: Option<&'a [u8]>,
    /// Dark current, subtracted from the raw intensity
    pub dark: Option<&'a [f64]>,
    /// Flat field, divided out
    pub flat: Option<&'a [f64]>,
    /// Polarization factor, divided out
    pub polarization: Option<&'a [f64]>,
    /// Solid angle, divided out
    pub solid_angle: Option<&'a [f64]>,
}

/// Sentinel intensity marking invalid pixels.
///
/// Pixels whose raw intensity matches the sentinel are skipped, and empty
/// output bins are filled with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dummy {
    /// The sentinel value
    pub value: f64,
    /// Match tolerance; 0 means exact comparison
    pub delta: f64,
}

impl Dummy {
    /// Sentinel with exact matching.
    pub fn new(value: f64) -> Self {
        Self { value, delta: 0.0 }
    }

    /// Sentinel matched within `delta`.
    pub fn with_delta(value: f64, delta: f64) -> Self {
        Self { value, delta }
    }

    /// Does a raw intensity count as the sentinel?
    #[inline]
    pub(crate) fn matches(&self, raw: f64) -> bool {
        if self.delta > 0.0 {
            (raw - self.value).abs() <= self.delta
        } else {
            raw == self.value
        }
    }
}

/// The correction pipeline, validated once per run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Corrector<'a> {
    corrections: Corrections<'a>,
    dummy: Option<Dummy>,
}

impl<'a> Corrector<'a> {
    /// Validate array lengths against the pixel count and build the
    /// pipeline.
    pub fn new(
        corrections: Corrections<'a>,
        dummy: Option<Dummy>,
        pixels: usize,
    ) -> RebinResult<Self> {
        check_len("mask", corrections.mask.map(|m| m.len()), pixels)?;
        check_len("dark", corrections.dark.map(|d| d.len()), pixels)?;
        check_len("flat", corrections.flat.map(|f| f.len()), pixels)?;
        check_len(
            "polarization",
            corrections.polarization.map(|p| p.len()),
            pixels,
        )?;
        check_len(
            "solid_angle",
            corrections.solid_angle.map(|s| s.len()),
            pixels,
        )?;
        Ok(Self { corrections, dummy })
    }

    /// Run pixel `idx` through the pipeline.
    ///
    /// Returns the corrected intensity, or `None` when the pixel is
    /// masked out or matches the dummy sentinel.
    pub fn accept(&self, idx: usize, raw: f64) -> Option<f64> {
        if let Some(mask) = self.corrections.mask
            && mask[idx] != 0
        {
            return None;
        }
        if let Some(dummy) = self.dummy
            && dummy.matches(raw)
        {
            return None;
        }
        let mut value = raw;
        if let Some(dark) = self.corrections.dark {
            value -= dark[idx];
        }
        if let Some(flat) = self.corrections.flat {
            value /= flat[idx];
        }
        if let Some(polarization) = self.corrections.polarization {
            value /= polarization[idx];
        }
        if let Some(solid_angle) = self.corrections.solid_angle {
            value /= solid_angle[idx];
        }
        Some(value)
    }
}

fn check_len(name: &'static str, len: Option<usize>, expected: usize) -> RebinResult<()> {
    match len {
        Some(actual) if actual != expected => Err(RebinError::LengthMismatch {
            name,
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}
