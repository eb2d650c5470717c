//! Scale generation for the fan transform.
//!
//! Automatic scales are log-spaced with the step `delta` that makes
//! neighbouring Morlet filters overlap at 75% of their peak, which yields a
//! quasi-orthogonal set (Robitaille et al. 2014).

use std::f64::consts::PI;

use crate::error::WaveletError;

/// Morlet central wavenumber `k0`, controlling the angular/radial trade-off.
pub const MORLET_K0: f64 = 5.336;

/// Logarithmic scale step and angular orientation step,
/// `2 * sqrt(-2 ln 0.75) / k0`.
pub fn delta() -> f64 {
    2.0 * (-2.0 * 0.75_f64.ln()).sqrt() / MORLET_K0
}

/// Number of orientations covering the half plane, `floor(pi / delta)`.
pub fn n_orientations() -> usize {
    (PI / delta()).floor() as usize
}

/// An ordered set of analysis scales and their wavenumbers.
///
/// `wavenumbers[j] == 1 / (scales[j] * resolution)` for every `j`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleSet {
    scales: Vec<f64>,
    wavenumbers: Vec<f64>,
}

impl ScaleSet {
    /// Generates the default log-spaced scale set for a `rows` x `cols` grid.
    ///
    /// With `nx = max(rows, cols)`, produces `M = floor(ln(nx) / delta)`
    /// scales `exp(ln(nx) - i * delta)` for `i = 0..M`, returned in
    /// increasing order (wavenumbers decreasing).
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::InvalidResolution`] | `resolution` not finite and positive |
    /// | [`WaveletError::NoScales`] | `M == 0` (e.g. a 1x1 grid) |
    pub fn generate(rows: usize, cols: usize, resolution: f64) -> Result<Self, WaveletError> {
        validate_resolution(resolution)?;
        let nx = rows.max(cols) as f64;
        let step = delta();
        let log_nx = nx.ln();
        let m = if log_nx > 0.0 {
            (log_nx / step).floor() as usize
        } else {
            0
        };
        if m == 0 {
            return Err(WaveletError::NoScales { rows, cols });
        }
        let scales: Vec<f64> = (0..m)
            .rev()
            .map(|i| (log_nx - i as f64 * step).exp())
            .collect();
        Ok(Self::with_resolution(scales, resolution))
    }

    /// Builds a scale set from explicit physical scales.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::InvalidResolution`] | `resolution` not finite and positive |
    /// | [`WaveletError::InvalidScale`] | a scale is not finite and positive |
    /// | [`WaveletError::EmptyScaleList`] | `scales` is empty |
    pub fn from_scales(scales: &[f64], resolution: f64) -> Result<Self, WaveletError> {
        validate_resolution(resolution)?;
        validate_positive(scales)?;
        Ok(Self::with_resolution(scales.to_vec(), resolution))
    }

    /// Builds a scale set from explicit wavenumbers,
    /// `scale = 1 / (wavenumber * resolution)`.
    ///
    /// # Errors
    ///
    /// Same as [`ScaleSet::from_scales`].
    pub fn from_wavenumbers(wavenumbers: &[f64], resolution: f64) -> Result<Self, WaveletError> {
        validate_resolution(resolution)?;
        validate_positive(wavenumbers)?;
        let scales = wavenumbers.iter().map(|&k| 1.0 / (k * resolution)).collect();
        Ok(Self {
            scales,
            wavenumbers: wavenumbers.to_vec(),
        })
    }

    fn with_resolution(scales: Vec<f64>, resolution: f64) -> Self {
        let wavenumbers = scales.iter().map(|&s| 1.0 / (s * resolution)).collect();
        Self {
            scales,
            wavenumbers,
        }
    }

    /// Returns the physical scales.
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Returns the wavenumbers.
    pub fn wavenumbers(&self) -> &[f64] {
        &self.wavenumbers
    }

    /// Returns the number of scales `M`.
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    /// Returns `true` if the set is empty.
    ///
    /// Note: sets built through the constructors are never empty.
    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }
}

fn validate_resolution(resolution: f64) -> Result<(), WaveletError> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(WaveletError::InvalidResolution(resolution));
    }
    Ok(())
}

fn validate_positive(values: &[f64]) -> Result<(), WaveletError> {
    if values.is_empty() {
        return Err(WaveletError::EmptyScaleList);
    }
    if let Some((index, &value)) = values
        .iter()
        .enumerate()
        .find(|&(_, &v)| !v.is_finite() || v <= 0.0)
    {
        return Err(WaveletError::InvalidScale { index, value });
    }
    Ok(())
}
