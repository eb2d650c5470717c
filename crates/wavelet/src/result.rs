//! Output of the fan transform.

use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayView3, Axis, s};
use num_complex::Complex64;

use crate::scales::ScaleSet;
use crate::segment::Convergence;

/// Result of a fan wavelet transform.
///
/// Cubes are indexed `[slice, row, col]`. Without segmentation they hold one
/// slice per scale (`M` slices). With segmentation they are packed as
/// `[total; coherent; noise]`, `3 * M` slices, so that slice `j`, `M + j`
/// and `2 * M + j` belong to scale `j`. The scalar spectrum follows the same
/// convention with one row per component.
#[derive(Clone, Debug)]
pub struct FanResult {
    /// Packed complex wavelet coefficients.
    coefficients: Array3<Complex64>,
    /// Packed normalized power maps.
    power: Array3<f64>,
    /// Scales and wavenumbers of the decomposition.
    scale_set: ScaleSet,
    /// Normalized scale-integrated power, shape `(components, M)`.
    scale_power: Array2<f64>,
    /// Per-scale threshold multipliers after adaptation (segmentation only).
    thresholds: Option<Vec<f64>>,
    /// Per-scale segmentation outcome (segmentation only).
    convergence: Option<Vec<Convergence>>,
    /// Orientations per scale.
    n_orientations: usize,
}

impl FanResult {
    pub(crate) fn new(
        coefficients: Array3<Complex64>,
        power: Array3<f64>,
        scale_set: ScaleSet,
        scale_power: Array2<f64>,
        thresholds: Option<Vec<f64>>,
        convergence: Option<Vec<Convergence>>,
        n_orientations: usize,
    ) -> Self {
        Self {
            coefficients,
            power,
            scale_set,
            scale_power,
            thresholds,
            convergence,
            n_orientations,
        }
    }

    /// Returns the packed coefficient cube (`M` or `3 * M` slices).
    pub fn coefficients(&self) -> &Array3<Complex64> {
        &self.coefficients
    }

    /// Returns the packed normalized power cube (`M` or `3 * M` slices).
    pub fn power(&self) -> &Array3<f64> {
        &self.power
    }

    /// Returns the scale-integrated power, one row per component
    /// (1 row, or 3 rows `[total; coherent; noise]` with segmentation).
    pub fn scale_power(&self) -> &Array2<f64> {
        &self.scale_power
    }

    /// Returns the physical scales.
    pub fn scales(&self) -> &[f64] {
        self.scale_set.scales()
    }

    /// Returns the wavenumbers.
    pub fn wavenumbers(&self) -> &[f64] {
        self.scale_set.wavenumbers()
    }

    /// Returns the adapted threshold multipliers, if segmentation ran.
    ///
    /// Feed these back as the thresholds of a later call to warm-start it.
    pub fn thresholds(&self) -> Option<&[f64]> {
        self.thresholds.as_deref()
    }

    /// Returns the per-scale segmentation outcome, if segmentation ran.
    ///
    /// A scale reports the last non-converged outcome among its
    /// orientations, or [`Convergence::Converged`].
    pub fn convergence(&self) -> Option<&[Convergence]> {
        self.convergence.as_deref()
    }

    /// Returns `true` if the outputs carry coherent and noise components.
    pub fn is_segmented(&self) -> bool {
        self.thresholds.is_some()
    }

    /// Returns the number of scales `M`.
    pub fn n_scales(&self) -> usize {
        self.scale_set.len()
    }

    /// Returns the number of orientations summed per scale.
    pub fn n_orientations(&self) -> usize {
        self.n_orientations
    }

    /// Returns the logarithmic scale step, also the angular step between
    /// orientations.
    pub fn delta(&self) -> f64 {
        crate::scales::delta()
    }

    /// Returns the spatial shape `(rows, cols)` of each slice.
    pub fn dim(&self) -> (usize, usize) {
        let (_, rows, cols) = self.coefficients.dim();
        (rows, cols)
    }

    /// Returns the total coefficient slices.
    pub fn total_coefficients(&self) -> ArrayView3<'_, Complex64> {
        self.component(&self.coefficients, 0)
    }

    /// Returns the coherent coefficient slices, if segmented.
    pub fn coherent_coefficients(&self) -> Option<ArrayView3<'_, Complex64>> {
        self.is_segmented().then(|| self.component(&self.coefficients, 1))
    }

    /// Returns the noise coefficient slices, if segmented.
    pub fn noise_coefficients(&self) -> Option<ArrayView3<'_, Complex64>> {
        self.is_segmented().then(|| self.component(&self.coefficients, 2))
    }

    /// Returns the total power slices.
    pub fn total_power(&self) -> ArrayView3<'_, f64> {
        self.component(&self.power, 0)
    }

    /// Returns the coherent power slices, if segmented.
    pub fn coherent_power(&self) -> Option<ArrayView3<'_, f64>> {
        self.is_segmented().then(|| self.component(&self.power, 1))
    }

    /// Returns the noise power slices, if segmented.
    pub fn noise_power(&self) -> Option<ArrayView3<'_, f64>> {
        self.is_segmented().then(|| self.component(&self.power, 2))
    }

    /// Returns the total power map of scale `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= n_scales()`.
    pub fn power_map(&self, j: usize) -> ArrayView2<'_, f64> {
        assert!(j < self.n_scales(), "power_map: scale index out of range");
        self.power.index_axis(Axis(0), j)
    }

    /// Returns the total scale-integrated power spectrum.
    pub fn total_scale_power(&self) -> ArrayView1<'_, f64> {
        self.scale_power.row(0)
    }

    /// Returns the coherent scale-integrated power spectrum, if segmented.
    pub fn coherent_scale_power(&self) -> Option<ArrayView1<'_, f64>> {
        self.is_segmented().then(|| self.scale_power.row(1))
    }

    /// Returns the noise scale-integrated power spectrum, if segmented.
    pub fn noise_scale_power(&self) -> Option<ArrayView1<'_, f64>> {
        self.is_segmented().then(|| self.scale_power.row(2))
    }

    fn component<'a, T>(&self, cube: &'a Array3<T>, k: usize) -> ArrayView3<'a, T> {
        let m = self.n_scales();
        cube.slice(s![k * m..(k + 1) * m, .., ..])
    }
}
