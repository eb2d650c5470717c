//! The fan wavelet transform.
//!
//! For every scale the image spectrum is multiplied by `N` anisotropic Morlet
//! filters spread over the half plane, each filtered spectrum is brought back
//! to image space, and the orientations are summed. Optionally each
//! orientation is split into coherent and noise parts before summing.

use std::f64::consts::PI;

use fanwave_smooth::{FWHM_PER_SIGMA, GaussianSmoother, Smoother};
use ndarray::{Array2, Array3, Axis};
use num_complex::Complex64;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::apodize::apodize;
use crate::config::{FanConfig, ScaleSelection, SegmentationMode};
use crate::error::WaveletError;
use crate::fft::{Fft2, roll};
use crate::image::Image;
use crate::pad::{depad, pad};
use crate::plane::FrequencyPlane;
use crate::result::FanResult;
use crate::scales::{MORLET_K0, ScaleSet, delta, n_orientations};
use crate::segment::{Convergence, SegmentOptions, gauss_segment};

/// Runs the fan transform with the default Gaussian smoother.
///
/// See [`fan_transform_with`].
pub fn fan_transform(image: &Image, config: &FanConfig) -> Result<FanResult, WaveletError> {
    fan_transform_with(image, config, &GaussianSmoother::new())
}

/// Runs the fan transform, smoothing segmented power maps with `smoother`.
///
/// Pipeline: optional apodization, optional zero padding, scale selection on
/// the working grid, forward FFT, then per scale (in parallel) the sum over
/// orientations of the filtered inverse transforms. The output is cropped
/// back to the image size when padding was applied and
/// [`FanConfig::crop_to_original`] is set.
///
/// Normalization per scale `j` with `a = k0 * scale[j]`:
/// - power maps: `|W|^2 * a^2 * delta / N` (`delta / N` without power
///   normalization)
/// - scalar power: sum of the power map divided by the working grid size.
///
/// An invalid apodization radius does not fail the call: a warning is logged
/// and the image is used unchanged. Smoothing only applies to the coherent
/// and noise power maps, so it has no effect without segmentation.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`WaveletError::InvalidResolution`] | resolution not finite and positive |
/// | [`WaveletError::InvalidConfig`] | invalid padding canvas or segmentation settings |
/// | [`WaveletError::PadTooSmall`] | padding canvas smaller than the image |
/// | [`WaveletError::InvalidScale`] | an explicit scale or wavenumber is not positive |
/// | [`WaveletError::NoScales`] | the grid is too small to generate scales |
/// | [`WaveletError::EmptyScaleList`] | an explicit scale or wavenumber list is empty |
/// | [`WaveletError::ThresholdCountMismatch`] | thresholds do not match the scale count |
/// | [`WaveletError::Smoothing`] | the smoother rejected a map |
#[tracing::instrument(skip_all, fields(rows = image.rows(), cols = image.cols()))]
pub fn fan_transform_with<S>(
    image: &Image,
    config: &FanConfig,
    smoother: &S,
) -> Result<FanResult, WaveletError>
where
    S: Smoother + Sync,
{
    config.validate()?;
    let (image_rows, image_cols) = image.dim();

    let mut work = image.view().to_owned();
    if let Some(radius) = config.apodize() {
        match apodize(image_rows, image_cols, radius) {
            Ok(mask) => work *= &mask,
            Err(err) => warn!(radius, error = %err, "apodization skipped"),
        }
    }

    let padded = match config.pad_to() {
        Some((rows, cols)) => {
            work = pad(work.view(), rows, cols)?;
            true
        }
        None => false,
    };
    let (rows, cols) = work.dim();

    let scale_set = match config.scales() {
        ScaleSelection::Auto => ScaleSet::generate(rows, cols, config.resolution())?,
        ScaleSelection::Physical(scales) => ScaleSet::from_scales(scales, config.resolution())?,
        ScaleSelection::Wavenumbers(wavenumbers) => {
            ScaleSet::from_wavenumbers(wavenumbers, config.resolution())?
        }
    };
    let m = scale_set.len();

    let segmentation = match config.segmentation() {
        SegmentationMode::Disabled => None,
        SegmentationMode::Enabled(seg) => {
            if seg.thresholds().len() != m {
                return Err(WaveletError::ThresholdCountMismatch {
                    thresholds: seg.thresholds().len(),
                    scales: m,
                });
            }
            Some(seg)
        }
    };

    let plane = FrequencyPlane::new(rows, cols);
    let fft = Fft2::new(rows, cols);
    let shift = plane.shift();
    let spectrum = roll(fft.forward(work.view()).view(), shift.forward_y, shift.forward_x);

    let crop_to = (padded && config.crop_to_original()).then_some((image_rows, image_cols));
    let ctx = ScaleContext {
        plane: &plane,
        fft: &fft,
        spectrum: &spectrum,
        crop_to,
        out_dim: crop_to.unwrap_or((rows, cols)),
        n_orientations: n_orientations(),
        delta: delta(),
    };

    let outputs: Vec<ScaleOutput> = (0..m)
        .into_par_iter()
        .map(|j| -> Result<ScaleOutput, WaveletError> {
            let a = MORLET_K0 * scale_set.scales()[j];
            let seg = segmentation.map(|s| (s.thresholds()[j], *s.options()));
            let mut out = ctx.analyse_scale(a, seg)?;

            if config.smooth()
                && let Some(parts) = out.segmented.as_mut()
            {
                let width =
                    FWHM_PER_SIGMA / (scale_set.wavenumbers()[j] * config.resolution() * 2.0 * PI);
                parts.coherent_power = smoother.smooth(parts.coherent_power.view(), width)?;
                parts.noise_power = smoother.smooth(parts.noise_power.view(), width)?;
            }

            let norm = if config.power_normalize() {
                a * a * ctx.delta / ctx.n_orientations as f64
            } else {
                ctx.delta / ctx.n_orientations as f64
            };
            out.normalize(norm, (rows * cols) as f64);

            debug!(
                scale = j,
                wavenumber = scale_set.wavenumbers()[j],
                orientations = ctx.n_orientations,
                q = out.segmented.as_ref().map(|p| p.q),
                retries = out.segmented.as_ref().map(|p| p.retries),
                power = out.scale_power,
                "scale done"
            );
            if let Some(parts) = &out.segmented
                && !parts.convergence.is_converged()
            {
                warn!(
                    scale = j,
                    q = parts.q,
                    convergence = ?parts.convergence,
                    "segmentation did not converge"
                );
            }
            Ok(out)
        })
        .collect::<Result<_, _>>()?;

    Ok(pack(outputs, scale_set, ctx.out_dim, ctx.n_orientations))
}

/// Shared, read-only state for the per-scale workers.
struct ScaleContext<'a> {
    plane: &'a FrequencyPlane,
    fft: &'a Fft2,
    /// Forward spectrum, rolled so the zero frequency is at the plane center.
    spectrum: &'a Array2<Complex64>,
    crop_to: Option<(usize, usize)>,
    out_dim: (usize, usize),
    n_orientations: usize,
    delta: f64,
}

struct SegmentedParts {
    coherent: Array2<Complex64>,
    noise: Array2<Complex64>,
    coherent_power: Array2<f64>,
    noise_power: Array2<f64>,
    coherent_scale_power: f64,
    noise_scale_power: f64,
    q: f64,
    /// Adaptive restarts summed over orientations.
    retries: usize,
    convergence: Convergence,
}

struct ScaleOutput {
    coefficients: Array2<Complex64>,
    power: Array2<f64>,
    scale_power: f64,
    segmented: Option<SegmentedParts>,
}

impl ScaleOutput {
    fn normalize(&mut self, norm: f64, grid_size: f64) {
        self.power *= norm;
        self.scale_power = self.power.sum() / grid_size;
        if let Some(parts) = self.segmented.as_mut() {
            parts.coherent_power *= norm;
            parts.noise_power *= norm;
            parts.coherent_scale_power = parts.coherent_power.sum() / grid_size;
            parts.noise_scale_power = parts.noise_power.sum() / grid_size;
        }
    }
}

impl ScaleContext<'_> {
    /// Sums the `N` oriented filter responses of one scale.
    ///
    /// `segmentation` carries the scale's threshold multiplier and options.
    /// The multiplier adapted on one orientation seeds the next.
    fn analyse_scale(
        &self,
        a: f64,
        segmentation: Option<(f64, SegmentOptions)>,
    ) -> Result<ScaleOutput, WaveletError> {
        let mut coefficients = Array2::<Complex64>::zeros(self.out_dim);
        let mut power = Array2::<f64>::zeros(self.out_dim);
        let mut segmented = segmentation.map(|(q, _)| SegmentedParts {
            coherent: Array2::zeros(self.out_dim),
            noise: Array2::zeros(self.out_dim),
            coherent_power: Array2::zeros(self.out_dim),
            noise_power: Array2::zeros(self.out_dim),
            coherent_scale_power: 0.0,
            noise_scale_power: 0.0,
            q,
            retries: 0,
            convergence: Convergence::Converged,
        });

        for i in 0..self.n_orientations {
            let w = self.oriented_response(a, self.delta * i as f64)?;
            coefficients += &w;
            power.zip_mut_with(&w, |p, c| *p += c.norm_sqr());

            if let (Some(parts), Some((_, options))) = (segmented.as_mut(), segmentation)
                && parts.q != 0.0
            {
                let seg = gauss_segment(w.view(), parts.q, &options);
                let cols = self.out_dim.1;
                for &k in seg.coherent() {
                    let idx = [k / cols, k % cols];
                    parts.coherent[idx] += w[idx];
                    parts.coherent_power[idx] += w[idx].norm_sqr();
                }
                for &k in seg.noise() {
                    let idx = [k / cols, k % cols];
                    parts.noise[idx] += w[idx];
                    parts.noise_power[idx] += w[idx].norm_sqr();
                }
                parts.q = seg.q();
                parts.retries += seg.retries();
                if !seg.convergence().is_converged() {
                    parts.convergence = seg.convergence();
                }
            }
        }

        Ok(ScaleOutput {
            coefficients,
            power,
            scale_power: 0.0,
            segmented,
        })
    }

    /// Image-space response of the filter with dilation `a` and angle `theta`.
    fn oriented_response(&self, a: f64, theta: f64) -> Result<Array2<Complex64>, WaveletError> {
        let (kx, ky) = (MORLET_K0 * theta.cos(), MORLET_K0 * theta.sin());
        let mut filtered = self.spectrum.clone();
        ndarray::Zip::from(&mut filtered)
            .and(self.plane.u())
            .and(self.plane.v())
            .for_each(|s, &u, &v| {
                let dx = a * u - kx;
                let dy = a * v - ky;
                *s *= (-0.5 * (dx * dx + dy * dy)).exp();
            });

        let shift = self.plane.shift();
        let mut response = roll(filtered.view(), shift.inverse_y, shift.inverse_x);
        self.fft.inverse(&mut response);

        match self.crop_to {
            Some((rows, cols)) => depad(response.view(), rows, cols),
            None => Ok(response),
        }
    }
}

/// Stacks per-scale outputs into the packed `[total; coherent; noise]` cubes.
fn pack(
    outputs: Vec<ScaleOutput>,
    scale_set: ScaleSet,
    (rows, cols): (usize, usize),
    n_orientations: usize,
) -> FanResult {
    let m = outputs.len();
    let segmented = outputs.first().is_some_and(|o| o.segmented.is_some());
    let layers = if segmented { 3 } else { 1 };

    let mut coefficients = Array3::<Complex64>::zeros((layers * m, rows, cols));
    let mut power = Array3::<f64>::zeros((layers * m, rows, cols));
    let mut scale_power = Array2::<f64>::zeros((layers, m));
    let mut thresholds = Vec::new();
    let mut convergence = Vec::new();

    for (j, out) in outputs.into_iter().enumerate() {
        coefficients.index_axis_mut(Axis(0), j).assign(&out.coefficients);
        power.index_axis_mut(Axis(0), j).assign(&out.power);
        scale_power[[0, j]] = out.scale_power;
        if let Some(parts) = out.segmented {
            coefficients.index_axis_mut(Axis(0), m + j).assign(&parts.coherent);
            coefficients.index_axis_mut(Axis(0), 2 * m + j).assign(&parts.noise);
            power.index_axis_mut(Axis(0), m + j).assign(&parts.coherent_power);
            power.index_axis_mut(Axis(0), 2 * m + j).assign(&parts.noise_power);
            scale_power[[1, j]] = parts.coherent_scale_power;
            scale_power[[2, j]] = parts.noise_scale_power;
            thresholds.push(parts.q);
            convergence.push(parts.convergence);
        }
    }

    FanResult::new(
        coefficients,
        power,
        scale_set,
        scale_power,
        segmented.then_some(thresholds),
        segmented.then_some(convergence),
        n_orientations,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SegmentationConfig;
    use crate::segment::Q_STEP;
    use approx::assert_relative_eq;

    fn ramp(rows: usize, cols: usize) -> Image {
        Image::new(Array2::from_shape_fn((rows, cols), |(r, c)| {
            ((r * 7 + c * 3) % 11) as f64 - 5.0
        }))
        .unwrap()
    }

    #[test]
    fn adapted_q_carries_across_orientations() {
        let image = ramp(16, 16);
        let plane = FrequencyPlane::new(16, 16);
        let fft = Fft2::new(16, 16);
        let shift = plane.shift();
        let spectrum = roll(fft.forward(image.view()).view(), shift.forward_y, shift.forward_x);
        let ctx = ScaleContext {
            plane: &plane,
            fft: &fft,
            spectrum: &spectrum,
            crop_to: None,
            out_dim: (16, 16),
            n_orientations: n_orientations(),
            delta: delta(),
        };

        // Every defined skewness exceeds the limit, so each orientation
        // spends its full retry budget.
        let options = SegmentOptions::new()
            .with_adaptive(true)
            .with_skewness_limit(-100.0)
            .with_max_retries(2);
        let out = ctx.analyse_scale(MORLET_K0 * 3.0, Some((5.0, options))).unwrap();
        let parts = out.segmented.unwrap();

        assert_eq!(parts.retries, 2 * n_orientations());
        assert_relative_eq!(parts.q, 5.0 - Q_STEP * parts.retries as f64, epsilon = 1e-9);
        assert_eq!(parts.convergence, Convergence::RetryLimit);
    }

    #[test]
    fn auto_scales_use_working_grid() {
        let config = FanConfig::new().with_pad_to(64, 64);
        let result = fan_transform(&ramp(16, 16), &config).unwrap();
        assert_eq!(result.n_scales(), 14);
        assert_eq!(result.dim(), (16, 16));
    }

    #[test]
    fn uncropped_output_keeps_canvas() {
        let config = FanConfig::new()
            .with_scales(ScaleSelection::Physical(vec![2.0, 4.0]))
            .with_pad_to(24, 20)
            .with_crop_to_original(false);
        let result = fan_transform(&ramp(16, 12), &config).unwrap();
        assert_eq!(result.dim(), (24, 20));
    }

    #[test]
    fn power_is_coefficient_energy_without_segmentation() {
        // Sum of N energies >= |sum|^2 / N.
        let config = FanConfig::new().with_scales(ScaleSelection::Physical(vec![3.0]));
        let result = fan_transform(&ramp(16, 16), &config).unwrap();
        let n = result.n_orientations() as f64;
        let a = MORLET_K0 * 3.0;
        let norm = a * a * delta() / n;
        for (p, w) in result.power().iter().zip(result.coefficients().iter()) {
            assert!(*p + 1e-12 >= w.norm_sqr() / n * norm);
        }
    }

    #[test]
    fn scale_power_is_mean_of_power_map() {
        let config = FanConfig::new().with_scales(ScaleSelection::Physical(vec![2.0, 5.0]));
        let result = fan_transform(&ramp(12, 10), &config).unwrap();
        for j in 0..2 {
            let mean = result.power_map(j).sum() / 120.0;
            assert_relative_eq!(result.total_scale_power()[j], mean, max_relative = 1e-12);
        }
    }

    #[test]
    fn zero_threshold_skips_scale() {
        let seg = SegmentationConfig::new(vec![0.0, 2.0]);
        let config = FanConfig::new()
            .with_scales(ScaleSelection::Physical(vec![2.0, 4.0]))
            .with_segmentation(SegmentationMode::Enabled(seg));
        let result = fan_transform(&ramp(16, 16), &config).unwrap();
        assert!(result.is_segmented());
        let coherent = result.coherent_power().unwrap();
        let noise = result.noise_power().unwrap();
        assert!(coherent.index_axis(Axis(0), 0).iter().all(|&v| v == 0.0));
        assert!(noise.index_axis(Axis(0), 0).iter().all(|&v| v == 0.0));
        assert!(noise.index_axis(Axis(0), 1).iter().any(|&v| v > 0.0));
        assert_eq!(result.thresholds().unwrap()[0], 0.0);
    }

    #[test]
    fn segmented_parts_partition_total_power() {
        let seg = SegmentationConfig::uniform(2.0, 2);
        let config = FanConfig::new()
            .with_scales(ScaleSelection::Physical(vec![2.0, 4.0]))
            .with_segmentation(SegmentationMode::Enabled(seg));
        let result = fan_transform(&ramp(16, 16), &config).unwrap();
        let total = result.total_power();
        let coherent = result.coherent_power().unwrap();
        let noise = result.noise_power().unwrap();
        for ((t, c), n) in total.iter().zip(coherent.iter()).zip(noise.iter()) {
            assert_relative_eq!(*t, c + n, max_relative = 1e-9, epsilon = 1e-12);
        }
        let sp = result.scale_power();
        for j in 0..2 {
            assert_relative_eq!(sp[[0, j]], sp[[1, j]] + sp[[2, j]], max_relative = 1e-9);
        }
    }
}
