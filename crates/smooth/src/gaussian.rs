//! Separable Gaussian convolution with symmetric boundary extension.

use ndarray::{Array2, ArrayView2, Axis};

use crate::Smoother;
use crate::error::SmoothError;

/// Ratio between the FWHM and the standard deviation of a Gaussian,
/// `2 * sqrt(2 * ln 2)`.
pub const FWHM_PER_SIGMA: f64 = 2.354_820_045_030_949;

/// Gaussian smoother driven by a FWHM kernel width.
///
/// The kernel is truncated at `truncate` standard deviations and normalized
/// to unit sum. Borders are extended by reflection about the edge
/// (`d c b a | a b c d | d c b a`), so a constant map is left unchanged.
///
/// # Example
///
/// ```ignore
/// use fanwave_smooth::{GaussianSmoother, Smoother};
///
/// let smoother = GaussianSmoother::new().with_truncate(3.0);
/// let out = smoother.smooth(map.view(), 4.0)?;
/// ```
#[derive(Clone, Debug)]
pub struct GaussianSmoother {
    /// Kernel half-width in units of sigma.
    truncate: f64,
}

impl GaussianSmoother {
    /// Creates a new `GaussianSmoother`.
    ///
    /// Defaults: `truncate = 4.0`.
    pub fn new() -> Self {
        Self { truncate: 4.0 }
    }

    /// Sets the kernel half-width in units of sigma.
    pub fn with_truncate(mut self, truncate: f64) -> Self {
        self.truncate = truncate;
        self
    }

    /// Returns the kernel half-width in units of sigma.
    pub fn truncate(&self) -> f64 {
        self.truncate
    }
}

impl Default for GaussianSmoother {
    fn default() -> Self {
        Self::new()
    }
}

impl Smoother for GaussianSmoother {
    fn smooth(&self, map: ArrayView2<'_, f64>, width: f64) -> Result<Array2<f64>, SmoothError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(SmoothError::InvalidWidth { width });
        }
        if !self.truncate.is_finite() || self.truncate <= 0.0 {
            return Err(SmoothError::InvalidTruncate {
                truncate: self.truncate,
            });
        }
        if map.is_empty() {
            return Err(SmoothError::EmptyMap);
        }

        let kernel = gaussian_kernel(width / FWHM_PER_SIGMA, self.truncate);
        let rows_done = convolve_axis(map, &kernel, Axis(1));
        Ok(convolve_axis(rows_done.view(), &kernel, Axis(0)))
    }
}

/// Builds a normalized 1-D Gaussian kernel of standard deviation `sigma`,
/// truncated at `truncate * sigma` samples on each side.
///
/// The kernel has odd length `2 * radius + 1`, with
/// `radius = round(truncate * sigma)`.
pub fn gaussian_kernel(sigma: f64, truncate: f64) -> Vec<f64> {
    let radius = (truncate * sigma + 0.5) as usize;
    if radius == 0 {
        return vec![1.0];
    }
    let r = radius as isize;
    let mut kernel: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64 / sigma;
            (-0.5 * x * x).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Convolves every lane of `input` along `axis` with `kernel`.
fn convolve_axis(input: ArrayView2<'_, f64>, kernel: &[f64], axis: Axis) -> Array2<f64> {
    let radius = (kernel.len() / 2) as isize;
    let mut output = Array2::zeros(input.dim());
    for (lane_in, mut lane_out) in input.lanes(axis).into_iter().zip(output.lanes_mut(axis)) {
        let n = lane_in.len();
        for (i, out) in lane_out.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let j = reflect_index(i as isize + k as isize - radius, n);
                acc += w * lane_in[j];
            }
            *out = acc;
        }
    }
    output
}

/// Maps an out-of-range index onto `0..n` by reflection about the edges.
fn reflect_index(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    #[test]
    fn config_defaults() {
        let smoother = GaussianSmoother::new();
        assert!((smoother.truncate() - 4.0).abs() < f64::EPSILON);
        let from_default = GaussianSmoother::default();
        assert!((from_default.truncate() - smoother.truncate()).abs() < f64::EPSILON);
    }

    #[test]
    fn fwhm_constant() {
        assert_relative_eq!(
            FWHM_PER_SIGMA,
            2.0 * (2.0 * 2.0_f64.ln()).sqrt(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn kernel_normalized_and_symmetric() {
        let kernel = gaussian_kernel(2.0, 4.0);
        assert_eq!(kernel.len(), 17);
        assert_relative_eq!(kernel.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        for i in 0..kernel.len() / 2 {
            assert_relative_eq!(kernel[i], kernel[kernel.len() - 1 - i], epsilon = 1e-15);
        }
        let centre = kernel.len() / 2;
        assert!(kernel.iter().all(|&w| w <= kernel[centre]));
    }

    #[test]
    fn kernel_degenerate_sigma() {
        assert_eq!(gaussian_kernel(0.01, 4.0), vec![1.0]);
    }

    #[test]
    fn reflect_index_mapping() {
        // d c b a | a b c d | d c b a
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(0, 4), 0);
        assert_eq!(reflect_index(3, 4), 3);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(9, 4), 1);
    }

    #[test]
    fn constant_map_unchanged() {
        let map = Array2::from_elem((7, 5), 3.25);
        let out = GaussianSmoother::new().smooth(map.view(), 6.0).unwrap();
        assert_eq!(out.dim(), (7, 5));
        for &v in out.iter() {
            assert_relative_eq!(v, 3.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn impulse_spreads_and_keeps_mass() {
        let mut map = Array2::zeros((21, 21));
        map[[10, 10]] = 1.0;
        let out = GaussianSmoother::new().smooth(map.view(), 3.0).unwrap();
        assert_relative_eq!(out.sum(), 1.0, epsilon = 1e-12);
        assert!(out[[10, 10]] < 1.0);
        assert!(out[[10, 11]] > 0.0);
        assert_relative_eq!(out[[9, 10]], out[[11, 10]], epsilon = 1e-15);
        assert_relative_eq!(out[[10, 9]], out[[9, 10]], epsilon = 1e-15);
    }

    #[test]
    fn invalid_width_rejected() {
        let map = Array2::<f64>::zeros((4, 4));
        let smoother = GaussianSmoother::new();
        for width in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let err = smoother.smooth(map.view(), width).unwrap_err();
            assert!(matches!(err, SmoothError::InvalidWidth { .. }));
        }
    }

    #[test]
    fn invalid_truncate_rejected() {
        let map = Array2::<f64>::zeros((4, 4));
        let err = GaussianSmoother::new()
            .with_truncate(-1.0)
            .smooth(map.view(), 2.0)
            .unwrap_err();
        assert!(matches!(err, SmoothError::InvalidTruncate { .. }));
    }

    #[test]
    fn empty_map_rejected() {
        let map = Array2::<f64>::zeros((0, 4));
        let err = GaussianSmoother::new().smooth(map.view(), 2.0).unwrap_err();
        assert!(matches!(err, SmoothError::EmptyMap));
    }

    #[test]
    fn smoother_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<GaussianSmoother>();
    }
}
