//! # fanwave-smooth
//!
//! Gaussian smoothing of 2-D maps, used to post-filter per-scale wavelet
//! power maps.
//!
//! The kernel width handed to a [`Smoother`] is the full width at half
//! maximum (FWHM) of the Gaussian, in pixels.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fanwave_smooth::{GaussianSmoother, Smoother};
//!
//! let smoother = GaussianSmoother::new();
//! let smoothed = smoother.smooth(map.view(), 3.0)?;
//! assert_eq!(smoothed.dim(), map.dim());
//! ```

mod error;
mod gaussian;

pub use error::SmoothError;
pub use gaussian::{FWHM_PER_SIGMA, GaussianSmoother, gaussian_kernel};

use ndarray::{Array2, ArrayView2};

/// A shape-preserving 2-D smoothing operator.
pub trait Smoother {
    /// Smooths `map` with a kernel of the given FWHM (pixels).
    ///
    /// The returned array has the same shape as `map`.
    fn smooth(&self, map: ArrayView2<'_, f64>, width: f64) -> Result<Array2<f64>, SmoothError>;
}
