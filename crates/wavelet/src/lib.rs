//! # fanwave-wavelet
//!
//! Fan (anisotropic Morlet) continuous wavelet transform of 2-D images, with
//! optional coherent/noise segmentation of the coefficients.
//!
//! ## Analysis Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["Image::new(data)?"] -->|"validate"| B["Image"]
//!     B -->|"apodize / pad"| C["working grid"]
//!     C -->|"fft2 + roll"| D["centered spectrum"]
//!     D -->|"N oriented filters per scale"| E["W(a, x)"]
//!     E -->|"gauss_segment"| F["coherent / noise"]
//!     E --> G["FanResult"]
//!     F --> G
//!     G --> H[".total_power()"]
//!     G --> I[".scale_power()"]
//!     G --> J[".thresholds()"]
//! ```
//!
//! ## Output Layout
//!
//! | Mode | Slices | Scalar rows |
//! |------|--------|-------------|
//! | [`SegmentationMode::Disabled`] | `M` | 1 |
//! | [`SegmentationMode::Enabled`] | `3 * M` (total, coherent, noise) | 3 |
//!
//! ## Quick Start
//!
//! ```ignore
//! use fanwave_wavelet::{FanConfig, Image, SegmentationConfig, SegmentationMode, fan_transform};
//!
//! let image = Image::new(data)?;
//! let result = fan_transform(&image, &FanConfig::new().with_apodize(0.1))?;
//!
//! // Segment with the same q on every scale, adapting it when the noise
//! // population is too skewed.
//! let seg = SegmentationConfig::uniform(2.5, result.n_scales()).with_adaptive(true);
//! let config = FanConfig::new().with_segmentation(SegmentationMode::Enabled(seg));
//! let segmented = fan_transform(&image, &config)?;
//!
//! for (k, p) in segmented.wavenumbers().iter().zip(segmented.total_scale_power()) {
//!     println!("{k:.4} {p:.4e}");
//! }
//! ```

mod apodize;
mod config;
mod error;
mod fan;
mod fft;
mod image;
mod pad;
mod plane;
mod result;
mod scales;
mod segment;

pub use apodize::{apodize, taper_window};
pub use config::{FanConfig, ScaleSelection, SegmentationConfig, SegmentationMode};
pub use error::WaveletError;
pub use fan::{fan_transform, fan_transform_with};
pub use fft::roll;
pub use image::Image;
pub use pad::{depad, pad};
pub use plane::{FrequencyPlane, PlaneShift};
pub use result::FanResult;
pub use scales::{MORLET_K0, ScaleSet, delta, n_orientations};
pub use segment::{Convergence, Q_STEP, SegmentOptions, Segmentation, gauss_segment};

pub use fanwave_smooth::{GaussianSmoother, SmoothError, Smoother};
