//! Error types for the fanwave-wavelet crate.

use fanwave_smooth::SmoothError;

/// Error type for all fallible operations in the fanwave-wavelet crate.
///
/// Covers input validation, configuration problems, and failures of the
/// smoothing collaborator. Segmentation that fails to converge is not an
/// error; see [`Convergence`](crate::Convergence).
#[derive(Debug, Clone, thiserror::Error)]
pub enum WaveletError {
    /// Returned when the input image has no pixels.
    #[error("image is empty: {rows}x{cols}")]
    EmptyImage {
        /// Number of rows provided.
        rows: usize,
        /// Number of columns provided.
        cols: usize,
    },

    /// Returned when the input data contains non-finite values (NaN or infinity).
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the apodization radius is outside the open interval (0, 1).
    #[error("apodization radius must be in (0, 1), got {radius}")]
    InvalidApodizeRadius {
        /// Radius that was requested.
        radius: f64,
    },

    /// Returned when the apodization taper would be narrower than 2 samples.
    #[error("apodization taper of {width} samples on an axis of length {len} is narrower than 2")]
    TaperTooNarrow {
        /// Length of the axis.
        len: usize,
        /// Taper width in samples.
        width: usize,
    },

    /// Returned when the rising and falling tapers would overlap
    /// (`2 * width > len`).
    #[error("apodization taper of {width} samples overlaps itself on an axis of length {len}")]
    TaperTooWide {
        /// Length of the axis.
        len: usize,
        /// Taper width in samples.
        width: usize,
    },

    /// Returned when the padding canvas is smaller than the image.
    #[error("cannot pad {rows}x{cols} image into a {target_rows}x{target_cols} canvas")]
    PadTooSmall {
        /// Rows of the image.
        rows: usize,
        /// Columns of the image.
        cols: usize,
        /// Rows of the requested canvas.
        target_rows: usize,
        /// Columns of the requested canvas.
        target_cols: usize,
    },

    /// Returned when the depadded region is larger than the source array.
    #[error("cannot extract {target_rows}x{target_cols} region from a {rows}x{cols} array")]
    DepadTooLarge {
        /// Rows of the source array.
        rows: usize,
        /// Columns of the source array.
        cols: usize,
        /// Rows of the requested region.
        target_rows: usize,
        /// Columns of the requested region.
        target_cols: usize,
    },

    /// Returned when the resolution is non-finite or non-positive.
    #[error("resolution must be finite and positive, got {0}")]
    InvalidResolution(f64),

    /// Returned when an explicit scale or wavenumber is non-finite or non-positive.
    #[error("scale at index {index} must be finite and positive, got {value}")]
    InvalidScale {
        /// Position in the supplied array.
        index: usize,
        /// The invalid value.
        value: f64,
    },

    /// Returned when no scales can be generated for the grid.
    #[error("no scales can be generated for a {rows}x{cols} grid")]
    NoScales {
        /// Rows of the (padded) grid.
        rows: usize,
        /// Columns of the (padded) grid.
        cols: usize,
    },

    /// Returned when an explicit scale or wavenumber list is empty.
    #[error("no scales or wavenumbers supplied")]
    EmptyScaleList,

    /// Returned when the number of segmentation thresholds differs from the number of scales.
    #[error("got {thresholds} segmentation thresholds for {scales} scales")]
    ThresholdCountMismatch {
        /// Number of thresholds supplied.
        thresholds: usize,
        /// Number of scales in the transform.
        scales: usize,
    },

    /// Returned when configuration parameters are invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Returned when the smoothing collaborator fails.
    #[error("smoothing failed: {0}")]
    Smoothing(#[from] SmoothError),
}
