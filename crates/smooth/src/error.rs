//! Error types for the fanwave-smooth crate.

/// Error type for all fallible operations in the fanwave-smooth crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SmoothError {
    /// Returned when the kernel width is non-finite or non-positive.
    #[error("kernel width must be finite and positive, got {width}")]
    InvalidWidth {
        /// The invalid width.
        width: f64,
    },

    /// Returned when the truncation radius (in sigmas) is non-finite or non-positive.
    #[error("truncation must be finite and positive, got {truncate}")]
    InvalidTruncate {
        /// The invalid truncation.
        truncate: f64,
    },

    /// Returned when the map to smooth has no pixels.
    #[error("cannot smooth an empty map")]
    EmptyMap,
}
