//! Configuration for the fan transform.

use crate::error::WaveletError;
use crate::segment::SegmentOptions;

/// How the analysis scales are chosen.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ScaleSelection {
    /// Log-spaced scales generated from the (padded) grid size.
    #[default]
    Auto,
    /// Explicit physical scales; wavenumber = `1 / (scale * resolution)`.
    Physical(Vec<f64>),
    /// Explicit wavenumbers; scale = `1 / (wavenumber * resolution)`.
    Wavenumbers(Vec<f64>),
}

/// Coherent/noise segmentation settings.
///
/// One threshold multiplier `q` per scale. A threshold of exactly `0.0`
/// skips segmentation for that scale while keeping the three-way output
/// layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentationConfig {
    thresholds: Vec<f64>,
    options: SegmentOptions,
}

impl SegmentationConfig {
    /// Creates a segmentation config from per-scale thresholds.
    ///
    /// Defaults: see [`SegmentOptions::new`].
    pub fn new(thresholds: Vec<f64>) -> Self {
        Self {
            thresholds,
            options: SegmentOptions::new(),
        }
    }

    /// Creates a segmentation config with the same `q` for `n_scales` scales.
    pub fn uniform(q: f64, n_scales: usize) -> Self {
        Self::new(vec![q; n_scales])
    }

    /// Enables or disables adaptive lowering of `q`.
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.options = self.options.with_adaptive(adaptive);
        self
    }

    /// Sets the skewness limit that triggers adaptation.
    pub fn with_skewness_limit(mut self, skewness_limit: f64) -> Self {
        self.options = self.options.with_skewness_limit(skewness_limit);
        self
    }

    /// Sets the cap on threshold updates per segmentation.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.options = self.options.with_max_iterations(max_iterations);
        self
    }

    /// Sets the cap on adaptive restarts per segmentation.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.options = self.options.with_max_retries(max_retries);
        self
    }

    /// Returns the per-scale thresholds.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Returns the segmentation options.
    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }
}

/// Whether wavelet coefficients are split into coherent and noise parts.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SegmentationMode {
    /// Plain transform; outputs hold `M` scale slices.
    #[default]
    Disabled,
    /// Segmented transform; outputs hold `3 * M` slices (total, coherent, noise).
    Enabled(SegmentationConfig),
}

impl SegmentationMode {
    /// Returns `true` for [`SegmentationMode::Enabled`].
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }
}

/// Configuration for [`fan_transform`](crate::fan_transform).
///
/// Use the builder methods to customize the transform.
///
/// # Example
///
/// ```ignore
/// use fanwave_wavelet::{FanConfig, SegmentationConfig, SegmentationMode};
///
/// let config = FanConfig::new()
///     .with_resolution(1.0)
///     .with_apodize(0.1)
///     .with_pad_to(256, 256)
///     .with_segmentation(SegmentationMode::Enabled(
///         SegmentationConfig::uniform(2.5, 19).with_adaptive(true),
///     ));
/// ```
#[derive(Clone, Debug)]
pub struct FanConfig {
    /// Pixels per unit length.
    resolution: f64,
    /// Scale selection.
    scales: ScaleSelection,
    /// Coherent/noise segmentation.
    segmentation: SegmentationMode,
    /// Multiply power by `a^2` (scale power normalization).
    power_normalize: bool,
    /// Crop padded outputs back to the input shape.
    crop_to_original: bool,
    /// Smooth coherent and noise power maps per scale.
    smooth: bool,
    /// Apodization radius in (0, 1), if any.
    apodize: Option<f64>,
    /// Canvas shape `(rows, cols)` to zero-pad to, if any.
    pad_to: Option<(usize, usize)>,
}

impl FanConfig {
    /// Creates a new `FanConfig` with default parameters.
    ///
    /// Defaults: `resolution = 1.0`, `scales = Auto`,
    /// `segmentation = Disabled`, `power_normalize = true`,
    /// `crop_to_original = true`, `smooth = false`, no apodization,
    /// no padding.
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            scales: ScaleSelection::Auto,
            segmentation: SegmentationMode::Disabled,
            power_normalize: true,
            crop_to_original: true,
            smooth: false,
            apodize: None,
            pad_to: None,
        }
    }

    /// Sets the resolution (pixels per unit length).
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the scale selection.
    pub fn with_scales(mut self, scales: ScaleSelection) -> Self {
        self.scales = scales;
        self
    }

    /// Sets the segmentation mode.
    pub fn with_segmentation(mut self, segmentation: SegmentationMode) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// Sets whether scale power normalization (`a^2`) is applied.
    pub fn with_power_normalize(mut self, power_normalize: bool) -> Self {
        self.power_normalize = power_normalize;
        self
    }

    /// Sets whether padded outputs are cropped back to the input shape.
    pub fn with_crop_to_original(mut self, crop_to_original: bool) -> Self {
        self.crop_to_original = crop_to_original;
        self
    }

    /// Sets whether coherent and noise power maps are smoothed per scale.
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    /// Tapers the image edges with the given radius before transforming.
    pub fn with_apodize(mut self, radius: f64) -> Self {
        self.apodize = Some(radius);
        self
    }

    /// Zero-pads the image onto a `rows` x `cols` canvas before transforming.
    pub fn with_pad_to(mut self, rows: usize, cols: usize) -> Self {
        self.pad_to = Some((rows, cols));
        self
    }

    /// Returns the resolution.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Returns the scale selection.
    pub fn scales(&self) -> &ScaleSelection {
        &self.scales
    }

    /// Returns the segmentation mode.
    pub fn segmentation(&self) -> &SegmentationMode {
        &self.segmentation
    }

    /// Returns whether scale power normalization is applied.
    pub fn power_normalize(&self) -> bool {
        self.power_normalize
    }

    /// Returns whether padded outputs are cropped.
    pub fn crop_to_original(&self) -> bool {
        self.crop_to_original
    }

    /// Returns whether power maps are smoothed.
    pub fn smooth(&self) -> bool {
        self.smooth
    }

    /// Returns the apodization radius, if set.
    pub fn apodize(&self) -> Option<f64> {
        self.apodize
    }

    /// Returns the padding canvas shape, if set.
    pub fn pad_to(&self) -> Option<(usize, usize)> {
        self.pad_to
    }

    /// Validates the parameters that do not depend on the image.
    ///
    /// The apodization radius is not checked; an invalid radius disables
    /// apodization with a warning when the transform runs.
    pub fn validate(&self) -> Result<(), WaveletError> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(WaveletError::InvalidResolution(self.resolution));
        }
        if let Some((rows, cols)) = self.pad_to
            && (rows == 0 || cols == 0)
        {
            return Err(WaveletError::InvalidConfig(format!(
                "padding canvas must be non-empty, got {rows}x{cols}"
            )));
        }
        if let SegmentationMode::Enabled(seg) = &self.segmentation {
            if let Some(&q) = seg.thresholds.iter().find(|q| !q.is_finite() || **q < 0.0) {
                return Err(WaveletError::InvalidConfig(format!(
                    "segmentation thresholds must be finite and >= 0, got {q}"
                )));
            }
            if !seg.options.skewness_limit().is_finite() {
                return Err(WaveletError::InvalidConfig(
                    "skewness limit must be finite".to_string(),
                ));
            }
            if seg.options.max_iterations() == 0 {
                return Err(WaveletError::InvalidConfig(
                    "max_iterations must be >= 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for FanConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = FanConfig::new();
        assert!((config.resolution() - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.scales(), &ScaleSelection::Auto);
        assert!(!config.segmentation().is_enabled());
        assert!(config.power_normalize());
        assert!(config.crop_to_original());
        assert!(!config.smooth());
        assert!(config.apodize().is_none());
        assert!(config.pad_to().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder() {
        let config = FanConfig::new()
            .with_resolution(0.5)
            .with_scales(ScaleSelection::Physical(vec![2.0, 4.0]))
            .with_segmentation(SegmentationMode::Enabled(SegmentationConfig::uniform(2.5, 2)))
            .with_power_normalize(false)
            .with_crop_to_original(false)
            .with_smooth(true)
            .with_apodize(0.1)
            .with_pad_to(64, 32);

        assert!((config.resolution() - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.scales(), &ScaleSelection::Physical(vec![2.0, 4.0]));
        assert!(config.segmentation().is_enabled());
        assert!(!config.power_normalize());
        assert!(!config.crop_to_original());
        assert!(config.smooth());
        assert_eq!(config.apodize(), Some(0.1));
        assert_eq!(config.pad_to(), Some((64, 32)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_default_trait() {
        let from_new = FanConfig::new();
        let from_default = FanConfig::default();
        assert_eq!(from_new.scales(), from_default.scales());
        assert_eq!(from_new.segmentation(), from_default.segmentation());
        assert_eq!(from_new.pad_to(), from_default.pad_to());
    }

    #[test]
    fn segmentation_config_builder() {
        let seg = SegmentationConfig::uniform(2.0, 3)
            .with_adaptive(true)
            .with_skewness_limit(0.3)
            .with_max_iterations(50)
            .with_max_retries(5);
        assert_eq!(seg.thresholds(), &[2.0, 2.0, 2.0]);
        assert!(seg.options().adaptive());
        assert!((seg.options().skewness_limit() - 0.3).abs() < f64::EPSILON);
        assert_eq!(seg.options().max_iterations(), 50);
        assert_eq!(seg.options().max_retries(), 5);
    }

    #[test]
    fn invalid_resolution() {
        let err = FanConfig::new().with_resolution(0.0).validate().unwrap_err();
        assert!(matches!(err, WaveletError::InvalidResolution(_)));
    }

    #[test]
    fn empty_pad_canvas() {
        let err = FanConfig::new().with_pad_to(0, 16).validate().unwrap_err();
        assert!(matches!(err, WaveletError::InvalidConfig(_)));
    }

    #[test]
    fn negative_threshold() {
        let seg = SegmentationConfig::new(vec![2.5, -1.0]);
        let err = FanConfig::new()
            .with_segmentation(SegmentationMode::Enabled(seg))
            .validate()
            .unwrap_err();
        assert!(matches!(err, WaveletError::InvalidConfig(_)));
    }

    #[test]
    fn zero_iteration_cap() {
        let seg = SegmentationConfig::uniform(2.5, 4).with_max_iterations(0);
        let err = FanConfig::new()
            .with_segmentation(SegmentationMode::Enabled(seg))
            .validate()
            .unwrap_err();
        assert!(matches!(err, WaveletError::InvalidConfig(_)));
    }

    #[test]
    fn bad_apodize_radius_still_validates() {
        assert!(FanConfig::new().with_apodize(1.5).validate().is_ok());
    }

    #[test]
    fn config_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<FanConfig>();
    }
}
