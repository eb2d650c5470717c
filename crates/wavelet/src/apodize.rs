//! Edge apodization (tapering) window.

use ndarray::Array2;
use std::f64::consts::FRAC_PI_2;

use crate::error::WaveletError;

/// Builds a separable 2-D apodization mask of shape `(rows, cols)`.
///
/// The mask is the outer product of two 1-D windows (see [`taper_window`]),
/// one per axis. It is 1.0 in the interior and rolls off to 0.0 at the
/// edges over `floor(radius * len)` samples on each side.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`WaveletError::InvalidApodizeRadius`] | `radius` not in (0, 1) |
/// | [`WaveletError::TaperTooNarrow`] | taper shorter than 2 samples on either axis |
/// | [`WaveletError::TaperTooWide`] | tapers overlap on either axis (`radius > 0.5`) |
pub fn apodize(rows: usize, cols: usize, radius: f64) -> Result<Array2<f64>, WaveletError> {
    let tap_y = taper_window(rows, radius)?;
    let tap_x = taper_window(cols, radius)?;
    Ok(Array2::from_shape_fn((rows, cols), |(r, c)| tap_y[r] * tap_x[c]))
}

/// Builds a 1-D cosine-tapered window of length `len`.
///
/// With `width = floor(radius * len)`, the first `width` samples rise as a
/// quarter sine from 0 to 1 and the last `width` samples fall as a quarter
/// cosine from 1 to 0. The two tapers must not overlap.
///
/// # Errors
///
/// Same as [`apodize`].
pub fn taper_window(len: usize, radius: f64) -> Result<Vec<f64>, WaveletError> {
    if !(radius > 0.0 && radius < 1.0) {
        return Err(WaveletError::InvalidApodizeRadius { radius });
    }
    let width = (radius * len as f64) as usize;
    if width < 2 {
        return Err(WaveletError::TaperTooNarrow { len, width });
    }
    if 2 * width > len {
        return Err(WaveletError::TaperTooWide { len, width });
    }

    let mut window = vec![1.0; len];
    let denom = (width - 1) as f64;
    for i in 0..width {
        window[i] = (FRAC_PI_2 * i as f64 / denom).sin();
    }
    for i in 0..width {
        window[len - width + i] = (FRAC_PI_2 * i as f64 / denom).cos();
    }
    Ok(window)
}
