//! Zero padding onto a larger canvas and centered extraction.
//!
//! Both directions place the smaller array at offset
//! `(big - small) / 2` on each axis (integer division), so
//! `depad(pad(x, H, W), h, w) == x` for any size difference.

use ndarray::{Array2, ArrayView2, s};
use num_complex::Complex64;

use crate::error::WaveletError;

/// Embeds `image` in the center of a zero canvas of shape `(rows, cols)`.
///
/// # Errors
///
/// Returns [`WaveletError::PadTooSmall`] if the canvas is smaller than the
/// image along either axis.
pub fn pad(
    image: ArrayView2<'_, f64>,
    rows: usize,
    cols: usize,
) -> Result<Array2<f64>, WaveletError> {
    let (h, w) = image.dim();
    if rows < h || cols < w {
        return Err(WaveletError::PadTooSmall {
            rows: h,
            cols: w,
            target_rows: rows,
            target_cols: cols,
        });
    }
    let (y0, x0) = (center_offset(rows, h), center_offset(cols, w));
    let mut canvas = Array2::zeros((rows, cols));
    canvas.slice_mut(s![y0..y0 + h, x0..x0 + w]).assign(&image);
    Ok(canvas)
}

/// Extracts the centered `(rows, cols)` region of a complex map.
///
/// # Errors
///
/// Returns [`WaveletError::DepadTooLarge`] if the region exceeds the map.
pub fn depad(
    map: ArrayView2<'_, Complex64>,
    rows: usize,
    cols: usize,
) -> Result<Array2<Complex64>, WaveletError> {
    let (h, w) = map.dim();
    if rows > h || cols > w {
        return Err(WaveletError::DepadTooLarge {
            rows: h,
            cols: w,
            target_rows: rows,
            target_cols: cols,
        });
    }
    let (y0, x0) = (center_offset(h, rows), center_offset(w, cols));
    Ok(map.slice(s![y0..y0 + rows, x0..x0 + cols]).to_owned())
}

/// Offset of a `small` extent centered inside a `big` one, truncated.
fn center_offset(big: usize, small: usize) -> usize {
    (big - small) / 2
}
