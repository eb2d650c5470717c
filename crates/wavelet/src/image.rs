//! Validated 2-D image wrapper.

use ndarray::{Array2, ArrayView2};

use crate::error::WaveletError;

/// A validated real-valued image of finite `f64` pixels.
///
/// Wraps an `Array2<f64>` indexed `[row, col]` (height x width) and
/// guarantees:
/// - at least one row and one column
/// - all values are finite (no NaN or infinity)
///
/// # Example
///
/// ```ignore
/// use fanwave_wavelet::Image;
///
/// let image = Image::from_shape_vec(2, 3, vec![0.0; 6])?;
/// assert_eq!(image.dim(), (2, 3));
/// ```
#[derive(Clone, Debug)]
pub struct Image {
    data: Array2<f64>,
}

impl Image {
    /// Creates a new `Image` after validating the data.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::EmptyImage`] | zero rows or zero columns |
    /// | [`WaveletError::NonFiniteData`] | any pixel is NaN or infinite |
    pub fn new(data: Array2<f64>) -> Result<Self, WaveletError> {
        let (rows, cols) = data.dim();
        if rows == 0 || cols == 0 {
            return Err(WaveletError::EmptyImage { rows, cols });
        }
        if !data.iter().all(|v| v.is_finite()) {
            return Err(WaveletError::NonFiniteData);
        }
        Ok(Self { data })
    }

    /// Creates a new `Image` from row-major pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::InvalidConfig`] if `data.len() != rows * cols`,
    /// otherwise the same errors as [`Image::new`].
    pub fn from_shape_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, WaveletError> {
        let len = data.len();
        let array = Array2::from_shape_vec((rows, cols), data).map_err(|_| {
            WaveletError::InvalidConfig(format!(
                "{len} pixels cannot fill a {rows}x{cols} image"
            ))
        })?;
        Self::new(array)
    }

    /// Returns a read-only view of the pixels.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Returns `(rows, cols)`, i.e. `(height, width)`.
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Returns the number of rows (height).
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Returns the number of columns (width).
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Consumes the image and returns the underlying array.
    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }
}

impl AsRef<Array2<f64>> for Image {
    fn as_ref(&self) -> &Array2<f64> {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid_image() {
        let image = Image::new(Array2::from_elem((3, 4), 1.5)).unwrap();
        assert_eq!(image.dim(), (3, 4));
        assert_eq!(image.rows(), 3);
        assert_eq!(image.cols(), 4);
        assert_eq!(image.view()[[2, 3]], 1.5);
    }

    #[test]
    fn new_single_pixel() {
        let image = Image::new(Array2::zeros((1, 1))).unwrap();
        assert_eq!(image.dim(), (1, 1));
    }

    #[test]
    fn new_empty_rejected() {
        let err = Image::new(Array2::zeros((0, 5))).unwrap_err();
        assert!(matches!(err, WaveletError::EmptyImage { rows: 0, cols: 5 }));
        let err = Image::new(Array2::zeros((5, 0))).unwrap_err();
        assert!(matches!(err, WaveletError::EmptyImage { rows: 5, cols: 0 }));
    }

    #[test]
    fn new_nan_rejected() {
        let mut data = Array2::zeros((2, 2));
        data[[1, 0]] = f64::NAN;
        let err = Image::new(data).unwrap_err();
        assert!(matches!(err, WaveletError::NonFiniteData));
    }

    #[test]
    fn new_infinity_rejected() {
        let mut data = Array2::zeros((2, 2));
        data[[0, 1]] = f64::NEG_INFINITY;
        let err = Image::new(data).unwrap_err();
        assert!(matches!(err, WaveletError::NonFiniteData));
    }

    #[test]
    fn from_shape_vec_row_major() {
        let image = Image::from_shape_vec(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(image.view()[[0, 2]], 2.0);
        assert_eq!(image.view()[[1, 0]], 3.0);
    }

    #[test]
    fn from_shape_vec_wrong_length() {
        let err = Image::from_shape_vec(2, 3, vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, WaveletError::InvalidConfig(_)));
    }

    #[test]
    fn into_inner_and_as_ref() {
        let data = Array2::from_elem((2, 2), 7.0);
        let image = Image::new(data.clone()).unwrap();
        assert_eq!(image.as_ref(), &data);
        assert_eq!(image.into_inner(), data);
    }

    #[test]
    fn image_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + Clone>() {}
        assert_impl::<Image>();
    }
}
