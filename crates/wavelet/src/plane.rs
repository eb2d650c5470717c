//! Frequency (UV) plane construction.
//!
//! Coordinates are normalized wavenumbers in cycles per pixel, centered so
//! that the zero frequency sits at index `n / 2` of each axis.

use ndarray::Array2;

/// Circular shifts that move a raw FFT so its zero frequency lines up with
/// the center of a [`FrequencyPlane`], and back.
///
/// Shifts follow `numpy.roll` semantics: element `i` moves to `i + shift`.
/// For every axis `forward + inverse == n`, so applying both restores the
/// original layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneShift {
    /// Forward roll along columns (x).
    pub forward_x: usize,
    /// Forward roll along rows (y).
    pub forward_y: usize,
    /// Inverse roll along columns (x).
    pub inverse_x: usize,
    /// Inverse roll along rows (y).
    pub inverse_y: usize,
}

/// Normalized wavenumber grid over a `(rows, cols)` image.
#[derive(Clone, Debug)]
pub struct FrequencyPlane {
    u: Array2<f64>,
    v: Array2<f64>,
    shift: PlaneShift,
}

impl FrequencyPlane {
    /// Builds the plane for a grid of `rows` x `cols` pixels.
    ///
    /// `u[[r, c]]` is the x wavenumber of column `c` and `v[[r, c]]` the y
    /// wavenumber of row `r`, each `(index - n / 2) / n` with integer `n / 2`.
    pub fn new(rows: usize, cols: usize) -> Self {
        let ux = axis_coordinates(cols);
        let vy = axis_coordinates(rows);
        let u = Array2::from_shape_fn((rows, cols), |(_, c)| ux[c]);
        let v = Array2::from_shape_fn((rows, cols), |(r, _)| vy[r]);
        let (forward_x, inverse_x) = axis_shifts(cols);
        let (forward_y, inverse_y) = axis_shifts(rows);
        Self {
            u,
            v,
            shift: PlaneShift {
                forward_x,
                forward_y,
                inverse_x,
                inverse_y,
            },
        }
    }

    /// Returns the x (column) wavenumbers.
    pub fn u(&self) -> &Array2<f64> {
        &self.u
    }

    /// Returns the y (row) wavenumbers.
    pub fn v(&self) -> &Array2<f64> {
        &self.v
    }

    /// Returns the centering shifts.
    pub fn shift(&self) -> PlaneShift {
        self.shift
    }

    /// Returns `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        self.u.dim()
    }
}

/// Centered, normalized coordinates of one axis.
fn axis_coordinates(n: usize) -> Vec<f64> {
    let center = (n / 2) as f64;
    let nf = n as f64;
    (0..n).map(|i| (i as f64 - center) / nf).collect()
}

/// `(forward, inverse)` roll amounts for an axis of length `n`.
///
/// The forward roll carries FFT bin 0 to the zero coordinate at `n / 2`.
/// Even: `(n/2, n/2)`. Odd: `((n-1)/2, (n-1)/2 + 1)`.
fn axis_shifts(n: usize) -> (usize, usize) {
    let forward = n / 2;
    (forward, n - forward)
}
