//! 2-D FFT over `ndarray` maps, built from `rustfft` row and column passes.
//!
//! Conventions match numpy: the forward transform is unnormalized and the
//! inverse is scaled by `1 / (rows * cols)`.

use std::sync::Arc;

use ndarray::{Array2, ArrayView2, Axis};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// Forward and inverse FFT plans for one grid shape.
///
/// Plans are shared (`Arc`), so a single `Fft2` can serve many threads.
#[derive(Clone)]
pub(crate) struct Fft2 {
    rows: usize,
    cols: usize,
    forward_rows: Arc<dyn Fft<f64>>,
    forward_cols: Arc<dyn Fft<f64>>,
    inverse_rows: Arc<dyn Fft<f64>>,
    inverse_cols: Arc<dyn Fft<f64>>,
}

impl Fft2 {
    /// Plans transforms for a `rows` x `cols` grid.
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            rows,
            cols,
            forward_rows: planner.plan_fft_forward(cols),
            forward_cols: planner.plan_fft_forward(rows),
            inverse_rows: planner.plan_fft_inverse(cols),
            inverse_cols: planner.plan_fft_inverse(rows),
        }
    }

    /// Forward 2-D FFT of a real map. Matches `numpy.fft.fft2`.
    pub(crate) fn forward(&self, input: ArrayView2<'_, f64>) -> Array2<Complex64> {
        debug_assert_eq!(input.dim(), (self.rows, self.cols));
        let mut data = input.mapv(|v| Complex64::new(v, 0.0));
        process_lanes(&mut data, Axis(1), self.forward_rows.as_ref());
        process_lanes(&mut data, Axis(0), self.forward_cols.as_ref());
        data
    }

    /// Inverse 2-D FFT of a complex map, in place. Matches `numpy.fft.ifft2`.
    pub(crate) fn inverse(&self, data: &mut Array2<Complex64>) {
        debug_assert_eq!(data.dim(), (self.rows, self.cols));
        process_lanes(data, Axis(0), self.inverse_cols.as_ref());
        process_lanes(data, Axis(1), self.inverse_rows.as_ref());
        let norm = 1.0 / (self.rows * self.cols) as f64;
        data.mapv_inplace(|c| c * norm);
    }
}

/// Runs `fft` over every lane of `data` along `axis`.
fn process_lanes(data: &mut Array2<Complex64>, axis: Axis, fft: &dyn Fft<f64>) {
    let len = data.len_of(axis);
    let mut buffer = vec![Complex64::new(0.0, 0.0); len];
    for mut lane in data.lanes_mut(axis) {
        for (b, v) in buffer.iter_mut().zip(lane.iter()) {
            *b = *v;
        }
        fft.process(&mut buffer);
        for (v, b) in lane.iter_mut().zip(buffer.iter()) {
            *v = *b;
        }
    }
}

/// Circular shift with `numpy.roll` semantics on both axes:
/// `out[(r + shift_rows) % rows, (c + shift_cols) % cols] = input[r, c]`.
pub fn roll<T: Clone>(input: ArrayView2<'_, T>, shift_rows: usize, shift_cols: usize) -> Array2<T> {
    let (rows, cols) = input.dim();
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let src_r = (r + rows - shift_rows % rows) % rows;
        let src_c = (c + cols - shift_cols % cols) % cols;
        input[[src_r, src_c]].clone()
    })
}
