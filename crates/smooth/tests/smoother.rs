use approx::assert_relative_eq;
use fanwave_smooth::{GaussianSmoother, Smoother};
use ndarray::Array2;

fn smooth_dyn(smoother: &dyn Smoother, map: &Array2<f64>, width: f64) -> Array2<f64> {
    smoother.smooth(map.view(), width).unwrap()
}

#[test]
fn wider_kernel_flattens_more() {
    // Checkerboard: the finest structure a grid can hold.
    let map = Array2::from_shape_fn((32, 32), |(r, c)| if (r + c) % 2 == 0 { 1.0 } else { 0.0 });
    let smoother = GaussianSmoother::new();

    let narrow = smooth_dyn(&smoother, &map, 1.0);
    let wide = smooth_dyn(&smoother, &map, 8.0);

    let spread = |a: &Array2<f64>| {
        let max = a.iter().cloned().fold(f64::MIN, f64::max);
        let min = a.iter().cloned().fold(f64::MAX, f64::min);
        max - min
    };
    assert!(spread(&wide) < spread(&narrow));
    assert_relative_eq!(wide[[16, 16]], 0.5, epsilon = 1e-3);
}

#[test]
fn rectangular_shape_preserved() {
    let map = Array2::from_shape_fn((9, 17), |(r, c)| (r * 17 + c) as f64);
    let out = smooth_dyn(&GaussianSmoother::new(), &map, 2.5);
    assert_eq!(out.dim(), (9, 17));
}

#[test]
fn linear_ramp_interior_preserved() {
    // A symmetric kernel leaves a linear ramp unchanged away from the edges.
    let map = Array2::from_shape_fn((5, 64), |(_, c)| c as f64);
    let out = smooth_dyn(&GaussianSmoother::new(), &map, 3.0);
    for c in 10..54 {
        assert_relative_eq!(out[[2, c]], c as f64, epsilon = 1e-9);
    }
}
