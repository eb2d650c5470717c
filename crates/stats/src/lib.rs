//! Moment statistics for the fanwave coefficient segmentation.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Population central moment of order `k` (N denominator).
/// Returns 0.0 if empty.
pub fn central_moment(data: &[f64], k: i32) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|&x| (x - m).powi(k)).sum::<f64>() / data.len() as f64
}

/// Population variance (N denominator). Returns 0.0 if empty.
pub fn variance(data: &[f64]) -> f64 {
    central_moment(data, 2)
}

/// Biased sample skewness `g1 = m3 / m2^(3/2)` (matching SciPy's
/// `scipy.stats.skew` with `bias=True`).
///
/// Returns `None` if fewer than 3 values are given or the variance is zero
/// (relative to the magnitude of the mean), where skewness is undefined.
pub fn skewness(data: &[f64]) -> Option<f64> {
    if data.len() < 3 {
        return None;
    }
    let m = mean(data);
    let m2 = variance(data);
    if m2 <= (f64::EPSILON * m).powi(2) {
        return None;
    }
    let m3 = central_moment(data, 3);
    Some(m3 / m2.powf(1.5))
}
