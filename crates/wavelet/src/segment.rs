//! Gaussian segmentation of wavelet coefficients into coherent and noise
//! populations.
//!
//! The noise level is estimated by iterated trimming: starting above the
//! largest magnitude, the threshold is repeatedly set to `q` times the RMS
//! of the non-zero magnitudes at or below it, until it stops changing.
//! Coefficients above the converged threshold are coherent; the remaining
//! non-zero ones are noise.
//!
//! With adaptive mode on, a trimmed population whose skewness exceeds the
//! configured limit is taken as still containing structure: `q` is lowered
//! by [`Q_STEP`] and the estimate restarts from the top.

use ndarray::ArrayView2;
use num_complex::Complex64;

use fanwave_stats::{mean, skewness};

/// Decrement applied to `q` on each adaptive restart.
pub const Q_STEP: f64 = 0.1;

/// How a segmentation run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Convergence {
    /// The threshold converged and, in adaptive mode, the skewness test passed.
    #[default]
    Converged,
    /// The threshold iteration hit `max_iterations` without settling.
    IterationLimit,
    /// Adaptive mode hit `max_retries` restarts with the skewness still too high.
    RetryLimit,
    /// Adaptive mode could not lower `q` further without reaching zero.
    QExhausted,
}

impl Convergence {
    /// Returns `true` for [`Convergence::Converged`].
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged)
    }
}

/// Tuning of a single segmentation run.
///
/// # Example
///
/// ```ignore
/// use fanwave_wavelet::SegmentOptions;
///
/// let options = SegmentOptions::new()
///     .with_adaptive(true)
///     .with_skewness_limit(0.4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentOptions {
    /// Lower `q` while the trimmed population is too skewed.
    adaptive: bool,
    /// Skewness above which adaptive mode lowers `q`.
    skewness_limit: f64,
    /// Cap on threshold updates per estimate.
    max_iterations: usize,
    /// Cap on adaptive restarts.
    max_retries: usize,
}

impl SegmentOptions {
    /// Creates options with default parameters.
    ///
    /// Defaults: `adaptive = false`, `skewness_limit = 0.4`,
    /// `max_iterations = 1000`, `max_retries = 100`.
    pub fn new() -> Self {
        Self {
            adaptive: false,
            skewness_limit: 0.4,
            max_iterations: 1000,
            max_retries: 100,
        }
    }

    /// Enables or disables adaptive lowering of `q`.
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    /// Sets the skewness limit.
    pub fn with_skewness_limit(mut self, skewness_limit: f64) -> Self {
        self.skewness_limit = skewness_limit;
        self
    }

    /// Sets the cap on threshold updates per estimate.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the cap on adaptive restarts.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Returns whether adaptive mode is enabled.
    pub fn adaptive(&self) -> bool {
        self.adaptive
    }

    /// Returns the skewness limit.
    pub fn skewness_limit(&self) -> f64 {
        self.skewness_limit
    }

    /// Returns the cap on threshold updates.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the cap on adaptive restarts.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of segmenting one coefficient map.
///
/// Index sets hold flat row-major positions (`row * cols + col`).
#[derive(Clone, Debug)]
pub struct Segmentation {
    coherent: Vec<usize>,
    noise: Vec<usize>,
    threshold: f64,
    q: f64,
    retries: usize,
    convergence: Convergence,
}

impl Segmentation {
    /// Returns positions with magnitude above the threshold.
    pub fn coherent(&self) -> &[usize] {
        &self.coherent
    }

    /// Returns positions with magnitude in `(0, threshold]`.
    pub fn noise(&self) -> &[usize] {
        &self.noise
    }

    /// Returns the final magnitude threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the (possibly lowered) threshold multiplier.
    pub fn q(&self) -> f64 {
        self.q
    }

    /// Returns the number of adaptive restarts performed.
    pub fn retries(&self) -> usize {
        self.retries
    }

    /// Returns how the run ended.
    pub fn convergence(&self) -> Convergence {
        self.convergence
    }
}

/// Splits `coeff` into coherent and noise positions.
///
/// `q` is the starting threshold multiplier. The returned
/// [`Segmentation::q`] is the value actually used, lower than `q` if
/// adaptive mode kicked in, and is meant to seed the next call.
///
/// Never loops unboundedly: hitting a cap yields the last threshold
/// computed and a non-converged [`Convergence`].
pub fn gauss_segment(
    coeff: ArrayView2<'_, Complex64>,
    q: f64,
    options: &SegmentOptions,
) -> Segmentation {
    let module: Vec<f64> = coeff.iter().map(|c| c.norm()).collect();
    let max = module.iter().cloned().fold(0.0_f64, f64::max);

    if max <= 0.0 {
        return Segmentation {
            coherent: Vec::new(),
            noise: Vec::new(),
            threshold: 0.0,
            q,
            retries: 0,
            convergence: Convergence::Converged,
        };
    }

    let mut q = q;
    let mut retries = 0;
    let (threshold, convergence) = loop {
        let (threshold, settled) = trimmed_threshold(&module, max, q, options.max_iterations);
        if !settled {
            break (threshold, Convergence::IterationLimit);
        }
        if !options.adaptive || !too_skewed(&module, threshold, options.skewness_limit) {
            break (threshold, Convergence::Converged);
        }
        if retries >= options.max_retries {
            break (threshold, Convergence::RetryLimit);
        }
        if q - Q_STEP <= 0.0 {
            break (threshold, Convergence::QExhausted);
        }
        q -= Q_STEP;
        retries += 1;
    };

    let mut coherent = Vec::new();
    let mut noise = Vec::new();
    for (i, &m) in module.iter().enumerate() {
        if m > threshold {
            coherent.push(i);
        } else if m > 0.0 {
            noise.push(i);
        }
    }

    Segmentation {
        coherent,
        noise,
        threshold,
        q,
        retries,
        convergence,
    }
}

/// Iterates `t <- q * rms({m : 0 < m <= t})` from `2 * max` until `t` is
/// unchanged. Returns the last `t` and whether it settled.
fn trimmed_threshold(module: &[f64], max: f64, q: f64, max_iterations: usize) -> (f64, bool) {
    let mut current = 2.0 * max;
    for _ in 0..max_iterations {
        let squares: Vec<f64> = module
            .iter()
            .filter(|&&m| m > 0.0 && m <= current)
            .map(|&m| m * m)
            .collect();
        let next = q * mean(&squares).sqrt();
        if next == current {
            return (next, true);
        }
        current = next;
    }
    (current, false)
}

/// Whether the population trimmed at `threshold` is skewed beyond `limit`.
fn too_skewed(module: &[f64], threshold: f64, limit: f64) -> bool {
    let trimmed: Vec<f64> = module
        .iter()
        .copied()
        .filter(|&m| m > 0.0 && m <= threshold)
        .collect();
    matches!(skewness(&trimmed), Some(s) if s > limit)
}
