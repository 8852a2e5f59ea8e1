//! Sampling-error helpers for Monte Carlo frequency estimates.

/// Z-score for a two-sided 95% interval.
pub const Z_95: f64 = 1.96;

/// Wilson score interval for `successes` out of `n` trials at z-score `z`,
/// clamped to `[0, 1]`. Stays sensible for long shots near 0 where the
/// normal approximation goes negative.
///
/// ```
/// use calcutta_core::stats::wilson_ci;
///
/// let (lower, upper) = wilson_ci(50, 100, 1.96);
/// assert!(lower > 0.39 && lower < 0.41);
/// assert!(upper > 0.59 && upper < 0.61);
/// ```
#[must_use]
pub fn wilson_ci(successes: u64, n: u64, z: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }

    let trials = n as f64;
    let p = successes as f64 / trials;
    let z2 = z * z;

    let scale = 1.0 + z2 / trials;
    let mid = p + z2 / (2.0 * trials);
    let half_width = z * (p * (1.0 - p) / trials + z2 / (4.0 * trials * trials)).sqrt();

    let (lower, upper) = ((mid - half_width) / scale, (mid + half_width) / scale);

    (lower.max(0.0), upper.min(1.0))
}

/// Binomial standard error of an estimated proportion `p` over `n` trials.
#[must_use]
pub fn standard_error(p: f64, n: u64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    (p * (1.0 - p) / n as f64).sqrt()
}
