//! Uniform resampling of irregularly spaced beat-interval samples.

/// `[start, stop)` in steps of `1 / rate_hz`.
pub fn uniform_grid(start: f64, stop: f64, rate_hz: f64) -> Vec<f64> {
    if !(rate_hz > 0.0) || !(stop > start) {
        return Vec::new();
    }
    let step = 1.0 / rate_hz;
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Piecewise-linear interpolation of `(xs, ys)` at `at`, extrapolating the
/// first/last segment beyond the data range.
///
/// `xs` must be strictly increasing with at least two points; fewer points
/// yield an empty result.
pub fn interp_linear(xs: &[f64], ys: &[f64], at: &[f64]) -> Vec<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Vec::new();
    }
    let xs = &xs[..n];
    let ys = &ys[..n];

    at.iter()
        .map(|&x| {
            // Index of the segment [xs[lo], xs[lo + 1]] used for x
            let hi = xs.partition_point(|&v| v < x).clamp(1, n - 1);
            let lo = hi - 1;
            let slope = (ys[hi] - ys[lo]) / (xs[hi] - xs[lo]);
            ys[lo] + slope * (x - xs[lo])
        })
        .collect()
}
