//! Equally spaced partitions of `[a, b]`

/// Build `n + 1` equally spaced points from `a` to `b` and the step `(b - a) / n`
///
/// `x_i = a + i * step`; the end points are pinned to `a` and `b` exactly.
/// Works unchanged for `b < a` (decreasing) and `a == b` (zero step).
/// Callers guarantee `n >= 1`, so both end points exist.
pub(crate) fn equally_spaced(a: f64, b: f64, n: usize) -> (Vec<f64>, f64) {
    #[allow(clippy::cast_precision_loss)]
    let step = (b - a) / n as f64;

    #[allow(clippy::cast_precision_loss)]
    let mut points: Vec<f64> = (0..=n).map(|i| a + i as f64 * step).collect();
    points[0] = a;
    points[n] = b;

    (points, step)
}

/// `x_0 .. x_n`
pub(crate) fn all_nodes(partition: &[f64]) -> Vec<f64> {
    partition.to_vec()
}

/// `x_0 .. x_{n-1}`
pub(crate) fn left_endpoints(partition: &[f64]) -> Vec<f64> {
    partition[..partition.len().saturating_sub(1)].to_vec()
}

/// `x_1 .. x_n`
pub(crate) fn right_endpoints(partition: &[f64]) -> Vec<f64> {
    partition.get(1..).unwrap_or_default().to_vec()
}

/// `(x_i + x_{i+1}) / 2`
pub(crate) fn midpoints(partition: &[f64]) -> Vec<f64> {
    partition.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}
