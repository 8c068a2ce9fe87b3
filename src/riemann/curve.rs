use super::partition;
use crate::NumericFunction;
use crate::error::RiemannError;

/// A sampled function graph, for plotting
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Curve {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Curve {
    /// Number of sampled points
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// `(x, f(x))` pairs in order
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }
}

/// Evaluate `f` on `points` evenly spaced abscissas from `a` to `b`
///
/// The grid is evaluated in one batch call.
///
/// # Errors
/// `InvalidCurvePoints` when `points < 2`.
///
/// # Example
/// ```
/// use riemann_anafis::{normalize, sample_curve};
///
/// let f = normalize("x^2").unwrap().function;
/// let curve = sample_curve(&f, 0.0, 2.0, 3).unwrap();
/// assert_eq!(curve.xs, vec![0.0, 1.0, 2.0]);
/// assert_eq!(curve.ys, vec![0.0, 1.0, 4.0]);
/// ```
pub fn sample_curve(
    f: &NumericFunction,
    a: f64,
    b: f64,
    points: usize,
) -> Result<Curve, RiemannError> {
    if points < 2 {
        return Err(RiemannError::InvalidCurvePoints { points });
    }

    let (xs, _) = partition::equally_spaced(a, b, points - 1);
    let ys = f.eval_batch(&xs);
    Ok(Curve { xs, ys })
}
