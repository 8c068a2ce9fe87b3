//! Riemann sums over an equally spaced partition
//!
//! The steps of one integration:
//!
//! 1. Partition `[a, b]` into `n` subintervals of width `Δx`
//! 2. Look up the rule's [`RuleSpec`](rule::RuleSpec), evaluate `f` once over
//!    its sample points and reduce the values to `n` heights
//! 3. `area_i = height_i * Δx`
//! 4. Inclusive prefix sum in index order; the last entry is the total
//!
//! # Example
//! ```
//! use riemann_anafis::{integrate, normalize, Rule};
//!
//! let f = normalize("x**2").unwrap().function;
//! let result = integrate(&f, 0.0, 5.0, 5, Rule::Trapezoid).unwrap();
//! assert_eq!(result.heights, vec![0.5, 2.5, 6.5, 12.5, 20.5]);
//! assert_eq!(result.total, 42.5);
//! ```

mod curve;
mod partition;
mod result;
mod rule;

pub use curve::{Curve, sample_curve};
pub use result::{IntegrationResult, IterationRow};
pub use rule::Rule;

use crate::NumericFunction;
use crate::error::{EvaluationError, RiemannError};

/// Builder for Riemann sums
///
/// # Example
/// ```
/// use riemann_anafis::{normalize, Integrator, Rule, RiemannError};
///
/// let f = normalize("x").unwrap().function;
/// let integrator = Integrator::new().rule(Rule::Midpoint).max_subdivisions(500);
///
/// assert_eq!(integrator.integrate(&f, 0.0, 2.0, 4).unwrap().total, 2.0);
/// assert!(matches!(
///     integrator.integrate(&f, 0.0, 2.0, 501),
///     Err(RiemannError::InvalidSubdivisionCount { n: 501, max: Some(500) })
/// ));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Integrator {
    rule: Rule,
    max_subdivisions: Option<usize>,
}

impl Integrator {
    /// Left rule, no upper bound on `n`
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampling rule
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    /// Reject subdivision counts above `max`
    pub fn max_subdivisions(mut self, max: usize) -> Self {
        self.max_subdivisions = Some(max);
        self
    }

    fn check_count(&self, n: usize) -> Result<(), RiemannError> {
        let too_many = self.max_subdivisions.is_some_and(|max| n > max);
        if n == 0 || too_many {
            return Err(RiemannError::InvalidSubdivisionCount {
                n,
                max: self.max_subdivisions,
            });
        }
        Ok(())
    }

    /// Compute the Riemann sum of `f` over `[a, b]` with `n` subintervals
    ///
    /// Non-finite values do not abort the computation; they are listed in
    /// [`IntegrationResult::errors`] and propagate into the sums.
    ///
    /// # Errors
    /// `InvalidSubdivisionCount` if `n == 0` or `n` exceeds the configured maximum.
    pub fn integrate(
        &self,
        f: &NumericFunction,
        a: f64,
        b: f64,
        n: usize,
    ) -> Result<IntegrationResult, RiemannError> {
        self.check_count(n)?;

        let (partition, step) = partition::equally_spaced(a, b, n);

        let spec = self.rule.spec();
        let values = f.eval_batch(&(spec.eval_points)(&partition));
        let heights = (spec.heights)(values);
        let abscissas = (spec.sample_points)(&partition);
        debug_assert_eq!(heights.len(), n);
        debug_assert_eq!(abscissas.len(), n);

        let areas: Vec<f64> = heights.iter().map(|h| h * step).collect();
        let cumulative: Vec<f64> = areas
            .iter()
            .scan(0.0, |running, area| {
                *running += area;
                Some(*running)
            })
            .collect();
        let total = cumulative.last().copied().unwrap_or(0.0);

        let errors = non_finite_entries(&abscissas, &heights, &areas, &cumulative);

        log::debug!(
            "{} sum over [{a}, {b}] with n = {n}: total = {total}, {} undefined point(s)",
            self.rule,
            errors.len()
        );

        Ok(IntegrationResult {
            rule: self.rule,
            partition,
            step,
            abscissas,
            heights,
            areas,
            cumulative,
            total,
            errors,
        })
    }
}

/// Subintervals with a non-finite height or area, or where the running sum
/// first stops being finite. A sum already poisoned by an earlier entry is
/// not reported again.
fn non_finite_entries(
    abscissas: &[f64],
    heights: &[f64],
    areas: &[f64],
    cumulative: &[f64],
) -> Vec<EvaluationError> {
    let mut errors = Vec::new();
    let mut sum_was_finite = true;
    for (index, &abscissa) in abscissas.iter().enumerate() {
        let sum = cumulative[index];
        let value = [heights[index], areas[index]]
            .into_iter()
            .chain(sum_was_finite.then_some(sum))
            .find(|v| !v.is_finite());
        sum_was_finite = sum.is_finite();

        if let Some(value) = value {
            log::trace!("non-finite value {value} at x = {abscissa} (subinterval {index})");
            errors.push(EvaluationError {
                index,
                abscissa,
                value,
            });
        }
    }
    errors
}

/// Riemann sum with no upper bound on `n`
///
/// # Errors
/// `InvalidSubdivisionCount` if `n == 0`.
pub fn integrate(
    f: &NumericFunction,
    a: f64,
    b: f64,
    n: usize,
    rule: Rule,
) -> Result<IntegrationResult, RiemannError> {
    Integrator::new().rule(rule).integrate(f, a, b, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;

    fn square() -> NumericFunction {
        normalize("x**2").unwrap().function
    }

    #[test]
    fn test_left_single_interval() {
        let result = integrate(&square(), 0.0, 5.0, 1, Rule::Left).unwrap();
        assert_eq!(result.partition, vec![0.0, 5.0]);
        assert_eq!(result.heights, vec![0.0]);
        assert_eq!(result.areas, vec![0.0]);
        assert_eq!(result.cumulative, vec![0.0]);
        assert_eq!(result.total, 0.0);
    }

    #[test]
    fn test_right_single_interval() {
        let result = integrate(&square(), 0.0, 5.0, 1, Rule::Right).unwrap();
        assert_eq!(result.heights, vec![25.0]);
        assert_eq!(result.areas, vec![125.0]);
        assert_eq!(result.total, 125.0);
    }

    #[test]
    fn test_trapezoid_five_intervals() {
        let result = integrate(&square(), 0.0, 5.0, 5, Rule::Trapezoid).unwrap();
        assert_eq!(result.step, 1.0);
        assert_eq!(result.partition, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(result.heights, vec![0.5, 2.5, 6.5, 12.5, 20.5]);
        assert_eq!(result.areas, result.heights);
        assert_eq!(result.cumulative, vec![0.5, 3.0, 9.5, 22.0, 42.5]);
        assert_eq!(result.total, 42.5);
        assert_eq!(result.abscissas, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_midpoint_abscissas() {
        let result = integrate(&square(), 0.0, 2.0, 2, Rule::Midpoint).unwrap();
        assert_eq!(result.abscissas, vec![0.5, 1.5]);
        assert_eq!(result.heights, vec![0.25, 2.25]);
    }

    #[test]
    fn test_zero_subdivisions() {
        assert_eq!(
            integrate(&square(), 0.0, 5.0, 0, Rule::Left).unwrap_err(),
            RiemannError::InvalidSubdivisionCount { n: 0, max: None }
        );
    }

    #[test]
    fn test_rows() {
        let result = integrate(&square(), 0.0, 5.0, 5, Rule::Right).unwrap();
        let rows = result.rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].iteration, 1);
        assert_eq!(rows[4].iteration, 5);
        assert_eq!(rows[2].abscissa, 3.0);
        assert_eq!(rows[2].height, 9.0);
        assert_eq!(rows[4].cumulative, result.total);
    }

    #[test]
    fn test_undefined_points_recorded() {
        let f = normalize("sqrt(x)").unwrap().function;
        let result = integrate(&f, -1.0, 1.0, 4, Rule::Left).unwrap();
        assert!(!result.is_fully_defined());
        let indices: Vec<usize> = result.errors.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert!(result.heights[2].is_finite());
        assert!(result.heights[3].is_finite());
        assert!(result.total.is_nan());

        let err = result.strict().unwrap_err();
        assert!(matches!(err, RiemannError::Evaluation(EvaluationError { index: 0, .. })));
    }

    #[test]
    fn test_strict_passes_clean_result() {
        let result = integrate(&square(), 0.0, 1.0, 10, Rule::Midpoint).unwrap();
        assert!(result.is_fully_defined());
        assert_eq!(result.clone().strict().unwrap(), result);
    }

    #[test]
    fn test_overflowing_step_recorded() {
        let one = normalize("1").unwrap().function;
        let result = integrate(&one, -1e308, 1e308, 1, Rule::Left).unwrap();
        assert_eq!(result.heights, vec![1.0]);
        assert_eq!(result.step, f64::INFINITY);
        assert!(!result.is_fully_defined());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].index, 0);
        assert_eq!(result.errors[0].value, f64::INFINITY);
    }

    #[test]
    fn test_running_sum_overflow_reported_once() {
        let big = normalize("1e308").unwrap().function;
        let result = integrate(&big, 0.0, 4.0, 4, Rule::Left).unwrap();
        assert!(result.areas.iter().all(|a| a.is_finite()));
        assert!(result.cumulative[0].is_finite());
        assert_eq!(result.cumulative[1], f64::INFINITY);
        let indices: Vec<usize> = result.errors.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1]);
        assert_eq!(result.errors[0].value, f64::INFINITY);
    }

    #[test]
    fn test_non_finite_bounds() {
        let result = integrate(&square(), 0.0, f64::INFINITY, 2, Rule::Left).unwrap();
        assert!(!result.is_fully_defined());
        assert!(!result.total.is_finite());
    }

    #[test]
    fn test_zero_function() {
        let result = integrate(&NumericFunction::zero(), -3.0, 7.0, 10, Rule::Trapezoid).unwrap();
        assert_eq!(result.total, 0.0);
        assert!(result.is_fully_defined());
    }
}
