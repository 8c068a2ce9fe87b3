use super::Rule;
use crate::error::{EvaluationError, RiemannError};

/// Everything computed for one Riemann sum
///
/// Arrays are indexed by subinterval; `partition` has one more entry.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResult {
    /// Rule the heights were computed with
    pub rule: Rule,
    /// `n + 1` division points, first `a`, last `b`
    pub partition: Vec<f64>,
    /// `Δx = (b - a) / n`, negative when `b < a`
    pub step: f64,
    /// Sample point per subinterval (left endpoint for Trapezoid)
    pub abscissas: Vec<f64>,
    /// Height per subinterval
    pub heights: Vec<f64>,
    /// `height * Δx` per subinterval
    pub areas: Vec<f64>,
    /// Inclusive running sum of `areas`
    pub cumulative: Vec<f64>,
    /// Last cumulative value; may be NaN or infinite
    pub total: f64,
    /// Subintervals with a non-finite height or area, plus the one where
    /// the running sum first overflows
    pub errors: Vec<EvaluationError>,
}

/// One line of the iteration table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRow {
    /// 1-based iteration number
    pub iteration: usize,
    /// Sample point of the subinterval
    pub abscissa: f64,
    /// Function value, or the averaged endpoints for Trapezoid
    pub height: f64,
    /// `height * Δx`
    pub area: f64,
    /// Running sum up to and including this row
    pub cumulative: f64,
}

impl IntegrationResult {
    /// Number of subintervals
    #[must_use]
    pub fn n(&self) -> usize {
        self.heights.len()
    }

    /// True when no subinterval was recorded in `errors`
    #[must_use]
    pub fn is_fully_defined(&self) -> bool {
        self.errors.is_empty()
    }

    /// Per-subinterval view in iteration order
    #[must_use]
    pub fn rows(&self) -> Vec<IterationRow> {
        self.abscissas
            .iter()
            .zip(&self.heights)
            .zip(&self.areas)
            .zip(&self.cumulative)
            .enumerate()
            .map(|(i, (((&abscissa, &height), &area), &cumulative))| IterationRow {
                iteration: i + 1,
                abscissa,
                height,
                area,
                cumulative,
            })
            .collect()
    }

    /// Turn the first recorded evaluation error into an `Err`
    ///
    /// # Errors
    /// `RiemannError::Evaluation` if any subinterval was recorded in `errors`.
    pub fn strict(self) -> Result<Self, RiemannError> {
        match self.errors.first() {
            Some(err) => Err(RiemannError::Evaluation(*err)),
            None => Ok(self),
        }
    }
}
