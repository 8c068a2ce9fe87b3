//! Text → callable normalization
//!
//! Parses a formula, compiles it to bytecode and renders its display form.
//!
//! # Example
//! ```
//! use riemann_anafis::normalize;
//!
//! let normalized = normalize("x**2 + 1").unwrap();
//! assert_eq!(normalized.function.eval(3.0), 10.0);
//! assert_eq!(normalized.display, "x^{2} + 1");
//! assert_eq!(normalized.plain(), "x^2 + 1");
//! ```

use crate::error::ParseError;
use crate::evaluator::CompiledEvaluator;
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Expr, parser};
use std::sync::Arc;

/// A numeric function of `x`, safe to share across threads
///
/// Either a compiled bytecode program or the constant zero function used
/// when a formula cannot be parsed.
#[derive(Clone, Debug)]
pub struct NumericFunction {
    kind: FunctionKind,
}

#[derive(Clone, Debug)]
enum FunctionKind {
    Compiled(Arc<CompiledEvaluator>),
    Zero,
}

impl NumericFunction {
    /// The degenerate function `f(x) = 0`
    #[must_use]
    pub fn zero() -> Self {
        Self {
            kind: FunctionKind::Zero,
        }
    }

    /// Wrap a compiled program
    #[must_use]
    pub fn from_evaluator(evaluator: CompiledEvaluator) -> Self {
        Self {
            kind: FunctionKind::Compiled(Arc::new(evaluator)),
        }
    }

    /// True for the zero fallback
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self.kind, FunctionKind::Zero)
    }

    /// Evaluate at a single point
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        match &self.kind {
            FunctionKind::Compiled(evaluator) => evaluator.evaluate(x),
            FunctionKind::Zero => 0.0,
        }
    }

    /// Evaluate at every point of `xs` in one call, preserving order
    ///
    /// With the `parallel` feature large inputs are spread over the rayon pool.
    #[must_use]
    pub fn eval_batch(&self, xs: &[f64]) -> Vec<f64> {
        match &self.kind {
            #[cfg(feature = "parallel")]
            FunctionKind::Compiled(evaluator) => evaluator.eval_batch_parallel(xs),
            #[cfg(not(feature = "parallel"))]
            FunctionKind::Compiled(evaluator) => evaluator.eval_batch(xs),
            FunctionKind::Zero => vec![0.0; xs.len()],
        }
    }
}

/// A parsed formula together with its callable and display form
#[derive(Clone, Debug)]
pub struct Normalized {
    /// Parsed expression tree
    pub expr: Expr,
    /// Compiled callable
    pub function: NumericFunction,
    /// LaTeX rendering
    pub display: String,
}

impl Normalized {
    /// Standard textual rendering, e.g. `x^2 + sin(x)`
    #[must_use]
    pub fn plain(&self) -> String {
        self.expr.to_string()
    }
}

/// Result of a normalization that never fails
#[derive(Clone, Debug)]
pub struct Recovered {
    /// The compiled formula, or `f(x) = 0` on failure
    pub function: NumericFunction,
    /// LaTeX rendering, `None` when the formula was replaced
    pub display: Option<String>,
    /// Why the formula was replaced
    pub error: Option<ParseError>,
}

/// Builder for normalization with custom safety limits
///
/// # Example
/// ```
/// use riemann_anafis::Normalizer;
///
/// let normalizer = Normalizer::new().max_depth(10).max_nodes(50);
/// assert!(normalizer.normalize("sin(x) / x").is_ok());
/// let long_sum = vec!["x"; 60].join(" + ");
/// assert!(normalizer.normalize(&long_sum).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Normalizer {
    max_depth: usize,
    max_nodes: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Normalized> for Recovered {
    fn from(normalized: Normalized) -> Self {
        Self {
            function: normalized.function,
            display: Some(normalized.display),
            error: None,
        }
    }
}

impl Normalizer {
    /// Create a normalizer with the default limits
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }

    /// Set maximum AST depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set maximum AST node count
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Parse, compile and render a formula
    ///
    /// # Errors
    /// Any `ParseError` from parsing or compilation.
    pub fn normalize(&self, text: &str) -> Result<Normalized, ParseError> {
        let expr = parser::parse_with_limits(text, self.max_depth, self.max_nodes)?;
        let evaluator = CompiledEvaluator::compile(&expr)?;
        log::debug!(
            "normalized {text:?} -> {expr} ({} nodes, depth {}, {} instructions, stack {})",
            expr.node_count(),
            expr.max_depth(),
            evaluator.instruction_count(),
            evaluator.stack_size()
        );

        let display = expr.to_latex();
        Ok(Normalized {
            expr,
            function: NumericFunction::from_evaluator(evaluator),
            display,
        })
    }

    /// Normalize, falling back to the zero function on failure
    ///
    /// The failure is logged at `warn` level and handed back in
    /// [`Recovered::error`]; the display form is kept on success.
    pub fn normalize_with_fallback(&self, text: &str) -> Recovered {
        match self.normalize(text) {
            Ok(normalized) => normalized.into(),
            Err(err) => {
                log::warn!("could not parse {text:?}: {err}; using f(x) = 0");
                Recovered {
                    function: NumericFunction::zero(),
                    display: None,
                    error: Some(err),
                }
            }
        }
    }

    /// [`normalize_with_fallback`](Self::normalize_with_fallback) without the display form
    pub fn normalize_or_zero(&self, text: &str) -> (NumericFunction, Option<ParseError>) {
        let recovered = self.normalize_with_fallback(text);
        (recovered.function, recovered.error)
    }
}

/// Normalize a formula with the default limits
///
/// # Errors
/// See [`Normalizer::normalize`].
pub fn normalize(text: &str) -> Result<Normalized, ParseError> {
    Normalizer::new().normalize(text)
}

/// Normalize with the default limits, substituting `f(x) = 0` on failure
///
/// # Example
/// ```
/// use riemann_anafis::normalize_or_zero;
///
/// let (function, error) = normalize_or_zero("y+1");
/// assert!(error.is_some());
/// assert_eq!(function.eval(4.0), 0.0);
/// ```
pub fn normalize_or_zero(text: &str) -> (NumericFunction, Option<ParseError>) {
    Normalizer::new().normalize_or_zero(text)
}
