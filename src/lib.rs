//! Riemann-sum integration of single-variable formulas
//!
//! A formula over `x` is parsed with a whitelisted grammar, compiled once to
//! bytecode and evaluated in SIMD batches. The Riemann stage partitions
//! `[a, b]`, samples heights under one of four rules and reports the
//! per-subinterval areas, their running sum and the total.
//!
//! # Features
//! - Pratt parser with implicit multiplication (`2x`, `3(x+1)`) and `**` or `^` powers
//! - Left, Right, Midpoint and Trapezoid rules dispatched through a rule table
//! - One vectorized evaluation per integration (`wide::f64x4`, optional rayon)
//! - Undefined points are recorded, not fatal
//! - Plain and LaTeX display of the normalized formula
//!
//! # Usage Examples
//!
//! ## Step by step
//! ```
//! use riemann_anafis::{integrate, normalize, Rule};
//!
//! let normalized = normalize("x**2").unwrap();
//! let result = integrate(&normalized.function, 0.0, 5.0, 5, Rule::Trapezoid).unwrap();
//! assert_eq!(result.total, 42.5);
//! assert_eq!(result.cumulative.last(), Some(&42.5));
//! ```
//!
//! ## Whole pipeline
//! ```
//! use riemann_anafis::{Request, Rule};
//!
//! let report = Request::new("y + 1", 0.0, 5.0, 10, Rule::Left).run().unwrap();
//! assert!(report.parse_error.is_some());
//! assert_eq!(report.result.total, 0.0);
//! ```

mod ast;
mod display;
mod error;
mod evaluator;
mod functions;
mod known_symbols;
mod normalize;
mod parser;
mod pipeline;
mod riemann;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::{Expr, ExprKind};
pub use display::LatexFormatter;
pub use error::{EvaluationError, ParseError, RiemannError, Span, UnknownRuleError};
pub use evaluator::{CompiledEvaluator, MAX_STACK_DEPTH};
pub use known_symbols::VARIABLE;
pub use normalize::{Normalized, Normalizer, NumericFunction, Recovered, normalize, normalize_or_zero};
pub use parser::{parse, parse_with_limits};
pub use pipeline::{Pipeline, Report, Request};
pub use riemann::{
    Curve, IntegrationResult, Integrator, IterationRow, Rule, integrate, sample_curve,
};

/// Default maximum AST depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum AST node count
pub const DEFAULT_MAX_NODES: usize = 10_000;
/// Default number of points in a sampled curve
pub const DEFAULT_CURVE_POINTS: usize = 500;
