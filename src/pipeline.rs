//! End-to-end facade: formula text in, integration report out
//!
//! By default parse failures never abort a run. The formula is replaced by
//! `f(x) = 0` and the error travels back in [`Report::parse_error`].
//! [`Pipeline::strict_parsing`] turns them into `RiemannError::Parse` instead.
//!
//! # Example
//! ```
//! use riemann_anafis::{Request, Rule};
//!
//! let report = Request::new("x**2", 0.0, 5.0, 1, Rule::Right).run().unwrap();
//! assert_eq!(report.display.as_deref(), Some("x^{2}"));
//! assert_eq!(report.result.total, 125.0);
//! assert_eq!(report.curve.len(), 500);
//! ```

use crate::error::{ParseError, RiemannError};
use crate::riemann::{Curve, IntegrationResult, Integrator, Rule, sample_curve};
use crate::{DEFAULT_CURVE_POINTS, Normalizer, Recovered};

/// Inputs of one integration run
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub function_text: String,
    pub a: f64,
    pub b: f64,
    pub n: usize,
    pub rule: Rule,
}

/// Outputs of one integration run
#[derive(Debug, Clone)]
pub struct Report {
    /// LaTeX form of the parsed formula, `None` when parsing failed
    pub display: Option<String>,
    /// Recovered parse failure
    pub parse_error: Option<ParseError>,
    pub result: IntegrationResult,
    /// Function graph over `[a, b]`
    pub curve: Curve,
}

impl Request {
    pub fn new(function_text: impl Into<String>, a: f64, b: f64, n: usize, rule: Rule) -> Self {
        Self {
            function_text: function_text.into(),
            a,
            b,
            n,
            rule,
        }
    }

    /// Run with default limits and curve resolution; parse errors are recovered
    ///
    /// # Errors
    /// `InvalidSubdivisionCount` if `n == 0`.
    pub fn run(&self) -> Result<Report, RiemannError> {
        Pipeline::new().run(self)
    }
}

/// Configured runner for [`Request`]s
#[derive(Debug, Clone)]
pub struct Pipeline {
    normalizer: Normalizer,
    integrator: Integrator,
    curve_points: usize,
    strict_parsing: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::new(),
            integrator: Integrator::new(),
            curve_points: DEFAULT_CURVE_POINTS,
            strict_parsing: false,
        }
    }

    /// Parser limits
    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Subdivision limit; the request's rule overrides the integrator's
    pub fn integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    /// Number of points in [`Report::curve`], at least 2
    pub fn curve_points(mut self, points: usize) -> Self {
        self.curve_points = points;
        self
    }

    /// Fail with `RiemannError::Parse` instead of substituting `f(x) = 0`
    pub fn strict_parsing(mut self, strict: bool) -> Self {
        self.strict_parsing = strict;
        self
    }

    /// Normalize, integrate and sample the curve
    ///
    /// # Errors
    /// - `InvalidCurvePoints` if fewer than two curve points are configured
    /// - `InvalidSubdivisionCount` for a bad `n`
    /// - `Parse` for an invalid formula, only with strict parsing
    pub fn run(&self, request: &Request) -> Result<Report, RiemannError> {
        if self.curve_points < 2 {
            return Err(RiemannError::InvalidCurvePoints {
                points: self.curve_points,
            });
        }

        let recovered = if self.strict_parsing {
            Recovered::from(self.normalizer.normalize(&request.function_text)?)
        } else {
            self.normalizer.normalize_with_fallback(&request.function_text)
        };

        let result = self
            .integrator
            .clone()
            .rule(request.rule)
            .integrate(&recovered.function, request.a, request.b, request.n)?;
        let curve = sample_curve(&recovered.function, request.a, request.b, self.curve_points)?;

        Ok(Report {
            display: recovered.display,
            parse_error: recovered.error,
            result,
            curve,
        })
    }
}
