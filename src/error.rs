use thiserror::Error;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed character offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed character offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map_or(String::new(), |s| s.display())
}

fn max_suffix(max: &Option<usize>) -> String {
    max.map_or(String::new(), |m| format!(" and at most {m}"))
}

/// Errors that can occur while turning user text into an expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Formula cannot be empty")]
    EmptyFormula,

    #[error("Invalid number format: '{value}'{}", span_suffix(.span))]
    InvalidNumber { value: String, span: Option<Span> },

    #[error("Invalid token: '{token}'{}", span_suffix(.span))]
    InvalidToken { token: String, span: Option<Span> },

    #[error("Expected '{expected}', but got '{got}'{}", span_suffix(.span))]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },

    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("Unmatched parenthesis{}", span_suffix(.span))]
    UnmatchedParenthesis { span: Option<Span> },

    #[error(
        "Unknown variable '{name}'{}: only 'x' may appear free (constants: pi, e)",
        span_suffix(.span)
    )]
    UnknownVariable { name: String, span: Option<Span> },

    #[error("Unknown function '{name}'{}", span_suffix(.span))]
    UnknownFunction { name: String, span: Option<Span> },

    #[error("Function '{name}' expects {expected} argument(s), but got {got}")]
    InvalidArity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("Expression nesting depth exceeds maximum limit")]
    MaxDepthExceeded,

    #[error("Expression size exceeds maximum node count limit")]
    MaxNodesExceeded,

    #[error("Expression requires a stack depth of {depth}, limit is {limit}")]
    StackOverflow { depth: usize, limit: usize },
}

impl ParseError {
    /// Create InvalidToken without span
    pub fn invalid_token(token: impl Into<String>) -> Self {
        ParseError::InvalidToken {
            token: token.into(),
            span: None,
        }
    }

    /// Create UnexpectedToken with an optional span
    pub fn unexpected(expected: impl Into<String>, got: impl Into<String>, span: Option<Span>) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            got: got.into(),
            span,
        }
    }

    /// The location of the failure in the input, when known
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::InvalidNumber { span, .. }
            | ParseError::InvalidToken { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnmatchedParenthesis { span }
            | ParseError::UnknownVariable { span, .. }
            | ParseError::UnknownFunction { span, .. } => *span,
            _ => None,
        }
    }
}

/// A subinterval whose height, area or running sum is not a finite number
///
/// Recorded per subinterval; the entry keeps its non-finite value and the
/// rest of the computation proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Non-finite value {value} in subinterval {index} (x = {abscissa})")]
pub struct EvaluationError {
    /// Subinterval index (0-based)
    pub index: usize,
    /// Sample abscissa reported for the subinterval
    pub abscissa: f64,
    /// The first non-finite quantity of the entry: height, then area, then running sum
    pub value: f64,
}

/// Errors raised by the partition/summation stage
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiemannError {
    #[error("Subdivision count must be at least 1{}, got {n}", max_suffix(.max))]
    InvalidSubdivisionCount { n: usize, max: Option<usize> },

    #[error("A sampled curve needs at least 2 points, got {points}")]
    InvalidCurvePoints { points: usize },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// A rule name that is not one of `left`, `right`, `midpoint`, `trapezoid`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown rule '{0}', expected one of: left, right, midpoint, trapezoid")]
pub struct UnknownRuleError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(Span::at(0).display(), " at position 1");
        assert_eq!(Span::new(2, 5).display(), " at positions 3-5");
        assert_eq!(Span::default().display(), "");
    }

    #[test]
    fn test_parse_error_messages() {
        let err = ParseError::UnknownVariable {
            name: "y".to_string(),
            span: Some(Span::at(0)),
        };
        assert_eq!(
            err.to_string(),
            "Unknown variable 'y' at position 1: only 'x' may appear free (constants: pi, e)"
        );
        assert_eq!(err.span(), Some(Span::at(0)));
        assert_eq!(ParseError::EmptyFormula.to_string(), "Formula cannot be empty");
    }

    #[test]
    fn test_subdivision_message() {
        let err = RiemannError::InvalidSubdivisionCount { n: 0, max: None };
        assert_eq!(err.to_string(), "Subdivision count must be at least 1, got 0");

        let err = RiemannError::InvalidSubdivisionCount {
            n: 900,
            max: Some(500),
        };
        assert_eq!(
            err.to_string(),
            "Subdivision count must be at least 1 and at most 500, got 900"
        );
    }

    #[test]
    fn test_curve_and_evaluation_messages() {
        let err = RiemannError::InvalidCurvePoints { points: 1 };
        assert_eq!(err.to_string(), "A sampled curve needs at least 2 points, got 1");

        let err = EvaluationError {
            index: 3,
            abscissa: 0.5,
            value: f64::INFINITY,
        };
        assert_eq!(err.to_string(), "Non-finite value inf in subinterval 3 (x = 0.5)");
    }
}
