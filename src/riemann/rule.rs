//! Sampling rules and their dispatch table

use super::partition;
use crate::error::UnknownRuleError;
use std::fmt;
use std::str::FromStr;

/// Which point(s) of each subinterval set its height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rule {
    /// `f(x_i)`
    #[default]
    Left,
    /// `f(x_{i+1})`
    Right,
    /// `f((x_i + x_{i+1}) / 2)`
    Midpoint,
    /// `(f(x_i) + f(x_{i+1})) / 2`
    Trapezoid,
}

impl Rule {
    /// Every rule, in table order
    pub const ALL: [Rule; 4] = [Rule::Left, Rule::Right, Rule::Midpoint, Rule::Trapezoid];

    /// Lowercase name, as accepted by `FromStr`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Rule::Left => "left",
            Rule::Right => "right",
            Rule::Midpoint => "midpoint",
            Rule::Trapezoid => "trapezoid",
        }
    }

    pub(crate) fn spec(self) -> &'static RuleSpec {
        &RULE_TABLE[self as usize]
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rule::Left => "Left",
            Rule::Right => "Right",
            Rule::Midpoint => "Midpoint",
            Rule::Trapezoid => "Trapezoid",
        };
        f.write_str(label)
    }
}

impl FromStr for Rule {
    type Err = UnknownRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Rule::ALL
            .into_iter()
            .find(|rule| rule.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRuleError(s.to_string()))
    }
}

/// Per-rule sampling behaviour
///
/// All three functions receive the full partition (`n + 1` points).
pub(crate) struct RuleSpec {
    /// Points handed to the batch evaluator in a single call
    pub eval_points: fn(&[f64]) -> Vec<f64>,
    /// Collapse the batch values to `n` heights
    pub heights: fn(Vec<f64>) -> Vec<f64>,
    /// Sample abscissa reported per subinterval
    pub sample_points: fn(&[f64]) -> Vec<f64>,
}

/// Indexed by `Rule as usize`
static RULE_TABLE: [RuleSpec; 4] = [
    // Left
    RuleSpec {
        eval_points: partition::left_endpoints,
        heights: identity,
        sample_points: partition::left_endpoints,
    },
    // Right
    RuleSpec {
        eval_points: partition::right_endpoints,
        heights: identity,
        sample_points: partition::right_endpoints,
    },
    // Midpoint
    RuleSpec {
        eval_points: partition::midpoints,
        heights: identity,
        sample_points: partition::midpoints,
    },
    // Trapezoid: all n + 1 nodes in one batch, averaged pairwise
    RuleSpec {
        eval_points: partition::all_nodes,
        heights: pairwise_mean,
        sample_points: partition::left_endpoints,
    },
];

fn identity(values: Vec<f64>) -> Vec<f64> {
    values
}

fn pairwise_mean(values: Vec<f64>) -> Vec<f64> {
    values.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}
