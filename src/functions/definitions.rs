//! Built-in function definitions for the function registry
//!
//! Every kernel is the `std` implementation so that the scalar and batch
//! evaluation paths produce identical bits.

use super::registry::FunctionDefinition;

fn unary(name: &'static str, f: fn(f64) -> f64, latex: Option<&'static str>) -> FunctionDefinition {
    FunctionDefinition {
        name,
        unary: Some(f),
        binary: None,
        latex,
    }
}

/// `log(x, base)`
fn log_base(x: f64, base: f64) -> f64 {
    x.ln() / base.ln()
}

/// Sign with `sign(0) == 0`, NaN passes through
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric
        unary("sin", f64::sin, Some(r"\sin")),
        unary("cos", f64::cos, Some(r"\cos")),
        unary("tan", f64::tan, Some(r"\tan")),
        // Inverse trigonometric
        unary("asin", f64::asin, Some(r"\operatorname{asin}")),
        unary("acos", f64::acos, Some(r"\operatorname{acos}")),
        unary("atan", f64::atan, Some(r"\operatorname{atan}")),
        // Hyperbolic
        unary("sinh", f64::sinh, Some(r"\sinh")),
        unary("cosh", f64::cosh, Some(r"\cosh")),
        unary("tanh", f64::tanh, Some(r"\tanh")),
        // Exponential / log
        unary("exp", f64::exp, None),
        FunctionDefinition {
            name: "log",
            unary: Some(f64::ln),
            binary: Some(log_base),
            latex: Some(r"\log"),
        },
        unary("ln", f64::ln, Some(r"\ln")),
        // Roots
        unary("sqrt", f64::sqrt, None),
        unary("cbrt", f64::cbrt, None),
        // Piecewise
        unary("abs", f64::abs, None),
        unary("floor", f64::floor, None),
        unary("ceil", f64::ceil, None),
        unary("sign", sign, Some(r"\operatorname{sign}")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_at_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(2.5), 1.0);
        assert!(sign(f64::NAN).is_nan());
    }

    #[test]
    fn test_names_unique() {
        let defs = all_definitions();
        for (i, a) in defs.iter().enumerate() {
            assert!(
                defs[i + 1..].iter().all(|b| b.name != a.name),
                "duplicate definition for {}",
                a.name
            );
        }
    }

    #[test]
    fn test_log_base() {
        assert!((log_base(100.0, 10.0) - 2.0).abs() < 1e-12);
        assert!(log_base(-1.0, 10.0).is_nan());
    }
}
