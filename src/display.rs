//! Display implementations for expressions.
//!
//! Two output formats are provided:
//!
//! ## Standard Display (`to_string()` / `{}`)
//! Human-readable notation that parses back to the same tree shape:
//! - `x^2 + 2 * x + 1`
//! - `sin(x) + cos(x)`
//!
//! ## LaTeX Format (`to_latex()`)
//! For typesetting the normalized function:
//! - `x^{2} + 2 x + 1`
//! - `\sin\left(x\right) + \sqrt{x}`
//!
//! Negation is stored as `-1 * e` and always displays as `-e`.

use crate::functions::Registry;
use crate::known_symbols;
use crate::{Expr, ExprKind};
use std::fmt;

#[derive(Clone, Copy)]
enum FormatMode {
    Standard,
    Latex,
}

/// Format a number based on the display mode
fn format_number(f: &mut fmt::Formatter<'_>, n: f64, mode: FormatMode) -> fmt::Result {
    if n.is_nan() {
        return match mode {
            FormatMode::Standard => write!(f, "NaN"),
            FormatMode::Latex => write!(f, r"\text{{NaN}}"),
        };
    }
    if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        return match mode {
            FormatMode::Standard => write!(f, "{sign}Infinity"),
            FormatMode::Latex => write!(f, r"{sign}\infty"),
        };
    }

    #[allow(clippy::float_cmp)]
    let is_int = n.trunc() == n;
    if is_int && n.abs() < 1e10 {
        #[allow(clippy::cast_possible_truncation)]
        let n_int = n as i64;
        write!(f, "{n_int}")
    } else {
        write!(f, "{n}")
    }
}

/// Recurse in the same mode
fn recurse(f: &mut fmt::Formatter<'_>, expr: &Expr, mode: FormatMode) -> fmt::Result {
    match mode {
        FormatMode::Standard => write!(f, "{expr}"),
        FormatMode::Latex => write!(f, "{}", LatexFormatter { expr }),
    }
}

/// Recurse, wrapping the operand in parentheses when `wrap` holds
fn wrapped(f: &mut fmt::Formatter<'_>, expr: &Expr, mode: FormatMode, wrap: bool) -> fmt::Result {
    if !wrap {
        return recurse(f, expr, mode);
    }
    match mode {
        FormatMode::Standard => {
            write!(f, "(")?;
            recurse(f, expr, mode)?;
            write!(f, ")")
        }
        FormatMode::Latex => {
            write!(f, r"\left(")?;
            recurse(f, expr, mode)?;
            write!(f, r"\right)")
        }
    }
}

fn is_sum(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Add(_, _) | ExprKind::Sub(_, _))
}

/// `Some(inner)` when the expression is a negation `-1 * inner`
fn negated(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Mul(coeff, inner) if coeff.is_neg_one_num() => Some(&**inner),
        _ => None,
    }
}

/// Helper for Power base parenthesis
fn needs_parens_as_base(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Add(_, _)
        | ExprKind::Sub(_, _)
        | ExprKind::Mul(_, _)
        | ExprKind::Div(_, _)
        | ExprKind::Pow(_, _) => true,
        ExprKind::Number(n) => *n < 0.0, // (-1)^x not -1^x
        _ => false,
    }
}

fn format_symbol(f: &mut fmt::Formatter<'_>, name: &str, mode: FormatMode) -> fmt::Result {
    match mode {
        FormatMode::Latex if name == "pi" => write!(f, r"\pi"),
        FormatMode::Latex if known_symbols::is_euler(name) => write!(f, "e"),
        _ => write!(f, "{name}"),
    }
}

fn format_add(f: &mut fmt::Formatter<'_>, u: &Expr, v: &Expr, mode: FormatMode) -> fmt::Result {
    recurse(f, u, mode)?;
    // A negated right operand displays as subtraction
    if let Some(inner) = negated(v) {
        write!(f, " - ")?;
        wrapped(f, inner, mode, is_sum(inner))
    } else {
        write!(f, " + ")?;
        recurse(f, v, mode)
    }
}

fn format_sub(f: &mut fmt::Formatter<'_>, u: &Expr, v: &Expr, mode: FormatMode) -> fmt::Result {
    recurse(f, u, mode)?;
    write!(f, " - ")?;
    // Parenthesize RHS sums to preserve grouping: `a - (b + c)`
    wrapped(f, v, mode, is_sum(v))
}

fn format_mul(f: &mut fmt::Formatter<'_>, u: &Expr, v: &Expr, mode: FormatMode) -> fmt::Result {
    if u.is_neg_one_num() {
        write!(f, "-")?;
        return wrapped(f, v, mode, is_sum(v));
    }

    wrapped(f, u, mode, is_sum(u))?;
    match mode {
        FormatMode::Standard => write!(f, " * ")?,
        FormatMode::Latex => {
            // Coefficient juxtaposition: `2 x`, but `2 \cdot 3`
            let juxtapose = matches!(u.kind, ExprKind::Number(_))
                && !matches!(v.kind, ExprKind::Number(_))
                && negated(v).is_none();
            if juxtapose {
                write!(f, " ")?;
            } else {
                write!(f, r" \cdot ")?;
            }
        }
    }
    wrapped(f, v, mode, is_sum(v))
}

fn format_div(f: &mut fmt::Formatter<'_>, u: &Expr, v: &Expr, mode: FormatMode) -> fmt::Result {
    match mode {
        FormatMode::Latex => write!(
            f,
            r"\frac{{{}}}{{{}}}",
            LatexFormatter { expr: u },
            LatexFormatter { expr: v }
        ),
        FormatMode::Standard => {
            // Parenthesize numerator sums
            wrapped(f, u, mode, is_sum(u))?;
            write!(f, " / ")?;
            // Parenthesize denominator unless it is atomic
            let denom_simple = matches!(
                v.kind,
                ExprKind::Symbol(_)
                    | ExprKind::Number(_)
                    | ExprKind::Pow(_, _)
                    | ExprKind::FunctionCall { .. }
            );
            wrapped(f, v, mode, !denom_simple)
        }
    }
}

fn format_pow(f: &mut fmt::Formatter<'_>, u: &Expr, v: &Expr, mode: FormatMode) -> fmt::Result {
    let euler_base = u.as_symbol().is_some_and(known_symbols::is_euler);

    match mode {
        FormatMode::Standard => {
            // e^x displays as exp(x)
            if euler_base {
                write!(f, "exp(")?;
                recurse(f, v, mode)?;
                return write!(f, ")");
            }
            wrapped(f, u, mode, needs_parens_as_base(u))?;
            write!(f, "^")?;
            let exp_simple = matches!(v.kind, ExprKind::Symbol(_))
                || v.as_number().is_some_and(|n| n >= 0.0);
            wrapped(f, v, mode, !exp_simple)
        }
        FormatMode::Latex => {
            if euler_base {
                write!(f, "e")?;
            } else {
                wrapped(f, u, mode, needs_parens_as_base(u))?;
            }
            write!(f, "^{{{}}}", LatexFormatter { expr: v })
        }
    }
}

fn format_function_call(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    args: &[Expr],
    mode: FormatMode,
) -> fmt::Result {
    if let FormatMode::Standard = mode {
        write!(f, "{name}(")?;
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        return write!(f, ")");
    }

    // LaTeX special forms
    match (name, args) {
        ("sqrt", [arg]) => return write!(f, r"\sqrt{{{}}}", LatexFormatter { expr: arg }),
        ("cbrt", [arg]) => return write!(f, r"\sqrt[3]{{{}}}", LatexFormatter { expr: arg }),
        ("abs", [arg]) => return write!(f, r"\left|{}\right|", LatexFormatter { expr: arg }),
        ("floor", [arg]) => {
            return write!(f, r"\left\lfloor{{{}}}\right\rfloor", LatexFormatter { expr: arg });
        }
        ("ceil", [arg]) => {
            return write!(f, r"\left\lceil{{{}}}\right\rceil", LatexFormatter { expr: arg });
        }
        ("exp", [arg]) => return write!(f, "e^{{{}}}", LatexFormatter { expr: arg }),
        ("log", [arg, base]) => {
            return write!(
                f,
                r"\log_{{{}}}\left({}\right)",
                LatexFormatter { expr: base },
                LatexFormatter { expr: arg }
            );
        }
        _ => {}
    }

    match Registry::get(name).and_then(|def| def.latex) {
        Some(command) => write!(f, "{command}")?,
        None => write!(f, r"\operatorname{{{name}}}")?,
    }
    write!(f, r"\left(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", LatexFormatter { expr: arg })?;
    }
    write!(f, r"\right)")
}

fn format_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, mode: FormatMode) -> fmt::Result {
    match &expr.kind {
        ExprKind::Number(n) => format_number(f, *n, mode),
        ExprKind::Symbol(s) => format_symbol(f, s, mode),
        ExprKind::FunctionCall { name, args } => format_function_call(f, name, args, mode),
        ExprKind::Add(u, v) => format_add(f, u, v, mode),
        ExprKind::Sub(u, v) => format_sub(f, u, v, mode),
        ExprKind::Mul(u, v) => format_mul(f, u, v, mode),
        ExprKind::Div(u, v) => format_div(f, u, v, mode),
        ExprKind::Pow(u, v) => format_pow(f, u, v, mode),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_expr(f, self, FormatMode::Standard)
    }
}

/// Renders an expression as LaTeX through `Display`
pub struct LatexFormatter<'expr> {
    pub(crate) expr: &'expr Expr,
}

impl fmt::Display for LatexFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_expr(f, self.expr, FormatMode::Latex)
    }
}

impl Expr {
    /// Convert the expression to LaTeX format.
    ///
    /// Returns a string suitable for rendering in LaTeX math environments.
    #[must_use]
    pub fn to_latex(&self) -> String {
        LatexFormatter { expr: self }.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn show(input: &str) -> String {
        parse(input).unwrap().to_string()
    }

    fn latex(input: &str) -> String {
        parse(input).unwrap().to_latex()
    }

    #[test]
    fn test_display_number() {
        assert_eq!(Expr::number(3.0).to_string(), "3");
        assert!(Expr::number(314.0 / 100.0).to_string().starts_with("3.14"));
        assert_eq!(Expr::number(f64::NAN).to_string(), "NaN");
        assert_eq!(Expr::number(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_display_basic() {
        assert_eq!(show("x**2"), "x^2");
        assert_eq!(show("x + 1"), "x + 1");
        assert_eq!(show("2x"), "2 * x");
        assert_eq!(show("sin(x)"), "sin(x)");
        assert_eq!(show("log(x, 2)"), "log(x, 2)");
    }

    #[test]
    fn test_display_negative_term() {
        assert_eq!(show("-x"), "-x");
        assert_eq!(show("-sin(x)"), "-sin(x)");
        assert_eq!(show("-x^2"), "-x^2");
        assert_eq!(show("(-x)^2"), "(-x)^2");
        assert_eq!(show("x + -x"), "x - x");
    }

    #[test]
    fn test_display_fraction_parens() {
        assert_eq!(show("1 / x"), "1 / x");
        assert_eq!(show("1 / x^2"), "1 / x^2");
        assert_eq!(show("1 / sin(x)"), "1 / sin(x)");
        assert_eq!(show("1 / (2 * x)"), "1 / (2 * x)");
        assert_eq!(show("(x + 1) / (x - 1)"), "(x + 1) / (x - 1)");
    }

    #[test]
    fn test_display_exp() {
        assert_eq!(show("e^x"), "exp(x)");
        assert_eq!(show("x^(x + 1)"), "x^(x + 1)");
    }

    #[test]
    fn test_display_reparses_to_same_tree() {
        for input in ["x^2 - (x + 1)", "-x^2 + 3", "(x + 1) * (x - 1)", "2^x^2", "x / (x * x)"] {
            let expr = parse(input).unwrap();
            let again = parse(&expr.to_string()).unwrap();
            assert_eq!(expr, again, "round trip failed for {input}");
        }
    }

    #[test]
    fn test_latex_forms() {
        assert_eq!(latex("x**2"), "x^{2}");
        assert_eq!(latex("2x"), "2 x");
        assert_eq!(latex("sqrt(x)"), r"\sqrt{x}");
        assert_eq!(latex("abs(x)"), r"\left|x\right|");
        assert_eq!(latex("sin(x)"), r"\sin\left(x\right)");
        assert_eq!(latex("exp(x)"), "e^{x}");
        assert_eq!(latex("e^x"), "e^{x}");
        assert_eq!(latex("pi*x"), r"\pi \cdot x");
        assert_eq!(latex("1/x"), r"\frac{1}{x}");
        assert_eq!(latex("log(x, 2)"), r"\log_{2}\left(x\right)");
        assert_eq!(latex("(x+1)^2"), r"\left(x + 1\right)^{2}");
        assert_eq!(latex("-x^2"), "-x^{2}");
    }
}
