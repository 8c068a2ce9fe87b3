//! Parser module - converts strings to AST
mod implicit_mul;
mod lexer;
mod pratt;
mod tokens;

use crate::error::ParseError;
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Expr};

/// Parse a formula string into an expression AST
///
/// Uses the default safety limits. See [`parse_with_limits`].
///
/// # Example
/// ```
/// use riemann_anafis::parse;
///
/// let expr = parse("x**2 + sin(x)").unwrap();
/// assert_eq!(expr.to_string(), "x^2 + sin(x)");
/// ```
///
/// # Errors
/// Returns `ParseError` if:
/// - The input is empty
/// - The input contains invalid syntax or unmatched parentheses
/// - The input names a variable other than `x` or an unknown function
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    parse_with_limits(input, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES)
}

/// Parse a formula string, bounding nesting depth and node count
///
/// # Errors
/// Same as [`parse`], plus `MaxDepthExceeded` / `MaxNodesExceeded`.
pub fn parse_with_limits(
    input: &str,
    max_depth: usize,
    max_nodes: usize,
) -> Result<Expr, ParseError> {
    // Pipeline: validate -> lex -> implicit_mul -> parse (limits enforced while building)

    // Step 1: Validate input
    if input.trim().is_empty() {
        return Err(ParseError::EmptyFormula);
    }

    // Step 2: Lexing (also checks parenthesis balance)
    let tokens = lexer::lex(input)?;

    // Step 3: Insert implicit multiplication
    let tokens_with_mul = implicit_mul::insert_implicit_multiplication(tokens);

    // Step 4: Build AST
    pratt::parse_expression(&tokens_with_mul, max_depth, max_nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;

    #[test]
    fn test_empty_formula() {
        assert_eq!(parse("   ").unwrap_err(), ParseError::EmptyFormula);
    }

    #[test]
    fn test_power_notations_agree() {
        assert_eq!(parse("x**2").unwrap(), parse("x^2").unwrap());
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(parse("2x").unwrap(), parse("2*x").unwrap());
        assert_eq!(parse("3(x+1)").unwrap(), parse("3*(x+1)").unwrap());
        assert_eq!(parse("2 sin(x)").unwrap(), parse("2*sin(x)").unwrap());
        assert_eq!(parse("(x)(x)").unwrap(), parse("(x)*(x)").unwrap());
    }

    #[test]
    fn test_free_variable_rejected() {
        let err = parse("y+1").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownVariable {
                name: "y".to_string(),
                span: Some(Span::at(0)),
            }
        );
    }

    #[test]
    fn test_unknown_function() {
        let err = parse("foo(x)").unwrap_err();
        assert!(matches!(err, ParseError::UnknownFunction { ref name, .. } if name == "foo"));
    }

    #[test]
    fn test_constants_accepted() {
        assert!(parse("pi*x + e").is_ok());
        assert!(parse("E^x").is_ok());
    }

    #[test]
    fn test_node_limit() {
        assert_eq!(
            parse_with_limits("x + x + x + x", 100, 3).unwrap_err(),
            ParseError::MaxNodesExceeded
        );
    }

    #[test]
    fn test_long_flat_sum_rejected_without_overflow() {
        for terms in [20_000, 200_000] {
            let text = vec!["x"; terms].join("+");
            let err = parse(&text).unwrap_err();
            assert!(
                matches!(err, ParseError::MaxDepthExceeded | ParseError::MaxNodesExceeded),
                "{terms} terms gave {err:?}"
            );
        }
    }

    #[test]
    fn test_long_product_chain_rejected() {
        let text = vec!["x"; 50_000].join(" * ");
        assert_eq!(parse(&text).unwrap_err(), ParseError::MaxDepthExceeded);
    }

    #[test]
    fn test_unmatched_delimiters() {
        assert!(matches!(
            parse("sin(x").unwrap_err(),
            ParseError::UnmatchedParenthesis { .. }
        ));
        assert!(matches!(
            parse("x)").unwrap_err(),
            ParseError::UnmatchedParenthesis { .. }
        ));
    }
}
