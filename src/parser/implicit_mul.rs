//! Implicit multiplication insertion for natural notation
//!
//! Inserts `*` operators between tokens where multiplication is implied, e.g. `2x` → `2 * x`.

use crate::error::Span;
use crate::known_symbols;
use crate::parser::tokens::{Lexeme, Operator, Token};

/// Identifiers that denote a value (the variable or a constant)
fn is_value_name(name: &str) -> bool {
    name == known_symbols::VARIABLE || known_symbols::constant_value(name).is_some()
}

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    match (current, next) {
        // Number * Function: 4 sin(x) → 4 * sin(x)
        // Identifier * Function: x sin(x) → x * sin(x)
        // ) * Function: (a) sin(x) → (a) * sin(x)
        (Token::Number(_) | Token::Identifier(_) | Token::RightParen, Token::Function(_)) => true,

        // Identifier * (: only for values, so `foo(x)` is reported as an unknown function
        (Token::Identifier(name), Token::LeftParen) => is_value_name(name),

        // Number * Identifier: 2x
        // Number * (: 2(x)
        // Identifier * Identifier: pi x
        // Identifier * Number: x 2
        // ) * Identifier: )x
        // ) * Number: )2
        // ) * (: )(
        (Token::Number(_) | Token::Identifier(_) | Token::RightParen, Token::Identifier(_))
        | (Token::Number(_) | Token::RightParen, Token::LeftParen)
        | (Token::Identifier(_) | Token::RightParen, Token::Number(_)) => true,

        // Function followed by ( is a call, not a product
        _ => false,
    }
}

/// Insert implicit multiplication operators between appropriate tokens
///
/// Rules:
/// - Number * Identifier: `2 x` → `2 * x`
/// - Identifier * Identifier: `pi x` → `pi * x`
/// - Identifier/Number/) * Function: `x sin(x)` → `x * sin(x)`
/// - ) * Identifier/Number/(: `(a) x` → `(a) * x`
/// - Value/Number * (: `x (y)` → `x * (y)`
///
/// Exception: Function followed by ( is NOT multiplication
pub(crate) fn insert_implicit_multiplication(tokens: Vec<Lexeme>) -> Vec<Lexeme> {
    if tokens.is_empty() {
        return tokens;
    }

    // Check if any insertion is needed before allocating new vector
    let needs_insertion = tokens
        .windows(2)
        .any(|w| should_insert_mul(&w[0].token, &w[1].token));

    if !needs_insertion {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();

    while let Some(current) = it.next() {
        let inserted_at = it
            .peek()
            .filter(|next| should_insert_mul(&current.token, &next.token))
            .map(|next| next.span.start);

        result.push(current);
        if let Some(pos) = inserted_at {
            result.push(Lexeme::new(
                Token::Operator(Operator::Mul),
                Span::new(pos, pos),
            ));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexemes(tokens: Vec<Token>) -> Vec<Lexeme> {
        tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| Lexeme::new(t, Span::at(i)))
            .collect()
    }

    fn run(tokens: Vec<Token>) -> Vec<Token> {
        insert_implicit_multiplication(lexemes(tokens))
            .into_iter()
            .map(|l| l.token)
            .collect()
    }

    #[test]
    fn test_number_identifier() {
        let result = run(vec![Token::Number(2.0), Token::Identifier("x".into())]);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_identifier_identifier() {
        let result = run(vec![
            Token::Identifier("pi".into()),
            Token::Identifier("x".into()),
        ]);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_paren_identifier() {
        let result = run(vec![Token::RightParen, Token::Identifier("x".into())]);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_function_no_multiplication() {
        let result = run(vec![Token::Function("sin"), Token::LeftParen]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_number_function() {
        let result = run(vec![Token::Number(4.0), Token::Function("sin")]);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_variable_paren() {
        let result = run(vec![Token::Identifier("x".into()), Token::LeftParen]);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_unknown_name_paren_left_alone() {
        let result = run(vec![Token::Identifier("foo".into()), Token::LeftParen]);
        assert_eq!(result.len(), 2);
    }
}
