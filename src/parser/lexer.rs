//! Lexer: splits the input into spanned tokens and checks delimiter balance

use super::tokens::{Lexeme, Operator, Token};
use crate::error::{ParseError, Span};
use crate::functions::Registry;

/// Convert the input into tokens
///
/// Accepts both `^` and `**` for exponentiation. Unbalanced parentheses are
/// reported here so the parser only sees well-nested input.
pub(crate) fn lex(input: &str) -> Result<Vec<Lexeme>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut open_parens: Vec<usize> = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && chars.get(pos + 1).is_some_and(char::is_ascii_digit)) {
            let (lexeme, next) = lex_number(&chars, pos)?;
            tokens.push(lexeme);
            pos = next;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                pos += 1;
            }
            let name: String = chars[start..pos].iter().collect();
            let token = match Registry::get(&name) {
                Some(def) => Token::Function(def.name),
                None => Token::Identifier(name),
            };
            tokens.push(Lexeme::new(token, Span::new(start, pos)));
            continue;
        }

        let (token, width) = match c {
            '+' => (Token::Operator(Operator::Add), 1),
            '-' => (Token::Operator(Operator::Sub), 1),
            '*' if chars.get(pos + 1) == Some(&'*') => (Token::Operator(Operator::Pow), 2),
            '*' => (Token::Operator(Operator::Mul), 1),
            '/' => (Token::Operator(Operator::Div), 1),
            '^' => (Token::Operator(Operator::Pow), 1),
            ',' => (Token::Comma, 1),
            '(' => {
                open_parens.push(pos);
                (Token::LeftParen, 1)
            }
            ')' => {
                if open_parens.pop().is_none() {
                    return Err(ParseError::UnmatchedParenthesis {
                        span: Some(Span::at(pos)),
                    });
                }
                (Token::RightParen, 1)
            }
            other => {
                return Err(ParseError::InvalidToken {
                    token: other.to_string(),
                    span: Some(Span::at(pos)),
                });
            }
        };

        tokens.push(Lexeme::new(token, Span::new(pos, pos + width)));
        pos += width;
    }

    if let Some(&unclosed) = open_parens.last() {
        return Err(ParseError::UnmatchedParenthesis {
            span: Some(Span::at(unclosed)),
        });
    }

    Ok(tokens)
}

/// Lex a numeric literal starting at `start`
///
/// Grammar: `digits [. digits] [(e|E) [+|-] digits]`. The exponent marker is
/// only consumed when digits follow, so `2e` stays `2 * e`.
fn lex_number(chars: &[char], start: usize) -> Result<(Lexeme, usize), ParseError> {
    let mut pos = start;
    let mut dots = 0;

    while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
        if chars[pos] == '.' {
            dots += 1;
        }
        pos += 1;
    }

    if pos < chars.len() && matches!(chars[pos], 'e' | 'E') {
        let mut lookahead = pos + 1;
        if lookahead < chars.len() && matches!(chars[lookahead], '+' | '-') {
            lookahead += 1;
        }
        if lookahead < chars.len() && chars[lookahead].is_ascii_digit() {
            pos = lookahead;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }

    let text: String = chars[start..pos].iter().collect();
    let span = Span::new(start, pos);

    if dots > 1 {
        return Err(ParseError::InvalidNumber {
            value: text,
            span: Some(span),
        });
    }

    match text.parse::<f64>() {
        Ok(value) => Ok((Lexeme::new(Token::Number(value), span), pos)),
        Err(_) => Err(ParseError::InvalidNumber {
            value: text,
            span: Some(span),
        }),
    }
}
