use crate::error::{ParseError, Span};
use crate::functions::Registry;
use crate::known_symbols;
use crate::parser::tokens::{Lexeme, Operator, Token};
use crate::Expr;

/// Parse tokens into an AST using Pratt parsing algorithm
///
/// `max_depth` bounds both the recursion and the depth of the tree being
/// built; `max_nodes` bounds its size. Both are enforced as each node is
/// created, so an oversized tree is never materialized.
pub(crate) fn parse_expression(
    tokens: &[Lexeme],
    max_depth: usize,
    max_nodes: usize,
) -> Result<Expr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::UnexpectedEndOfInput);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
        nodes: 0,
        max_nodes,
    };

    let node = parser.parse_expr(0)?;

    // Everything must be consumed
    if let Some(lexeme) = parser.current() {
        return Err(ParseError::unexpected(
            "end of input",
            lexeme.token.to_user_string(),
            Some(lexeme.span),
        ));
    }

    Ok(node.expr)
}

/// An expression together with the depth of its tree
struct Node {
    expr: Expr,
    depth: usize,
}

struct Parser<'a> {
    tokens: &'a [Lexeme],
    pos: usize,
    /// Current recursion depth
    depth: usize,
    max_depth: usize,
    /// Nodes created so far
    nodes: usize,
    max_nodes: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Lexeme> {
        self.tokens.get(self.pos)
    }

    fn current_token(&self) -> Option<&'a Token> {
        self.current().map(|l| &l.token)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Account for `added` new nodes forming a tree of `depth`
    fn track(&mut self, expr: Expr, depth: usize, added: usize) -> Result<Node, ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::MaxDepthExceeded);
        }
        self.nodes += added;
        if self.nodes > self.max_nodes {
            return Err(ParseError::MaxNodesExceeded);
        }
        Ok(Node { expr, depth })
    }

    fn leaf(&mut self, expr: Expr) -> Result<Node, ParseError> {
        self.track(expr, 1, 1)
    }

    /// Build an "expected X" error for the current position
    fn expected(&self, what: &str) -> ParseError {
        match self.current() {
            Some(lexeme) => {
                ParseError::unexpected(what, lexeme.token.to_user_string(), Some(lexeme.span))
            }
            None => ParseError::UnexpectedEndOfInput,
        }
    }

    fn expect_right_paren(&mut self) -> Result<(), ParseError> {
        if let Some(Token::RightParen) = self.current_token() {
            self.advance(); // consume )
            Ok(())
        } else {
            Err(self.expected(")"))
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Node, ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::MaxDepthExceeded);
        }

        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(Token::Operator(op)) = self.current_token() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, *op, precedence)?;
        }

        self.depth -= 1;
        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut args = Vec::new();

        if let Some(Token::RightParen) = self.current_token() {
            return Ok(args); // Empty argument list
        }

        loop {
            args.push(self.parse_expr(0)?);

            match self.current_token() {
                Some(Token::Comma) => {
                    self.advance(); // consume ,
                }
                Some(Token::RightParen) => {
                    break;
                }
                _ => return Err(self.expected(", or )")),
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Node, ParseError> {
        let lexeme = self.current().ok_or(ParseError::UnexpectedEndOfInput)?;

        match &lexeme.token {
            Token::Number(n) => {
                self.advance();
                self.leaf(Expr::number(*n))
            }

            Token::Identifier(name) => {
                self.advance();

                // An unknown name used like a call is an unknown function
                if let Some(Token::LeftParen) = self.current_token() {
                    return Err(ParseError::UnknownFunction {
                        name: name.clone(),
                        span: Some(lexeme.span),
                    });
                }

                let symbol = resolve_identifier(name, lexeme.span)?;
                self.leaf(symbol)
            }

            Token::Function(name) => {
                self.advance();

                // Function must be followed by (
                if let Some(Token::LeftParen) = self.current_token() {
                    self.advance(); // consume (
                    let args = self.parse_arguments()?;
                    self.expect_right_paren()?;

                    let def = Registry::get(name).ok_or_else(|| ParseError::UnknownFunction {
                        name: (*name).to_string(),
                        span: Some(lexeme.span),
                    })?;
                    if !def.validate_arity(args.len()) {
                        return Err(ParseError::InvalidArity {
                            name: (*name).to_string(),
                            expected: def.arity_text(),
                            got: args.len(),
                        });
                    }

                    let depth = 1 + args.iter().map(|a| a.depth).max().unwrap_or(0);
                    let args = args.into_iter().map(|a| a.expr).collect();
                    self.track(Expr::func_multi(*name, args), depth, 1)
                } else {
                    Err(self.expected("("))
                }
            }

            // Unary minus: precedence between Mul (20) and Pow (30)
            // This ensures -x^2 parses as -(x^2), not (-x)^2
            Token::Operator(Operator::Sub) => {
                self.advance();
                let inner = self.parse_expr(25)?;
                // Stored as Mul(-1, inner): two new nodes
                self.track(Expr::neg(inner.expr), inner.depth + 1, 2)
            }

            // Unary plus: same precedence as unary minus, just returns the expression
            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(25)
            }

            Token::LeftParen => {
                self.advance(); // consume (
                if let Some(Token::RightParen) = self.current_token() {
                    return Err(self.expected("expression"));
                }
                let inner = self.parse_expr(0)?;
                self.expect_right_paren()?;
                Ok(inner)
            }

            other => Err(ParseError::InvalidToken {
                token: other.to_user_string(),
                span: Some(lexeme.span),
            }),
        }
    }

    fn parse_infix(&mut self, left: Node, op: Operator, precedence: u8) -> Result<Node, ParseError> {
        self.advance();

        // Right associative for power, left for others
        let next_precedence = if matches!(op, Operator::Pow) {
            precedence
        } else {
            precedence + 1
        };

        let right = self.parse_expr(next_precedence)?;
        let depth = 1 + left.depth.max(right.depth);
        let (l, r) = (left.expr, right.expr);

        let expr = match op {
            Operator::Add => Expr::add_expr(l, r),
            Operator::Sub => Expr::sub_expr(l, r),
            Operator::Mul => Expr::mul_expr(l, r),
            Operator::Div => Expr::div_expr(l, r),
            Operator::Pow => Expr::pow(l, r),
        };
        self.track(expr, depth, 1)
    }
}

/// Accept only the integration variable and named constants
fn resolve_identifier(name: &str, span: Span) -> Result<Expr, ParseError> {
    if name == known_symbols::VARIABLE || known_symbols::constant_value(name).is_some() {
        Ok(Expr::symbol(name))
    } else {
        Err(ParseError::UnknownVariable {
            name: name.to_string(),
            span: Some(span),
        })
    }
}
