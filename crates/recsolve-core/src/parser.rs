//! Parsing of recurrence expressions and input files
//!
//! The expression grammar covers what the input files use: rationals,
//! decimals, `n`, `s(n-j)`, the four arithmetic operators, `^`, unary minus,
//! and parentheses. Input files wrap one recurrence equation and its initial
//! conditions in Maple-style framing handled by [`input`].

pub mod input;
pub mod lexer;

use crate::core::{Expression, Number};
use crate::error::{SolveError, SolveResult};
use crate::simplify::Simplify;
use lexer::{tokenize, Token};

/// Recursive-descent parser for the recurrence expression grammar
pub struct ExpressionParser {
    tokens: Vec<Token>,
    position: usize,
}

/// Parse a single expression from text
///
/// # Examples
///
/// ```rust
/// use recsolve_core::parser::parse_expression;
///
/// let expr = parse_expression("2*s(n-1) + 2^n + 1").unwrap();
/// assert!(expr.mentions_rec_call());
/// ```
pub fn parse_expression(text: &str) -> SolveResult<Expression> {
    let mut parser = ExpressionParser::new(tokenize(text)?);
    let expr = parser.parse_sum()?;
    parser.expect_end()?;
    Ok(expr)
}

impl ExpressionParser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> SolveResult<()> {
        match self.advance() {
            Some(ref token) if token == expected => Ok(()),
            other => Err(SolveError::ParseConstraintViolated {
                construct: format!("expected {:?}, found {:?}", expected, other),
            }),
        }
    }

    fn expect_end(&mut self) -> SolveResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(SolveError::ParseConstraintViolated {
                construct: format!("trailing input at {:?}", token),
            }),
        }
    }

    /// sum := product (('+' | '-') product)*
    fn parse_sum(&mut self) -> SolveResult<Expression> {
        let mut terms = vec![self.parse_product()?];
        while let Some(token) = self.peek() {
            match token {
                Token::Plus => {
                    self.advance();
                    terms.push(self.parse_product()?);
                }
                Token::Minus => {
                    self.advance();
                    terms.push(Expression::neg(self.parse_product()?));
                }
                _ => break,
            }
        }
        Ok(if terms.len() == 1 {
            terms.into_iter().next().expect("single term")
        } else {
            Expression::add(terms)
        })
    }

    /// product := unary (('*' | '/') unary)*
    fn parse_product(&mut self) -> SolveResult<Expression> {
        let mut factors = vec![self.parse_unary()?];
        while let Some(token) = self.peek() {
            match token {
                Token::Star => {
                    self.advance();
                    factors.push(self.parse_unary()?);
                }
                Token::Slash => {
                    self.advance();
                    let divisor = self.parse_unary()?;
                    factors.push(Expression::pow(divisor, Expression::integer(-1)));
                }
                _ => break,
            }
        }
        Ok(if factors.len() == 1 {
            factors.into_iter().next().expect("single factor")
        } else {
            Expression::mul(factors)
        })
    }

    /// unary := '-' unary | power
    fn parse_unary(&mut self) -> SolveResult<Expression> {
        if self.peek() == Some(&Token::Minus) {
            self.advance();
            return Ok(Expression::neg(self.parse_unary()?));
        }
        self.parse_power()
    }

    /// power := atom ('^' unary)?   (right-associative)
    fn parse_power(&mut self) -> SolveResult<Expression> {
        let base = self.parse_atom()?;
        if self.peek() == Some(&Token::Caret) {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(Expression::pow(base, exponent));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> SolveResult<Expression> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expression::rational(value)),
            Some(Token::LParen) => {
                let inner = self.parse_sum()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "n" => Ok(Expression::n()),
                "s" => self.parse_rec_call(),
                other => Err(SolveError::ParseConstraintViolated {
                    construct: format!("unknown identifier \"{}\"", other),
                }),
            },
            other => Err(SolveError::ParseConstraintViolated {
                construct: format!("unexpected token {:?}", other),
            }),
        }
    }

    /// `s(n)` or `s(n - j)` with a positive integer offset
    fn parse_rec_call(&mut self) -> SolveResult<Expression> {
        self.expect(&Token::LParen)?;
        let argument = self.parse_sum()?;
        self.expect(&Token::RParen)?;
        rec_call_offset(&argument).map(Expression::rec_call).ok_or(
            SolveError::ParseConstraintViolated {
                construct: format!("s({})", argument),
            },
        )
    }
}

/// Match a recurrence-call argument of the form `n` or `n - j`
fn rec_call_offset(argument: &Expression) -> Option<u32> {
    match argument.simplify() {
        Expression::Symbol(sym) if sym.is_domain_variable() => Some(0),
        Expression::Add(terms) if terms.len() == 2 => {
            let mut offset = None;
            let mut saw_domain = false;
            for term in terms.iter() {
                match term {
                    Expression::Symbol(sym) if sym.is_domain_variable() => saw_domain = true,
                    Expression::Number(Number::Integer(j)) if *j < 0 => {
                        offset = u32::try_from(-j).ok();
                    }
                    _ => return None,
                }
            }
            if saw_domain {
                offset
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recurrence_rhs() {
        let expr = parse_expression("s(n-1)+s(n-2)").unwrap();
        assert_eq!(
            expr,
            Expression::add(vec![Expression::rec_call(1), Expression::rec_call(2)])
        );
    }

    #[test]
    fn test_parse_precedence() {
        // 2*n^2 parses as 2*(n^2)
        let expr = parse_expression("2*n^2").unwrap();
        assert_eq!(
            expr,
            Expression::mul(vec![
                Expression::integer(2),
                Expression::pow(Expression::n(), Expression::integer(2)),
            ])
        );
    }

    #[test]
    fn test_parse_division_is_exact() {
        let expr = parse_expression("(9/2)*s(n-2)").unwrap().simplify();
        match expr {
            Expression::Mul(factors) => {
                assert_eq!(factors[0], Expression::ratio(9, 2));
                assert_eq!(factors[1], Expression::rec_call(2));
            }
            other => panic!("expected Mul, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unary_minus() {
        let expr = parse_expression("-4*s(n-2)+4*s(n-1)").unwrap().simplify();
        match &expr {
            Expression::Add(terms) => assert_eq!(terms.len(), 2),
            other => panic!("expected Add, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_shifted_exponential() {
        let expr = parse_expression("41^(n-4)").unwrap();
        assert_eq!(
            expr,
            Expression::pow(
                Expression::integer(41),
                Expression::add(vec![
                    Expression::n(),
                    Expression::mul(vec![Expression::integer(-1), Expression::integer(4)]),
                ])
            )
        );
    }

    #[test]
    fn test_rejects_bad_rec_call() {
        assert!(parse_expression("s(n+1)").is_err());
        assert!(parse_expression("s(n-n)").is_err());
        assert!(parse_expression("s(2*n)").is_err());
    }

    #[test]
    fn test_rejects_unknown_identifier() {
        assert!(parse_expression("x+1").is_err());
    }
}
