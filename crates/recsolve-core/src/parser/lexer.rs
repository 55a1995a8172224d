//! Tokenizer for the input expression language

use crate::error::{SolveError, SolveResult};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::pow::Pow;

/// Token of the recurrence expression grammar
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Integer or decimal literal, held exactly
    Number(BigRational),
    /// Identifier; the grammar only admits `s` and `n`
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

/// Tokenize an expression; whitespace is insignificant
///
/// Decimal literals are converted to exact rationals (`0.5` becomes `1/2`).
pub fn tokenize(input: &str) -> SolveResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        match c {
            ' ' | '\t' | '\r' | '\n' => pos += 1,
            '+' => {
                tokens.push(Token::Plus);
                pos += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                pos += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                pos += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                pos += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            '0'..='9' => {
                let start = pos;
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
                let mut fraction_digits = 0u32;
                if pos < chars.len() && chars[pos] == '.' {
                    pos += 1;
                    let fraction_start = pos;
                    while pos < chars.len() && chars[pos].is_ascii_digit() {
                        pos += 1;
                    }
                    fraction_digits = (pos - fraction_start) as u32;
                    if fraction_digits == 0 {
                        return Err(SolveError::ParseConstraintViolated {
                            construct: format!(
                                "malformed decimal literal near \"{}\"",
                                chars[start..pos].iter().collect::<String>()
                            ),
                        });
                    }
                }
                let digits: String = chars[start..pos]
                    .iter()
                    .filter(|c| **c != '.')
                    .collect();
                let numerator: BigInt = digits.parse().map_err(|_| {
                    SolveError::ParseConstraintViolated {
                        construct: format!("unreadable number literal \"{}\"", digits),
                    }
                })?;
                let denominator = BigInt::from(10).pow(fraction_digits);
                tokens.push(Token::Number(BigRational::new(numerator, denominator)));
            }
            c if c.is_ascii_alphabetic() => {
                let start = pos;
                while pos < chars.len() && chars[pos].is_ascii_alphanumeric() {
                    pos += 1;
                }
                tokens.push(Token::Ident(chars[start..pos].iter().collect()));
            }
            other => {
                return Err(SolveError::ParseConstraintViolated {
                    construct: format!("unexpected character '{}'", other),
                });
            }
        }
    }

    Ok(tokens)
}
