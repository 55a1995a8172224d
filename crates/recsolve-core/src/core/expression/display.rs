//! Display implementation for Expression
//!
//! Renders the surface syntax used by the output files: `*` for products,
//! `^` for powers, rational exponents parenthesized (so square roots appear
//! as `(E)^(1/2)`), and negative-leading terms folded into `-` signs.

use super::Expression;
use crate::core::Number;
use std::fmt;

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

fn precedence(expr: &Expression) -> u8 {
    match expr {
        Expression::Number(Number::Integer(i)) if *i >= 0 => PREC_ATOM,
        // Negative literals and rationals read as compound terms
        Expression::Number(_) => PREC_ADD,
        Expression::Symbol(_) | Expression::RecCall(_) => PREC_ATOM,
        Expression::Add(_) => PREC_ADD,
        Expression::Mul(_) => PREC_MUL,
        Expression::Pow(_, _) => PREC_POW,
    }
}

/// Whether a term renders with a leading minus sign
fn has_negative_lead(expr: &Expression) -> bool {
    match expr {
        Expression::Number(num) => num.is_negative(),
        Expression::Mul(factors) => factors
            .first()
            .is_some_and(|first| matches!(first, Expression::Number(num) if num.is_negative())),
        _ => false,
    }
}

/// Strip the leading minus from a term known to satisfy [`has_negative_lead`]
fn negated(expr: &Expression) -> Expression {
    match expr {
        Expression::Number(num) => Expression::Number(-num),
        Expression::Mul(factors) => {
            let mut rest = factors.as_ref().clone();
            let first = match rest.first() {
                Some(Expression::Number(num)) => -num,
                _ => return Expression::neg(expr.clone()),
            };
            if first.is_one() && rest.len() > 1 {
                rest.remove(0);
                if rest.len() == 1 {
                    rest.into_iter().next().expect("one factor remains")
                } else {
                    Expression::mul(rest)
                }
            } else {
                rest[0] = Expression::Number(first);
                Expression::mul(rest)
            }
        }
        _ => Expression::neg(expr.clone()),
    }
}

fn fmt_prec(expr: &Expression, f: &mut fmt::Formatter, min_prec: u8) -> fmt::Result {
    let needs_parens = precedence(expr) < min_prec;
    if needs_parens {
        write!(f, "(")?;
    }
    match expr {
        Expression::Number(num) => write!(f, "{}", num)?,
        Expression::Symbol(sym) => write!(f, "{}", sym)?,
        Expression::RecCall(0) => write!(f, "s(n)")?,
        Expression::RecCall(offset) => write!(f, "s(n-{})", offset)?,
        Expression::Add(terms) => {
            if terms.is_empty() {
                write!(f, "0")?;
            } else {
                fmt_prec(&terms[0], f, PREC_ADD)?;
                for term in &terms[1..] {
                    if has_negative_lead(term) {
                        write!(f, "-")?;
                        fmt_prec(&negated(term), f, PREC_ADD + 1)?;
                    } else {
                        write!(f, "+")?;
                        fmt_prec(term, f, PREC_ADD + 1)?;
                    }
                }
            }
        }
        Expression::Mul(factors) => {
            if factors.is_empty() {
                write!(f, "1")?;
            } else {
                // A leading numeric factor carries its sign without
                // parentheses; rationals keep them so `1/2*x` never appears
                match &factors[0] {
                    Expression::Number(num @ Number::Rational(_)) => write!(f, "({})", num)?,
                    Expression::Number(num) => write!(f, "{}", num)?,
                    first => fmt_prec(first, f, PREC_MUL)?,
                }
                for factor in &factors[1..] {
                    write!(f, "*")?;
                    fmt_prec(factor, f, PREC_MUL)?;
                }
            }
        }
        Expression::Pow(base, exponent) => {
            fmt_prec(base, f, PREC_ATOM)?;
            write!(f, "^")?;
            fmt_prec(exponent, f, PREC_ATOM)?;
        }
    }
    if needs_parens {
        write!(f, ")")?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_prec(self, f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_with_negative_coefficient() {
        let expr = Expression::add(vec![
            Expression::integer(6),
            Expression::mul(vec![Expression::integer(-2), Expression::n()]),
        ]);
        assert_eq!(expr.to_string(), "6-2*n");
    }

    #[test]
    fn test_product_with_sum_factor() {
        let expr = Expression::mul(vec![
            Expression::add(vec![
                Expression::integer(6),
                Expression::mul(vec![Expression::integer(-2), Expression::n()]),
            ]),
            Expression::pow(Expression::integer(2), Expression::n()),
        ]);
        assert_eq!(expr.to_string(), "(6-2*n)*2^n");
    }

    #[test]
    fn test_square_root_rendering() {
        let expr = Expression::pow(Expression::integer(5), Expression::ratio(1, 2));
        assert_eq!(expr.to_string(), "5^(1/2)");
    }

    #[test]
    fn test_rational_base_parenthesized() {
        let expr = Expression::pow(Expression::ratio(1, 2), Expression::n());
        assert_eq!(expr.to_string(), "(1/2)^n");
    }

    #[test]
    fn test_negative_base_parenthesized() {
        let expr = Expression::pow(Expression::integer(-3), Expression::n());
        assert_eq!(expr.to_string(), "(-3)^n");
    }

    #[test]
    fn test_leading_negative_product() {
        let expr = Expression::mul(vec![
            Expression::integer(-2),
            Expression::pow(Expression::integer(2), Expression::n()),
        ]);
        assert_eq!(expr.to_string(), "-2*2^n");
    }

    #[test]
    fn test_rec_call_rendering() {
        assert_eq!(Expression::rec_call(0).to_string(), "s(n)");
        assert_eq!(Expression::rec_call(2).to_string(), "s(n-2)");
    }
}
