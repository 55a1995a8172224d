//! Expression expansion operations
//!
//! Distributes multiplication over addition, expands small integer powers of
//! sums, and normalizes exponentials with shifted exponents: `b^(n-c)`
//! becomes `b^(-c) * b^n` so every `n`-dependent exponent is the bare domain
//! variable after expansion.

use crate::core::{Expression, Number, Symbol};
use crate::simplify::Simplify;

/// Integer powers of sums beyond this are left unexpanded
const MAX_EXPANDED_POWER: i64 = 64;

/// Trait for expanding expressions
pub trait Expand {
    fn expand(&self) -> Self;
}

impl Expand for Expression {
    /// Expand the expression by distributing multiplication over addition
    fn expand(&self) -> Self {
        match self {
            Expression::Number(_) | Expression::Symbol(_) | Expression::RecCall(_) => self.clone(),

            Expression::Add(terms) => {
                let expanded_terms: Vec<Expression> =
                    terms.iter().map(|term| term.expand()).collect();
                Expression::add(expanded_terms)
            }

            Expression::Mul(factors) => expand_multiplication(factors),

            Expression::Pow(base, exponent) => expand_power(base, exponent),
        }
    }
}

/// Expand multiplication by distributing over addition
fn expand_multiplication(factors: &[Expression]) -> Expression {
    if factors.is_empty() {
        return Expression::integer(1);
    }

    if factors.len() == 1 {
        return factors[0].expand();
    }

    let mut result = factors[0].expand();
    for factor in &factors[1..] {
        result = distribute_multiply(&result, &factor.expand());
    }

    result
}

/// Distribute multiplication: (a + b) * c = a*c + b*c
fn distribute_multiply(left: &Expression, right: &Expression) -> Expression {
    match (left, right) {
        (Expression::Add(left_terms), _) => {
            let distributed: Vec<Expression> = left_terms
                .iter()
                .map(|term| distribute_multiply(term, right))
                .collect();
            Expression::add(distributed)
        }

        (_, Expression::Add(right_terms)) => {
            let distributed: Vec<Expression> = right_terms
                .iter()
                .map(|term| distribute_multiply(left, term))
                .collect();
            Expression::add(distributed)
        }

        _ => Expression::mul(vec![left.clone(), right.clone()]),
    }
}

/// Expand power expressions
fn expand_power(base: &Expression, exponent: &Expression) -> Expression {
    let base = base.expand();
    let exponent = exponent.expand().simplify();

    if let Expression::Number(Number::Integer(m)) = exponent {
        if (0..=MAX_EXPANDED_POWER).contains(&m) {
            return expand_integer_power(&base, m as u32);
        }
    }

    if exponent.mentions_symbol(&Symbol::n()) {
        if let Some(normalized) = split_shifted_exponent(&base, &exponent) {
            return normalized;
        }
    }

    Expression::pow(base, exponent)
}

/// Expand integer powers: (a + b)^m by repeated distribution
fn expand_integer_power(base: &Expression, exponent: u32) -> Expression {
    match exponent {
        0 => Expression::integer(1),
        1 => base.clone(),
        _ => {
            let mut result = base.clone();
            for _ in 1..exponent {
                result = distribute_multiply(&result, base);
            }
            result
        }
    }
}

/// Rewrite `b^(n + c)` as `b^c * b^n` for a numeric base
///
/// Returns `None` when the exponent is not an integer-shifted occurrence of
/// the domain variable; the forcing classifier rejects such shapes later.
fn split_shifted_exponent(base: &Expression, exponent: &Expression) -> Option<Expression> {
    let base_num = base.as_number()?;

    let terms: Vec<Expression> = match exponent {
        Expression::Symbol(sym) if sym.is_domain_variable() => return None,
        Expression::Add(terms) => terms.as_ref().clone(),
        _ => return None,
    };

    let mut shift: Option<i64> = None;
    let mut saw_domain = false;
    for term in &terms {
        match term {
            Expression::Symbol(sym) if sym.is_domain_variable() && !saw_domain => {
                saw_domain = true;
            }
            Expression::Number(num) if shift.is_none() => {
                shift = Some(num.to_i64()?);
            }
            _ => return None,
        }
    }
    let shift = shift?;
    if !saw_domain {
        return None;
    }

    let constant_part = base_num.checked_pow(shift)?;
    Some(Expression::mul(vec![
        Expression::Number(constant_part),
        Expression::pow(base.clone(), Expression::n()),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution() {
        // (n + 1) * 2 -> n*2 + 1*2
        let expr = Expression::mul(vec![
            Expression::add(vec![Expression::n(), Expression::integer(1)]),
            Expression::integer(2),
        ]);
        let expanded = expr.expand().simplify();
        assert_eq!(
            expanded,
            Expression::add(vec![
                Expression::integer(2),
                Expression::mul(vec![Expression::integer(2), Expression::n()]),
            ])
        );
    }

    #[test]
    fn test_binomial_square() {
        // (n - 5)^2 -> n^2 - 10n + 25
        let expr = Expression::pow(
            Expression::sub(Expression::n(), Expression::integer(5)),
            Expression::integer(2),
        );
        let expanded = expr.expand().simplify();
        let expected = Expression::add(vec![
            Expression::integer(25),
            Expression::mul(vec![Expression::integer(-10), Expression::n()]),
            Expression::pow(Expression::n(), Expression::integer(2)),
        ]);
        assert_eq!(expanded, expected);
    }

    #[test]
    fn test_shifted_exponent_normalization() {
        // 41^(n - 4) -> 41^(-4) * 41^n
        let expr = Expression::pow(
            Expression::integer(41),
            Expression::sub(Expression::n(), Expression::integer(4)),
        );
        let expanded = expr.expand().simplify();
        match &expanded {
            Expression::Mul(factors) => {
                assert_eq!(factors.len(), 2);
                assert_eq!(
                    factors[0],
                    Expression::Number(Number::ratio(1, 41_i64.pow(4)))
                );
                assert_eq!(
                    factors[1],
                    Expression::pow(Expression::integer(41), Expression::n())
                );
            }
            other => panic!("expected Mul, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_exponential_untouched() {
        let expr = Expression::pow(Expression::integer(2), Expression::n());
        assert_eq!(expr.expand(), expr);
    }
}
