//! Expression simplification
//!
//! Flattens nested sums and products, folds constants exactly, collects like
//! terms, combines same-base powers, and keeps operands in a canonical order
//! so that structural equality doubles as equality of canonical forms.

use crate::core::Expression;

mod addition;
mod helpers;
mod multiplication;
mod power;

pub(crate) use addition::simplify_addition;
pub(crate) use multiplication::simplify_multiplication;
pub(crate) use power::simplify_power;

/// Trait for simplifying expressions
pub trait Simplify {
    fn simplify(&self) -> Self;
}

impl Simplify for Expression {
    fn simplify(&self) -> Self {
        match self {
            Expression::Number(_) | Expression::Symbol(_) | Expression::RecCall(_) => self.clone(),
            Expression::Add(terms) => simplify_addition(terms),
            Expression::Mul(factors) => simplify_multiplication(factors),
            Expression::Pow(base, exponent) => simplify_power(base, exponent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_is_idempotent() {
        let expr = Expression::add(vec![
            Expression::mul(vec![Expression::integer(2), Expression::n()]),
            Expression::mul(vec![Expression::integer(3), Expression::n()]),
            Expression::integer(4),
            Expression::integer(-4),
        ]);
        let once = expr.simplify();
        let twice = once.simplify();
        assert_eq!(once, twice);
        assert_eq!(
            once,
            Expression::mul(vec![Expression::integer(5), Expression::n()])
        );
    }

    #[test]
    fn test_cancellation_to_zero() {
        let expr = Expression::add(vec![
            Expression::n(),
            Expression::mul(vec![Expression::integer(-1), Expression::n()]),
        ]);
        assert!(expr.simplify().is_zero());
    }

    #[test]
    fn test_radical_product_collapses() {
        // 5^(1/2) * 5^(1/2) -> 5
        let root = Expression::pow(Expression::integer(5), Expression::ratio(1, 2));
        let expr = Expression::mul(vec![root.clone(), root]);
        assert_eq!(expr.simplify(), Expression::integer(5));
    }
}
