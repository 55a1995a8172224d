//! Helper functions for simplification

use crate::core::{Expression, Number};
use std::cmp::Ordering;

/// Canonical ordering for expressions to ensure consistent output
pub(super) fn expression_order(a: &Expression, b: &Expression) -> Ordering {
    match (a, b) {
        // Numbers come first, ordered by exact value
        (Expression::Number(n1), Expression::Number(n2)) => n1.cmp(n2),
        (Expression::Number(_), _) => Ordering::Less,
        (_, Expression::Number(_)) => Ordering::Greater,

        // Symbols next, alphabetically
        (Expression::Symbol(s1), Expression::Symbol(s2)) => s1.name().cmp(s2.name()),
        (Expression::Symbol(_), _) => Ordering::Less,
        (_, Expression::Symbol(_)) => Ordering::Greater,

        // Recurrence calls ordered by offset
        (Expression::RecCall(j1), Expression::RecCall(j2)) => j1.cmp(j2),
        (Expression::RecCall(_), _) => Ordering::Less,
        (_, Expression::RecCall(_)) => Ordering::Greater,

        // Sums order after products; both compare lexicographically
        (Expression::Add(t1), Expression::Add(t2)) => operand_order(t1, t2),
        (Expression::Add(_), _) => Ordering::Greater,
        (_, Expression::Add(_)) => Ordering::Less,

        (Expression::Mul(f1), Expression::Mul(f2)) => operand_order(f1, f2),
        (Expression::Mul(_), _) => Ordering::Greater,
        (_, Expression::Mul(_)) => Ordering::Less,

        (Expression::Pow(b1, e1), Expression::Pow(b2, e2)) => {
            expression_order(b1, b2).then_with(|| expression_order(e1, e2))
        }
    }
}

/// Lexicographic ordering over operand lists, shorter lists first on ties
fn operand_order(a: &[Expression], b: &[Expression]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = expression_order(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Extract coefficient and base term from a simplified expression
///
/// - `3*x` -> `(3, x)`
/// - `-2*n*2^n` -> `(-2, n*2^n)`
/// - `x` -> `(1, x)`
pub(super) fn extract_coefficient_and_base(expr: &Expression) -> (Number, Expression) {
    match expr {
        Expression::Mul(factors) if factors.len() >= 2 => {
            if let Expression::Number(num) = &factors[0] {
                let base = if factors.len() == 2 {
                    factors[1].clone()
                } else {
                    Expression::mul(factors[1..].to_vec())
                };
                (num.clone(), base)
            } else {
                (Number::integer(1), expr.clone())
            }
        }
        _ => (Number::integer(1), expr.clone()),
    }
}
