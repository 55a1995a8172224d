//! Addition simplification

use super::helpers::{expression_order, extract_coefficient_and_base};
use super::Simplify;
use crate::core::{Expression, Number};

/// Simplify addition: flatten, fold constants, collect like terms
pub(crate) fn simplify_addition(terms: &[Expression]) -> Expression {
    // Simplify each operand first so nested sums surface, then flatten them
    let mut flattened: Vec<Expression> = Vec::with_capacity(terms.len());
    for term in terms {
        match term.simplify() {
            Expression::Add(nested) => flattened.extend(nested.into_iter()),
            other => flattened.push(other),
        }
    }

    let mut numeric_sum = Number::integer(0);
    // Like terms keyed by the canonical form of their non-numeric part
    let mut like_terms: Vec<(String, Expression, Number)> = Vec::new();

    for term in &flattened {
        match term {
            Expression::Number(num) => {
                numeric_sum = &numeric_sum + num;
            }
            _ => {
                let (coeff, base) = extract_coefficient_and_base(term);
                let key = format!("{:?}", base);
                if let Some(entry) = like_terms.iter_mut().find(|(k, _, _)| k == &key) {
                    entry.2 = &entry.2 + &coeff;
                } else {
                    like_terms.push((key, base, coeff));
                }
            }
        }
    }

    let mut result_terms = Vec::with_capacity(like_terms.len() + 1);
    if !numeric_sum.is_zero() {
        result_terms.push(Expression::Number(numeric_sum));
    }

    for (_, base, coeff) in like_terms {
        if coeff.is_zero() {
            continue;
        }
        if coeff.is_one() {
            result_terms.push(base);
        } else {
            let term = match base {
                Expression::Mul(factors) => {
                    let mut rebuilt = Vec::with_capacity(factors.len() + 1);
                    rebuilt.push(Expression::Number(coeff));
                    rebuilt.extend(factors.iter().cloned());
                    Expression::mul(rebuilt)
                }
                other => Expression::mul(vec![Expression::Number(coeff), other]),
            };
            result_terms.push(term);
        }
    }

    match result_terms.len() {
        0 => Expression::integer(0),
        1 => result_terms.into_iter().next().expect("single term"),
        _ => {
            result_terms.sort_by(expression_order);
            Expression::add(result_terms)
        }
    }
}
