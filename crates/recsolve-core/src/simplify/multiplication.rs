//! Multiplication simplification

use super::addition::simplify_addition;
use super::helpers::expression_order;
use super::power::simplify_power;
use super::Simplify;
use crate::core::{Expression, Number};

/// Simplify multiplication: flatten, fold constants, combine same-base powers
pub(crate) fn simplify_multiplication(factors: &[Expression]) -> Expression {
    // Simplify each operand first, then flatten nested products
    let mut flattened: Vec<Expression> = Vec::with_capacity(factors.len());
    for factor in factors {
        match factor.simplify() {
            Expression::Mul(nested) => flattened.extend(nested.into_iter()),
            other => flattened.push(other),
        }
    }

    let mut numeric_product = Number::integer(1);
    // Same-base powers keyed by base, exponents accumulated
    let mut power_groups: Vec<(Expression, Vec<Expression>)> = Vec::new();

    for factor in &flattened {
        match factor {
            Expression::Number(num) => {
                if num.is_zero() {
                    return Expression::integer(0);
                }
                numeric_product = &numeric_product * num;
            }
            _ => {
                let (base, exponent) = match factor {
                    Expression::Pow(base, exponent) => {
                        ((**base).clone(), (**exponent).clone())
                    }
                    other => (other.clone(), Expression::integer(1)),
                };
                if let Some((_, exponents)) =
                    power_groups.iter_mut().find(|(b, _)| *b == base)
                {
                    exponents.push(exponent);
                } else {
                    power_groups.push((base, vec![exponent]));
                }
            }
        }
    }

    let mut result_factors = Vec::with_capacity(power_groups.len() + 1);
    for (base, exponents) in power_groups {
        let combined_exponent = if exponents.len() == 1 {
            exponents.into_iter().next().expect("single exponent")
        } else {
            simplify_addition(&exponents)
        };
        match simplify_power(&base, &combined_exponent) {
            Expression::Number(num) => {
                if num.is_zero() {
                    return Expression::integer(0);
                }
                numeric_product = &numeric_product * &num;
            }
            Expression::Mul(nested) => {
                // Power simplification may itself split into a product
                // (e.g. a radical with an extractable square factor)
                for piece in nested.iter() {
                    match piece {
                        Expression::Number(num) => {
                            numeric_product = &numeric_product * num;
                        }
                        other => result_factors.push(other.clone()),
                    }
                }
            }
            other => result_factors.push(other),
        }
    }

    merge_radical_factors(&mut result_factors, &mut numeric_product);

    if result_factors.is_empty() {
        return Expression::Number(numeric_product);
    }
    if !numeric_product.is_one() {
        result_factors.push(Expression::Number(numeric_product));
    }
    result_factors.sort_by(expression_order);

    match result_factors.len() {
        1 => result_factors.into_iter().next().expect("single factor"),
        _ => Expression::mul(result_factors),
    }
}

/// Fold several square-root factors into one canonical radical
///
/// `2^(1/2) * 6^(1/2)` becomes `2 * 3^(1/2)`: radicands multiply and the
/// square part moves into the numeric coefficient. Distinct radicals must
/// combine this way or sums over them cannot recognize equal monomials.
fn merge_radical_factors(factors: &mut Vec<Expression>, numeric: &mut Number) {
    let mut radicand = num_bigint::BigInt::from(1);
    let mut merged = 0usize;
    factors.retain(|factor| match square_root_radicand(factor) {
        Some(value) => {
            radicand *= value;
            merged += 1;
            false
        }
        None => true,
    });
    if merged == 0 {
        return;
    }
    match crate::algebra::radical::simplify_sqrt(&Number::from(radicand)) {
        Expression::Number(num) => *numeric = &*numeric * &num,
        Expression::Mul(parts) => {
            for part in parts.iter() {
                match part {
                    Expression::Number(num) => *numeric = &*numeric * num,
                    other => factors.push(other.clone()),
                }
            }
        }
        other => factors.push(other),
    }
}

/// The radicand of a canonical `d^(1/2)` factor with positive integer `d`
fn square_root_radicand(expr: &Expression) -> Option<num_bigint::BigInt> {
    use num_traits::Signed;
    match expr {
        Expression::Pow(base, exponent) => {
            let base = base.as_number()?.to_rational();
            let exponent = exponent.as_number()?.to_rational();
            let half = num_rational::BigRational::new(1.into(), 2.into());
            if exponent == half && base.is_integer() && base.is_positive() {
                Some(base.to_integer())
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
    fn test_radical_product_merges() {
        // 2^(1/2) * 6^(1/2) -> 2 * 3^(1/2)
        let sqrt2 = Expression::pow(Expression::integer(2), Expression::ratio(1, 2));
        let sqrt6 = Expression::pow(Expression::integer(6), Expression::ratio(1, 2));
        let expr = simplify_multiplication(&[sqrt2, sqrt6]);
        assert_eq!(
            expr,
            Expression::mul(vec![
                Expression::integer(2),
                Expression::pow(Expression::integer(3), Expression::ratio(1, 2)),
            ])
        );
    }

    #[test]
    fn test_distinct_radicals_combine_to_one() {
        // 2^(1/2) * 7^(1/2) -> 14^(1/2)
        let sqrt2 = Expression::pow(Expression::integer(2), Expression::ratio(1, 2));
        let sqrt7 = Expression::pow(Expression::integer(7), Expression::ratio(1, 2));
        let expr = simplify_multiplication(&[sqrt2, sqrt7]);
        assert_eq!(
            expr,
            Expression::pow(Expression::integer(14), Expression::ratio(1, 2))
        );
    }

    #[test]
    fn test_constant_folding() {
        let expr = simplify_multiplication(&[
            Expression::integer(2),
            Expression::ratio(3, 4),
            Expression::integer(2),
        ]);
        assert_eq!(expr, Expression::integer(3));
    }

    #[test]
    fn test_zero_annihilates() {
        let expr = simplify_multiplication(&[Expression::n(), Expression::integer(0)]);
        assert_eq!(expr, Expression::integer(0));
    }

    #[test]
    fn test_power_combining() {
        // n * n^2 -> n^3
        let expr = simplify_multiplication(&[
            Expression::n(),
            Expression::pow(Expression::n(), Expression::integer(2)),
        ]);
        assert_eq!(
            expr,
            Expression::pow(Expression::n(), Expression::integer(3))
        );
    }

    #[test]
    fn test_reciprocal_cancellation() {
        // (1+n) * (1+n)^(-1) -> 1
        let sum = Expression::add(vec![Expression::integer(1), Expression::n()]);
        let expr = simplify_multiplication(&[
            sum.clone(),
            Expression::pow(sum, Expression::integer(-1)),
        ]);
        assert_eq!(expr, Expression::integer(1));
    }

    #[test]
    fn test_numeric_coefficient_leads() {
        let expr = simplify_multiplication(&[
            Expression::pow(Expression::integer(2), Expression::n()),
            Expression::integer(3),
        ]);
        match expr {
            Expression::Mul(factors) => {
                assert_eq!(factors[0], Expression::integer(3));
            }
            other => panic!("expected Mul, got {:?}", other),
        }
    }
}
