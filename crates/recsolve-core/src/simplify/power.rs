//! Power simplification

use super::multiplication::simplify_multiplication;
use super::Simplify;
use crate::algebra::radical;
use crate::core::{Expression, Number};
use num_traits::ToPrimitive;

/// Simplify a power expression
pub(crate) fn simplify_power(base: &Expression, exponent: &Expression) -> Expression {
    let base = base.simplify();
    let exponent = exponent.simplify();

    match (&base, &exponent) {
        // x^0 = 1
        (_, Expression::Number(num)) if num.is_zero() => Expression::integer(1),
        // x^1 = x
        (_, Expression::Number(num)) if num.is_one() => base,
        // 1^x = 1
        (Expression::Number(num), _) if num.is_one() => Expression::integer(1),

        (Expression::Number(base_num), Expression::Number(exp_num)) => {
            if let Some(exp_int) = exp_num.to_i64() {
                // Exact numeric power; 0^negative stays symbolic
                match base_num.checked_pow(exp_int) {
                    Some(value) => Expression::Number(value),
                    None => Expression::pow(base, exponent),
                }
            } else if let Some(numer) = odd_half_numerator(exp_num) {
                if base_num.is_negative() || base_num.is_zero() {
                    Expression::pow(base, exponent)
                } else {
                    // b^(p/2) = b^((p-1)/2) * b^(1/2), with the square root
                    // reduced by extracting its largest square factor
                    let whole = base_num
                        .checked_pow((numer - 1) / 2)
                        .expect("nonzero base has every integer power");
                    let root = radical::simplify_sqrt(base_num);
                    simplify_multiplication(&[Expression::Number(whole), root])
                }
            } else {
                Expression::pow(base, exponent)
            }
        }

        // (a^b)^c = a^(b*c)
        (Expression::Pow(inner_base, inner_exp), _) => {
            let combined =
                simplify_multiplication(&[(**inner_exp).clone(), exponent.clone()]);
            simplify_power(inner_base, &combined)
        }

        // (a*b)^m = a^m * b^m for integer m; all factors here are scalars
        (Expression::Mul(factors), Expression::Number(exp_num))
            if exp_num.to_i64().is_some() =>
        {
            let powered: Vec<Expression> = factors
                .iter()
                .map(|factor| Expression::pow(factor.clone(), exponent.clone()))
                .collect();
            simplify_multiplication(&powered)
        }

        _ => Expression::pow(base, exponent),
    }
}

/// For an exponent `p/2` in lowest terms, return the odd numerator `p`
fn odd_half_numerator(num: &Number) -> Option<i64> {
    match num {
        Number::Rational(r) if *r.denom() == 2.into() => r.numer().to_i64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_rules() {
        assert_eq!(
            simplify_power(&Expression::n(), &Expression::integer(0)),
            Expression::integer(1)
        );
        assert_eq!(
            simplify_power(&Expression::n(), &Expression::integer(1)),
            Expression::n()
        );
        assert_eq!(
            simplify_power(&Expression::integer(1), &Expression::n()),
            Expression::integer(1)
        );
    }

    #[test]
    fn test_numeric_powers() {
        assert_eq!(
            simplify_power(&Expression::integer(2), &Expression::integer(10)),
            Expression::integer(1024)
        );
        assert_eq!(
            simplify_power(&Expression::integer(2), &Expression::integer(-1)),
            Expression::ratio(1, 2)
        );
        assert_eq!(
            simplify_power(&Expression::ratio(2, 3), &Expression::integer(2)),
            Expression::ratio(4, 9)
        );
    }

    #[test]
    fn test_perfect_square_root() {
        assert_eq!(
            simplify_power(&Expression::integer(4), &Expression::ratio(1, 2)),
            Expression::integer(2)
        );
    }

    #[test]
    fn test_square_factor_extraction() {
        // 96^(1/2) -> 4*6^(1/2)
        let result = simplify_power(&Expression::integer(96), &Expression::ratio(1, 2));
        assert_eq!(
            result,
            Expression::mul(vec![
                Expression::integer(4),
                Expression::pow(Expression::integer(6), Expression::ratio(1, 2)),
            ])
        );
    }

    #[test]
    fn test_power_of_power() {
        // (5^(1/2))^2 -> 5
        let sqrt5 = Expression::pow(Expression::integer(5), Expression::ratio(1, 2));
        assert_eq!(
            simplify_power(&sqrt5, &Expression::integer(2)),
            Expression::integer(5)
        );
    }

    #[test]
    fn test_zero_to_negative_stays_symbolic() {
        let result = simplify_power(&Expression::integer(0), &Expression::integer(-1));
        assert!(matches!(result, Expression::Pow(_, _)));
    }
}
