//! Characteristic-equation construction

use super::analyzer::Recurrence;
use crate::algebra::RationalPoly;
use num_rational::BigRational;
use num_traits::{One, Zero};

/// Build `r^k - sum c_j * r^(k-j)` from the recurrence coefficients
///
/// Coefficients missing from the map default to zero.
pub fn characteristic_polynomial(recurrence: &Recurrence) -> RationalPoly {
    let order = recurrence.order as usize;
    let mut coeffs = vec![BigRational::zero(); order + 1];
    coeffs[order] = BigRational::one();
    for (offset, coefficient) in &recurrence.coefficients {
        coeffs[order - *offset as usize] = -coefficient.clone();
    }
    RationalPoly::new(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use crate::solve::analyzer::analyze;
    use crate::core::Expression;
    use std::collections::BTreeMap;

    fn analyzed(rhs: &str, conditions: &[(i64, i64)]) -> Recurrence {
        let parsed = parse_expression(rhs).unwrap();
        let initial: BTreeMap<i64, Expression> = conditions
            .iter()
            .map(|&(index, value)| (index, Expression::integer(value)))
            .collect();
        analyze(&parsed, &initial).unwrap()
    }

    #[test]
    fn test_fibonacci_polynomial() {
        // s(n) = s(n-1) + s(n-2)  ->  r^2 - r - 1
        let recurrence = analyzed("s(n-1)+s(n-2)", &[(0, 1), (1, 1)]);
        let poly = characteristic_polynomial(&recurrence);
        assert_eq!(poly.to_string(), "r^2 - r - 1");
    }

    #[test]
    fn test_gap_defaults_to_zero() {
        // s(n) = 8*s(n-2) - 16*s(n-4)  ->  r^4 - 8*r^2 + 16
        let recurrence = analyzed(
            "8*s(n-2)-16*s(n-4)",
            &[(0, 0), (1, 1), (2, 2), (3, 3)],
        );
        let poly = characteristic_polynomial(&recurrence);
        assert_eq!(poly.degree(), 4);
        assert!(poly.coeff(3).is_zero());
        assert!(poly.coeff(1).is_zero());
        assert_eq!(poly.coeff(2), BigRational::from_integer((-8).into()));
        assert_eq!(poly.coeff(0), BigRational::from_integer(16.into()));
    }
}
