//! Square-root normalization and quadratic-field arithmetic
//!
//! Characteristic roots that are not rational always come from quadratic
//! factors, so every irrational value the solver manipulates lives in a
//! field `Q(sqrt(d))`. This module extracts square factors from radicands
//! and inverts `c0 + c1*sqrt(d)` elements by conjugation, which keeps the
//! symbolic linear solver's divisions exact.

use super::expand::Expand;
use crate::core::{Expression, Number};
use crate::simplify::Simplify;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Split a positive integer into its largest square factor and the
/// square-free remainder: `96 -> (4, 6)`
pub fn sqrt_factor(value: &BigInt) -> (BigInt, BigInt) {
    let one = BigInt::one();
    if value <= &one {
        return (one, value.clone());
    }
    let Some(mut remaining) = value.to_u64() else {
        // Values beyond u64 are left unfactored
        return (one, value.clone());
    };

    let mut outside: u64 = 1;
    let mut divisor: u64 = 2;
    while divisor.saturating_mul(divisor) <= remaining {
        let square = divisor * divisor;
        while remaining % square == 0 {
            outside *= divisor;
            remaining /= square;
        }
        divisor += 1;
    }

    (BigInt::from(outside), BigInt::from(remaining))
}

/// Exact square root of a positive rational as `outside * sqrt(radicand)`
/// with an integer, square-free radicand: `sqrt(3/4) -> (1/2, 3)`
pub fn sqrt_rational(value: &BigRational) -> (BigRational, BigInt) {
    // sqrt(a/b) = sqrt(a*b) / b
    let combined = value.numer() * value.denom();
    let (outside, radicand) = sqrt_factor(&combined);
    (
        BigRational::new(outside, value.denom().clone()),
        radicand,
    )
}

/// Simplified expression for the square root of a positive number
pub fn simplify_sqrt(value: &Number) -> Expression {
    let (outside, radicand) = sqrt_rational(&value.to_rational());
    let root = if radicand.is_one() {
        Expression::integer(1)
    } else {
        Expression::pow(
            Expression::number(Number::from(radicand)),
            Expression::ratio(1, 2),
        )
    };
    let scale = Number::rational(outside);
    if scale.is_one() {
        root
    } else if root.is_one() {
        Expression::Number(scale)
    } else {
        Expression::mul(vec![Expression::Number(scale), root])
    }
}

/// An element `rational + coeff * sqrt(radicand)` of a quadratic field
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticElement {
    pub rational: BigRational,
    pub coeff: BigRational,
    pub radicand: BigInt,
}

/// Recognize a simplified expression as a quadratic-field element
///
/// Accepts rationals, `sqrt(d)`, `c*sqrt(d)`, and sums of those sharing one
/// radicand. Returns `None` for anything else.
pub fn as_quadratic(expr: &Expression) -> Option<QuadraticElement> {
    let mut element = QuadraticElement {
        rational: BigRational::zero(),
        coeff: BigRational::zero(),
        radicand: BigInt::one(),
    };
    let terms: Vec<&Expression> = match expr {
        Expression::Add(terms) => terms.iter().collect(),
        other => vec![other],
    };
    for term in terms {
        match term {
            Expression::Number(num) => element.rational += num.to_rational(),
            Expression::Pow(_, _) => {
                let (coeff, radicand) = as_radical_term(term)?;
                merge_radical(&mut element, coeff, radicand)?;
            }
            Expression::Mul(factors) if factors.len() == 2 => {
                let coeff = factors[0].as_number()?.to_rational();
                let (scale, radicand) = as_radical_term(&factors[1])?;
                merge_radical(&mut element, coeff * scale, radicand)?;
            }
            _ => return None,
        }
    }
    Some(element)
}

fn as_radical_term(expr: &Expression) -> Option<(BigRational, BigInt)> {
    match expr {
        Expression::Pow(base, exponent) => {
            let base = base.as_number()?.to_rational();
            let exponent = exponent.as_number()?.to_rational();
            if exponent != BigRational::new(BigInt::one(), BigInt::from(2)) {
                return None;
            }
            if !base.is_integer() || base.is_negative() {
                return None;
            }
            Some((BigRational::one(), base.to_integer()))
        }
        _ => None,
    }
}

fn merge_radical(
    element: &mut QuadraticElement,
    coeff: BigRational,
    radicand: BigInt,
) -> Option<()> {
    if element.coeff.is_zero() {
        element.coeff = coeff;
        element.radicand = radicand;
        Some(())
    } else if element.radicand == radicand {
        element.coeff += coeff;
        Some(())
    } else {
        None
    }
}

impl QuadraticElement {
    /// Build the expression `rational + coeff * sqrt(radicand)`
    pub fn to_expression(&self) -> Expression {
        let mut terms = Vec::new();
        if !self.rational.is_zero() {
            terms.push(Expression::rational(self.rational.clone()));
        }
        if !self.coeff.is_zero() {
            let root = Expression::pow(
                Expression::number(Number::from(self.radicand.clone())),
                Expression::ratio(1, 2),
            );
            if self.coeff.is_one() {
                terms.push(root);
            } else {
                terms.push(Expression::mul(vec![
                    Expression::rational(self.coeff.clone()),
                    root,
                ]));
            }
        }
        match terms.len() {
            0 => Expression::integer(0),
            1 => terms.into_iter().next().expect("single term"),
            _ => Expression::add(terms),
        }
    }

    /// Conjugate inverse: `1 / (c0 + c1*sqrt(d)) = (c0 - c1*sqrt(d)) / (c0^2 - c1^2*d)`
    pub fn invert(&self) -> Option<QuadraticElement> {
        let d = BigRational::from_integer(self.radicand.clone());
        let norm = &self.rational * &self.rational - &self.coeff * &self.coeff * d;
        if norm.is_zero() {
            // Only the zero element has zero norm over a square-free radicand
            return None;
        }
        Some(QuadraticElement {
            rational: &self.rational / &norm,
            coeff: -(&self.coeff / &norm),
            radicand: self.radicand.clone(),
        })
    }
}

/// Invert a simplified expression, using (iterated) conjugation when it is
/// a flat sum of radical monomials and a symbolic `^(-1)` otherwise
pub fn invert_expression(expr: &Expression) -> Expression {
    match invert_radical_sum(expr) {
        Some(inverse) => inverse,
        None => Expression::pow(expr.clone(), Expression::integer(-1)),
    }
}

/// One monomial of a flat radical sum: `coeff * radicand^(1/2)`, with
/// radicand 1 for the rational part
type RadicalMonomial = (BigRational, BigInt);

/// Invert `sum coeff_i * sqrt(d_i)` by conjugating away one prime at a time
///
/// Multiplying by the conjugate over a prime `p` (all terms whose radicand
/// `p` divides get their sign flipped) squares away every `sqrt(p)`; the
/// denominator that remains has strictly fewer primes under its radicals,
/// so the recursion bottoms out at a plain rational.
fn invert_radical_sum(expr: &Expression) -> Option<Expression> {
    let monomials = parse_radical_sum(expr)?;

    let mut prime: Option<BigInt> = None;
    for (_, radicand) in &monomials {
        if radicand.is_one() {
            continue;
        }
        // An unfactorable radicand means no conjugate; let the caller fall
        // back to a symbolic reciprocal
        let factor = smallest_prime_factor(radicand)?;
        prime = Some(match prime {
            Some(current) => current.min(factor),
            None => factor,
        });
    }
    let Some(prime) = prime else {
        // Purely rational
        let total: BigRational = monomials.into_iter().map(|(coeff, _)| coeff).sum();
        if total.is_zero() {
            return None;
        }
        return Some(Expression::rational(total.recip()));
    };

    let conjugate_terms: Vec<Expression> = monomials
        .iter()
        .map(|(coeff, radicand)| {
            let flipped = if (radicand % &prime).is_zero() {
                -coeff.clone()
            } else {
                coeff.clone()
            };
            monomial_expression(&flipped, radicand)
        })
        .collect();
    let conjugate = Expression::add(conjugate_terms).simplify();

    let denominator = Expression::mul(vec![expr.clone(), conjugate.clone()])
        .expand()
        .simplify();
    let denominator_inverse = invert_radical_sum(&denominator)?;

    Some(
        Expression::mul(vec![conjugate, denominator_inverse])
            .expand()
            .simplify(),
    )
}

fn monomial_expression(coeff: &BigRational, radicand: &BigInt) -> Expression {
    if radicand.is_one() {
        Expression::rational(coeff.clone())
    } else {
        let root = Expression::pow(
            Expression::number(Number::from(radicand.clone())),
            Expression::ratio(1, 2),
        );
        if coeff.is_one() {
            root
        } else {
            Expression::mul(vec![Expression::rational(coeff.clone()), root])
        }
    }
}

/// Decompose a simplified expression into radical monomials
fn parse_radical_sum(expr: &Expression) -> Option<Vec<RadicalMonomial>> {
    let terms: Vec<&Expression> = match expr {
        Expression::Add(terms) => terms.iter().collect(),
        other => vec![other],
    };
    terms.iter().map(|term| parse_radical_monomial(term)).collect()
}

fn parse_radical_monomial(term: &Expression) -> Option<RadicalMonomial> {
    match term {
        Expression::Number(num) => Some((num.to_rational(), BigInt::one())),
        Expression::Pow(_, _) => {
            let (coeff, radicand) = as_radical_term(term)?;
            Some((coeff, radicand))
        }
        Expression::Mul(factors) if factors.len() == 2 => {
            let coeff = factors[0].as_number()?.to_rational();
            let (scale, radicand) = as_radical_term(&factors[1])?;
            Some((coeff * scale, radicand))
        }
        _ => None,
    }
}

/// Smallest prime factor of a square-free radicand greater than one
fn smallest_prime_factor(radicand: &BigInt) -> Option<BigInt> {
    if radicand <= &BigInt::one() {
        return None;
    }
    let value = radicand.to_u64()?;
    let mut divisor = 2u64;
    while divisor.saturating_mul(divisor) <= value {
        if value % divisor == 0 {
            return Some(BigInt::from(divisor));
        }
        divisor += 1;
    }
    Some(BigInt::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplify::Simplify;

    #[test]
    fn test_sqrt_factor() {
        let (outside, radicand) = sqrt_factor(&BigInt::from(96));
        assert_eq!(outside, BigInt::from(4));
        assert_eq!(radicand, BigInt::from(6));

        let (outside, radicand) = sqrt_factor(&BigInt::from(49));
        assert_eq!(outside, BigInt::from(7));
        assert_eq!(radicand, BigInt::from(1));
    }

    #[test]
    fn test_simplify_sqrt_of_fraction() {
        // sqrt(3/4) = (1/2)*3^(1/2)
        let expr = simplify_sqrt(&Number::ratio(3, 4));
        assert_eq!(
            expr,
            Expression::mul(vec![
                Expression::ratio(1, 2),
                Expression::pow(Expression::integer(3), Expression::ratio(1, 2)),
            ])
        );
    }

    #[test]
    fn test_invert_golden_ratio() {
        // 1 / ((1/2) + (1/2)*sqrt(5)) = -(1/2) + (1/2)*sqrt(5)
        let phi = Expression::add(vec![
            Expression::ratio(1, 2),
            Expression::mul(vec![
                Expression::ratio(1, 2),
                Expression::pow(Expression::integer(5), Expression::ratio(1, 2)),
            ]),
        ]);
        let inverse = invert_expression(&phi);
        let product = Expression::mul(vec![phi, inverse]);
        use crate::algebra::expand::Expand;
        assert_eq!(product.expand().simplify(), Expression::integer(1));
    }

    #[test]
    fn test_invert_pure_radical() {
        let sqrt5 = Expression::pow(Expression::integer(5), Expression::ratio(1, 2));
        let inverse = invert_expression(&sqrt5);
        let product = Expression::mul(vec![sqrt5, inverse]).simplify();
        assert_eq!(product, Expression::integer(1));
    }

    #[test]
    fn test_non_quadratic_falls_back() {
        let expr = Expression::add(vec![Expression::integer(1), Expression::n()]);
        let inverse = invert_expression(&expr);
        assert!(matches!(inverse, Expression::Pow(_, _)));
    }
}
