//! Real-root extraction for characteristic polynomials
//!
//! Rational roots are found exactly through the rational root theorem and
//! peeled off with synthetic division to capture multiplicities. A leftover
//! quadratic factor is resolved by the quadratic formula with square-free
//! radicand extraction. Anything that would leave the reals unresolved is an
//! error: the multiplicities must sum to the polynomial degree.

use super::polynomial::RationalPoly;
use super::radical;
use crate::core::Expression;
use crate::error::{SolveError, SolveResult};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use std::collections::BTreeSet;

/// Ordered map from each real root to its multiplicity
///
/// Iteration order is the discovery order, which is deterministic for a
/// given input; downstream symbol assignment depends on this.
pub type RootsMap = Vec<(Expression, u32)>;

/// Find all real roots with multiplicities; the multiplicities sum to the
/// polynomial degree on success
pub fn find_real_roots(poly: &RationalPoly) -> SolveResult<RootsMap> {
    let mut roots: RootsMap = Vec::new();
    let mut work = poly.clone();

    // Roots at zero show up as trailing zero coefficients
    let zeros = work.trailing_zeros();
    if zeros > 0 {
        roots.push((Expression::integer(0), zeros as u32));
        work = work.shift_down(zeros);
    }

    for candidate in rational_candidates(&work)? {
        if work.degree() == 0 {
            break;
        }
        let mut multiplicity = 0u32;
        while work.degree() > 0 && work.eval(&candidate).is_zero() {
            work = work.deflate(&candidate);
            multiplicity += 1;
        }
        if multiplicity > 0 {
            roots.push((Expression::rational(candidate), multiplicity));
        }
    }

    match work.degree() {
        0 => Ok(roots),
        1 => {
            // A linear factor always has a rational root; the candidate scan
            // covers it, but deflation order can leave it here
            let root = -(work.coeff(0) / work.coeff(1));
            roots.push((Expression::rational(root), 1));
            Ok(roots)
        }
        2 => {
            let (plus, minus) = quadratic_roots(&work)?;
            push_root(&mut roots, plus);
            push_root(&mut roots, minus);
            Ok(roots)
        }
        4 => {
            // A quartic with no rational roots may still split into two
            // quadratics with rational coefficients
            let (first, second) =
                quartic_split(&work).ok_or_else(|| SolveError::ComplexRootsPresent {
                    detail: format!("irreducible quartic factor: {}", work),
                })?;
            for quadratic in [first, second] {
                let (plus, minus) = quadratic_roots(&quadratic)?;
                push_root(&mut roots, plus);
                push_root(&mut roots, minus);
            }
            Ok(roots)
        }
        degree => Err(SolveError::ComplexRootsPresent {
            detail: format!(
                "irreducible factor of degree {} without real rational roots: {}",
                degree, work
            ),
        }),
    }
}

/// Record a root, merging with an equal one already discovered
fn push_root(roots: &mut RootsMap, root: Expression) {
    if let Some((_, multiplicity)) = roots.iter_mut().find(|(seen, _)| *seen == root) {
        *multiplicity += 1;
    } else {
        roots.push((root, 1));
    }
}

/// Try to split a monic-equivalent quartic into two rational quadratics
///
/// Works on the depressed form `x^4 + P x^2 + Q x + R`: a factorization
/// `(x^2 + ax + b)(x^2 - ax + c)` exists with rational coefficients exactly
/// when the resolvent cubic `z^3 + 2P z^2 + (P^2 - 4R) z - Q^2` has a
/// rational root `z = a^2` that is a perfect square (or, for `Q = 0`, when
/// the biquadratic discriminant is a perfect square).
fn quartic_split(poly: &RationalPoly) -> Option<(RationalPoly, RationalPoly)> {
    let leading = poly.coeff(4);
    let p = poly.coeff(3) / &leading;
    let q = poly.coeff(2) / &leading;
    let s = poly.coeff(1) / &leading;
    let t = poly.coeff(0) / &leading;

    let rational = |n: i64, d: i64| BigRational::new(BigInt::from(n), BigInt::from(d));

    // Depress: r = x - p/4
    let p2 = &p * &p;
    let big_p = &q - rational(3, 8) * &p2;
    let big_q = &s - &q * &p / rational(2, 1) + &p2 * &p * rational(1, 8);
    let big_r = &t - &s * &p / rational(4, 1) + &q * &p2 * rational(1, 16)
        - &p2 * &p2 * rational(3, 256);

    let (alpha, beta, gamma) = if big_q.is_zero() {
        // Biquadratic: x^4 + P x^2 + R = (x^2 - w1)(x^2 - w2)
        let disc = &big_p * &big_p - rational(4, 1) * &big_r;
        if disc.is_negative() {
            return None;
        }
        let (outside, radicand) = radical::sqrt_rational(&disc);
        if radicand != BigInt::from(1) {
            return None;
        }
        let w1 = (-&big_p + &outside) / rational(2, 1);
        let w2 = (-&big_p - &outside) / rational(2, 1);
        (BigRational::zero(), -w1, -w2)
    } else {
        let resolvent = RationalPoly::new(vec![
            -(&big_q * &big_q),
            &big_p * &big_p - rational(4, 1) * &big_r,
            rational(2, 1) * &big_p,
            rational(1, 1),
        ]);
        let z = rational_candidates(&resolvent)
            .ok()?
            .into_iter()
            .find(|candidate| {
                candidate.is_positive()
                    && resolvent.eval(candidate).is_zero()
                    && radical::sqrt_rational(candidate).1 == BigInt::from(1)
            })?;
        let alpha = radical::sqrt_rational(&z).0;
        let beta = ((&big_p + &z) - &big_q / &alpha) / rational(2, 1);
        let gamma = ((&big_p + &z) + &big_q / &alpha) / rational(2, 1);
        (alpha, beta, gamma)
    };

    // Un-depress: x = r + p/4
    let quarter_p = &p / rational(4, 1);
    let build = |linear: BigRational, constant: BigRational| -> RationalPoly {
        RationalPoly::new(vec![
            &quarter_p * &quarter_p + &linear * &quarter_p + constant,
            rational(2, 1) * &quarter_p + linear,
            rational(1, 1),
        ])
    };

    Some((
        build(alpha.clone(), beta),
        build(-alpha, gamma),
    ))
}

/// Candidates `p/q` from the rational root theorem, in ascending order
fn rational_candidates(poly: &RationalPoly) -> SolveResult<BTreeSet<BigRational>> {
    let coeffs = poly.integer_coefficients();
    let constant = coeffs.first().cloned().unwrap_or_else(BigInt::zero);
    let leading = coeffs.last().cloned().unwrap_or_else(BigInt::zero);
    if constant.is_zero() || leading.is_zero() {
        return Ok(BTreeSet::new());
    }

    let numerators = divisors_of(&constant)?;
    let denominators = divisors_of(&leading)?;

    let mut candidates = BTreeSet::new();
    for p in &numerators {
        for q in &denominators {
            let value = BigRational::new(BigInt::from(*p), BigInt::from(*q));
            candidates.insert(value.clone());
            candidates.insert(-value);
        }
    }
    Ok(candidates)
}

/// Positive divisors of the absolute value
fn divisors_of(value: &BigInt) -> SolveResult<Vec<i128>> {
    let magnitude = value
        .abs()
        .to_i128()
        .filter(|m| *m <= 1_000_000_000_000)
        .ok_or_else(|| SolveError::ComplexRootsPresent {
            detail: "characteristic coefficients too large for root search".to_string(),
        })?;
    let mut divisors = Vec::new();
    let mut d: i128 = 1;
    while d * d <= magnitude {
        if magnitude % d == 0 {
            divisors.push(d);
            let paired = magnitude / d;
            if paired != d {
                divisors.push(paired);
            }
        }
        d += 1;
    }
    Ok(divisors)
}

/// Roots of a quadratic factor via the quadratic formula
///
/// Returns the `+` branch first. A negative discriminant is the complex-root
/// failure mode.
fn quadratic_roots(poly: &RationalPoly) -> SolveResult<(Expression, Expression)> {
    let a = poly.coeff(2);
    let b = poly.coeff(1);
    let c = poly.coeff(0);

    let four = BigRational::from_integer(BigInt::from(4));
    let two = BigRational::from_integer(BigInt::from(2));
    let discriminant = &b * &b - four * &a * &c;

    if discriminant.is_negative() {
        return Err(SolveError::ComplexRootsPresent {
            detail: format!("quadratic factor {} has discriminant {}", poly, discriminant),
        });
    }

    let center = -(&b / (&two * &a));
    if discriminant.is_zero() {
        // A rational double root; normally caught by the candidate scan
        let root = Expression::rational(center);
        return Ok((root.clone(), root));
    }

    let (scale, radicand) = radical::sqrt_rational(&discriminant);
    let offset = scale / (&two * &a);

    let radical_part = |coeff: BigRational| -> Expression {
        radical::QuadraticElement {
            rational: center.clone(),
            coeff,
            radicand: radicand.clone(),
        }
        .to_expression()
    };

    Ok((radical_part(offset.clone()), radical_part(-offset)))
}
