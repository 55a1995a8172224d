//! Dense univariate polynomials with rational coefficients

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::fmt;

/// Univariate polynomial in the characteristic variable `r`
///
/// Coefficients are stored densely, `coeffs[i]` multiplying `r^i`, with the
/// leading coefficient nonzero.
#[derive(Debug, Clone, PartialEq)]
pub struct RationalPoly {
    coeffs: Vec<BigRational>,
}

impl RationalPoly {
    /// Build from coefficients in ascending degree order, trimming leading
    /// zeros
    pub fn new(mut coeffs: Vec<BigRational>) -> Self {
        while coeffs.len() > 1 && coeffs.last().is_some_and(Zero::is_zero) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(BigRational::zero());
        }
        Self { coeffs }
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_zero()
    }

    pub fn coeff(&self, power: usize) -> BigRational {
        self.coeffs.get(power).cloned().unwrap_or_else(BigRational::zero)
    }

    /// Horner evaluation
    pub fn eval(&self, point: &BigRational) -> BigRational {
        let mut acc = BigRational::zero();
        for coeff in self.coeffs.iter().rev() {
            acc = acc * point + coeff;
        }
        acc
    }

    /// Exact division by the linear factor `r - root`
    ///
    /// The caller must ensure `root` actually is a root; the zero remainder
    /// is asserted in debug builds.
    pub fn deflate(&self, root: &BigRational) -> RationalPoly {
        let mut quotient = vec![BigRational::zero(); self.degree().max(1)];
        let mut carry = BigRational::zero();
        for (power, coeff) in self.coeffs.iter().enumerate().rev() {
            if power == 0 {
                debug_assert!((coeff + &carry * root).is_zero());
                break;
            }
            let q = coeff + &carry * root;
            quotient[power - 1] = q.clone();
            carry = q;
        }
        RationalPoly::new(quotient)
    }

    /// Drop a factor of `r^count`
    pub fn shift_down(&self, count: usize) -> RationalPoly {
        RationalPoly::new(self.coeffs.iter().skip(count).cloned().collect())
    }

    /// Number of trailing zero coefficients (multiplicity of the root 0)
    pub fn trailing_zeros(&self) -> usize {
        if self.is_zero() {
            return 0;
        }
        self.coeffs.iter().take_while(|c| c.is_zero()).count()
    }

    /// Scale to integer coefficients by the common denominator
    pub fn integer_coefficients(&self) -> Vec<BigInt> {
        let mut common = BigInt::one();
        for coeff in &self.coeffs {
            common = common.lcm(coeff.denom());
        }
        self.coeffs
            .iter()
            .map(|coeff| coeff.numer() * (&common / coeff.denom()))
            .collect()
    }
}

impl fmt::Display for RationalPoly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (power, coeff) in self.coeffs.iter().enumerate().rev() {
            if coeff.is_zero() && self.degree() > 0 {
                continue;
            }
            if first {
                first = false;
            } else if coeff.is_negative() {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            let magnitude = if first || !coeff.is_negative() {
                coeff.clone()
            } else {
                -coeff.clone()
            };
            match power {
                0 => write!(f, "{}", magnitude)?,
                1 if magnitude.is_one() => write!(f, "r")?,
                1 => write!(f, "{}*r", magnitude)?,
                _ if magnitude.is_one() => write!(f, "r^{}", power)?,
                _ => write!(f, "{}*r^{}", magnitude, power)?,
            }
        }
        Ok(())
    }
}
