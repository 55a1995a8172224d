//! Exact number type for recurrence computations

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Unified exact number type supporting machine integers, big integers, and
/// rationals
///
/// There is no float variant: the solver works over exact rationals, and
/// decimal input literals are converted to rationals at parse time. Floating
/// point only appears at the verification boundary via [`Number::to_f64`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Number {
    Integer(i64),
    BigInteger(Box<BigInt>),
    Rational(Box<BigRational>),
}

impl Number {
    /// Create an integer number
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recsolve_core::Number;
    ///
    /// let num = Number::integer(42);
    /// assert!(!num.is_zero());
    /// ```
    pub fn integer(value: i64) -> Self {
        Self::Integer(value)
    }

    /// Create a rational number, normalizing integral values down to the
    /// integer variants
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recsolve_core::Number;
    /// use num_bigint::BigInt;
    /// use num_rational::BigRational;
    ///
    /// let half = Number::rational(BigRational::new(BigInt::from(1), BigInt::from(2)));
    /// let two = Number::rational(BigRational::new(BigInt::from(4), BigInt::from(2)));
    /// assert_eq!(two, Number::integer(2));
    /// assert_ne!(half, Number::integer(0));
    /// ```
    pub fn rational(value: BigRational) -> Self {
        if value.is_integer() {
            let n = value.to_integer();
            match n.to_i64() {
                Some(small) => Self::Integer(small),
                None => Self::BigInteger(Box::new(n)),
            }
        } else {
            Self::Rational(Box::new(value))
        }
    }

    /// Create a rational from a numerator/denominator pair
    ///
    /// Panics if `denom` is zero, like `BigRational::new`.
    pub fn ratio(numer: i64, denom: i64) -> Self {
        Self::rational(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(i) => *i == 0,
            Number::BigInteger(bi) => bi.is_zero(),
            Number::Rational(r) => r.is_zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Number::Integer(i) => *i == 1,
            Number::BigInteger(bi) => bi.is_one(),
            Number::Rational(r) => r.is_one(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Integer(i) => *i < 0,
            Number::BigInteger(bi) => bi.is_negative(),
            Number::Rational(r) => r.is_negative(),
        }
    }

    /// View as an exact rational
    pub fn to_rational(&self) -> BigRational {
        match self {
            Number::Integer(i) => BigRational::from_integer(BigInt::from(*i)),
            Number::BigInteger(bi) => BigRational::from_integer(bi.as_ref().clone()),
            Number::Rational(r) => r.as_ref().clone(),
        }
    }

    /// Return the value as `i64` if it is an integer in range
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::BigInteger(bi) => bi.to_i64(),
            Number::Rational(_) => None,
        }
    }

    /// Lossy conversion for the numeric-verification boundary
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::BigInteger(bi) => bi.to_f64().unwrap_or(f64::INFINITY),
            Number::Rational(r) => r.to_f64().unwrap_or(f64::INFINITY),
        }
    }

    /// Exact integer power with promotion to big integers on overflow
    ///
    /// Returns `None` only for `0` raised to a negative exponent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recsolve_core::Number;
    ///
    /// assert_eq!(Number::integer(2).checked_pow(10), Some(Number::integer(1024)));
    /// assert_eq!(Number::integer(2).checked_pow(-1), Some(Number::ratio(1, 2)));
    /// assert_eq!(Number::integer(0).checked_pow(-1), None);
    /// ```
    pub fn checked_pow(&self, exp: i64) -> Option<Number> {
        if exp == 0 {
            return Some(Number::integer(1));
        }
        if self.is_zero() {
            if exp > 0 {
                return Some(Number::integer(0));
            }
            return None;
        }
        let magnitude = exp.unsigned_abs().min(u32::MAX as u64) as u32;
        let base = self.to_rational();
        let powered = BigRational::new(
            num_traits::pow::Pow::pow(base.numer(), magnitude),
            num_traits::pow::Pow::pow(base.denom(), magnitude),
        );
        let result = if exp < 0 { powered.recip() } else { powered };
        Some(Number::rational(result))
    }

    /// Exact reciprocal; `None` for zero
    pub fn recip(&self) -> Option<Number> {
        if self.is_zero() {
            None
        } else {
            Some(Number::rational(self.to_rational().recip()))
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        match value.to_i64() {
            Some(small) => Number::Integer(small),
            None => Number::BigInteger(Box::new(value)),
        }
    }
}

impl From<BigRational> for Number {
    fn from(value: BigRational) -> Self {
        Number::rational(value)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            _ => self.to_rational() == other.to_rational(),
        }
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a.cmp(b),
            _ => self.to_rational().cmp(&other.to_rational()),
        }
    }
}

impl Add for &Number {
    type Output = Number;

    fn add(self, rhs: &Number) -> Number {
        if let (Number::Integer(a), Number::Integer(b)) = (self, rhs) {
            if let Some(sum) = a.checked_add(*b) {
                return Number::Integer(sum);
            }
        }
        Number::rational(self.to_rational() + rhs.to_rational())
    }
}

impl Sub for &Number {
    type Output = Number;

    fn sub(self, rhs: &Number) -> Number {
        if let (Number::Integer(a), Number::Integer(b)) = (self, rhs) {
            if let Some(diff) = a.checked_sub(*b) {
                return Number::Integer(diff);
            }
        }
        Number::rational(self.to_rational() - rhs.to_rational())
    }
}

impl Mul for &Number {
    type Output = Number;

    fn mul(self, rhs: &Number) -> Number {
        if let (Number::Integer(a), Number::Integer(b)) = (self, rhs) {
            if let Some(product) = a.checked_mul(*b) {
                return Number::Integer(product);
            }
        }
        Number::rational(self.to_rational() * rhs.to_rational())
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Integer(i) if *i != i64::MIN => Number::Integer(-i),
            _ => Number::rational(-self.to_rational()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::BigInteger(bi) => write!(f, "{}", bi),
            Number::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
        }
    }
}
