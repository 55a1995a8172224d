//! Expression constructor methods

use super::Expression;
use crate::core::{Number, Symbol};
use num_rational::BigRational;

impl Expression {
    /// Create a number expression
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recsolve_core::{Expression, Number};
    ///
    /// let expr = Expression::number(Number::ratio(1, 2));
    /// ```
    pub fn number<T: Into<Number>>(value: T) -> Self {
        Self::Number(value.into())
    }

    /// Create an integer expression
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recsolve_core::Expression;
    ///
    /// let expr = Expression::integer(42);
    /// ```
    pub fn integer(value: i64) -> Self {
        Self::Number(Number::integer(value))
    }

    /// Create an exact rational expression from a numerator/denominator pair
    pub fn ratio(numer: i64, denom: i64) -> Self {
        Self::Number(Number::ratio(numer, denom))
    }

    /// Create a rational expression
    pub fn rational(value: BigRational) -> Self {
        Self::Number(Number::rational(value))
    }

    /// Create a symbol expression
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recsolve_core::{Expression, Symbol};
    ///
    /// let expr = Expression::symbol(Symbol::n());
    /// let expr = Expression::symbol("p_0_0");
    /// ```
    pub fn symbol<T: Into<Symbol>>(symbol: T) -> Self {
        Self::Symbol(symbol.into())
    }

    /// The domain variable `n`
    pub fn n() -> Self {
        Self::Symbol(Symbol::n())
    }

    /// The recurrence application `s(n - offset)`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recsolve_core::Expression;
    ///
    /// let prev = Expression::rec_call(1);
    /// assert_eq!(prev.to_string(), "s(n-1)");
    /// assert_eq!(Expression::rec_call(0).to_string(), "s(n)");
    /// ```
    pub fn rec_call(offset: u32) -> Self {
        Self::RecCall(offset)
    }

    /// Create an addition expression
    pub fn add(terms: Vec<Expression>) -> Self {
        Self::Add(Box::new(terms))
    }

    /// Create a multiplication expression
    pub fn mul(factors: Vec<Expression>) -> Self {
        Self::Mul(Box::new(factors))
    }

    /// Create a power expression
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recsolve_core::Expression;
    ///
    /// let squared = Expression::pow(Expression::n(), Expression::integer(2));
    /// let exponential = Expression::pow(Expression::integer(2), Expression::n());
    /// ```
    pub fn pow(base: Expression, exponent: Expression) -> Self {
        Self::Pow(Box::new(base), Box::new(exponent))
    }

    /// Negate an expression by prefixing a `-1` factor
    pub fn neg(expr: Expression) -> Self {
        Self::mul(vec![Self::integer(-1), expr])
    }

    /// Build `left - right`
    pub fn sub(left: Expression, right: Expression) -> Self {
        Self::add(vec![left, Self::neg(right)])
    }
}

impl From<Number> for Expression {
    fn from(value: Number) -> Self {
        Expression::Number(value)
    }
}

impl From<BigRational> for Expression {
    fn from(value: BigRational) -> Self {
        Expression::rational(value)
    }
}
