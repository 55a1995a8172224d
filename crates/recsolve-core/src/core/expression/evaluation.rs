//! Numeric evaluation of expressions
//!
//! Two evaluation modes: exact rational evaluation (fails on fractional
//! exponents, i.e. radicals) and floating-point evaluation for the
//! verification boundary.

use super::Expression;
use crate::core::Symbol;
use crate::error::{SolveError, SolveResult};
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use std::collections::BTreeMap;

impl Expression {
    /// Evaluate to an exact rational under the given symbol bindings
    ///
    /// Fails when the expression contains an unbound symbol, a recurrence
    /// call, or a power that does not resolve to an integer exponent (for
    /// example a square root).
    pub fn eval_exact(&self, bindings: &BTreeMap<Symbol, BigRational>) -> SolveResult<BigRational> {
        match self {
            Expression::Number(num) => Ok(num.to_rational()),
            Expression::Symbol(sym) => bindings.get(sym).cloned().ok_or_else(|| {
                SolveError::EvaluationFailed {
                    expression: self.clone(),
                    reason: format!("unbound symbol {}", sym),
                }
            }),
            Expression::RecCall(_) => Err(SolveError::EvaluationFailed {
                expression: self.clone(),
                reason: "recurrence call in evaluated expression".to_string(),
            }),
            Expression::Add(terms) => {
                let mut sum = BigRational::zero();
                for term in terms.iter() {
                    sum += term.eval_exact(bindings)?;
                }
                Ok(sum)
            }
            Expression::Mul(factors) => {
                let mut product = BigRational::from_integer(1.into());
                for factor in factors.iter() {
                    product *= factor.eval_exact(bindings)?;
                }
                Ok(product)
            }
            Expression::Pow(base, exponent) => {
                let base_value = base.eval_exact(bindings)?;
                let exp_value = exponent.eval_exact(bindings)?;
                if !exp_value.is_integer() {
                    return Err(SolveError::EvaluationFailed {
                        expression: self.clone(),
                        reason: format!("non-integer exponent {}", exp_value),
                    });
                }
                let exp_int = exp_value.to_integer().to_i64().ok_or_else(|| {
                    SolveError::EvaluationFailed {
                        expression: self.clone(),
                        reason: "exponent out of range".to_string(),
                    }
                })?;
                if base_value.is_zero() && exp_int < 0 {
                    return Err(SolveError::EvaluationFailed {
                        expression: self.clone(),
                        reason: "zero raised to a negative power".to_string(),
                    });
                }
                if base_value.is_zero() {
                    return Ok(if exp_int == 0 {
                        BigRational::from_integer(1.into())
                    } else {
                        BigRational::zero()
                    });
                }
                let magnitude = exp_int.unsigned_abs().min(u32::MAX as u64) as u32;
                let powered = BigRational::new(
                    num_traits::pow::Pow::pow(base_value.numer(), magnitude),
                    num_traits::pow::Pow::pow(base_value.denom(), magnitude),
                );
                Ok(if exp_int < 0 { powered.recip() } else { powered })
            }
        }
    }

    /// Evaluate to a floating-point value under the given symbol bindings
    ///
    /// Radicals evaluate through `f64::powf`; negative bases with fractional
    /// exponents are rejected rather than silently producing NaN.
    pub fn eval_f64(&self, bindings: &BTreeMap<Symbol, f64>) -> SolveResult<f64> {
        match self {
            Expression::Number(num) => Ok(num.to_f64()),
            Expression::Symbol(sym) => {
                bindings
                    .get(sym)
                    .copied()
                    .ok_or_else(|| SolveError::EvaluationFailed {
                        expression: self.clone(),
                        reason: format!("unbound symbol {}", sym),
                    })
            }
            Expression::RecCall(_) => Err(SolveError::EvaluationFailed {
                expression: self.clone(),
                reason: "recurrence call in evaluated expression".to_string(),
            }),
            Expression::Add(terms) => {
                let mut sum = 0.0;
                for term in terms.iter() {
                    sum += term.eval_f64(bindings)?;
                }
                Ok(sum)
            }
            Expression::Mul(factors) => {
                let mut product = 1.0;
                for factor in factors.iter() {
                    product *= factor.eval_f64(bindings)?;
                }
                Ok(product)
            }
            Expression::Pow(base, exponent) => {
                let base_value = base.eval_f64(bindings)?;
                let exp_value = exponent.eval_f64(bindings)?;
                let result = if exp_value.fract() == 0.0 && exp_value.abs() < i32::MAX as f64 {
                    base_value.powi(exp_value as i32)
                } else {
                    base_value.powf(exp_value)
                };
                if result.is_nan() {
                    return Err(SolveError::EvaluationFailed {
                        expression: self.clone(),
                        reason: format!("{}^{} is not a real number", base_value, exp_value),
                    });
                }
                Ok(result)
            }
        }
    }

    /// Evaluate a closed form in `n` at an integer point, exactly if the
    /// expression is radical-free and through `f64` otherwise
    pub fn eval_at(&self, n: i64) -> SolveResult<f64> {
        let mut exact_bindings = BTreeMap::new();
        exact_bindings.insert(Symbol::n(), BigRational::from_integer(n.into()));
        match self.eval_exact(&exact_bindings) {
            Ok(value) => value
                .to_f64()
                .ok_or_else(|| SolveError::EvaluationFailed {
                    expression: self.clone(),
                    reason: "value out of f64 range".to_string(),
                }),
            Err(_) => {
                let mut bindings = BTreeMap::new();
                bindings.insert(Symbol::n(), n as f64);
                self.eval_f64(&bindings)
            }
        }
    }
}
