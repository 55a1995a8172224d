//! Numeric verification of solved closed forms
//!
//! Cross-checks closed-form evaluation against bottom-up iteration of the
//! recurrence. Iteration is exact rational arithmetic with memoized values;
//! the closed form evaluates exactly when it is radical-free and through
//! `f64` otherwise.

use crate::core::Symbol;
use crate::error::{SolveError, SolveResult};
use crate::solve::RecurrenceSolver;
use num_rational::BigRational;
use num_traits::ToPrimitive;
use std::collections::BTreeMap;

impl RecurrenceSolver {
    /// Evaluate the closed form at `n`, solving first if necessary
    ///
    /// With `prefer_exact` set, a radical-free closed form is evaluated in
    /// exact rational arithmetic and converted at the boundary.
    pub fn evaluate_closed_form(&mut self, index: i64) -> SolveResult<f64> {
        let closed_form = self.solve()?;
        if self.config().prefer_exact {
            closed_form.eval_at(index)
        } else {
            let mut bindings = BTreeMap::new();
            bindings.insert(Symbol::n(), index as f64);
            closed_form.eval_f64(&bindings)
        }
    }

    /// Evaluate the closed form exactly; fails when radicals remain
    pub fn evaluate_closed_form_exact(&mut self, index: i64) -> SolveResult<BigRational> {
        let closed_form = self.solve()?;
        let mut bindings = BTreeMap::new();
        bindings.insert(Symbol::n(), BigRational::from_integer(index.into()));
        closed_form.eval_exact(&bindings)
    }

    /// Compute `s(index)` by unrolling the recurrence from the initial
    /// conditions, memoizing every intermediate value
    pub fn evaluate_by_iteration(&mut self, index: i64) -> SolveResult<BigRational> {
        let lower = self.recurrence().lower_bound();
        if index < lower {
            return Err(SolveError::EvaluationFailed {
                expression: self.recurrence().forcing.clone(),
                reason: format!("index {} is below the domain lower bound {}", index, lower),
            });
        }

        let position = (index - lower) as usize;
        while self.iteration_memo.len() <= position {
            let current = lower + self.iteration_memo.len() as i64;
            let value = match self.recurrence().initial_conditions.get(&current) {
                Some(value) => value.clone(),
                None => {
                    let mut sum = self.forcing_at(current)?;
                    let coefficients = self.recurrence().coefficients.clone();
                    for (offset, coefficient) in coefficients {
                        let back = (current - offset as i64 - lower) as usize;
                        sum += coefficient * &self.iteration_memo[back];
                    }
                    sum
                }
            };
            self.iteration_memo.push(value);
        }

        Ok(self.iteration_memo[position].clone())
    }

    /// Check closed-form against iterative evaluation over
    /// `[lower, lower + count)` within `10^(-precision)`
    ///
    /// Large magnitudes are compared relative to the iterative value, since
    /// `f64` cannot hold an absolute error bound past its mantissa.
    pub fn verify_range(&mut self, count: u32, precision: u32) -> SolveResult<()> {
        let tolerance = 10f64.powi(-(precision as i32));
        let lower = self.recurrence().lower_bound();

        for index in lower..lower + count as i64 {
            let closed = self.evaluate_closed_form(index)?;
            let iterative_exact = self.evaluate_by_iteration(index)?;
            let iterative = iterative_exact.to_f64().unwrap_or(f64::INFINITY);
            let scale = iterative.abs().max(1.0);
            if (closed - iterative).abs() > tolerance * scale {
                return Err(SolveError::VerificationFailed {
                    at: index,
                    closed,
                    iterative,
                });
            }
        }
        log::debug!("verified {} values to {} decimal places", count, precision);
        Ok(())
    }
}
