//! Error types for recurrence analysis and solving
//!
//! This module defines the error conditions a recurrence solve can surface:
//! constraint violations in the input, unsupported mathematical shapes, and
//! inconsistent linear systems. The solver never retries; every error carries
//! the offending sub-expression or detail for the message.

use crate::core::Expression;
use std::fmt;

/// Errors surfaced by the recurrence solver core
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The input references an unsupported construct
    ///
    /// # Examples
    ///
    /// - `s(n-n)` or `s(n+1)` inside a recurrence call
    /// - `s(n)` appearing on the right-hand side
    ParseConstraintViolated {
        construct: String,
    },

    /// The analyzer detected `s`-products, `s`-powers, or an `s` term with a
    /// non-constant coefficient
    NonLinear {
        term: Expression,
    },

    /// Real root multiplicities of the characteristic polynomial do not sum
    /// to the recurrence order
    ComplexRootsPresent {
        detail: String,
    },

    /// A forcing term falls outside `{rational, n^d, b^n, products thereof}`
    ForcingUnsupported {
        term: Expression,
    },

    /// The particular-coefficients system has no solution
    UndeterminedSystemInconsistent,

    /// The initial-conditions system has no solution
    ///
    /// Covers contradictory conditions as well as a non-contiguous or
    /// wrongly-sized block of initial indices.
    InitialSystemInconsistent {
        detail: String,
    },

    /// After substituting solved coefficients, the recurrence residual does
    /// not simplify to zero
    ResidualNonzero {
        residual: Expression,
    },

    /// An expression could not be evaluated numerically
    ///
    /// # Examples
    ///
    /// - an unbound symbol left in a closed form
    /// - `0^(-1)` during iteration
    EvaluationFailed {
        expression: Expression,
        reason: String,
    },

    /// Closed-form and iterative evaluation disagree beyond the tolerance
    VerificationFailed {
        at: i64,
        closed: f64,
        iterative: f64,
    },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolveError::ParseConstraintViolated { construct } => {
                write!(f, "Unsupported construct in input: {}", construct)
            }
            SolveError::NonLinear { term } => {
                write!(f, "Recurrence is not linear at term: {}", term)
            }
            SolveError::ComplexRootsPresent { detail } => {
                write!(f, "Unsupported: complex roots ({})", detail)
            }
            SolveError::ForcingUnsupported { term } => {
                write!(f, "Unsupported forcing term: {}", term)
            }
            SolveError::UndeterminedSystemInconsistent => {
                write!(f, "Particular-coefficients system has no solution")
            }
            SolveError::InitialSystemInconsistent { detail } => {
                write!(f, "Initial-conditions system has no solution: {}", detail)
            }
            SolveError::ResidualNonzero { residual } => {
                write!(
                    f,
                    "Particular-solution back-substitution did not reduce: residual {}",
                    residual
                )
            }
            SolveError::EvaluationFailed { expression, reason } => {
                write!(f, "Evaluation failed for {}: {}", expression, reason)
            }
            SolveError::VerificationFailed {
                at,
                closed,
                iterative,
            } => {
                write!(
                    f,
                    "Verification failed at n = {}: closed form {} vs iteration {}",
                    at, closed, iterative
                )
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// Type alias for solver operations that can fail
pub type SolveResult<T> = Result<T, SolveError>;
