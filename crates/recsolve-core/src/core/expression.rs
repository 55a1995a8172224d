//! Expression type and core functionality

pub mod constructors;
pub mod display;
pub mod evaluation;
pub mod methods;

use crate::core::{Number, Symbol};
use serde::{Deserialize, Serialize};

/// Algebraic expression over rationals, symbols, and the recurrence symbol
///
/// `RecCall(j)` is the application `s(n - j)`; `j = 0` denotes `s(n)`
/// itself. Keeping it a first-class variant (instead of a generic function
/// node) lets the analyzer and the iteration evaluator pattern-match on it
/// directly.
///
/// Exponents that depend on `n` only ever appear as `Pow(base, n)` with a
/// rational `base` after expansion; everything else `(·)^n` is rejected by
/// the analyzer or the forcing classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Number(Number),
    Symbol(Symbol),
    RecCall(u32),
    Add(Box<Vec<Expression>>),
    Mul(Box<Vec<Expression>>),
    Pow(Box<Expression>, Box<Expression>),
}
