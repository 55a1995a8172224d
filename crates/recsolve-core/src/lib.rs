//! Symbolic solver core for linear recurrence relations
//!
//! Takes a recurrence `s(n) = <rhs>` with constant coefficients plus a
//! contiguous block of initial conditions, and produces a closed-form
//! expression in `n` that reproduces the recurrence's trajectory:
//!
//! ```rust
//! use recsolve_core::parser::input::parse_input;
//! use recsolve_core::solve::RecurrenceSolver;
//!
//! let input = parse_input(
//!     "eqs :=\n[\ns(n) = 6*s(n-1) - 9*s(n-2),\ns(0) = 1,\ns(1) = 6\n];\n",
//! )
//! .unwrap();
//! let mut solver = RecurrenceSolver::new(&input).unwrap();
//! let closed_form = solver.solve().unwrap();
//! assert_eq!(closed_form.eval_at(4).unwrap(), 405.0);
//! ```
//!
//! The pipeline is strictly top-down: the analyzer classifies the equation
//! into homogeneous part, forcing, and order; the characteristic equation's
//! real roots (with multiplicities) generate the homogeneous solution; the
//! method of undetermined coefficients handles forcing built from constants,
//! polynomials in `n`, and exponentials `b^n`; and two exact linear solves
//! fix the particular coefficients and the initial conditions.

pub mod algebra;
pub mod core;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod simplify;
pub mod solve;
pub mod verify;

// Core types (most commonly used)
pub use crate::core::{Expression, Number, Symbol};

// Algebra traits and key types
pub use crate::algebra::{Expand, RationalPoly, RootsMap};

// Solver entry points
pub use crate::solve::{RecurrenceSolver, SolverConfig};

// Error types
pub use crate::error::{SolveError, SolveResult};

// Simplification
pub use crate::simplify::Simplify;
