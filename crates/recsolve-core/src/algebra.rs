//! Algebraic operations: expansion, polynomials, roots, and linear solving

pub mod expand;
pub mod linsolve;
pub mod polynomial;
pub mod radical;
pub mod roots;

pub use expand::Expand;
pub use linsolve::{solve_rational, solve_symbolic, LinSolveError};
pub use polynomial::RationalPoly;
pub use roots::{find_real_roots, RootsMap};
