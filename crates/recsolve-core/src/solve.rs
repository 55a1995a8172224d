//! The solve pipeline: analyze, characteristic roots, general and particular
//! solutions, initial fit

pub mod analyzer;
pub mod characteristic;
pub mod homogeneous;
pub mod initial;
pub mod particular;
pub mod solver;
pub mod symbols;
pub mod undetermined;

pub use analyzer::{analyze, Recurrence};
pub use characteristic::characteristic_polynomial;
pub use homogeneous::{general_solution, GeneralSolution};
pub use particular::{build_template, ParticularTemplate};
pub use solver::{RecurrenceSolver, SolverConfig};
pub use symbols::SymbolGen;
pub use undetermined::solve_particular;
