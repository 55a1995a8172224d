//! Solve orchestration
//!
//! One `RecurrenceSolver` is bound to one recurrence. The pipeline is
//! strictly top-down: analyze, characteristic roots, general solution,
//! particular solution when forcing is present, initial fit, simplify. The
//! closed form is cached, so solving twice yields identical output.

use super::analyzer::{analyze, Recurrence};
use super::characteristic::characteristic_polynomial;
use super::homogeneous::general_solution;
use super::initial::fit_initial_conditions;
use super::particular::build_template;
use super::symbols::SymbolGen;
use super::undetermined::solve_particular;
use crate::algebra::expand::Expand;
use crate::algebra::find_real_roots;
use crate::core::Expression;
use crate::error::SolveResult;
use crate::parser::input::ParsedInput;
use crate::simplify::Simplify;
use num_rational::BigRational;
use std::collections::BTreeMap;

/// Solver tunables
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Evaluate closed forms exactly where possible before falling back to
    /// floating point
    pub prefer_exact: bool,
    /// Run a final expand-and-simplify pass over the fitted closed form
    pub simplify_after_solve: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            prefer_exact: true,
            simplify_after_solve: true,
        }
    }
}

/// Symbolic solver for one linear recurrence with constant coefficients
#[derive(Debug)]
pub struct RecurrenceSolver {
    recurrence: Recurrence,
    config: SolverConfig,
    closed_form: Option<Expression>,
    pub(crate) iteration_memo: Vec<BigRational>,
}

impl RecurrenceSolver {
    /// Analyze a parsed input file into a solver instance
    pub fn new(input: &ParsedInput) -> SolveResult<Self> {
        Self::with_config(input, SolverConfig::default())
    }

    pub fn with_config(input: &ParsedInput, config: SolverConfig) -> SolveResult<Self> {
        let recurrence = analyze(&input.recurrence_rhs, &input.initial)?;
        Ok(Self {
            recurrence,
            config,
            closed_form: None,
            iteration_memo: Vec::new(),
        })
    }

    /// Build a solver from an already-analyzed recurrence
    pub fn from_recurrence(recurrence: Recurrence) -> Self {
        Self {
            recurrence,
            config: SolverConfig::default(),
            closed_form: None,
            iteration_memo: Vec::new(),
        }
    }

    pub fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve (or return the cached) closed form
    pub fn solve(&mut self) -> SolveResult<Expression> {
        if let Some(closed_form) = &self.closed_form {
            return Ok(closed_form.clone());
        }
        let closed_form = self.compute()?;
        self.closed_form = Some(closed_form.clone());
        Ok(closed_form)
    }

    fn compute(&self) -> SolveResult<Expression> {
        let recurrence = &self.recurrence;
        let mut symbols = SymbolGen::new();

        let char_poly = characteristic_polynomial(recurrence);
        log::debug!("characteristic polynomial: {}", char_poly);

        let roots = find_real_roots(&char_poly)?;
        log::debug!(
            "characteristic roots: {}",
            roots
                .iter()
                .map(|(root, multiplicity)| format!("{} (x{})", root, multiplicity))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let general = general_solution(&roots, &mut symbols);

        let particular = match build_template(&recurrence.forcing, &roots, &mut symbols)? {
            Some(template) => {
                log::debug!("particular template: {}", template.expression);
                solve_particular(recurrence, &template)?
            }
            None => Expression::integer(0),
        };

        let candidate = Expression::add(vec![particular, general.expression]);
        let closed_form = fit_initial_conditions(recurrence, &candidate, &general.symbols)?;

        let closed_form = if self.config.simplify_after_solve {
            closed_form.expand().simplify()
        } else {
            closed_form
        };
        log::debug!("closed form: {}", closed_form);
        Ok(closed_form)
    }

    /// Exact forcing value at a concrete index
    pub(crate) fn forcing_at(&self, index: i64) -> SolveResult<BigRational> {
        let mut bindings = BTreeMap::new();
        bindings.insert(crate::core::Symbol::n(), BigRational::from_integer(index.into()));
        self.recurrence.forcing.eval_exact(&bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::input::parse_input;

    fn solver_for(text: &str) -> RecurrenceSolver {
        RecurrenceSolver::new(&parse_input(text).unwrap()).unwrap()
    }

    #[test]
    fn test_solve_is_cached_and_idempotent() {
        let mut solver =
            solver_for("eqs :=\n[\ns(n) = 6*s(n-1) - 9*s(n-2),\ns(0) = 1,\ns(1) = 6\n];\n");
        let first = solver.solve().unwrap();
        let second = solver.solve().unwrap();
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_repeated_root_closed_form() {
        // s(n) = 6 s(n-1) - 9 s(n-2), s(0)=1, s(1)=6 -> (1+n)*3^n
        let mut solver =
            solver_for("eqs :=\n[\ns(n) = 6*s(n-1) - 9*s(n-2),\ns(0) = 1,\ns(1) = 6\n];\n");
        let closed = solver.solve().unwrap();
        assert_eq!(closed.eval_at(4).unwrap(), 405.0);
    }

    #[test]
    fn test_complex_roots_error() {
        let mut solver = solver_for("eqs :=\n[\ns(n) = -s(n-2),\ns(0) = 1,\ns(1) = 1\n];\n");
        assert!(matches!(
            solver.solve(),
            Err(crate::error::SolveError::ComplexRootsPresent { .. })
        ));
    }
}
