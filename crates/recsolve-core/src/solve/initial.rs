//! Initial-conditions fit
//!
//! Substitutes the candidate closed form `S(n) = particular + general` into
//! each initial condition, producing one linear equation per condition in
//! the `p` coefficients. Characteristic roots may be radicals, so the system
//! goes through the symbolic elimination path when needed.

use super::analyzer::Recurrence;
use crate::algebra::expand::Expand;
use crate::algebra::{solve_symbolic, LinSolveError};
use crate::core::{Expression, Symbol};
use crate::error::{SolveError, SolveResult};
use crate::simplify::Simplify;

/// Fix the general-solution coefficients from the initial conditions and
/// return the finished closed form
pub fn fit_initial_conditions(
    recurrence: &Recurrence,
    candidate: &Expression,
    unknowns: &[Symbol],
) -> SolveResult<Expression> {
    let n = Symbol::n();
    let mut equations = Vec::with_capacity(recurrence.initial_conditions.len());

    for (index, value) in &recurrence.initial_conditions {
        let at_index = candidate
            .substitute_symbol(&n, &Expression::integer(*index))
            .expand()
            .simplify();
        let equation = Expression::add(vec![
            at_index,
            Expression::rational(-value.clone()),
        ])
        .simplify();
        equations.push(equation);
    }

    let solution = solve_symbolic(&equations, unknowns).map_err(|error| match error {
        LinSolveError::Inconsistent => SolveError::InitialSystemInconsistent {
            detail: "conditions contradict the recurrence family".to_string(),
        },
        LinSolveError::NonLinear(term) => SolveError::InitialSystemInconsistent {
            detail: format!("system is not linear in the coefficients at {}", term),
        },
    })?;

    let mut closed_form = candidate.clone();
    for (symbol, value) in &solution {
        closed_form = closed_form.substitute_symbol(symbol, value);
    }
    Ok(closed_form.expand().simplify())
}
