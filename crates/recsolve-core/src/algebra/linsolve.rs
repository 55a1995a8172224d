//! Exact linear-system solving
//!
//! Two elimination paths share one contract: under-determined systems get
//! their free unknowns fixed to zero, inconsistent systems are reported, and
//! everything stays exact. The rational path runs Gauss-Jordan over
//! `BigRational`; the symbolic path runs the same elimination over
//! simplified expressions so that initial-condition systems with radical
//! coefficients solve exactly as well.

use super::expand::Expand;
use super::radical;
use crate::core::{Expression, Number, Symbol};
use crate::simplify::Simplify;
use num_rational::BigRational;
use num_traits::Zero;
use std::collections::BTreeMap;

/// Failure modes of an elimination; callers map these onto their own error
/// kinds
#[derive(Debug, Clone, PartialEq)]
pub enum LinSolveError {
    /// A row reduced to `0 = nonzero`
    Inconsistent,
    /// An equation is not linear in the requested unknowns
    NonLinear(Expression),
}

/// Solve `A x = b` over the rationals by Gauss-Jordan elimination
///
/// Free unknowns are set to zero; returns `None` when the system is
/// inconsistent.
pub fn solve_rational(
    mut matrix: Vec<Vec<BigRational>>,
    mut rhs: Vec<BigRational>,
) -> Option<Vec<BigRational>> {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    let mut pivot_columns = Vec::new();
    let mut pivot_row = 0;

    for col in 0..cols {
        let Some(source) = (pivot_row..rows).find(|&r| !matrix[r][col].is_zero()) else {
            continue;
        };
        matrix.swap(pivot_row, source);
        rhs.swap(pivot_row, source);

        let pivot = matrix[pivot_row][col].clone();
        for entry in &mut matrix[pivot_row] {
            *entry /= &pivot;
        }
        rhs[pivot_row] /= &pivot;

        for row in 0..rows {
            if row == pivot_row || matrix[row][col].is_zero() {
                continue;
            }
            let factor = matrix[row][col].clone();
            for c in 0..cols {
                let delta = &factor * &matrix[pivot_row][c];
                matrix[row][c] -= delta;
            }
            let delta = &factor * &rhs[pivot_row];
            rhs[row] -= delta;
        }

        pivot_columns.push(col);
        pivot_row += 1;
        if pivot_row == rows {
            break;
        }
    }

    for row in pivot_row..rows {
        if !rhs[row].is_zero() {
            return None;
        }
    }

    let mut solution = vec![BigRational::zero(); cols];
    for (row, col) in pivot_columns.into_iter().enumerate() {
        // Free columns are zero, so the pivot value is the right-hand side
        solution[col] = rhs[row].clone();
    }
    Some(solution)
}

/// Solve linear equations (each understood as `expr = 0`) for `unknowns`
///
/// Equations must be expanded and simplified. When every coefficient is
/// rational the system is handed to [`solve_rational`]; otherwise the same
/// elimination runs over expressions, with divisions resolved by
/// quadratic-field conjugation where possible.
pub fn solve_symbolic(
    equations: &[Expression],
    unknowns: &[Symbol],
) -> Result<BTreeMap<Symbol, Expression>, LinSolveError> {
    let mut matrix: Vec<Vec<Expression>> = Vec::with_capacity(equations.len());
    let mut rhs: Vec<Expression> = Vec::with_capacity(equations.len());

    for equation in equations {
        let (coefficients, constant) = linear_decompose(equation, unknowns)?;
        matrix.push(coefficients);
        // Move the constant to the right-hand side
        rhs.push(Expression::neg(constant).simplify());
    }

    if let Some((rational_matrix, rational_rhs)) = all_rational(&matrix, &rhs) {
        let solution =
            solve_rational(rational_matrix, rational_rhs).ok_or(LinSolveError::Inconsistent)?;
        return Ok(unknowns
            .iter()
            .cloned()
            .zip(solution.into_iter().map(Expression::rational))
            .collect());
    }

    let solution = eliminate_symbolic(matrix, rhs)?;
    Ok(unknowns.iter().cloned().zip(solution).collect())
}

/// Split an equation into per-unknown coefficient expressions and a constant
fn linear_decompose(
    equation: &Expression,
    unknowns: &[Symbol],
) -> Result<(Vec<Expression>, Expression), LinSolveError> {
    let terms: Vec<Expression> = match equation {
        Expression::Add(terms) => terms.as_ref().clone(),
        other => vec![other.clone()],
    };

    let mut coefficient_terms: Vec<Vec<Expression>> = vec![Vec::new(); unknowns.len()];
    let mut constant_terms: Vec<Expression> = Vec::new();

    for term in terms {
        let mentioned: Vec<usize> = unknowns
            .iter()
            .enumerate()
            .filter(|&(_, sym)| term.mentions_symbol(sym))
            .map(|(idx, _)| idx)
            .collect();
        match mentioned.as_slice() {
            [] => constant_terms.push(term),
            [index] => {
                let coefficient = extract_linear_coefficient(&term, &unknowns[*index])
                    .ok_or_else(|| LinSolveError::NonLinear(term.clone()))?;
                coefficient_terms[*index].push(coefficient);
            }
            _ => return Err(LinSolveError::NonLinear(term)),
        }
    }

    let coefficients = coefficient_terms
        .into_iter()
        .map(|terms| Expression::add(terms).simplify())
        .collect();
    Ok((coefficients, Expression::add(constant_terms).simplify()))
}

/// Divide a term by an unknown that must occur exactly once, to the first
/// power, as a top-level factor
fn extract_linear_coefficient(term: &Expression, unknown: &Symbol) -> Option<Expression> {
    let target = Expression::Symbol(unknown.clone());
    match term {
        Expression::Symbol(_) if *term == target => Some(Expression::integer(1)),
        Expression::Mul(factors) => {
            let occurrences = factors.iter().filter(|f| **f == target).count();
            if occurrences != 1 {
                return None;
            }
            // Any other factor mentioning the unknown makes the term nonlinear
            if factors
                .iter()
                .any(|f| *f != target && f.mentions_symbol(unknown))
            {
                return None;
            }
            let rest: Vec<Expression> =
                factors.iter().filter(|f| **f != target).cloned().collect();
            Some(match rest.len() {
                0 => Expression::integer(1),
                1 => rest.into_iter().next().expect("single factor"),
                _ => Expression::mul(rest),
            })
        }
        _ => None,
    }
}

fn all_rational(
    matrix: &[Vec<Expression>],
    rhs: &[Expression],
) -> Option<(Vec<Vec<BigRational>>, Vec<BigRational>)> {
    let to_rational = |expr: &Expression| expr.as_number().map(Number::to_rational);
    let rational_matrix = matrix
        .iter()
        .map(|row| row.iter().map(to_rational).collect::<Option<Vec<_>>>())
        .collect::<Option<Vec<_>>>()?;
    let rational_rhs = rhs.iter().map(to_rational).collect::<Option<Vec<_>>>()?;
    Some((rational_matrix, rational_rhs))
}

/// Gauss-Jordan over simplified expressions
fn eliminate_symbolic(
    mut matrix: Vec<Vec<Expression>>,
    mut rhs: Vec<Expression>,
) -> Result<Vec<Expression>, LinSolveError> {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    let mut pivot_columns = Vec::new();
    let mut pivot_row = 0;

    let product = |a: &Expression, b: &Expression| -> Expression {
        // Simplify before expanding so a factor and its symbolic reciprocal
        // cancel through power combining instead of being distributed apart
        let direct = Expression::mul(vec![a.clone(), b.clone()]).simplify();
        direct.expand().simplify()
    };
    let difference = |a: &Expression, b: &Expression| -> Expression {
        Expression::sub(a.clone(), b.clone()).expand().simplify()
    };

    for col in 0..cols {
        let Some(source) = (pivot_row..rows).find(|&r| !matrix[r][col].is_zero()) else {
            continue;
        };
        matrix.swap(pivot_row, source);
        rhs.swap(pivot_row, source);

        let inverse = radical::invert_expression(&matrix[pivot_row][col]);
        for c in 0..cols {
            matrix[pivot_row][c] = product(&matrix[pivot_row][c], &inverse);
        }
        rhs[pivot_row] = product(&rhs[pivot_row], &inverse);

        for row in 0..rows {
            if row == pivot_row || matrix[row][col].is_zero() {
                continue;
            }
            let factor = matrix[row][col].clone();
            for c in 0..cols {
                let scaled = product(&factor, &matrix[pivot_row][c]);
                matrix[row][c] = difference(&matrix[row][c], &scaled);
            }
            let scaled = product(&factor, &rhs[pivot_row]);
            rhs[row] = difference(&rhs[row], &scaled);
        }

        pivot_columns.push(col);
        pivot_row += 1;
        if pivot_row == rows {
            break;
        }
    }

    for row in pivot_row..rows {
        if !rhs[row].is_zero() {
            return Err(LinSolveError::Inconsistent);
        }
    }

    let mut solution = vec![Expression::integer(0); cols];
    for (row, col) in pivot_columns.into_iter().enumerate() {
        solution[col] = rhs[row].clone();
    }
    Ok(solution)
}
