//! Undetermined-coefficients solve for the particular template
//!
//! Substitutes the template `P` into the recurrence residual
//! `sum_j c_j * P(n-j) - P(n) + F(n)`, expands, groups the result by
//! `(base, n-power)`, and solves the per-group linear equations for the `q`
//! coefficients exactly. Back-substitution must reduce the residual to zero.

use super::analyzer::Recurrence;
use super::particular::{classify_term, ParticularTemplate};
use crate::algebra::expand::Expand;
use crate::algebra::solve_rational;
use crate::core::{Expression, Symbol};
use crate::error::{SolveError, SolveResult};
use crate::simplify::Simplify;
use num_rational::BigRational;
use num_traits::Zero;
use std::collections::BTreeMap;

/// Solve for the template's coefficients and return the particular solution
pub fn solve_particular(
    recurrence: &Recurrence,
    template: &ParticularTemplate,
) -> SolveResult<Expression> {
    let residual = recurrence_residual(recurrence, &template.expression);
    let equations = group_residual(&residual, &template.symbols)?;

    let unknown_count = template.symbols.len();
    let mut matrix = Vec::with_capacity(equations.len());
    let mut rhs = Vec::with_capacity(equations.len());
    for (coefficients, constant) in &equations {
        let row: Vec<BigRational> = template
            .symbols
            .iter()
            .map(|symbol| coefficients.get(symbol).cloned().unwrap_or_else(BigRational::zero))
            .collect();
        debug_assert_eq!(row.len(), unknown_count);
        matrix.push(row);
        rhs.push(-constant.clone());
    }

    let solution = if matrix.is_empty() {
        // Residual already vanished; every template coefficient is free
        vec![BigRational::zero(); unknown_count]
    } else {
        solve_rational(matrix, rhs).ok_or(SolveError::UndeterminedSystemInconsistent)?
    };

    let bindings: BTreeMap<Symbol, Expression> = template
        .symbols
        .iter()
        .cloned()
        .zip(solution.into_iter().map(Expression::rational))
        .collect();

    // Back-substitution check: the residual must vanish identically
    let mut check = residual.clone();
    for (symbol, value) in &bindings {
        check = check.substitute_symbol(symbol, value);
    }
    let check = check.expand().simplify();
    if !check.is_zero() {
        return Err(SolveError::ResidualNonzero { residual: check });
    }

    let mut particular = template.expression.clone();
    for (symbol, value) in &bindings {
        particular = particular.substitute_symbol(symbol, value);
    }
    Ok(particular.expand().simplify())
}

/// Form `sum_j c_j * P(n-j) - P(n) + F(n)`, expanded and simplified
fn recurrence_residual(recurrence: &Recurrence, template: &Expression) -> Expression {
    let n = Symbol::n();
    let mut terms = Vec::with_capacity(recurrence.coefficients.len() + 2);

    for (offset, coefficient) in &recurrence.coefficients {
        let shifted_n = Expression::sub(Expression::n(), Expression::integer(*offset as i64));
        let shifted = template.substitute_symbol(&n, &shifted_n);
        terms.push(Expression::mul(vec![
            Expression::rational(coefficient.clone()),
            shifted,
        ]));
    }
    terms.push(Expression::neg(template.clone()));
    terms.push(recurrence.forcing.clone());

    Expression::add(terms).expand().simplify()
}

type GroupedEquation = (BTreeMap<Symbol, BigRational>, BigRational);

/// Group residual terms by `(base, degree)`; each group is one equation
/// `sum coeff_q * q + constant = 0`
fn group_residual(
    residual: &Expression,
    unknowns: &[Symbol],
) -> SolveResult<Vec<GroupedEquation>> {
    let terms: Vec<Expression> = match residual {
        Expression::Add(terms) => terms.as_ref().clone(),
        other if other.is_zero() => Vec::new(),
        other => vec![other.clone()],
    };

    let mut keys: Vec<(BigRational, u32)> = Vec::new();
    let mut groups: Vec<GroupedEquation> = Vec::new();

    for term in &terms {
        let shape = classify_term(term, true)?;
        if let Some(unknown) = &shape.unknown {
            if !unknowns.contains(unknown) {
                return Err(SolveError::ForcingUnsupported { term: term.clone() });
            }
        }

        let key = (shape.base.clone(), shape.degree);
        let position = match keys.iter().position(|k| *k == key) {
            Some(position) => position,
            None => {
                keys.push(key);
                groups.push((BTreeMap::new(), BigRational::zero()));
                keys.len() - 1
            }
        };

        let (coefficients, constant) = &mut groups[position];
        match shape.unknown {
            Some(unknown) => {
                *coefficients
                    .entry(unknown)
                    .or_insert_with(BigRational::zero) += shape.coefficient;
            }
            None => *constant += shape.coefficient,
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use crate::solve::analyzer::analyze;
    use crate::solve::characteristic::characteristic_polynomial;
    use crate::solve::particular::build_template;
    use crate::solve::symbols::SymbolGen;
    use crate::algebra::find_real_roots;

    fn recurrence(rhs: &str, conditions: &[(i64, i64)]) -> Recurrence {
        let parsed = parse_expression(rhs).unwrap();
        let initial: BTreeMap<i64, Expression> = conditions
            .iter()
            .map(|&(index, value)| (index, Expression::integer(value)))
            .collect();
        analyze(&parsed, &initial).unwrap()
    }

    #[test]
    fn test_exponential_plus_constant_forcing() {
        // s(n) = s(n-1) + 2^n + 1: particular is 2*2^n + n
        let rec = recurrence("s(n-1) + 2^n + 1", &[(0, 0)]);
        let roots = find_real_roots(&characteristic_polynomial(&rec)).unwrap();
        let mut generator = SymbolGen::new();
        let template = build_template(&rec.forcing, &roots, &mut generator)
            .unwrap()
            .unwrap();
        let particular = solve_particular(&rec, &template).unwrap();

        // Evaluate at a few points: P(n) = 2*2^n + n
        for n in 0..5 {
            let expected = 2.0 * 2.0_f64.powi(n as i32) + n as f64;
            assert_eq!(particular.eval_at(n).unwrap(), expected);
        }
    }

    #[test]
    fn test_resonant_exponential_forcing() {
        // s(n) = 2*s(n-1) + 2^n: base 2 is a root, template n*q*2^n
        let rec = recurrence("2*s(n-1) + 2^n", &[(0, 1)]);
        let roots = find_real_roots(&characteristic_polynomial(&rec)).unwrap();
        let mut generator = SymbolGen::new();
        let template = build_template(&rec.forcing, &roots, &mut generator)
            .unwrap()
            .unwrap();
        let particular = solve_particular(&rec, &template).unwrap();

        // P(n) = n * 2^n satisfies P(n) - 2 P(n-1) = 2^n
        for n in 1..6 {
            let expected = n as f64 * 2.0_f64.powi(n as i32);
            assert_eq!(particular.eval_at(n).unwrap(), expected);
        }
    }

    #[test]
    fn test_polynomial_forcing() {
        // s(n) = s(n-2) + (1/2) n^2 + (1/2) n
        let rec = recurrence("s(n-2) + 0.5*n^2 + 0.5*n", &[(0, 0), (1, 1)]);
        let roots = find_real_roots(&characteristic_polynomial(&rec)).unwrap();
        let mut generator = SymbolGen::new();
        let template = build_template(&rec.forcing, &roots, &mut generator)
            .unwrap()
            .unwrap();
        let particular = solve_particular(&rec, &template).unwrap();

        // The residual must vanish: P(n) - P(n-2) = (1/2) n^2 + (1/2) n
        for n in 2..8 {
            let lhs = particular.eval_at(n).unwrap() - particular.eval_at(n - 2).unwrap();
            let rhs = 0.5 * (n * n) as f64 + 0.5 * n as f64;
            assert!((lhs - rhs).abs() < 1e-9);
        }
    }
}
