//! Recurrence analysis: order, coefficients, forcing, and linearity
//!
//! The analyzer walks the expanded right-hand side of `s(n) = <rhs>`. Terms
//! mentioning the recurrence symbol form the homogeneous part and must be
//! `c * s(n-j)` with a rational `c`; everything else is forcing. Any term
//! where `s` appears under a power, twice in one product, or multiplied by
//! `n` is fatal.

use crate::algebra::expand::Expand;
use crate::core::{Expression, Symbol};
use crate::error::{SolveError, SolveResult};
use crate::simplify::Simplify;
use num_rational::BigRational;
use num_traits::Zero;
use std::collections::BTreeMap;

/// A classified linear recurrence with constant coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct Recurrence {
    /// Order `k`: the largest offset `j` in `s(n-j)`
    pub order: u32,
    /// Coefficient of `s(n-j)` keyed by `j`; absent entries are zero
    pub coefficients: BTreeMap<u32, BigRational>,
    /// The non-homogeneous part `F(n)`, simplified; zero when homogeneous
    pub forcing: Expression,
    /// Initial conditions `s(i) = v` for a contiguous block of `k` indices
    pub initial_conditions: BTreeMap<i64, BigRational>,
}

impl Recurrence {
    /// Lowest initial index; the domain lower bound
    pub fn lower_bound(&self) -> i64 {
        self.initial_conditions
            .keys()
            .next()
            .copied()
            .unwrap_or(0)
    }

    pub fn is_homogeneous(&self) -> bool {
        self.forcing.is_zero()
    }

    /// Rebuild the homogeneous part `sum c_j * s(n-j)` as an expression
    pub fn homogeneous_part(&self) -> Expression {
        let terms: Vec<Expression> = self
            .coefficients
            .iter()
            .map(|(offset, coeff)| {
                Expression::mul(vec![
                    Expression::rational(coeff.clone()),
                    Expression::rec_call(*offset),
                ])
            })
            .collect();
        Expression::add(terms).simplify()
    }
}

/// Analyze a recurrence right-hand side together with its initial conditions
pub fn analyze(
    rhs: &Expression,
    initial: &BTreeMap<i64, Expression>,
) -> SolveResult<Recurrence> {
    let normalized = rhs.expand().simplify();
    let terms: Vec<Expression> = match &normalized {
        Expression::Add(terms) => terms.as_ref().clone(),
        other => vec![other.clone()],
    };

    let mut coefficients: BTreeMap<u32, BigRational> = BTreeMap::new();
    let mut forcing_terms: Vec<Expression> = Vec::new();

    for term in terms {
        if term.mentions_rec_call() {
            let (offset, coeff) = classify_homogeneous_term(&term)?;
            if offset == 0 {
                return Err(SolveError::ParseConstraintViolated {
                    construct: "s(n) on the right-hand side".to_string(),
                });
            }
            *coefficients
                .entry(offset)
                .or_insert_with(BigRational::zero) += coeff;
        } else {
            forcing_terms.push(term);
        }
    }

    // A cancelled coefficient is no coefficient at all
    coefficients.retain(|_, coeff| !coeff.is_zero());

    let order = coefficients.keys().max().copied().ok_or_else(|| {
        SolveError::ParseConstraintViolated {
            construct: "right-hand side contains no recurrence term".to_string(),
        }
    })?;

    let forcing = Expression::add(forcing_terms).simplify();
    let initial_conditions = evaluate_initial_conditions(initial)?;
    check_initial_block(order, &initial_conditions)?;

    Ok(Recurrence {
        order,
        coefficients,
        forcing,
        initial_conditions,
    })
}

/// Decompose a homogeneous term into `(offset, coefficient)`
fn classify_homogeneous_term(term: &Expression) -> SolveResult<(u32, BigRational)> {
    match term {
        Expression::RecCall(offset) => Ok((*offset, BigRational::from_integer(1.into()))),
        Expression::Mul(factors) => {
            let mut offset: Option<u32> = None;
            let mut coefficient = BigRational::from_integer(1.into());
            for factor in factors.iter() {
                match factor {
                    Expression::RecCall(j) => {
                        if offset.is_some() {
                            return Err(SolveError::NonLinear { term: term.clone() });
                        }
                        offset = Some(*j);
                    }
                    Expression::Number(num) => coefficient *= num.to_rational(),
                    other => return Err(nonlinear_or_unsupported(term, other)),
                }
            }
            match offset {
                Some(offset) => Ok((offset, coefficient)),
                None => Err(SolveError::NonLinear { term: term.clone() }),
            }
        }
        // `s(n-j)^m` and anything else with `s` in a non-factor position
        _ => Err(SolveError::NonLinear { term: term.clone() }),
    }
}

fn nonlinear_or_unsupported(term: &Expression, factor: &Expression) -> SolveError {
    if factor.mentions_rec_call() || factor.mentions_symbol(&Symbol::n()) {
        SolveError::NonLinear { term: term.clone() }
    } else {
        SolveError::ParseConstraintViolated {
            construct: format!("non-constant coefficient {} in {}", factor, term),
        }
    }
}

fn evaluate_initial_conditions(
    initial: &BTreeMap<i64, Expression>,
) -> SolveResult<BTreeMap<i64, BigRational>> {
    let mut conditions = BTreeMap::new();
    for (index, value) in initial {
        let evaluated = value.eval_exact(&BTreeMap::new()).map_err(|_| {
            SolveError::ParseConstraintViolated {
                construct: format!("initial condition s({}) = {}", index, value),
            }
        })?;
        conditions.insert(*index, evaluated);
    }
    Ok(conditions)
}

fn check_initial_block(order: u32, conditions: &BTreeMap<i64, BigRational>) -> SolveResult<()> {
    if conditions.len() != order as usize {
        return Err(SolveError::InitialSystemInconsistent {
            detail: format!(
                "order {} recurrence needs {} initial conditions, found {}",
                order,
                order,
                conditions.len()
            ),
        });
    }
    let lower = *conditions.keys().next().expect("nonempty conditions");
    for (expected, actual) in conditions.keys().enumerate() {
        if *actual != lower + expected as i64 {
            return Err(SolveError::InitialSystemInconsistent {
                detail: format!(
                    "initial indices must be contiguous from {}; missing s({})",
                    lower,
                    lower + expected as i64
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    fn initial(pairs: &[(i64, i64)]) -> BTreeMap<i64, Expression> {
        pairs
            .iter()
            .map(|&(index, value)| (index, Expression::integer(value)))
            .collect()
    }

    #[test]
    fn test_analyze_fibonacci() {
        let rhs = parse_expression("s(n-1)+s(n-2)").unwrap();
        let recurrence = analyze(&rhs, &initial(&[(0, 1), (1, 1)])).unwrap();
        assert_eq!(recurrence.order, 2);
        assert_eq!(
            recurrence.coefficients[&1],
            BigRational::from_integer(1.into())
        );
        assert_eq!(
            recurrence.coefficients[&2],
            BigRational::from_integer(1.into())
        );
        assert!(recurrence.is_homogeneous());
    }

    #[test]
    fn test_analyze_forcing_split() {
        let rhs = parse_expression("s(n-1) + 2^n + 1").unwrap();
        let recurrence = analyze(&rhs, &initial(&[(0, 0)])).unwrap();
        assert_eq!(recurrence.order, 1);
        assert!(!recurrence.is_homogeneous());
        assert!(!recurrence.forcing.mentions_rec_call());
    }

    #[test]
    fn test_analyze_negative_coefficients() {
        let rhs = parse_expression("-4*s(n-2) + 4*s(n-1)").unwrap();
        let recurrence = analyze(&rhs, &initial(&[(0, 6), (1, 8)])).unwrap();
        assert_eq!(
            recurrence.coefficients[&2],
            BigRational::from_integer((-4).into())
        );
        assert_eq!(
            recurrence.coefficients[&1],
            BigRational::from_integer(4.into())
        );
    }

    #[test]
    fn test_nonlinear_square_rejected() {
        let rhs = parse_expression("s(n-1)^2").unwrap();
        let err = analyze(&rhs, &initial(&[(0, 1)])).unwrap_err();
        assert!(matches!(err, SolveError::NonLinear { .. }));
    }

    #[test]
    fn test_nonlinear_product_rejected() {
        let rhs = parse_expression("s(n-1)*s(n-2)").unwrap();
        let err = analyze(&rhs, &initial(&[(0, 1), (1, 1)])).unwrap_err();
        assert!(matches!(err, SolveError::NonLinear { .. }));
    }

    #[test]
    fn test_variable_coefficient_rejected() {
        let rhs = parse_expression("n*s(n-1)").unwrap();
        let err = analyze(&rhs, &initial(&[(0, 1)])).unwrap_err();
        assert!(matches!(err, SolveError::NonLinear { .. }));
    }

    #[test]
    fn test_self_reference_rejected() {
        let rhs = parse_expression("s(n) + 1").unwrap();
        let err = analyze(&rhs, &initial(&[(0, 1)])).unwrap_err();
        assert!(matches!(err, SolveError::ParseConstraintViolated { .. }));
    }

    #[test]
    fn test_wrong_initial_count_rejected() {
        let rhs = parse_expression("s(n-1)+s(n-2)").unwrap();
        let err = analyze(&rhs, &initial(&[(0, 1)])).unwrap_err();
        assert!(matches!(err, SolveError::InitialSystemInconsistent { .. }));
    }

    #[test]
    fn test_gap_in_initial_indices_rejected() {
        let rhs = parse_expression("s(n-1)+s(n-2)").unwrap();
        let err = analyze(&rhs, &initial(&[(0, 1), (2, 1)])).unwrap_err();
        assert!(matches!(err, SolveError::InitialSystemInconsistent { .. }));
    }
}
