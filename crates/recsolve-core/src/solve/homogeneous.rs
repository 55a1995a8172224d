//! General-solution construction for the homogeneous recurrence

use super::symbols::SymbolGen;
use crate::algebra::RootsMap;
use crate::core::{Expression, Symbol};

/// The homogeneous general solution and its free coefficients
#[derive(Debug, Clone)]
pub struct GeneralSolution {
    pub expression: Expression,
    pub symbols: Vec<Symbol>,
}

/// Emit `sum_i (p_i_0 + p_i_1*n + ... + p_i_(m-1)*n^(m-1)) * rho_i^n`
///
/// Roots are visited in discovery order; the `p` symbols are registered for
/// the initial-conditions fit in the same order.
pub fn general_solution(roots: &RootsMap, generator: &mut SymbolGen) -> GeneralSolution {
    let mut blocks = Vec::with_capacity(roots.len());
    let mut symbols = Vec::new();

    for (root, multiplicity) in roots {
        let block = generator.general_block();
        let mut poly_terms = Vec::with_capacity(*multiplicity as usize);
        for power in 0..*multiplicity as usize {
            let symbol = SymbolGen::general_coefficient(block, power);
            symbols.push(symbol.clone());
            let coefficient = Expression::symbol(symbol);
            poly_terms.push(match power {
                0 => coefficient,
                1 => Expression::mul(vec![coefficient, Expression::n()]),
                _ => Expression::mul(vec![
                    coefficient,
                    Expression::pow(Expression::n(), Expression::integer(power as i64)),
                ]),
            });
        }
        let polynomial = if poly_terms.len() == 1 {
            poly_terms.into_iter().next().expect("single term")
        } else {
            Expression::add(poly_terms)
        };

        let contribution = if root.is_one() {
            polynomial
        } else {
            Expression::mul(vec![
                polynomial,
                Expression::pow(root.clone(), Expression::n()),
            ])
        };
        blocks.push(contribution);
    }

    let expression = match blocks.len() {
        0 => Expression::integer(0),
        1 => blocks.into_iter().next().expect("single block"),
        _ => Expression::add(blocks),
    };

    GeneralSolution {
        expression,
        symbols,
    }
}
