//! Particular-solution templates for undetermined coefficients
//!
//! Each forcing term is classified into an exponential base `b`, a
//! polynomial degree in `n`, and a rational coefficient. Terms sharing a
//! base form one bucket; the bucket's template is
//! `n^mu(b) * (q_0 + q_1*n + ... + q_d*n^d) * b^n` where `mu(b)` is the
//! multiplicity of `b` among the characteristic roots (resonance lifts the
//! template by `n^mu`).

use super::symbols::SymbolGen;
use crate::algebra::expand::Expand;
use crate::algebra::RootsMap;
use crate::core::{Expression, Number, Symbol};
use crate::error::{SolveError, SolveResult};
use crate::simplify::Simplify;
use num_rational::BigRational;
use num_traits::One;

/// A forcing or residual term decomposed as `coefficient * n^degree * base^n`
/// with at most one linear unknown factor
#[derive(Debug, Clone, PartialEq)]
pub struct TermShape {
    pub coefficient: BigRational,
    pub base: BigRational,
    pub degree: u32,
    pub unknown: Option<Symbol>,
}

/// The particular-solution template and its undetermined coefficients
#[derive(Debug, Clone)]
pub struct ParticularTemplate {
    pub expression: Expression,
    pub symbols: Vec<Symbol>,
}

/// Classify one expanded term
///
/// With `allow_unknowns` false, any symbol other than `n` is an unsupported
/// forcing shape; with it true, exactly one unknown may appear linearly
/// (residual terms during the undetermined-coefficients solve).
pub fn classify_term(term: &Expression, allow_unknowns: bool) -> SolveResult<TermShape> {
    let mut shape = TermShape {
        coefficient: BigRational::one(),
        base: BigRational::one(),
        degree: 0,
        unknown: None,
    };

    let factors: Vec<&Expression> = match term {
        Expression::Mul(factors) => factors.iter().collect(),
        other => vec![other],
    };

    for factor in factors {
        match factor {
            Expression::Number(num) => shape.coefficient *= num.to_rational(),
            Expression::Symbol(sym) if sym.is_domain_variable() => shape.degree += 1,
            Expression::Symbol(sym) => {
                if !allow_unknowns || shape.unknown.is_some() {
                    return Err(SolveError::ForcingUnsupported { term: term.clone() });
                }
                shape.unknown = Some(sym.clone());
            }
            Expression::Pow(base, exponent) => {
                classify_power(term, base, exponent, &mut shape)?;
            }
            _ => return Err(SolveError::ForcingUnsupported { term: term.clone() }),
        }
    }

    Ok(shape)
}

fn classify_power(
    term: &Expression,
    base: &Expression,
    exponent: &Expression,
    shape: &mut TermShape,
) -> SolveResult<()> {
    let unsupported = || SolveError::ForcingUnsupported { term: term.clone() };

    match base {
        // n^d with a non-negative integer degree
        Expression::Symbol(sym) if sym.is_domain_variable() => {
            let degree = exponent
                .as_number()
                .and_then(Number::to_i64)
                .and_then(|d| u32::try_from(d).ok())
                .ok_or_else(unsupported)?;
            shape.degree += degree;
            Ok(())
        }
        // b^(...) with a rational base
        Expression::Number(base_num) => match exponent {
            // Bare n: the exponential factor
            Expression::Symbol(sym) if sym.is_domain_variable() => {
                shape.base *= base_num.to_rational();
                Ok(())
            }
            // k*n for a positive integer k: b^(k*n) = (b^k)^n
            Expression::Mul(factors) if factors.len() == 2 => {
                let (scale, symbol) = (&factors[0], &factors[1]);
                let k = scale
                    .as_number()
                    .and_then(Number::to_i64)
                    .filter(|k| *k > 0)
                    .ok_or_else(unsupported)?;
                if !matches!(symbol, Expression::Symbol(sym) if sym.is_domain_variable()) {
                    return Err(unsupported());
                }
                let powered = base_num.checked_pow(k).ok_or_else(unsupported)?;
                shape.base *= powered.to_rational();
                Ok(())
            }
            // n + c: b^(n+c) = b^c * b^n (normally normalized by expand)
            Expression::Add(terms) if terms.len() == 2 => {
                let mut constant: Option<i64> = None;
                let mut saw_domain = false;
                for part in terms.iter() {
                    match part {
                        Expression::Symbol(sym) if sym.is_domain_variable() => {
                            saw_domain = true;
                        }
                        Expression::Number(num) => {
                            constant = num.to_i64();
                        }
                        _ => return Err(unsupported()),
                    }
                }
                let constant = constant.filter(|_| saw_domain).ok_or_else(unsupported)?;
                let scale = base_num.checked_pow(constant).ok_or_else(unsupported)?;
                shape.coefficient *= scale.to_rational();
                shape.base *= base_num.to_rational();
                Ok(())
            }
            // A numeric exponent would have been folded by simplification
            _ => Err(unsupported()),
        },
        _ => Err(unsupported()),
    }
}

/// Build the particular template for a non-zero forcing expression
///
/// Returns `None` when the forcing simplifies to zero.
pub fn build_template(
    forcing: &Expression,
    roots: &RootsMap,
    generator: &mut SymbolGen,
) -> SolveResult<Option<ParticularTemplate>> {
    let normalized = forcing.expand().simplify();
    if normalized.is_zero() {
        return Ok(None);
    }

    let terms: Vec<Expression> = match &normalized {
        Expression::Add(terms) => terms.as_ref().clone(),
        other => vec![other.clone()],
    };

    // Buckets keyed by base, in first-appearance order
    let mut buckets: Vec<(BigRational, u32)> = Vec::new();
    for term in &terms {
        let shape = classify_term(term, false)?;
        if let Some((_, max_degree)) = buckets.iter_mut().find(|(b, _)| *b == shape.base) {
            *max_degree = (*max_degree).max(shape.degree);
        } else {
            buckets.push((shape.base, shape.degree));
        }
    }

    let mut contributions = Vec::with_capacity(buckets.len());
    let mut symbols = Vec::new();

    for (base, max_degree) in buckets {
        let block = generator.particular_block();
        let resonance = root_multiplicity(roots, &base);

        let mut poly_terms = Vec::with_capacity(max_degree as usize + 1);
        for power in 0..=max_degree as usize {
            let symbol = SymbolGen::particular_coefficient(block, power);
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

        let mut factors = Vec::with_capacity(3);
        match resonance {
            0 => {}
            1 => factors.push(Expression::n()),
            mu => factors.push(Expression::pow(
                Expression::n(),
                Expression::integer(mu as i64),
            )),
        }
        factors.push(polynomial);
        if !base.is_one() {
            factors.push(Expression::pow(
                Expression::rational(base.clone()),
                Expression::n(),
            ));
        }

        contributions.push(if factors.len() == 1 {
            factors.into_iter().next().expect("single factor")
        } else {
            Expression::mul(factors)
        });
    }

    let expression = if contributions.len() == 1 {
        contributions.into_iter().next().expect("single bucket")
    } else {
        Expression::add(contributions)
    };

    Ok(Some(ParticularTemplate {
        expression,
        symbols,
    }))
}

/// Multiplicity of a rational base among the characteristic roots
fn root_multiplicity(roots: &RootsMap, base: &BigRational) -> u32 {
    let target = Expression::rational(base.clone());
    roots
        .iter()
        .find(|(root, _)| *root == target)
        .map(|(_, multiplicity)| *multiplicity)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    fn shapes(text: &str) -> Vec<TermShape> {
        let expr = parse_expression(text).unwrap().expand().simplify();
        let terms: Vec<Expression> = match &expr {
            Expression::Add(terms) => terms.as_ref().clone(),
            other => vec![other.clone()],
        };
        terms
            .iter()
            .map(|t| classify_term(t, false).unwrap())
            .collect()
    }

    #[test]
    fn test_classify_constant_and_polynomial() {
        let classified = shapes("3*n^2");
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].degree, 2);
        assert_eq!(
            classified[0].coefficient,
            BigRational::from_integer(3.into())
        );
        assert!(classified[0].base.is_one());
    }

    #[test]
    fn test_classify_exponential() {
        let classified = shapes("42*4^n");
        assert_eq!(classified[0].base, BigRational::from_integer(4.into()));
        assert_eq!(
            classified[0].coefficient,
            BigRational::from_integer(42.into())
        );
    }

    #[test]
    fn test_classify_shifted_exponential() {
        // 41^(n-4) carries the 41^(-4) factor into the coefficient
        let classified = shapes("41^(n-4)");
        assert_eq!(classified[0].base, BigRational::from_integer(41.into()));
        assert_eq!(
            classified[0].coefficient,
            BigRational::new(1.into(), 41_i64.pow(4).into())
        );
    }

    #[test]
    fn test_classify_rejects_n_to_the_n() {
        let expr = Expression::pow(Expression::n(), Expression::n());
        assert!(classify_term(&expr, false).is_err());
    }

    #[test]
    fn test_template_without_resonance() {
        // forcing 2^n + 1 against roots {2 is absent}: root 3 only
        let forcing = parse_expression("2^n + 1").unwrap();
        let roots = vec![(Expression::integer(3), 1)];
        let mut generator = SymbolGen::new();
        let template = build_template(&forcing, &roots, &mut generator)
            .unwrap()
            .unwrap();
        // The constant term sorts first after simplification, so the base-1
        // bucket claims the first symbol block
        assert_eq!(
            template.symbols,
            vec![Symbol::new("q_0_0"), Symbol::new("q_1_0")]
        );
        assert_eq!(template.expression.to_string(), "q_0_0+q_1_0*2^n");
    }

    #[test]
    fn test_template_with_resonance() {
        // forcing 2^n with 2 a double characteristic root: n^2 * q * 2^n
        let forcing = parse_expression("2^n").unwrap();
        let roots = vec![(Expression::integer(2), 2)];
        let mut generator = SymbolGen::new();
        let template = build_template(&forcing, &roots, &mut generator)
            .unwrap()
            .unwrap();
        assert_eq!(template.expression.to_string(), "n^2*q_0_0*2^n");
    }

    #[test]
    fn test_template_polynomial_bucket() {
        // n^3 forcing: full cubic template
        let forcing = parse_expression("n^3").unwrap();
        let roots = vec![(Expression::integer(2), 1)];
        let mut generator = SymbolGen::new();
        let template = build_template(&forcing, &roots, &mut generator)
            .unwrap()
            .unwrap();
        assert_eq!(template.symbols.len(), 4);
        assert_eq!(
            template.expression.to_string(),
            "q_0_0+q_0_1*n+q_0_2*n^2+q_0_3*n^3"
        );
    }

    #[test]
    fn test_zero_forcing_has_no_template() {
        let forcing = Expression::integer(0);
        let mut generator = SymbolGen::new();
        assert!(build_template(&forcing, &vec![], &mut generator)
            .unwrap()
            .is_none());
    }
}
