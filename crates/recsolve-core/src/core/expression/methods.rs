//! Structural introspection and substitution

use super::Expression;
use crate::core::{Number, Symbol};
use std::collections::BTreeSet;

impl Expression {
    /// View the expression as a number literal, if it is one
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Expression::Number(num) => Some(num),
            _ => None,
        }
    }

    /// Structural zero check (meaningful on simplified expressions)
    pub fn is_zero(&self) -> bool {
        match self {
            Expression::Number(num) => num.is_zero(),
            Expression::Add(terms) => terms.is_empty(),
            _ => false,
        }
    }

    /// Structural one check (meaningful on simplified expressions)
    pub fn is_one(&self) -> bool {
        match self {
            Expression::Number(num) => num.is_one(),
            Expression::Mul(factors) => factors.is_empty(),
            _ => false,
        }
    }

    /// Whether any `s(n-j)` application occurs within the expression
    pub fn mentions_rec_call(&self) -> bool {
        match self {
            Expression::RecCall(_) => true,
            Expression::Number(_) | Expression::Symbol(_) => false,
            Expression::Add(operands) | Expression::Mul(operands) => {
                operands.iter().any(Expression::mentions_rec_call)
            }
            Expression::Pow(base, exponent) => {
                base.mentions_rec_call() || exponent.mentions_rec_call()
            }
        }
    }

    /// Whether the given symbol occurs within the expression
    pub fn mentions_symbol(&self, symbol: &Symbol) -> bool {
        match self {
            Expression::Symbol(sym) => sym == symbol,
            Expression::Number(_) | Expression::RecCall(_) => false,
            Expression::Add(operands) | Expression::Mul(operands) => {
                operands.iter().any(|op| op.mentions_symbol(symbol))
            }
            Expression::Pow(base, exponent) => {
                base.mentions_symbol(symbol) || exponent.mentions_symbol(symbol)
            }
        }
    }

    /// Collect every free symbol, in deterministic order
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recsolve_core::Expression;
    ///
    /// let expr = Expression::mul(vec![
    ///     Expression::symbol("p_0_0"),
    ///     Expression::pow(Expression::integer(2), Expression::n()),
    /// ]);
    /// let names: Vec<_> = expr.free_symbols().into_iter().collect();
    /// assert_eq!(names.len(), 2);
    /// ```
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, into: &mut BTreeSet<Symbol>) {
        match self {
            Expression::Symbol(sym) => {
                into.insert(sym.clone());
            }
            Expression::Number(_) | Expression::RecCall(_) => {}
            Expression::Add(operands) | Expression::Mul(operands) => {
                for operand in operands.iter() {
                    operand.collect_symbols(into);
                }
            }
            Expression::Pow(base, exponent) => {
                base.collect_symbols(into);
                exponent.collect_symbols(into);
            }
        }
    }

    /// Replace every occurrence of `target` by `replacement`
    ///
    /// Substitution is a structural recursion over the tree; matching is by
    /// canonical equality of sub-trees, and the replacement is inserted by
    /// value, so no cycles can be introduced.
    pub fn substitute(&self, target: &Expression, replacement: &Expression) -> Expression {
        if self == target {
            return replacement.clone();
        }
        match self {
            Expression::Number(_) | Expression::Symbol(_) | Expression::RecCall(_) => self.clone(),
            Expression::Add(terms) => Expression::add(
                terms
                    .iter()
                    .map(|term| term.substitute(target, replacement))
                    .collect(),
            ),
            Expression::Mul(factors) => Expression::mul(
                factors
                    .iter()
                    .map(|factor| factor.substitute(target, replacement))
                    .collect(),
            ),
            Expression::Pow(base, exponent) => Expression::pow(
                base.substitute(target, replacement),
                exponent.substitute(target, replacement),
            ),
        }
    }

    /// Replace a symbol by an expression
    pub fn substitute_symbol(&self, symbol: &Symbol, replacement: &Expression) -> Expression {
        self.substitute(&Expression::Symbol(symbol.clone()), replacement)
    }
}
