//! Output rendering for solved recurrences
//!
//! Closed forms render with `^` for powers and parenthesized rational
//! exponents, so square roots come out as `(E)^(1/2)` with no string-level
//! rewriting. The output line format matches the original tool exactly.

use crate::core::Expression;

/// Render the output-file line `sdir := n -> <closed-form>;`
///
/// # Examples
///
/// ```rust
/// use recsolve_core::{formatter, Expression};
///
/// let closed = Expression::mul(vec![
///     Expression::integer(6),
///     Expression::pow(Expression::integer(2), Expression::n()),
/// ]);
/// assert_eq!(formatter::solution_line(&closed), "sdir := n -> 6*2^n;\n");
/// ```
pub fn solution_line(closed_form: &Expression) -> String {
    format!("sdir := n -> {};\n", closed_form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_line() {
        let closed = Expression::add(vec![
            Expression::pow(Expression::integer(3), Expression::n()),
            Expression::mul(vec![
                Expression::n(),
                Expression::pow(Expression::integer(3), Expression::n()),
            ]),
        ]);
        assert_eq!(solution_line(&closed), "sdir := n -> 3^n+n*3^n;\n");
    }

    #[test]
    fn test_square_root_surface_syntax() {
        let closed = Expression::pow(Expression::integer(5), Expression::ratio(1, 2));
        assert_eq!(solution_line(&closed), "sdir := n -> 5^(1/2);\n");
    }
}
