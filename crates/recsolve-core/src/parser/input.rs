//! Input-file reading: Maple-style framing around equation lines
//!
//! A file holds one recurrence and its initial conditions:
//!
//! ```text
//! eqs :=
//! [
//! s(n) = 2*s(n-1) + 1,
//! s(0) = 6
//! ];
//! ```
//!
//! Framing lines and trailing commas are stripped; each remaining line must
//! match `s(<index>) = <expr>` with `<index>` either `n` (the recurrence) or
//! a non-negative integer (an initial condition).

use super::parse_expression;
use crate::core::Expression;
use crate::error::{SolveError, SolveResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static EQUATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^s\((\d+|n)\)\s*=\s*(.+)$").expect("valid equation pattern"));

/// A parsed input file: the recurrence right-hand side and the initial
/// conditions as raw expressions
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput {
    pub recurrence_rhs: Expression,
    pub initial: BTreeMap<i64, Expression>,
}

/// Parse the contents of one input file
pub fn parse_input(text: &str) -> SolveResult<ParsedInput> {
    let mut recurrence_rhs: Option<Expression> = None;
    let mut initial = BTreeMap::new();

    for raw_line in text.lines() {
        let mut line = raw_line.trim();
        if line.is_empty() || line == "eqs :=" || line == "[" || line == "];" {
            continue;
        }
        line = line.trim_end_matches(',').trim_end();

        let captures = EQUATION_PATTERN.captures(line).ok_or_else(|| {
            SolveError::ParseConstraintViolated {
                construct: format!("unrecognized line \"{}\"", raw_line.trim()),
            }
        })?;
        let index = captures.get(1).expect("index capture").as_str();
        let rhs_text = captures.get(2).expect("rhs capture").as_str();
        let rhs = parse_expression(rhs_text)?;

        if index == "n" {
            if recurrence_rhs.is_some() {
                log::warn!("multiple recurrence equations; keeping the last");
            }
            recurrence_rhs = Some(rhs);
        } else {
            let position: i64 =
                index
                    .parse()
                    .map_err(|_| SolveError::ParseConstraintViolated {
                        construct: format!("initial-condition index \"{}\"", index),
                    })?;
            if initial.insert(position, rhs).is_some() {
                log::warn!("duplicate initial condition for s({}); keeping the last", position);
            }
        }
    }

    let recurrence_rhs = recurrence_rhs.ok_or_else(|| SolveError::ParseConstraintViolated {
        construct: "input contains no recurrence equation s(n) = ...".to_string(),
    })?;

    Ok(ParsedInput {
        recurrence_rhs,
        initial,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIBONACCI: &str = "eqs :=\n[\ns(n) = s(n-1)+s(n-2),\ns(0) = 1,\ns(1) = 1\n];\n";

    #[test]
    fn test_parse_fibonacci_file() {
        let parsed = parse_input(FIBONACCI).unwrap();
        assert_eq!(
            parsed.recurrence_rhs,
            Expression::add(vec![Expression::rec_call(1), Expression::rec_call(2)])
        );
        assert_eq!(parsed.initial.len(), 2);
        assert_eq!(parsed.initial[&0], Expression::integer(1));
        assert_eq!(parsed.initial[&1], Expression::integer(1));
    }

    #[test]
    fn test_whitespace_and_blank_lines_tolerated() {
        let text = "eqs :=\n[\n  s(n) = 2*s(n-1) ,\n\n  s(0) = 3\n];\n\n";
        let parsed = parse_input(text).unwrap();
        assert_eq!(parsed.initial[&0], Expression::integer(3));
    }

    #[test]
    fn test_missing_recurrence_rejected() {
        let text = "eqs :=\n[\ns(0) = 1\n];\n";
        assert!(matches!(
            parse_input(text),
            Err(SolveError::ParseConstraintViolated { .. })
        ));
    }

    #[test]
    fn test_garbage_line_rejected() {
        let text = "eqs :=\n[\nt(n) = 2\n];\n";
        assert!(parse_input(text).is_err());
    }

    #[test]
    fn test_initial_condition_expression_value() {
        let text = "eqs :=\n[\ns(n) = s(n-1),\ns(0) = 2+3/4\n];\n";
        let parsed = parse_input(text).unwrap();
        assert_eq!(
            parsed.initial[&0],
            Expression::add(vec![
                Expression::integer(2),
                Expression::mul(vec![
                    Expression::integer(3),
                    Expression::pow(Expression::integer(4), Expression::integer(-1)),
                ]),
            ])
        );
    }
}
