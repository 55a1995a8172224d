//! Output rendering and round-trip guarantees
//!
//! The rendered closed form must parse back through the same expression
//! grammar and reproduce every initial condition at its index.

use num_traits::ToPrimitive;
use recsolve_core::formatter;
use recsolve_core::parser::input::parse_input;
use recsolve_core::parser::parse_expression;
use recsolve_core::RecurrenceSolver;

fn round_trip(text: &str) {
    let input = parse_input(text).unwrap();
    let mut solver = RecurrenceSolver::new(&input).unwrap();
    let closed = solver.solve().unwrap();

    let line = formatter::solution_line(&closed);
    assert!(line.starts_with("sdir := n -> "));
    assert!(line.ends_with(";\n"));
    assert!(!line.contains("**"), "output must use ^ for powers: {}", line);
    assert!(!line.contains("sqrt"), "square roots must render as ^(1/2): {}", line);

    // Strip the framing and re-parse the rendered body
    let body = line
        .trim_start_matches("sdir := n -> ")
        .trim_end_matches(";\n");
    let reparsed = parse_expression(body).unwrap();

    for (index, value) in &solver.recurrence().initial_conditions.clone() {
        let expected = value.to_f64().unwrap();
        let replayed = reparsed.eval_at(*index).unwrap();
        assert!(
            (replayed - expected).abs() < 1e-9,
            "s({}) should replay {} but got {}",
            index,
            expected,
            replayed
        );
    }
}

#[test]
fn round_trip_rational_roots() {
    round_trip("eqs :=\n[\ns(n) = -4*s(n-2) + 4*s(n-1),\ns(0) = 6,\ns(1) = 8\n];\n");
}

#[test]
fn round_trip_surd_roots() {
    round_trip("eqs :=\n[\ns(n) = s(n-1)+s(n-2),\ns(0) = 1,\ns(1) = 1\n];\n");
}

#[test]
fn round_trip_with_forcing() {
    round_trip("eqs :=\n[\ns(n) = s(n-1) + 2^n + 1,\ns(0) = 0\n];\n");
}

#[test]
fn rendered_output_is_byte_stable() {
    let text = "eqs :=\n[\ns(n) = 10*s(n-1) - s(n-2),\ns(0) = 1,\ns(1) = 10\n];\n";
    let mut first = RecurrenceSolver::new(&parse_input(text).unwrap()).unwrap();
    let mut second = RecurrenceSolver::new(&parse_input(text).unwrap()).unwrap();
    assert_eq!(
        formatter::solution_line(&first.solve().unwrap()),
        formatter::solution_line(&second.solve().unwrap()),
    );
}
