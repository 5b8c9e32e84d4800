//! Tests for formula resolution

use std::cell::Cell;

use pretty_assertions::assert_eq;

use super::error::{is_error_marker, FormulaError};
use super::resolver::{expand_range, FormulaResolver};
use crate::core::table::{grid, Grid};
use crate::features::expression::{ExpressionError, ExpressionEvaluator, MathEvaluator};

fn evaluate(mut data: Grid) -> Grid {
    let evaluator = MathEvaluator::new();
    FormulaResolver::new(&mut data, &evaluator).evaluate_table_data();
    data
}

fn marker(err: FormulaError) -> String {
    err.to_marker()
}

#[test]
fn test_plain_text_is_unchanged() {
    let mut data = grid([["hello"]]);
    let evaluator = MathEvaluator::new();
    let mut resolver = FormulaResolver::new(&mut data, &evaluator);
    assert_eq!(resolver.evaluate_cell("hello", &[]), "hello");
    assert_eq!(resolver.evaluate_cell("", &[]), "");
    assert_eq!(resolver.evaluate_cell(" =1+2", &[]), " =1+2");
    // a resolved value stays what it is when resolved again
    let once = resolver.evaluate_cell("=1+2", &[]);
    assert_eq!(resolver.evaluate_cell(&once, &[]), once);
}

#[test]
fn test_simple_arithmetic() {
    let data = evaluate(grid([["=1+2", "= 2 * 3 "]]));
    assert_eq!(data[0][0], "3");
    assert_eq!(data[0][1], "6");
}

#[test]
fn test_cell_references() {
    let data = evaluate(grid([["2", "x"], ["3", "=[A1]+[A2]"]]));
    assert_eq!(data[1][1], "5");
}

#[test]
fn test_lowercase_references() {
    let data = evaluate(grid([["2", "=[a1]*10"]]));
    assert_eq!(data[0][1], "20");
}

#[test]
fn test_repeated_reference_resolves_once() {
    let calls = Cell::new(0usize);
    let counting = |expression: &str| -> Result<String, ExpressionError> {
        calls.set(calls.get() + 1);
        MathEvaluator::new().evaluate(expression)
    };

    let mut data = grid([["=1+1", "=[A1]+[A1]"]]);
    let mut resolver = FormulaResolver::new(&mut data, &counting);
    let value = resolver.evaluate_cell_at(0, 1);

    assert_eq!(value.as_deref(), Some("4"));
    // one evaluation for A1, one for B1
    assert_eq!(calls.get(), 2);
    assert_eq!(data[0][0], "2");
}

#[test]
fn test_forward_references() {
    let data = evaluate(grid([["=[B1]+1", "=[C1]*2", "5"]]));
    assert_eq!(data[0], vec!["11", "10", "5"]);
}

#[test]
fn test_memoized_values_are_written_back() {
    let data = evaluate(grid([["=[B1]", "=40+2"]]));
    assert_eq!(data[0][0], "42");
    assert_eq!(data[0][1], "42");
}

#[test]
fn test_direct_self_reference() {
    let data = evaluate(grid([["1", "2"], ["3", "=[B2]"]]));
    assert_eq!(data[1][1], marker(FormulaError::CircularReference));
}

#[test]
fn test_indirect_cycle() {
    let data = evaluate(grid([["=[B1]", "=[C1]", "=[A1]"]]));
    for value in &data[0] {
        assert_eq!(value, &marker(FormulaError::CircularReference));
    }
}

#[test]
fn test_diamond_is_not_a_cycle() {
    // D1 reaches A1 through two branches
    let data = evaluate(grid([["1", "=[A1]+1", "=[A1]+2", "=[B1]+[C1]"]]));
    assert_eq!(data[0][3], "5");
}

#[test]
fn test_too_many_equals() {
    let data = evaluate(grid([["=1=2"]]));
    assert_eq!(data[0][0], marker(FormulaError::TooManyEquals));
}

#[test]
fn test_adjacent_references() {
    let data = evaluate(grid([["1", "2", "=[A1][B1]"]]));
    assert_eq!(data[0][2], marker(FormulaError::AdjacentReferences));
}

#[test]
fn test_non_existent_cell() {
    let data = evaluate(grid([["=[D1]", "=[A9]", "=[A0]"]]));
    assert_eq!(
        data[0][0],
        marker(FormulaError::NonExistentCell("[D1]".into()))
    );
    assert_eq!(
        data[0][1],
        marker(FormulaError::NonExistentCell("[A9]".into()))
    );
    assert_eq!(
        data[0][2],
        marker(FormulaError::NonExistentCell("[A0]".into()))
    );
}

#[test]
fn test_evaluator_failure() {
    let data = evaluate(grid([["=1/0", "=abc+1"]]));
    assert_eq!(data[0][0], "!ERROR! division by zero");
    assert_eq!(data[0][1], "!ERROR! undefined variable 'abc'");
}

#[test]
fn test_errors_propagate_to_referencing_cells() {
    let data = evaluate(grid([["=1/0", "=[A1]+1", "=[B1]*2", "7"]]));
    assert_eq!(data[0][1], "!ERROR! division by zero");
    assert_eq!(data[0][2], "!ERROR! division by zero");
    assert_eq!(data[0][3], "7");
}

#[test]
fn test_error_read_back_from_grid_propagates() {
    // A1 is already an error marker when B1 is visited
    let data = evaluate(grid([["=[A1]", "=[A1]+1"]]));
    assert!(is_error_marker(&data[0][0]));
    assert_eq!(data[0][1], data[0][0]);
}

#[test]
fn test_range_expansion_order() {
    assert_eq!(expand_range("[A1:B2]", 10, 10), "[A1],[A2],[B1],[B2]");
    assert_eq!(expand_range("[B2:A1]", 10, 10), "[A1],[A2],[B1],[B2]");
    assert_eq!(expand_range("[A2:B1]", 10, 10), "[A1],[A2],[B1],[B2]");
    assert_eq!(expand_range("[a1:a3]", 10, 10), "[A1],[A2],[A3]");
}

#[test]
fn test_range_expansion_stops_outside_grid() {
    assert_eq!(expand_range("[A1:A999999]", 2, 1), "[A1],[A2],[A3]");
    assert_eq!(expand_range("[A1:C1]", 1, 1), "[A1],[B1]");
}

#[test]
fn test_range_in_function() {
    let data = evaluate(grid([
        ["1", "10"],
        ["2", "20"],
        ["3", "30"],
        ["=sum([A1:A3])", "=average([B3:B1]) + sum([A1:A3])"],
    ]));
    assert_eq!(data[3][0], "6");
    assert_eq!(data[3][1], "26");
}

#[test]
fn test_range_out_of_bounds() {
    let data = evaluate(grid([["1", "=sum([A1:A5])"]]));
    assert_eq!(
        data[0][1],
        marker(FormulaError::NonExistentCell("[A2]".into()))
    );
}

#[test]
fn test_range_containing_itself_is_circular() {
    let data = evaluate(grid([["1", "2", "=sum([A1:C1])"]]));
    assert_eq!(data[0][2], marker(FormulaError::CircularReference));
}

#[test]
fn test_negative_reference_values() {
    let data = evaluate(grid([["-3", "=2-[A1]", "=2^[A1]*8"]]));
    assert_eq!(data[0][1], "5");
    assert_eq!(data[0][2], "1");
}

#[test]
fn test_recursion_limit() {
    // A1 -> B1 -> C1 -> D1 -> E1
    let mut data = grid([["=[B1]", "=[C1]", "=[D1]", "=[E1]", "1"]]);
    let evaluator = MathEvaluator::new();
    let mut resolver = FormulaResolver::new(&mut data, &evaluator).with_max_depth(2);
    assert_eq!(
        resolver.evaluate_cell_at(0, 0),
        Some(marker(FormulaError::RecursionLimit(2)))
    );
    // cells on the cut off chain keep their formulas
    assert_eq!(data[0][1], "=[C1]");
    assert_eq!(data[0][3], "=[E1]");
}

#[test]
fn test_recursion_limit_is_not_cached_by_the_sweep() {
    let mut data = grid([["=[B1]", "=[C1]", "=[D1]", "=[E1]", "1"]]);
    let evaluator = MathEvaluator::new();
    FormulaResolver::new(&mut data, &evaluator)
        .with_max_depth(2)
        .evaluate_table_data();
    assert_eq!(data, grid([["1", "1", "1", "1", "1"]]));
}

fn chain(width: usize) -> Grid {
    let mut row: Vec<String> = (1..width)
        .map(|i| format!("=[{}1]+1", crate::core::addressing::number_to_letter(i + 1)))
        .collect();
    row.push("0".to_string());
    vec![row]
}

#[test]
fn test_chain_longer_than_limit_is_order_independent() {
    let width = 300;
    let forward = evaluate(chain(width));

    let mut backward = chain(width);
    let evaluator = MathEvaluator::new();
    let mut resolver = FormulaResolver::new(&mut backward, &evaluator);
    for column in (0..width).rev() {
        resolver.evaluate_cell_at(0, column);
    }

    assert_eq!(forward, backward);
    assert_eq!(forward[0][0], "299");
    assert_eq!(forward[0][100], "199");
    assert!(!forward[0].iter().any(|cell| is_error_marker(cell)));
}

#[test]
fn test_long_chain_within_default_limit() {
    let width = 100;
    let data = evaluate(chain(width));
    assert_eq!(data[0][0], (width - 1).to_string());
}

#[test]
fn test_evaluation_order_does_not_matter() {
    let source = grid([
        ["=[B1]+[A2]", "=[C2]*2", "4"],
        ["=sum([B2:C2])", "=[C1]-1", "=[C1]+[B2]"],
        ["=[A1]+[A2]", "=max([A1:C2])", "=[C3]"],
    ]);

    let forward = evaluate(source.clone());

    let mut backward = source;
    let evaluator = MathEvaluator::new();
    let mut resolver = FormulaResolver::new(&mut backward, &evaluator);
    for row in (0..3).rev() {
        for column in (0..3).rev() {
            resolver.evaluate_cell_at(row, column);
        }
    }

    assert_eq!(forward, backward);
    assert_eq!(forward[0][0], "24");
    assert_eq!(forward[2][1], "24");
    assert_eq!(forward[2][2], marker(FormulaError::CircularReference));
}

#[test]
fn test_marker_round_trip() {
    let err = FormulaError::NonExistentCell("[Z9]".into());
    let propagated = FormulaError::from_marker(&err.to_marker());
    assert_eq!(
        propagated.map(|e| e.to_marker()),
        Some(err.to_marker())
    );
    assert_eq!(FormulaError::from_marker("plain"), None);
}
