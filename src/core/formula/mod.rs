//! Formula resolution
//!
//! Cells whose content starts with `=` are formulas. A formula may reference
//! other cells (`[B3]`) and rectangular ranges (`[A1:A5]`), which expand to a
//! comma separated list of single references so that they can feed variadic
//! functions like `sum(...)`.
//!
//! # Architecture
//!
//! ```text
//! formula -> checks -> range expansion -> reference substitution (recursive) -> ExpressionEvaluator
//! ```
//!
//! Resolved values are written back into the grid, so the grid doubles as the
//! memoization cache. Failures stay in band as `!ERROR! <reason>` strings and
//! propagate to every formula that references the failing cell.
//!
//! # Example
//!
//! ```rust
//! use gridmark::core::formula::FormulaResolver;
//! use gridmark::core::table::grid;
//! use gridmark::features::expression::MathEvaluator;
//!
//! let mut data = grid([["2", "3", "=[A1]*[B1]"]]);
//! let evaluator = MathEvaluator::new();
//! FormulaResolver::new(&mut data, &evaluator).evaluate_table_data();
//! assert_eq!(data[0][2], "6");
//! ```

mod error;
mod resolver;

#[cfg(test)]
mod tests;

// Re-export public API
pub use error::{is_error_marker, FormulaError};
pub use resolver::{expand_range, FormulaResolver};
