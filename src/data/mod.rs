//! Data layer - Static tables, constants and input loading
//!
//! - Constants shared by the formula and layout stages
//! - Function and constant tables of the expression evaluator
//! - JSON/CSV table and TOML option loading (`data-loading` feature)

pub mod constants;
pub mod functions;

#[cfg(feature = "data-loading")]
pub mod loading;

// Re-export commonly used items
pub use constants::{empty_table_comment, ERROR_PREFIX};
pub use functions::{
    lookup_constant, lookup_function, MathFunction, MATH_CONSTANTS, MATH_FUNCTIONS,
};
