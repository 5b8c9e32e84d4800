//! Feature modules
//!
//! Collaborators of the core pipeline:
//! - `expression`: arithmetic evaluator behind formulas
//! - `hooks`: extension points applied during a render
//! - `sanitize`: safe text output

pub mod expression;
pub mod hooks;
pub mod sanitize;

// Re-export commonly used types
pub use expression::{ExpressionError, ExpressionEvaluator, MathEvaluator};
pub use hooks::{CellContext, DefaultHooks, RenderHooks};
pub use sanitize::safe_output;
