//! # gridmark
//!
//! Renders tables of string cells to HTML, with spreadsheet-like formulas and
//! cell merging.
//!
//! ## Features
//!
//! - **Formulas**: `=[A1]+[A2]`, ranges like `=sum([B2:B9])`, arithmetic and
//!   common math functions, with circular reference detection
//! - **Cell merging**: `#rowspan#`, `#colspan#` and `#span#` fold a cell into
//!   its upper, left or upper-left neighbour
//! - **Visibility**: row windows and hidden rows/columns, applied before
//!   formulas are evaluated
//! - **Head and foot rows**, alternating row classes, column widths
//! - **Hooks**: every stage can be adjusted through [`RenderHooks`]
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ```rust
//! use gridmark::{render_table, RenderOptions, Table};
//! use gridmark::core::table::grid;
//!
//! let table = Table::new(
//!     "1",
//!     grid([
//!         ["Fruit", "Count"],
//!         ["Apples", "3"],
//!         ["Pears", "4"],
//!         ["Total", "=sum([B2:B3])"],
//!     ]),
//! );
//! let options = RenderOptions {
//!     table_foot: true.into(),
//!     ..RenderOptions::default()
//! };
//!
//! let html = render_table(&table, &options);
//! assert!(html.contains("<th class=\"column-2\">7</th>"));
//! ```
//!
//! ### Warnings
//!
//! ```rust
//! use gridmark::{TableRenderer, RenderOptions, Table};
//! use gridmark::core::table::grid;
//!
//! let mut renderer = TableRenderer::new();
//! renderer.set_input(Table::new("1", grid([["=[A1]"]])), RenderOptions::default());
//! let output = renderer.render();
//! assert_eq!(output.warnings.len(), 1);
//! ```

/// Core rendering modules
pub mod core;

/// Data layer - constants, function tables and input loading
pub mod data;

/// Feature modules - evaluator, hooks and sanitization
pub mod features;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core types
pub use core::formula::{FormulaError, FormulaResolver};
pub use core::layout::{SpanTriggers, TableLayout};
pub use core::options::{
    default_render_options, NamePosition, RenderOptions, SiteDefaults, TriState,
};
pub use core::render::TableRenderer;
pub use core::table::{Grid, Table, Visibility};

// Re-export data modules
pub use data::constants;

// Re-export feature modules
pub use features::expression::{ExpressionError, ExpressionEvaluator, MathEvaluator};
pub use features::hooks::{CellContext, DefaultHooks, RenderHooks};

// Re-export utilities
pub use utils::error::{RenderError, RenderOutput, RenderResult, RenderWarning, WarningKind};

/// Render a table with the default hooks, evaluator and site defaults
pub fn render_table(table: &Table, options: &RenderOptions) -> String {
    render_table_with_diagnostics(table, options).content
}

/// Render a table, returning the warnings together with the markup
pub fn render_table_with_diagnostics(table: &Table, options: &RenderOptions) -> RenderOutput {
    let mut renderer = TableRenderer::new();
    renderer.set_input(table.clone(), options.clone());
    renderer.render()
}

/// Evaluate the formulas of a table's visible cells without rendering
///
/// ```rust
/// use gridmark::{evaluate_table, RenderOptions, Table};
/// use gridmark::core::table::grid;
///
/// let data = evaluate_table(&Table::new("1", grid([["2", "=[A1]^3"]])), &RenderOptions::default());
/// assert_eq!(data[0][1], "8");
/// ```
pub fn evaluate_table(table: &Table, options: &RenderOptions) -> Grid {
    let mut renderer = TableRenderer::new();
    renderer.set_input(table.clone(), options.clone());
    renderer.evaluated_data()
}
