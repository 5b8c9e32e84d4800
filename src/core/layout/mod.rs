//! Table layout and markup
//!
//! The filtered, evaluated grid becomes a [`TableLayout`] of row and cell
//! descriptors, which is then written out as HTML.
//!
//! # Architecture
//!
//! ```text
//! Grid -> SpanLayoutEngine (reverse walk, span counters) -> TableLayout -> emit_table
//! ```
//!
//! # Example
//!
//! ```rust
//! use gridmark::core::layout::SpanLayoutEngine;
//! use gridmark::core::options::ResolvedOptions;
//! use gridmark::core::table::grid;
//! use gridmark::features::hooks::DefaultHooks;
//!
//! let options = ResolvedOptions::default();
//! let mut engine = SpanLayoutEngine::new("1", &options, &DefaultHooks);
//! let layout = engine.layout(&grid([["a", "b"], ["c", "#colspan#"]]));
//! assert_eq!(layout.body[0].cells[0].colspan, 2);
//! ```

mod cell;
mod emitter;
mod generator;

#[cfg(test)]
mod tests;

pub use cell::{
    Caption, CellDescriptor, CellTag, ColumnGroup, RowDescriptor, RowSection, TableLayout,
};
pub use emitter::emit_table;
pub use generator::{SpanKind, SpanLayoutEngine, SpanTriggers};
