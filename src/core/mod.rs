//! Core rendering modules
//!
//! - `addressing`: column letters and cell tokens
//! - `table` / `options`: input model and render options
//! - `visibility`: row window and hidden rows/columns
//! - `formula`: formula resolution over the grid
//! - `layout`: span layout engine and markup emitter
//! - `render`: the driver tying the stages together

pub mod addressing;
pub mod formula;
pub mod layout;
pub mod options;
pub mod render;
pub mod table;
pub mod visibility;

pub use addressing::{cell_token, letter_to_number, number_to_letter};
pub use formula::{expand_range, is_error_marker, FormulaError, FormulaResolver};
pub use layout::{emit_table, SpanLayoutEngine, SpanTriggers, TableLayout};
pub use options::{
    default_render_options, parse_index_list, NamePosition, Placement, RenderOptions,
    ResolvedOptions, SiteDefaults, TriState,
};
pub use render::TableRenderer;
pub use table::{grid, Grid, Table, Visibility};
pub use visibility::filter_table;
