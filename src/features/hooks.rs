//! Extension points
//!
//! Every place where a host may adjust the render is a method of
//! [`RenderHooks`]. Each method receives the in-progress value plus context and
//! returns the value to continue with; the provided implementations return it
//! unchanged, so a host only overrides what it needs.
//!
//! ```rust
//! use gridmark::features::hooks::{CellContext, RenderHooks};
//!
//! struct Numbered;
//!
//! impl RenderHooks for Numbered {
//!     fn cell_css_class(&self, ctx: &CellContext<'_>, class: String) -> String {
//!         if ctx.content.parse::<f64>().is_ok() {
//!             format!("{} numeric", class)
//!         } else {
//!             class
//!         }
//!     }
//! }
//! ```

use crate::core::layout::SpanTriggers;
use crate::core::table::Grid;

/// Position and state of the cell being emitted
///
/// `row` and `column` are 1-based positions in the filtered grid.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub table_id: &'a str,
    pub row: usize,
    pub column: usize,
    pub colspan: usize,
    pub rowspan: usize,
    /// Cell content after formula evaluation and sanitization
    pub content: &'a str,
}

/// Host callbacks applied during a render
pub trait RenderHooks {
    /// Grid after hidden rows and columns were removed
    fn filtered_data(&self, _table_id: &str, data: Grid) -> Grid {
        data
    }

    /// Grid after formulas were resolved
    fn evaluated_data(&self, _table_id: &str, data: Grid) -> Grid {
        data
    }

    /// Cell contents that request merges
    fn span_triggers(&self, _table_id: &str, triggers: SpanTriggers) -> SpanTriggers {
        triggers
    }

    fn name_tag(&self, _table_id: &str, tag: String) -> String {
        tag
    }

    fn name_class(&self, _table_id: &str, class: String) -> String {
        class
    }

    fn description_tag(&self, _table_id: &str, tag: String) -> String {
        tag
    }

    fn description_class(&self, _table_id: &str, class: String) -> String {
        class
    }

    /// Caption text, no `<caption>` is written while it is empty
    fn caption(&self, _table_id: &str, caption: String) -> String {
        caption
    }

    fn caption_class(&self, _table_id: &str, class: String) -> String {
        class
    }

    /// Whether to write a `<colgroup>`
    fn colgroup_enabled(&self, _table_id: &str, enabled: bool) -> bool {
        enabled
    }

    /// Attributes of the `<col>` element for a 1-based column
    fn col_attributes(&self, _table_id: &str, _column: usize, attributes: String) -> String {
        attributes
    }

    fn cell_content(&self, _ctx: &CellContext<'_>, content: String) -> String {
        content
    }

    fn cell_css_class(&self, _ctx: &CellContext<'_>, class: String) -> String {
        class
    }

    /// Class of a `<tr>` for a 1-based row
    fn row_css_class(&self, _table_id: &str, _row: usize, class: String) -> String {
        class
    }

    fn table_css_classes(&self, _table_id: &str, classes: Vec<String>) -> Vec<String> {
        classes
    }

    /// `summary` attribute of the `<table>`, omitted while empty
    fn summary(&self, _table_id: &str, summary: String) -> String {
        summary
    }

    /// Whether line breaks in cells, name and description become `<br />`
    fn convert_line_breaks(&self, _table_id: &str, enabled: bool) -> bool {
        enabled
    }

    /// The finished markup
    fn output(&self, _table_id: &str, output: String) -> String {
        output
    }
}

/// Hooks that change nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl RenderHooks for DefaultHooks {}

impl<H: RenderHooks + ?Sized> RenderHooks for &H {
    fn filtered_data(&self, table_id: &str, data: Grid) -> Grid {
        (**self).filtered_data(table_id, data)
    }

    fn evaluated_data(&self, table_id: &str, data: Grid) -> Grid {
        (**self).evaluated_data(table_id, data)
    }

    fn span_triggers(&self, table_id: &str, triggers: SpanTriggers) -> SpanTriggers {
        (**self).span_triggers(table_id, triggers)
    }

    fn name_tag(&self, table_id: &str, tag: String) -> String {
        (**self).name_tag(table_id, tag)
    }

    fn name_class(&self, table_id: &str, class: String) -> String {
        (**self).name_class(table_id, class)
    }

    fn description_tag(&self, table_id: &str, tag: String) -> String {
        (**self).description_tag(table_id, tag)
    }

    fn description_class(&self, table_id: &str, class: String) -> String {
        (**self).description_class(table_id, class)
    }

    fn caption(&self, table_id: &str, caption: String) -> String {
        (**self).caption(table_id, caption)
    }

    fn caption_class(&self, table_id: &str, class: String) -> String {
        (**self).caption_class(table_id, class)
    }

    fn colgroup_enabled(&self, table_id: &str, enabled: bool) -> bool {
        (**self).colgroup_enabled(table_id, enabled)
    }

    fn col_attributes(&self, table_id: &str, column: usize, attributes: String) -> String {
        (**self).col_attributes(table_id, column, attributes)
    }

    fn cell_content(&self, ctx: &CellContext<'_>, content: String) -> String {
        (**self).cell_content(ctx, content)
    }

    fn cell_css_class(&self, ctx: &CellContext<'_>, class: String) -> String {
        (**self).cell_css_class(ctx, class)
    }

    fn row_css_class(&self, table_id: &str, row: usize, class: String) -> String {
        (**self).row_css_class(table_id, row, class)
    }

    fn table_css_classes(&self, table_id: &str, classes: Vec<String>) -> Vec<String> {
        (**self).table_css_classes(table_id, classes)
    }

    fn summary(&self, table_id: &str, summary: String) -> String {
        (**self).summary(table_id, summary)
    }

    fn convert_line_breaks(&self, table_id: &str, enabled: bool) -> bool {
        (**self).convert_line_breaks(table_id, enabled)
    }

    fn output(&self, table_id: &str, output: String) -> String {
        (**self).output(table_id, output)
    }
}
