//! Render driver
//!
//! [`TableRenderer`] runs the whole pipeline for one table:
//!
//! ```text
//! Table + RenderOptions
//!   -> filter_table        (window, hidden rows/columns)   hook: filtered_data
//!   -> FormulaResolver     (in place on the filtered grid) hook: evaluated_data
//!   -> SpanLayoutEngine    (TableLayout)                   hook: span_triggers, cell/row hooks
//!   -> emit_table          (markup)                        hook: output
//! ```
//!
//! Input is stored by [`set_input`](TableRenderer::set_input); everything
//! derived from it is rebuilt on every render.

use tracing::{debug, warn};

use crate::core::formula::{is_error_marker, FormulaResolver};
use crate::core::layout::{emit_table, SpanLayoutEngine};
use crate::core::options::{RenderOptions, ResolvedOptions, SiteDefaults};
use crate::core::table::{Grid, Table};
use crate::core::visibility::filter_table;
use crate::data::constants::{empty_table_comment, DEFAULT_MAX_FORMULA_DEPTH};
use crate::features::expression::{ExpressionEvaluator, MathEvaluator};
use crate::features::hooks::{DefaultHooks, RenderHooks};
use crate::utils::error::{RenderOutput, RenderWarning, WarningKind};

/// Renders a table with formulas and span triggers to HTML
///
/// # Example
///
/// ```rust
/// use gridmark::core::options::RenderOptions;
/// use gridmark::core::render::TableRenderer;
/// use gridmark::core::table::{grid, Table};
///
/// let mut renderer = TableRenderer::new();
/// renderer.set_input(
///     Table::new("1", grid([["Item", "Price"], ["Tea", "3"], ["Total", "=[B2]*2"]])),
///     RenderOptions::default(),
/// );
/// let html = renderer.get_output();
/// assert!(html.contains("<td class=\"column-2\">6</td>"));
/// ```
pub struct TableRenderer<H: RenderHooks = DefaultHooks, E: ExpressionEvaluator = MathEvaluator> {
    hooks: H,
    evaluator: E,
    site_defaults: SiteDefaults,
    max_formula_depth: usize,
    table: Table,
    options: RenderOptions,
}

impl TableRenderer {
    pub fn new() -> Self {
        TableRenderer {
            hooks: DefaultHooks,
            evaluator: MathEvaluator::new(),
            site_defaults: SiteDefaults::default(),
            max_formula_depth: DEFAULT_MAX_FORMULA_DEPTH,
            table: Table::default(),
            options: RenderOptions::default(),
        }
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Filtered and evaluated table, ready for layout
struct Prepared {
    table: Table,
    options: ResolvedOptions,
    warnings: Vec<RenderWarning>,
}

impl<H: RenderHooks, E: ExpressionEvaluator> TableRenderer<H, E> {
    /// Replace the hooks, keeping everything else
    pub fn with_hooks<H2: RenderHooks>(self, hooks: H2) -> TableRenderer<H2, E> {
        TableRenderer {
            hooks,
            evaluator: self.evaluator,
            site_defaults: self.site_defaults,
            max_formula_depth: self.max_formula_depth,
            table: self.table,
            options: self.options,
        }
    }

    /// Replace the expression evaluator, keeping everything else
    pub fn with_evaluator<E2: ExpressionEvaluator>(self, evaluator: E2) -> TableRenderer<H, E2> {
        TableRenderer {
            hooks: self.hooks,
            evaluator,
            site_defaults: self.site_defaults,
            max_formula_depth: self.max_formula_depth,
            table: self.table,
            options: self.options,
        }
    }

    pub fn with_site_defaults(mut self, site_defaults: SiteDefaults) -> Self {
        self.site_defaults = site_defaults;
        self
    }

    pub fn with_max_formula_depth(mut self, max_formula_depth: usize) -> Self {
        self.max_formula_depth = max_formula_depth;
        self
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn site_defaults(&self) -> &SiteDefaults {
        &self.site_defaults
    }

    /// Store the table and options for the next render
    pub fn set_input(&mut self, table: Table, options: RenderOptions) {
        self.table = table;
        self.options = options;
    }

    /// Render and return only the markup
    pub fn get_output(&mut self) -> String {
        self.render().content
    }

    /// Render and return the markup with the warnings collected on the way
    pub fn render(&mut self) -> RenderOutput {
        let Prepared {
            table,
            options,
            mut warnings,
        } = self.prepare();

        if table.is_empty() {
            warn!(table_id = %table.id, "table has no visible cells");
            warnings.push(RenderWarning::new(
                WarningKind::EmptyTable,
                format!("the table with ID {} has no visible cells", table.id),
            ));
            return RenderOutput::with_warnings(empty_table_comment(&table.id), warnings);
        }

        let mut engine = SpanLayoutEngine::new(&table.id, &options, &self.hooks);
        let layout = engine.layout(&table.data);
        for warning in engine.take_warnings() {
            warn!(table_id = %table.id, "{}", warning);
            warnings.push(warning);
        }

        let html = emit_table(&table, &layout, &options, &self.hooks);
        let html = self.hooks.output(&table.id, html);
        debug!(
            table_id = %table.id,
            bytes = html.len(),
            warnings = warnings.len(),
            "rendered table"
        );

        RenderOutput::with_warnings(html, warnings)
    }

    /// The grid as it enters layout: filtered, evaluated and passed through
    /// the data hooks
    pub fn evaluated_data(&mut self) -> Grid {
        self.prepare().table.data
    }

    fn prepare(&self) -> Prepared {
        let mut table = self.table.clone();
        if let Some(id) = self.options.id.as_deref() {
            if !id.is_empty() && id != "0" {
                table.id = id.to_string();
            }
        }
        let options = self.options.resolve(&self.site_defaults);

        let mut table = filter_table(&table, &options);
        table.data = self.hooks.filtered_data(&table.id, table.data);
        table.make_rectangular();

        let mut warnings = Vec::new();
        if table.is_empty() {
            return Prepared {
                table,
                options,
                warnings,
            };
        }

        let formula_cells: Vec<(usize, usize)> = table
            .data
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, content)| content.starts_with('='))
                    .map(move |(column, _)| (row, column))
            })
            .collect();

        debug!(
            table_id = %table.id,
            formulas = formula_cells.len(),
            "evaluating formulas"
        );
        FormulaResolver::new(&mut table.data, &self.evaluator)
            .with_max_depth(self.max_formula_depth)
            .evaluate_table_data();

        for (row, column) in formula_cells {
            let value = &table.data[row][column];
            if is_error_marker(value) {
                let warning =
                    RenderWarning::at(WarningKind::Formula, value.clone(), row + 1, column + 1);
                warn!(table_id = %table.id, "{}", warning);
                warnings.push(warning);
            }
        }

        table.data = self.hooks.evaluated_data(&table.id, table.data);
        table.make_rectangular();

        Prepared {
            table,
            options,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::TriState;
    use crate::core::table::grid;
    use crate::features::expression::ExpressionError;
    use pretty_assertions::assert_eq;

    fn render(data: Grid, options: RenderOptions) -> RenderOutput {
        let mut renderer = TableRenderer::new();
        renderer.set_input(Table::new("1", data), options);
        renderer.render()
    }

    #[test]
    fn test_formulas_are_evaluated_before_layout() {
        let output = render(grid([["2", "3", "=[A1]+[B1]"]]), RenderOptions::plain());
        assert!(output.content.contains("<td class=\"column-3\">5</td>"));
        assert!(!output.has_warnings());
    }

    #[test]
    fn test_hidden_cells_cannot_be_referenced() {
        // with column A hidden, [A1] names the former B1 and [D1] is gone
        let options = RenderOptions {
            hide_columns: vec![1],
            ..RenderOptions::plain()
        };
        let mut renderer = TableRenderer::new();
        renderer.set_input(
            Table::new("1", grid([["9", "5", "=[A1]*2", "=[D1]"]])),
            options,
        );
        assert_eq!(
            renderer.evaluated_data(),
            grid([["5", "10", "!ERROR! Cell [D1] does not exist"]])
        );
    }

    #[test]
    fn test_formula_errors_become_warnings() {
        let output = render(grid([["=1/0", "ok"], ["=[A1]", "=[Z1]"]]), RenderOptions::plain());
        let locations: Vec<String> = output
            .warnings
            .iter()
            .filter(|w| w.kind == WarningKind::Formula)
            .filter_map(|w| w.location())
            .collect();
        assert_eq!(locations, vec!["A1", "A2", "B2"]);
    }

    #[test]
    fn test_empty_table_placeholder() {
        let options = RenderOptions {
            row_offset: 5,
            ..RenderOptions::default()
        };
        let output = render(grid([["a"]]), options);
        assert_eq!(
            output.content,
            "<!-- gridmark: the table with ID 1 is empty! -->\n"
        );
        assert_eq!(output.warnings[0].kind, WarningKind::EmptyTable);
    }

    #[test]
    fn test_id_override() {
        let options = RenderOptions {
            id: Some("42".into()),
            ..RenderOptions::plain()
        };
        let output = render(grid([["a"]]), options);
        assert!(output.content.contains("gridmark-id-42"));

        let unset = RenderOptions {
            id: Some("0".into()),
            ..RenderOptions::plain()
        };
        assert!(render(grid([["a"]]), unset).content.contains("gridmark-id-1"));
    }

    #[test]
    fn test_site_defaults_apply_to_unset_options() {
        let mut renderer = TableRenderer::new().with_site_defaults(SiteDefaults {
            table_head: false,
            ..SiteDefaults::default()
        });
        renderer.set_input(Table::new("1", grid([["a"], ["b"]])), RenderOptions::default());
        assert!(!renderer.get_output().contains("<thead>"));

        renderer.set_input(
            Table::new("1", grid([["a"], ["b"]])),
            RenderOptions {
                table_head: TriState::Enabled,
                ..RenderOptions::default()
            },
        );
        assert!(renderer.get_output().contains("<thead>"));
    }

    #[test]
    fn test_custom_evaluator() {
        let upper = |expression: &str| -> Result<String, ExpressionError> {
            Ok(expression.to_uppercase())
        };
        let mut renderer = TableRenderer::new().with_evaluator(upper);
        renderer.set_input(Table::new("1", grid([["x", "=[A1]&y"]])), RenderOptions::plain());
        assert_eq!(renderer.evaluated_data(), grid([["x", "X&Y"]]));
    }

    #[test]
    fn test_renders_are_independent() {
        let mut renderer = TableRenderer::new();
        renderer.set_input(Table::new("1", grid([["=1+1"]])), RenderOptions::plain());
        let first = renderer.get_output();
        let second = renderer.get_output();
        assert_eq!(first, second);
        assert!(first.contains(">2</td>"));
    }

    struct Shouting;

    impl RenderHooks for Shouting {
        fn evaluated_data(&self, _table_id: &str, data: Grid) -> Grid {
            data.into_iter()
                .map(|row| row.into_iter().map(|c| c.to_uppercase()).collect())
                .collect()
        }

        fn output(&self, table_id: &str, output: String) -> String {
            format!("<div id=\"wrap-{}\">{}</div>", table_id, output)
        }
    }

    #[test]
    fn test_hooks_are_applied() {
        let mut renderer = TableRenderer::new().with_hooks(Shouting);
        renderer.set_input(Table::new("9", grid([["abc"]])), RenderOptions::plain());
        let html = renderer.get_output();
        assert!(html.starts_with("<div id=\"wrap-9\"><table"));
        assert!(html.contains(">ABC</td>"));
    }
}
