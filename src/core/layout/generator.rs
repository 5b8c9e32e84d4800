//! Span layout engine
//!
//! Cells holding a trigger keyword are folded into a neighbour instead of being
//! written: `#rowspan#` into the cell above, `#colspan#` into the cell to the
//! left, `#span#` into both. The grid is walked bottom-right to top-left so the
//! span counts are complete by the time the surviving cell is reached.

use tracing::debug;

use super::cell::{
    Caption, CellDescriptor, CellTag, ColumnGroup, RowDescriptor, RowSection, TableLayout,
};
use crate::core::options::ResolvedOptions;
use crate::core::table::Grid;
use crate::data::constants::{
    CLASS_PREFIX, DEFAULT_COLSPAN_TRIGGER, DEFAULT_ROWSPAN_TRIGGER, DEFAULT_SPAN_TRIGGER, NBSP,
};
use crate::features::hooks::{CellContext, DefaultHooks, RenderHooks};
use crate::features::sanitize::safe_output;
use crate::utils::error::{RenderWarning, WarningKind};

/// Cell contents that request a merge
///
/// An empty keyword never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanTriggers {
    pub rowspan: String,
    pub colspan: String,
    pub span: String,
}

impl Default for SpanTriggers {
    fn default() -> Self {
        SpanTriggers {
            rowspan: DEFAULT_ROWSPAN_TRIGGER.to_string(),
            colspan: DEFAULT_COLSPAN_TRIGGER.to_string(),
            span: DEFAULT_SPAN_TRIGGER.to_string(),
        }
    }
}

/// Merge requested by a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Rowspan,
    Colspan,
    Span,
}

impl SpanTriggers {
    pub fn classify(&self, content: &str) -> Option<SpanKind> {
        if content.is_empty() {
            None
        } else if content == self.rowspan {
            Some(SpanKind::Rowspan)
        } else if content == self.colspan {
            Some(SpanKind::Colspan)
        } else if content == self.span {
            Some(SpanKind::Span)
        } else {
            None
        }
    }

    fn keyword(&self, kind: SpanKind) -> &str {
        match kind {
            SpanKind::Rowspan => &self.rowspan,
            SpanKind::Colspan => &self.colspan,
            SpanKind::Span => &self.span,
        }
    }
}

/// Head/foot promotion decided for one grid
#[derive(Debug, Clone, Copy)]
struct Sections {
    head: bool,
    foot: bool,
    last_row: usize,
    first_column_th: bool,
}

impl Sections {
    fn section_of(&self, row: usize) -> RowSection {
        if self.head && row == 0 {
            RowSection::Header
        } else if self.foot && row == self.last_row {
            RowSection::Footer
        } else {
            RowSection::Body
        }
    }

    /// A merge upwards must stay inside the body
    fn can_merge_up(&self, row: usize) -> bool {
        row > 0 && !(row == 1 && self.head) && !(row == self.last_row && self.foot)
    }

    /// A merge to the left must not reach the header column
    fn can_merge_left(&self, column: usize) -> bool {
        column > 0 && !(column == 1 && self.first_column_th)
    }
}

/// Turns a filtered, evaluated grid into a [`TableLayout`]
///
/// Counters and warnings live for one [`layout`](Self::layout) call; the
/// engine can be reused for another grid of the same table.
pub struct SpanLayoutEngine<'a, H: RenderHooks + ?Sized = DefaultHooks> {
    table_id: &'a str,
    options: &'a ResolvedOptions,
    hooks: &'a H,
    triggers: SpanTriggers,
    convert_line_breaks: bool,
    warnings: Vec<RenderWarning>,
}

impl<'a, H: RenderHooks + ?Sized> SpanLayoutEngine<'a, H> {
    pub fn new(table_id: &'a str, options: &'a ResolvedOptions, hooks: &'a H) -> Self {
        SpanLayoutEngine {
            table_id,
            options,
            hooks,
            triggers: hooks.span_triggers(table_id, SpanTriggers::default()),
            convert_line_breaks: hooks.convert_line_breaks(table_id, true),
            warnings: Vec::new(),
        }
    }

    pub fn triggers(&self) -> &SpanTriggers {
        &self.triggers
    }

    /// Warnings collected so far, leaving none behind
    pub fn take_warnings(&mut self) -> Vec<RenderWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn layout(&mut self, data: &Grid) -> TableLayout {
        let row_count = data.len();
        let column_count = data.iter().map(Vec::len).max().unwrap_or(0);
        let promote = row_count > 1;
        let sections = Sections {
            head: promote && self.options.table_head,
            foot: promote && self.options.table_foot,
            last_row: row_count.saturating_sub(1),
            first_column_th: self.options.first_column_th,
        };

        let mut rowspan = vec![1usize; column_count];
        let mut colspan = vec![1usize; row_count];
        let mut rows = Vec::with_capacity(row_count);

        for row in (0..row_count).rev() {
            let section = sections.section_of(row);
            let mut cells = Vec::with_capacity(column_count);

            for column in (0..column_count).rev() {
                let mut content = data[row].get(column).map_or("", String::as_str);

                if let Some(kind) = self.triggers.classify(content) {
                    let valid = match kind {
                        SpanKind::Rowspan => sections.can_merge_up(row),
                        SpanKind::Colspan => sections.can_merge_left(column),
                        SpanKind::Span => {
                            sections.can_merge_up(row) && sections.can_merge_left(column)
                        }
                    };

                    if valid {
                        match kind {
                            SpanKind::Rowspan => {
                                rowspan[column] += 1;
                                colspan[row] = 1;
                            }
                            SpanKind::Colspan => {
                                colspan[row] += 1;
                                rowspan[column] = 1;
                            }
                            SpanKind::Span => {}
                        }
                        continue;
                    }

                    self.warnings.push(RenderWarning::at(
                        WarningKind::SpanTrigger,
                        format!(
                            "'{}' has no cell to merge into",
                            self.triggers.keyword(kind)
                        ),
                        row + 1,
                        column + 1,
                    ));
                    content = NBSP;
                }

                cells.push(self.cell(
                    row,
                    column,
                    content,
                    section,
                    colspan[row],
                    rowspan[column],
                ));
                rowspan[column] = 1;
                colspan[row] = 1;
            }

            cells.reverse();
            rows.push(RowDescriptor {
                index: row + 1,
                section,
                class: String::new(),
                cells,
            });
        }

        rows.reverse();
        self.assign_row_classes(&mut rows);

        let mut rows = rows.into_iter();
        let header = if sections.head { rows.next() } else { None };
        let mut body: Vec<RowDescriptor> = rows.collect();
        let footer = if sections.foot { body.pop() } else { None };

        debug!(
            table_id = self.table_id,
            header = header.is_some(),
            footer = footer.is_some(),
            body_rows = body.len(),
            "laid out table"
        );

        TableLayout {
            header,
            footer,
            body,
            caption: self.caption(),
            colgroup: self.colgroup(column_count),
        }
    }

    fn cell(
        &self,
        row: usize,
        column: usize,
        content: &str,
        section: RowSection,
        colspan: usize,
        rowspan: usize,
    ) -> CellDescriptor {
        let tag = if section != RowSection::Body || (column == 0 && self.options.first_column_th)
        {
            CellTag::Header
        } else {
            CellTag::Data
        };

        let sanitized = safe_output(content, self.convert_line_breaks);
        let ctx = CellContext {
            table_id: self.table_id,
            row: row + 1,
            column: column + 1,
            colspan,
            rowspan,
            content: &sanitized,
        };
        let content = self.hooks.cell_content(&ctx, sanitized.clone());
        let ctx = CellContext {
            content: &content,
            ..ctx
        };
        let class = self
            .hooks
            .cell_css_class(&ctx, format!("column-{}", column + 1));

        let style = if row == 0 {
            self.options
                .column_widths
                .get(column)
                .filter(|width| !width.is_empty())
                .map(|width| format!("width:{};", width))
        } else {
            None
        };

        CellDescriptor {
            content,
            tag,
            colspan,
            rowspan,
            class,
            style,
        }
    }

    /// `row-N` classes plus odd/even parity counted over body rows
    fn assign_row_classes(&self, rows: &mut [RowDescriptor]) {
        let mut body_rows = 0usize;
        for row in rows.iter_mut() {
            let mut class = format!("row-{}", row.index);
            if row.section == RowSection::Body && self.options.alternating_row_colors {
                body_rows += 1;
                class.push_str(if body_rows % 2 == 1 { " odd" } else { " even" });
            }
            row.class = self.hooks.row_css_class(self.table_id, row.index, class);
        }
    }

    fn caption(&self) -> Option<Caption> {
        let text = self.hooks.caption(self.table_id, String::new());
        if text.is_empty() {
            return None;
        }
        let class = self.hooks.caption_class(
            self.table_id,
            format!(
                "{0}-table-caption {0}-table-caption-id-{1}",
                CLASS_PREFIX, self.table_id
            ),
        );
        Some(Caption { text, class })
    }

    fn colgroup(&self, column_count: usize) -> Option<ColumnGroup> {
        if !self.hooks.colgroup_enabled(self.table_id, false) {
            return None;
        }
        let columns = (1..=column_count)
            .map(|column| {
                self.hooks.col_attributes(
                    self.table_id,
                    column,
                    format!("class=\"colgroup-column-{}\"", column),
                )
            })
            .collect();
        Some(ColumnGroup { columns })
    }
}
