//! Tests for span layout and markup emission

use pretty_assertions::assert_eq;

use super::cell::{CellDescriptor, CellTag, RowSection, TableLayout};
use super::emitter::emit_table;
use super::generator::{SpanKind, SpanLayoutEngine, SpanTriggers};
use crate::core::options::{Placement, ResolvedOptions};
use crate::core::table::{grid, Grid, Table};
use crate::features::hooks::{CellContext, DefaultHooks, RenderHooks};
use crate::utils::error::WarningKind;

fn plain() -> ResolvedOptions {
    ResolvedOptions {
        table_head: false,
        table_foot: false,
        alternating_row_colors: false,
        row_hover: false,
        ..ResolvedOptions::default()
    }
}

fn lay_out(data: Grid, options: &ResolvedOptions) -> TableLayout {
    SpanLayoutEngine::new("1", options, &DefaultHooks).layout(&data)
}

fn contents(layout: &TableLayout) -> Vec<Vec<String>> {
    layout
        .rows()
        .map(|row| row.cells.iter().map(|c| c.content.clone()).collect())
        .collect()
}

#[test]
fn test_head_body_foot_partition() {
    let options = ResolvedOptions {
        table_head: true,
        table_foot: true,
        ..plain()
    };
    let layout = lay_out(grid([["h"], ["b"], ["f"]]), &options);

    let header = layout.header.as_ref().map(|r| r.cells[0].content.as_str());
    let footer = layout.footer.as_ref().map(|r| r.cells[0].content.as_str());
    assert_eq!(header, Some("h"));
    assert_eq!(footer, Some("f"));
    assert_eq!(layout.body.len(), 1);
    assert_eq!(layout.body[0].cells[0].content, "b");
    assert_eq!(layout.body[0].cells[0].tag, CellTag::Data);
    assert_eq!(layout.header.as_ref().map(|r| r.cells[0].tag), Some(CellTag::Header));
    assert_eq!(layout.footer.as_ref().map(|r| r.section), Some(RowSection::Footer));
}

#[test]
fn test_single_row_is_never_promoted() {
    let options = ResolvedOptions {
        table_head: true,
        table_foot: true,
        ..plain()
    };
    let layout = lay_out(grid([["only"]]), &options);
    assert!(layout.header.is_none());
    assert!(layout.footer.is_none());
    assert_eq!(layout.body.len(), 1);
    assert_eq!(layout.body[0].cells[0].tag, CellTag::Data);
}

#[test]
fn test_rowspan() {
    let layout = lay_out(
        grid([["a", "b"], ["#rowspan#", "c"], ["#rowspan#", "d"]]),
        &plain(),
    );
    assert_eq!(
        contents(&layout),
        vec![vec!["a", "b"], vec!["c"], vec!["d"]]
    );
    assert_eq!(layout.body[0].cells[0].rowspan, 3);
    assert_eq!(layout.body[0].cells[1].rowspan, 1);
}

#[test]
fn test_colspan() {
    let layout = lay_out(grid([["a", "#colspan#", "#colspan#"], ["b", "c", "d"]]), &plain());
    assert_eq!(layout.body[0].cells.len(), 1);
    assert_eq!(layout.body[0].cells[0].colspan, 3);
    assert_eq!(layout.body[1].cells.len(), 3);
}

#[test]
fn test_combined_span_block() {
    // a 2x2 block anchored at B2
    let layout = lay_out(
        grid([
            ["x", "x", "x"],
            ["x", "a", "#colspan#"],
            ["x", "#rowspan#", "#span#"],
        ]),
        &plain(),
    );
    let anchor = &layout.body[1].cells[1];
    assert_eq!(anchor.content, "a");
    assert_eq!((anchor.colspan, anchor.rowspan), (2, 2));
    assert_eq!(layout.body[1].cells.len(), 2);
    assert_eq!(layout.body[2].cells.len(), 1);
}

#[test]
fn test_rowspan_in_first_row_is_literal() {
    let options = plain();
    let mut engine = SpanLayoutEngine::new("1", &options, &DefaultHooks);
    let layout = engine.layout(&grid([["#rowspan#", "a"], ["b", "c"]]));
    assert_eq!(layout.body[0].cells[0].content, "&nbsp;");
    assert_eq!(layout.body[0].cells.len(), 2);

    let warnings = engine.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::SpanTrigger);
    assert_eq!(warnings[0].location().as_deref(), Some("A1"));
    assert!(engine.take_warnings().is_empty());
}

#[test]
fn test_colspan_in_first_column_is_literal() {
    let layout = lay_out(grid([["#colspan#", "a"]]), &plain());
    assert_eq!(contents(&layout), vec![vec!["&nbsp;", "a"]]);
}

#[test]
fn test_no_merge_into_promoted_header() {
    let options = ResolvedOptions {
        table_head: true,
        ..plain()
    };
    let layout = lay_out(grid([["h"], ["#rowspan#"], ["c"]]), &options);
    assert_eq!(layout.header.as_ref().map(|r| r.cells[0].rowspan), Some(1));
    assert_eq!(layout.body[0].cells[0].content, "&nbsp;");

    // without a header row the same trigger merges
    let layout = lay_out(grid([["h"], ["#rowspan#"], ["c"]]), &plain());
    assert_eq!(layout.body[0].cells[0].rowspan, 2);
}

#[test]
fn test_no_merge_out_of_promoted_footer() {
    let options = ResolvedOptions {
        table_foot: true,
        ..plain()
    };
    let layout = lay_out(grid([["a"], ["b"], ["#rowspan#"]]), &options);
    assert_eq!(
        layout.footer.as_ref().map(|r| r.cells[0].content.as_str()),
        Some("&nbsp;")
    );
    assert_eq!(layout.body[1].cells[0].rowspan, 1);
}

#[test]
fn test_no_merge_into_header_column() {
    let options = ResolvedOptions {
        first_column_th: true,
        ..plain()
    };
    let layout = lay_out(grid([["a", "#colspan#", "#colspan#"]]), &options);
    // the outer trigger counts, the one next to the header column does not
    assert_eq!(contents(&layout), vec![vec!["a", "&nbsp;"]]);
    assert_eq!(layout.body[0].cells[1].colspan, 2);
    assert_eq!(layout.body[0].cells[0].tag, CellTag::Header);
    assert_eq!(layout.body[0].cells[1].tag, CellTag::Data);
}

#[test]
fn test_span_needs_both_directions() {
    let layout = lay_out(grid([["a", "#span#"], ["#span#", "b"]]), &plain());
    assert_eq!(contents(&layout), vec![vec!["a", "&nbsp;"], vec!["&nbsp;", "b"]]);
}

fn span_row(data: Grid, options: &ResolvedOptions, row: usize) -> (Vec<String>, usize) {
    let mut engine = SpanLayoutEngine::new("1", options, &DefaultHooks);
    let layout = engine.layout(&data);
    (contents(&layout)[row].clone(), engine.take_warnings().len())
}

#[test]
fn test_span_inside_body_is_merged() {
    let data = grid([["a", "b", "c"], ["d", "#span#", "e"], ["f", "#span#", "g"]]);
    assert_eq!(span_row(data.clone(), &plain(), 1), (vec!["d".into(), "e".into()], 0));
    assert_eq!(span_row(data, &plain(), 2), (vec!["f".into(), "g".into()], 0));
}

#[test]
fn test_span_below_header_is_literal() {
    let options = ResolvedOptions {
        table_head: true,
        ..plain()
    };
    let data = grid([["a", "b", "c"], ["d", "#span#", "e"], ["f", "g", "h"]]);
    assert_eq!(
        span_row(data, &options, 1),
        (vec!["d".into(), "&nbsp;".into(), "e".into()], 1)
    );
}

#[test]
fn test_span_next_to_header_column_is_literal() {
    let options = ResolvedOptions {
        first_column_th: true,
        ..plain()
    };
    let data = grid([["a", "b", "c"], ["d", "#span#", "e"], ["f", "g", "h"]]);
    assert_eq!(
        span_row(data, &options, 1),
        (vec!["d".into(), "&nbsp;".into(), "e".into()], 1)
    );
}

#[test]
fn test_span_in_footer_is_literal() {
    let options = ResolvedOptions {
        table_foot: true,
        ..plain()
    };
    let data = grid([["a", "b", "c"], ["d", "e", "f"], ["g", "#span#", "h"]]);
    assert_eq!(
        span_row(data, &options, 2),
        (vec!["g".into(), "&nbsp;".into(), "h".into()], 1)
    );
}

#[test]
fn test_rowspan_resets_row_colspan() {
    // the colspan collected in C2 must not widen A2 across the merged B2
    let layout = lay_out(
        grid([["a", "b", "c"], ["e", "#rowspan#", "#colspan#"]]),
        &plain(),
    );
    let second = &layout.body[1].cells;
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].content, "e");
    assert_eq!(second[0].colspan, 1);
    assert_eq!(layout.body[0].cells[1].rowspan, 2);
    assert_eq!(layout.body[0].cells[2].rowspan, 1);
}

#[test]
fn test_column_widths_on_first_row_only() {
    let options = ResolvedOptions {
        column_widths: vec!["40px".into(), String::new()],
        ..plain()
    };
    let layout = lay_out(grid([["a", "b", "c"], ["d", "e", "f"]]), &options);
    assert_eq!(layout.body[0].cells[0].style.as_deref(), Some("width:40px;"));
    assert_eq!(layout.body[0].cells[1].style, None);
    assert_eq!(layout.body[0].cells[2].style, None);
    assert_eq!(layout.body[1].cells[0].style, None);
}

#[test]
fn test_row_classes_and_parity() {
    let options = ResolvedOptions {
        table_head: true,
        alternating_row_colors: true,
        ..plain()
    };
    let layout = lay_out(grid([["h"], ["a"], ["b"], ["c"]]), &options);
    assert_eq!(layout.header.as_ref().map(|r| r.class.as_str()), Some("row-1"));
    let classes: Vec<&str> = layout.body.iter().map(|r| r.class.as_str()).collect();
    assert_eq!(classes, vec!["row-2 odd", "row-3 even", "row-4 odd"]);
    assert_eq!(layout.body[0].cells[0].class, "column-1");
}

#[test]
fn test_cell_content_is_sanitized() {
    let layout = lay_out(grid([["a & b\nc", "&amp;"]]), &plain());
    assert_eq!(layout.body[0].cells[0].content, "a &amp; b<br />\nc");
    assert_eq!(layout.body[0].cells[1].content, "&amp;");
}

struct CustomHooks;

impl RenderHooks for CustomHooks {
    fn span_triggers(&self, _table_id: &str, _triggers: SpanTriggers) -> SpanTriggers {
        SpanTriggers {
            rowspan: "^^".into(),
            colspan: "<<".into(),
            span: String::new(),
        }
    }

    fn cell_css_class(&self, ctx: &CellContext<'_>, class: String) -> String {
        if ctx.colspan > 1 {
            format!("{} wide", class)
        } else {
            class
        }
    }

    fn caption(&self, table_id: &str, _caption: String) -> String {
        format!("Table {}", table_id)
    }

    fn colgroup_enabled(&self, _table_id: &str, _enabled: bool) -> bool {
        true
    }

    fn convert_line_breaks(&self, _table_id: &str, _enabled: bool) -> bool {
        false
    }
}

#[test]
fn test_hooks_change_layout() {
    let options = plain();
    let mut engine = SpanLayoutEngine::new("7", &options, &CustomHooks);
    assert_eq!(engine.triggers().classify("<<"), Some(SpanKind::Colspan));
    assert_eq!(engine.triggers().classify(""), None);

    let layout = engine.layout(&grid([["a", "<<"], ["#rowspan#", "x\ny"]]));
    assert_eq!(layout.body[0].cells[0].class, "column-1 wide");
    assert_eq!(layout.body[1].cells[0].content, "#rowspan#");
    assert_eq!(layout.body[1].cells[1].content, "x\ny");
    assert_eq!(layout.caption.as_ref().map(|c| c.text.as_str()), Some("Table 7"));
    assert_eq!(layout.colgroup.as_ref().map(|c| c.columns.len()), Some(2));
}

#[test]
fn test_cell_html() {
    let mut cell = CellDescriptor::new("x");
    assert_eq!(cell.to_html(), "<td>x</td>");

    cell.tag = CellTag::Header;
    cell.colspan = 2;
    cell.rowspan = 3;
    cell.class = "column-1".into();
    cell.style = Some("width:10px;".into());
    assert_eq!(
        cell.to_html(),
        "<th colspan=\"2\" rowspan=\"3\" class=\"column-1\" style=\"width:10px;\">x</th>"
    );
}

#[test]
fn test_emit_table() {
    let options = ResolvedOptions {
        table_head: true,
        row_hover: true,
        alternating_row_colors: true,
        extra_css_classes: "compact".into(),
        border: Some("1".into()),
        ..plain()
    };
    let table = Table::new("3", grid([["H1", "H2"], ["a", "b"]]));
    let layout = lay_out(table.data.clone(), &options);
    let html = emit_table(&table, &layout, &options, &DefaultHooks);

    let expected = "<table id=\"test\" class=\"gridmark gridmark-id-3 compact\" border=\"1\">\n\
<thead>\n\
\t<tr class=\"row-1\">\n\
\t\t<th class=\"column-1\">H1</th>\n\
\t\t<th class=\"column-2\">H2</th>\n\
\t</tr>\n\
</thead>\n\
<tbody class=\"row-hover\">\n\
\t<tr class=\"row-2 odd\">\n\
\t\t<td class=\"column-1\">a</td>\n\
\t\t<td class=\"column-2\">b</td>\n\
\t</tr>\n\
</tbody>\n\
</table>\n";
    assert_eq!(html, expected);
}

#[test]
fn test_emit_name_and_description() {
    let options = ResolvedOptions {
        print_name: Some(Placement::Above),
        print_description: Some(Placement::Below),
        html_id: String::new(),
        ..plain()
    };
    let table = Table::new("5", grid([["x"]]))
        .with_name("Prices & fees")
        .with_description("Per month");
    let layout = lay_out(table.data.clone(), &options);
    let html = emit_table(&table, &layout, &options, &DefaultHooks);

    assert!(html.starts_with(
        "<h2 class=\"gridmark-table-name gridmark-table-name-id-5\">Prices &amp; fees</h2>\n<table class="
    ));
    assert!(html.ends_with(
        "</table>\n<span class=\"gridmark-table-description gridmark-table-description-id-5\">Per month</span>\n"
    ));
}

#[test]
fn test_emit_caption_and_colgroup() {
    let options = plain();
    let table = Table::new("7", grid([["a", "b"]]));
    let layout = SpanLayoutEngine::new("7", &options, &CustomHooks).layout(&table.data);
    let html = emit_table(&table, &layout, &options, &CustomHooks);
    assert!(html.contains(
        "<caption class=\"gridmark-table-caption gridmark-table-caption-id-7\">Table 7</caption>\n"
    ));
    assert!(html.contains(
        "<colgroup>\n\t<col class=\"colgroup-column-1\" />\n\t<col class=\"colgroup-column-2\" />\n</colgroup>\n"
    ));
    assert!(html.contains("<tbody>\n"));
}
