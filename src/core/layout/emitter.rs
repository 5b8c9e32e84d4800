//! Markup emitter
//!
//! Serializes a [`TableLayout`] together with the table name and description.

use super::cell::{RowDescriptor, TableLayout};
use crate::core::options::{Placement, ResolvedOptions};
use crate::core::table::Table;
use crate::data::constants::CLASS_PREFIX;
use crate::features::hooks::RenderHooks;
use crate::features::sanitize::safe_output;

/// Write the complete markup for a laid out table
pub fn emit_table<H: RenderHooks + ?Sized>(
    table: &Table,
    layout: &TableLayout,
    options: &ResolvedOptions,
    hooks: &H,
) -> String {
    let id = table.id.as_str();
    let convert_line_breaks = hooks.convert_line_breaks(id, true);

    let name = heading(
        &table.name,
        hooks.name_tag(id, "h2".to_string()),
        hooks.name_class(
            id,
            format!("{0}-table-name {0}-table-name-id-{1}", CLASS_PREFIX, id),
        ),
        convert_line_breaks,
    );
    let description = heading(
        &table.description,
        hooks.description_tag(id, "span".to_string()),
        hooks.description_class(
            id,
            format!(
                "{0}-table-description {0}-table-description-id-{1}",
                CLASS_PREFIX, id
            ),
        ),
        convert_line_breaks,
    );

    let mut output = String::new();

    for (placement, html) in [
        (options.print_name, &name),
        (options.print_description, &description),
    ] {
        if placement == Some(Placement::Above) {
            output.push_str(html);
        }
    }

    output.push_str(&open_table_tag(id, options, hooks));

    if let Some(caption) = &layout.caption {
        if caption.class.is_empty() {
            output.push_str(&format!("<caption>{}</caption>\n", caption.text));
        } else {
            output.push_str(&format!(
                "<caption class=\"{}\">{}</caption>\n",
                caption.class, caption.text
            ));
        }
    }

    if let Some(colgroup) = &layout.colgroup {
        output.push_str("<colgroup>\n");
        for attributes in &colgroup.columns {
            if attributes.is_empty() {
                output.push_str("\t<col />\n");
            } else {
                output.push_str(&format!("\t<col {} />\n", attributes));
            }
        }
        output.push_str("</colgroup>\n");
    }

    if let Some(header) = &layout.header {
        output.push_str(&section("thead", None, std::slice::from_ref(header)));
    }
    if let Some(footer) = &layout.footer {
        output.push_str(&section("tfoot", None, std::slice::from_ref(footer)));
    }
    if !layout.body.is_empty() {
        let class = options.row_hover.then_some("row-hover");
        output.push_str(&section("tbody", class, &layout.body));
    }

    output.push_str("</table>\n");

    for (placement, html) in [
        (options.print_name, &name),
        (options.print_description, &description),
    ] {
        if placement == Some(Placement::Below) {
            output.push_str(html);
        }
    }

    output
}

/// Name or description element, empty when there is no text
fn heading(text: &str, tag: String, class: String, convert_line_breaks: bool) -> String {
    if text.is_empty() {
        return String::new();
    }
    let tag = if tag.is_empty() { "span".to_string() } else { tag };
    let class = if class.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", class)
    };
    format!(
        "<{0}{1}>{2}</{0}>\n",
        tag,
        class,
        safe_output(text, convert_line_breaks)
    )
}

fn open_table_tag<H: RenderHooks + ?Sized>(
    id: &str,
    options: &ResolvedOptions,
    hooks: &H,
) -> String {
    let mut classes = vec![CLASS_PREFIX.to_string(), format!("{}-id-{}", CLASS_PREFIX, id)];
    classes.extend(
        options
            .extra_css_classes
            .split_whitespace()
            .map(str::to_string),
    );
    let classes = hooks.table_css_classes(id, classes);
    let mut seen = Vec::with_capacity(classes.len());
    for class in classes {
        if !class.is_empty() && !seen.contains(&class) {
            seen.push(class);
        }
    }

    let mut tag = String::from("<table");
    if !options.html_id.is_empty() {
        tag.push_str(&format!(" id=\"{}\"", options.html_id));
    }
    if !seen.is_empty() {
        tag.push_str(&format!(" class=\"{}\"", seen.join(" ")));
    }
    let summary = hooks.summary(id, String::new());
    if !summary.is_empty() {
        tag.push_str(&format!(" summary=\"{}\"", summary));
    }
    for (attribute, value) in [
        ("cellspacing", &options.cellspacing),
        ("cellpadding", &options.cellpadding),
        ("border", &options.border),
    ] {
        if let Some(value) = value {
            tag.push_str(&format!(" {}=\"{}\"", attribute, value));
        }
    }
    tag.push_str(">\n");
    tag
}

fn section(element: &str, class: Option<&str>, rows: &[RowDescriptor]) -> String {
    let mut html = match class {
        Some(class) => format!("<{} class=\"{}\">\n", element, class),
        None => format!("<{}>\n", element),
    };
    for row in rows {
        html.push_str(&row.to_html());
    }
    html.push_str(&format!("</{}>\n", element));
    html
}
