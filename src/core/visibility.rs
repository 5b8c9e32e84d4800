//! Visibility filter
//!
//! Applies the row window and the hidden row/column rules to a table. Index
//! lists in the options are 1-based and, like the window, refer to rows and
//! columns of the unfiltered table.

use fxhash::FxHashSet;
use tracing::debug;

use crate::core::options::ResolvedOptions;
use crate::core::table::{Table, Visibility};

/// Produce the table that is actually laid out
///
/// The result is rectangular and densely indexed from 0, and its visibility
/// flags are all set, so filtering it again with no index lists and the
/// default window returns it unchanged.
pub fn filter_table(table: &Table, options: &ResolvedOptions) -> Table {
    let column_count = table.num_cols();

    let window_start = options.row_offset.max(1) - 1;
    let window_end = match options.row_count {
        Some(count) => window_start.saturating_add(count),
        None => usize::MAX,
    }
    .min(table.num_rows());

    let hidden_rows = hidden_indices(
        &table.visibility.rows,
        &options.hide_rows,
        &options.show_rows,
    );
    let hidden_columns = hidden_indices(
        &table.visibility.columns,
        &options.hide_columns,
        &options.show_columns,
    );

    let columns: Vec<usize> = (0..column_count)
        .filter(|c| !hidden_columns.contains(c))
        .collect();

    let data: Vec<Vec<String>> = if columns.is_empty() || window_start >= window_end {
        Vec::new()
    } else {
        (window_start..window_end)
            .filter(|r| !hidden_rows.contains(r))
            .map(|r| {
                let row = &table.data[r];
                columns
                    .iter()
                    .map(|&c| row.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    };

    debug!(
        table_id = %table.id,
        rows = data.len(),
        columns = if data.is_empty() { 0 } else { columns.len() },
        "filtered table"
    );

    let visibility = Visibility::all_visible(data.len(), data.first().map_or(0, Vec::len));
    Table {
        id: table.id.clone(),
        name: table.name.clone(),
        description: table.description.clone(),
        data,
        visibility,
    }
}

/// 0-based indices that are hidden: falsy flags and `hide`, minus `show`
fn hidden_indices(flags: &[bool], hide: &[usize], show: &[usize]) -> FxHashSet<usize> {
    let shown: FxHashSet<usize> = show.iter().filter_map(|&i| i.checked_sub(1)).collect();

    flags
        .iter()
        .enumerate()
        .filter(|&(_, &visible)| !visible)
        .map(|(i, _)| i)
        .chain(hide.iter().filter_map(|&i| i.checked_sub(1)))
        .filter(|i| !shown.contains(i))
        .collect()
}
