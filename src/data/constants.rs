//! Constants shared by the formula and layout stages

/// Prefix of an in-band formula error marker
pub const ERROR_PREFIX: &str = "!ERROR!";

/// Content written into span-trigger cells that have no merge target
pub const NBSP: &str = "&nbsp;";

/// Class prefix of every element the emitter writes
pub const CLASS_PREFIX: &str = "gridmark";

/// Default cell content requesting a merge into the cell above
pub const DEFAULT_ROWSPAN_TRIGGER: &str = "#rowspan#";

/// Default cell content requesting a merge into the cell to the left
pub const DEFAULT_COLSPAN_TRIGGER: &str = "#colspan#";

/// Default cell content requesting a merge into both neighbours
pub const DEFAULT_SPAN_TRIGGER: &str = "#span#";

/// Deepest ancestor chain the formula resolver follows
pub const DEFAULT_MAX_FORMULA_DEPTH: usize = 256;

/// Significant digits kept when formatting formula results
pub const RESULT_SIGNIFICANT_DIGITS: usize = 14;

/// Placeholder emitted instead of a table whose filtered grid is empty
pub fn empty_table_comment(table_id: &str) -> String {
    format!(
        "<!-- {}: the table with ID {} is empty! -->\n",
        CLASS_PREFIX, table_id
    )
}
