//! Loading tables and option files
//!
//! Tables come as JSON (a table object or a bare array of rows) or as CSV;
//! render options come as TOML using the option names of [`RenderOptions`].

use serde_json::Value;

use crate::core::options::RenderOptions;
use crate::core::table::{Grid, Table, Visibility};
use crate::utils::error::{RenderError, RenderResult};

/// Parse a JSON table
///
/// Accepts either `{"id": .., "name": .., "description": .., "data": [[..]],
/// "visibility": {"rows": [..], "columns": [..]}}` or a bare array of rows.
/// Numbers, booleans and nulls in cells are converted to text. A bare array
/// gets `default_id` as its id.
pub fn load_table_json(text: &str, default_id: &str) -> RenderResult<Table> {
    let value: Value = serde_json::from_str(text)?;

    match value {
        Value::Array(_) => Ok(Table::new(default_id, json_grid(&value)?)),
        Value::Object(object) => {
            let id = match object.get("id") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => default_id.to_string(),
            };
            let text_field = |key: &str| {
                object
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            let data = match object.get("data") {
                Some(data) => json_grid(data)?,
                None => Grid::new(),
            };
            let visibility = match object.get("visibility") {
                Some(visibility) => serde_json::from_value::<Visibility>(visibility.clone())?,
                None => Visibility::default(),
            };

            Ok(Table::new(id, data)
                .with_name(text_field("name"))
                .with_description(text_field("description"))
                .with_visibility(visibility))
        }
        _ => Err(RenderError::invalid(
            "expected a table object or an array of rows",
        )),
    }
}

fn json_grid(value: &Value) -> RenderResult<Grid> {
    let rows = value
        .as_array()
        .ok_or_else(|| RenderError::invalid("table data must be an array of rows"))?;

    rows.iter()
        .enumerate()
        .map(|(row, cells)| {
            let cells = cells.as_array().ok_or_else(|| {
                RenderError::invalid(format!("row {} is not an array of cells", row + 1))
            })?;
            cells
                .iter()
                .enumerate()
                .map(|(column, cell)| json_cell(cell, row, column))
                .collect()
        })
        .collect()
}

fn json_cell(value: &Value, row: usize, column: usize) -> RenderResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(RenderError::invalid(format!(
            "cell {} holds a nested value",
            crate::core::addressing::cell_token(column + 1, row + 1)
        ))),
    }
}

/// Parse CSV without a header row; rows may differ in length
pub fn load_table_csv(text: &str, id: &str) -> RenderResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut data = Grid::new();
    for record in reader.records() {
        let record = record?;
        data.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(id, data))
}

/// Parse render options from TOML
///
/// ```rust
/// use gridmark::data::loading::load_options_toml;
/// use gridmark::core::options::TriState;
///
/// let options = load_options_toml("table_foot = true\nhide_columns = [2]").unwrap();
/// assert_eq!(options.table_foot, TriState::Enabled);
/// assert_eq!(options.hide_columns, vec![2]);
/// ```
pub fn load_options_toml(text: &str) -> RenderResult<RenderOptions> {
    Ok(toml::from_str(text)?)
}

/// Write a grid as CSV
pub fn grid_to_csv(data: &Grid) -> RenderResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in data {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| RenderError::IoError {
            message: err.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|err| RenderError::invalid(err.to_string()))
}
