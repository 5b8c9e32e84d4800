//! WASM bindings for gridmark
//!
//! This module provides JavaScript-accessible functions for rendering tables.
//! Tables and options are passed as plain JS objects using the same field
//! names as [`Table`](crate::Table) and [`RenderOptions`](crate::RenderOptions).

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{RenderOptions, Table, TableRenderer};

/// Render result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct RenderResultJs {
    /// The rendered markup
    pub output: String,
    /// Whether the input could be read
    pub success: bool,
    /// Error message if the input was rejected
    pub error: Option<String>,
    /// Warnings during the render
    pub warnings: Vec<String>,
}

#[cfg(feature = "wasm")]
impl RenderResultJs {
    fn failure(error: String) -> Self {
        RenderResultJs {
            output: String::new(),
            success: false,
            error: Some(error),
            warnings: vec![],
        }
    }
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn read_input(table: JsValue, options: JsValue) -> Result<(Table, RenderOptions), String> {
    let table: Table = serde_wasm_bindgen::from_value(table)
        .map_err(|e| format!("Invalid table: {}", e))?;
    let options: RenderOptions = if options.is_undefined() || options.is_null() {
        RenderOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| format!("Invalid options: {}", e))?
    };
    Ok((table, options))
}

/// Render a table to HTML
///
/// # Arguments
/// * `table` - `{ id, name, description, data, visibility }`
/// * `options` - render options, may be `undefined`
///
/// # Returns
/// `{ output, success, error, warnings }`
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "renderTable")]
pub fn render_table_wasm(table: JsValue, options: JsValue) -> JsValue {
    let result = match read_input(table, options) {
        Ok((table, options)) => {
            let mut renderer = TableRenderer::new();
            renderer.set_input(table, options);
            let output = renderer.render();
            RenderResultJs {
                warnings: output.warnings.iter().map(ToString::to_string).collect(),
                output: output.content,
                success: true,
                error: None,
            }
        }
        Err(error) => RenderResultJs::failure(error),
    };

    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Evaluate a table's visible cells and return the resulting rows
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "evaluateTable")]
pub fn evaluate_table_wasm(table: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let (table, options) = read_input(table, options).map_err(|e| JsValue::from_str(&e))?;
    let data = crate::evaluate_table(&table, &options);
    serde_wasm_bindgen::to_value(&data).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Evaluate a single arithmetic expression with the built-in evaluator
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "evaluateExpression")]
pub fn evaluate_expression_wasm(expression: &str) -> Result<String, JsValue> {
    use crate::ExpressionEvaluator;

    crate::MathEvaluator::new()
        .evaluate(expression)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The default option set as a JS object
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getDefaultRenderOptions")]
pub fn get_default_render_options() -> JsValue {
    serde_wasm_bindgen::to_value(&crate::default_render_options()).unwrap_or(JsValue::NULL)
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
