//! Recursive formula resolver

use fxhash::FxHashMap;
use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use super::error::{is_error_marker, FormulaError};
use crate::core::addressing::{cell_token, letter_to_number};
use crate::core::table::Grid;
use crate::data::constants::DEFAULT_MAX_FORMULA_DEPTH;
use crate::features::expression::{ExpressionEvaluator, MathEvaluator};

lazy_static! {
    /// `[A1:B5]`, either corner first
    static ref RANGE_REF: Regex = Regex::new(r"(?i)\[([a-z]+)([0-9]+):([a-z]+)([0-9]+)\]").unwrap();
    /// `[B5]`
    static ref CELL_REF: Regex = Regex::new(r"(?i)\[([a-z]+)([0-9]+)\]").unwrap();
}

/// Resolves formulas in a grid, writing results back in place
///
/// One resolver lives for one render: its range expansion cache is dropped
/// together with it.
pub struct FormulaResolver<'a, E: ExpressionEvaluator + ?Sized = MathEvaluator> {
    grid: &'a mut Grid,
    evaluator: &'a E,
    /// Literal range token -> comma joined single references
    range_cache: FxHashMap<String, String>,
    max_depth: usize,
}

impl<'a, E: ExpressionEvaluator + ?Sized> FormulaResolver<'a, E> {
    pub fn new(grid: &'a mut Grid, evaluator: &'a E) -> Self {
        FormulaResolver {
            grid,
            evaluator,
            range_cache: FxHashMap::default(),
            max_depth: DEFAULT_MAX_FORMULA_DEPTH,
        }
    }

    /// Set the deepest reference chain followed before failing
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve every cell in row-major order
    ///
    /// A cell whose chain ran into the depth ceiling is retried once the rest
    /// of the sweep has stored its dependencies, so long chains resolve
    /// whichever end is visited first.
    pub fn evaluate_table_data(&mut self) {
        let mut pending = Vec::new();
        for row in 0..self.grid.len() {
            for column in 0..self.grid[row].len() {
                if let Err(FormulaError::RecursionLimit(_)) = self.resolve_at(row, column) {
                    pending.push((row, column));
                }
            }
        }

        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|&(row, column)| {
                matches!(
                    self.resolve_at(row, column),
                    Err(FormulaError::RecursionLimit(_))
                )
            });
            if pending.len() == before {
                break;
            }
        }

        for (row, column) in pending {
            self.grid[row][column] = FormulaError::RecursionLimit(self.max_depth).to_marker();
        }
    }

    /// Resolve one cell (0-based) and store the result in the grid
    ///
    /// Returns `None` for positions outside the grid.
    pub fn evaluate_cell_at(&mut self, row: usize, column: usize) -> Option<String> {
        self.grid.get(row)?.get(column)?;
        let value = self
            .resolve_at(row, column)
            .unwrap_or_else(|err| err.to_marker());
        self.grid[row][column] = value.clone();
        Some(value)
    }

    /// Resolve a top-level cell, storing everything but a depth failure
    fn resolve_at(&mut self, row: usize, column: usize) -> Result<String, FormulaError> {
        let content = self.grid[row][column].clone();
        match self.resolve(&content, &[]) {
            Ok(value) => {
                self.grid[row][column] = value.clone();
                Ok(value)
            }
            Err(err @ FormulaError::RecursionLimit(_)) => Err(err),
            Err(err) => {
                self.grid[row][column] = err.to_marker();
                Err(err)
            }
        }
    }

    /// Resolve a cell's content
    ///
    /// `ancestors` holds the canonical reference tokens currently being
    /// resolved further up the call chain. Plain text is returned unchanged,
    /// failures come back as `!ERROR!` markers.
    pub fn evaluate_cell(&mut self, content: &str, ancestors: &[String]) -> String {
        match self.resolve(content, ancestors) {
            Ok(value) => value,
            Err(err) => err.to_marker(),
        }
    }

    fn resolve(&mut self, content: &str, ancestors: &[String]) -> Result<String, FormulaError> {
        let Some(expression) = content.strip_prefix('=') else {
            return Ok(content.to_string());
        };

        if expression.contains('=') {
            return Err(FormulaError::TooManyEquals);
        }
        if expression.contains("][") {
            return Err(FormulaError::AdjacentReferences);
        }

        let expression: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
        let expression = self.expand_ranges(&expression);
        let expression = self.substitute_references(expression, ancestors)?;

        self.evaluator
            .evaluate(&expression)
            .map_err(|err| FormulaError::ExpressionEvaluationFailed(err.to_string()))
    }

    /// Replace every range token with its single-reference expansion
    fn expand_ranges(&mut self, expression: &str) -> String {
        let tokens: IndexSet<&str> = RANGE_REF
            .find_iter(expression)
            .map(|m| m.as_str())
            .collect();

        let row_count = self.grid.len();
        let column_count = self.grid.iter().map(Vec::len).max().unwrap_or(0);

        let mut expanded = expression.to_string();
        for token in tokens {
            let replacement = self
                .range_cache
                .entry(token.to_string())
                .or_insert_with(|| expand_range(token, row_count, column_count))
                .clone();
            expanded = expanded.replace(token, &replacement);
        }

        expanded
    }

    /// Resolve single references and substitute their values
    fn substitute_references(
        &mut self,
        mut expression: String,
        ancestors: &[String],
    ) -> Result<String, FormulaError> {
        let tokens: IndexSet<String> = CELL_REF
            .find_iter(&expression)
            .map(|m| m.as_str().to_string())
            .collect();

        for token in tokens {
            let canonical = token.to_uppercase();
            if ancestors.contains(&canonical) {
                return Err(FormulaError::CircularReference);
            }

            let (row, column) = parse_reference(&token)
                .filter(|&(row, column)| {
                    self.grid
                        .get(row)
                        .map_or(false, |cells| column < cells.len())
                })
                .ok_or_else(|| FormulaError::NonExistentCell(canonical.clone()))?;

            if ancestors.len() >= self.max_depth {
                return Err(FormulaError::RecursionLimit(self.max_depth));
            }

            let content = self.grid[row][column].clone();
            let mut chain = ancestors.to_vec();
            chain.push(canonical);
            trace!(reference = %token, depth = chain.len(), "resolving cell reference");

            // depth failures depend on the chain, not the cell, and are never stored
            let value = match self.resolve(&content, &chain) {
                Ok(value) => value,
                Err(err @ FormulaError::RecursionLimit(_)) => return Err(err),
                Err(err) => err.to_marker(),
            };
            self.grid[row][column] = value.clone();

            if is_error_marker(&value) {
                return Err(FormulaError::from_marker(&value)
                    .unwrap_or(FormulaError::Propagated(value)));
            }

            expression = expression.replace(&token, &value);
        }

        Ok(expression)
    }
}

/// Parse `[B3]` into 0-based `(row, column)`
fn parse_reference(token: &str) -> Option<(usize, usize)> {
    let captures = CELL_REF.captures(token)?;
    let column = letter_to_number(captures.get(1)?.as_str());
    let row = captures.get(2)?.as_str().parse::<usize>().ok()?;
    if row == 0 || column == 0 {
        return None;
    }
    Some((row - 1, column - 1))
}

/// Expand a range token into comma joined single references
///
/// Columns form the outer loop and rows the inner one, both ascending, whatever
/// corner the token names first. `row_count` and `column_count` bound the
/// grid: the expansion stops after the first reference that falls outside it,
/// since resolution fails there and nothing after it is ever looked at.
///
/// ```rust
/// use gridmark::core::formula::expand_range;
///
/// assert_eq!(expand_range("[B2:A1]", 5, 5), "[A1],[A2],[B1],[B2]");
/// ```
pub fn expand_range(token: &str, row_count: usize, column_count: usize) -> String {
    let Some(captures) = RANGE_REF.captures(token) else {
        return token.to_string();
    };
    let part = |i: usize| captures.get(i).map_or("", |m| m.as_str());

    let first_column = letter_to_number(part(1));
    let first_row = part(2).parse::<usize>().unwrap_or(usize::MAX);
    let second_column = letter_to_number(part(3));
    let second_row = part(4).parse::<usize>().unwrap_or(usize::MAX);

    let (low_column, high_column) = ordered(first_column, second_column);
    let (low_row, high_row) = ordered(first_row, second_row);

    let mut references = Vec::new();
    for column in low_column..=high_column {
        for row in low_row..=high_row {
            references.push(cell_token(column, row));
            if row == 0 || row > row_count || column == 0 || column > column_count {
                return references.join(",");
            }
        }
    }

    references.join(",")
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
