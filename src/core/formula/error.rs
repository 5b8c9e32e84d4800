//! In-band formula errors

use std::fmt;

use crate::data::constants::ERROR_PREFIX;

/// Why a formula could not be resolved
///
/// A failing cell still occupies its grid position, so errors are turned into
/// marker strings (`!ERROR! <reason>`) with [`FormulaError::to_marker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// A second `=` inside the formula
    TooManyEquals,
    /// `][`: two references without an operator between them
    AdjacentReferences,
    /// The reference is already being resolved further up the chain
    CircularReference,
    /// The reference points outside the grid
    NonExistentCell(String),
    /// The ancestor chain grew past the configured ceiling
    RecursionLimit(usize),
    /// The arithmetic evaluator rejected the expression
    ExpressionEvaluationFailed(String),
    /// A referenced cell already holds an error marker
    Propagated(String),
}

impl FormulaError {
    /// Render as an in-band marker string
    pub fn to_marker(&self) -> String {
        format!("{} {}", ERROR_PREFIX, self)
    }

    /// Recover an error from a marker string
    pub fn from_marker(marker: &str) -> Option<Self> {
        marker
            .strip_prefix(ERROR_PREFIX)
            .map(|reason| FormulaError::Propagated(reason.trim_start().to_string()))
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaError::TooManyEquals => write!(f, "Too many '=' in formula"),
            FormulaError::AdjacentReferences => write!(
                f,
                "Two cell references next to each other are not allowed"
            ),
            FormulaError::CircularReference => write!(f, "Circular Reference"),
            FormulaError::NonExistentCell(token) => write!(f, "Cell {} does not exist", token),
            FormulaError::RecursionLimit(depth) => write!(
                f,
                "Cell references are nested deeper than {} levels",
                depth
            ),
            FormulaError::ExpressionEvaluationFailed(reason) => write!(f, "{}", reason),
            FormulaError::Propagated(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for FormulaError {}

/// Whether a cell value is a formula error marker
pub fn is_error_marker(value: &str) -> bool {
    value.starts_with(ERROR_PREFIX)
}
