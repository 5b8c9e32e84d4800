//! Error handling for gridmark
//!
//! The render pipeline itself never fails: formula problems are reported in
//! band (see `core::formula`) and as [`RenderWarning`]s. [`RenderError`] covers
//! the surrounding work of loading tables and option files.

use std::fmt;

/// Error raised while loading or validating render input
#[derive(Debug, Clone)]
pub enum RenderError {
    /// Parse error - input could not be parsed
    ParseError {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    /// Invalid input
    InvalidInput { message: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ParseError {
                message,
                line,
                column,
            } => {
                if let (Some(l), Some(c)) = (line, column) {
                    write!(f, "Parse error at line {}, column {}: {}", l, c, message)
                } else if let Some(l) = line {
                    write!(f, "Parse error at line {}: {}", l, message)
                } else {
                    write!(f, "Parse error: {}", message)
                }
            }
            RenderError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            RenderError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::IoError {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "data-loading")]
impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::parse_at(err.to_string(), err.line(), err.column())
    }
}

#[cfg(feature = "data-loading")]
impl From<csv::Error> for RenderError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line() as usize);
        RenderError::ParseError {
            message: err.to_string(),
            line,
            column: None,
        }
    }
}

#[cfg(feature = "data-loading")]
impl From<toml::de::Error> for RenderError {
    fn from(err: toml::de::Error) -> Self {
        RenderError::parse(err.message())
    }
}

/// Result type for loading operations
pub type RenderResult<T> = Result<T, RenderError>;

/// What a warning is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A formula resolved to an error marker
    Formula,
    /// A span trigger sat in a position with no merge target
    SpanTrigger,
    /// The filtered grid was empty
    EmptyTable,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::Formula => write!(f, "formula"),
            WarningKind::SpanTrigger => write!(f, "span"),
            WarningKind::EmptyTable => write!(f, "empty"),
        }
    }
}

/// Render warnings (non-fatal issues)
///
/// Positions are 1-based and refer to the filtered grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderWarning {
    pub kind: WarningKind,
    pub message: String,
    pub row: Option<usize>,
    pub column: Option<usize>,
}

impl RenderWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            row: None,
            column: None,
        }
    }

    pub fn at(kind: WarningKind, message: impl Into<String>, row: usize, column: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            row: Some(row),
            column: Some(column),
        }
    }

    /// Location like `B3`, when the warning has one
    pub fn location(&self) -> Option<String> {
        match (self.row, self.column) {
            (Some(row), Some(column)) => Some(format!(
                "{}{}",
                crate::core::addressing::number_to_letter(column),
                row
            )),
            _ => None,
        }
    }
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = self.location() {
            write!(f, "Warning at {}: {}", loc, self.message)
        } else {
            write!(f, "Warning: {}", self.message)
        }
    }
}

/// Render output with optional warnings
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// The rendered markup
    pub content: String,
    /// Any warnings generated during the render
    pub warnings: Vec<RenderWarning>,
}

impl RenderOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(content: String, warnings: Vec<RenderWarning>) -> Self {
        Self { content, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// Convenience constructors for errors
impl RenderError {
    pub fn parse(message: impl Into<String>) -> Self {
        RenderError::ParseError {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn parse_at(message: impl Into<String>, line: usize, column: usize) -> Self {
        RenderError::ParseError {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        RenderError::InvalidInput {
            message: message.into(),
        }
    }
}
