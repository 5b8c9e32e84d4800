//! Utility modules
//!
//! Error, warning and output types shared across the crate.

pub mod error;

// Re-export commonly used items
pub use error::{RenderError, RenderOutput, RenderResult, RenderWarning, WarningKind};
