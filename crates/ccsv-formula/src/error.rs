//! Formula error types

use ccsv_core::CellAddress;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormulaError {
    /// A named column does not exist in the header row
    #[error("Header \"{name}\" not found (in reference '{token}')")]
    UnknownHeader { name: String, token: String },

    /// A reference resolved to a line outside the data rows
    #[error("Line {line} not found (in reference '{token}', {rows} data rows)")]
    RowOutOfBounds {
        token: String,
        /// 1-based line number the reference resolved to
        line: i64,
        rows: usize,
    },

    /// A relative column offset left the header row
    #[error("Column {column} out of bounds (in reference '{token}', {columns} columns)")]
    ColumnOutOfBounds {
        token: String,
        /// 0-based column index the reference resolved to
        column: i64,
        columns: usize,
    },

    /// A reference token matches none of the reference forms
    #[error("Malformed reference '{token}': {reason}")]
    MalformedReference { token: String, reason: String },

    /// A formula cannot be split into operands and operators
    #[error("Malformed formula '{formula}': {reason}")]
    MalformedFormula { formula: String, reason: String },

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// A cell was reached again while it was still being evaluated
    #[error("Circular reference detected at {cell} (path: {})", display_path(.path))]
    CircularReference {
        cell: CellAddress,
        path: Vec<CellAddress>,
    },

    /// The chain of nested references grew past the configured limit
    #[error("Reference chain deeper than {limit} cells at {cell}")]
    DepthLimitExceeded { cell: CellAddress, limit: usize },
}

impl FormulaError {
    pub(crate) fn malformed_reference(token: &str, reason: impl Into<String>) -> Self {
        FormulaError::MalformedReference {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_formula(formula: &str, reason: impl Into<String>) -> Self {
        FormulaError::MalformedFormula {
            formula: formula.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this is a reference error: an unknown header or an index
    /// outside the grid
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            FormulaError::UnknownHeader { .. }
                | FormulaError::RowOutOfBounds { .. }
                | FormulaError::ColumnOutOfBounds { .. }
        )
    }

    /// Whether the formula text itself could not be understood
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            FormulaError::MalformedReference { .. }
                | FormulaError::MalformedFormula { .. }
                | FormulaError::UnknownFunction(_)
        )
    }
}

fn display_path(path: &[CellAddress]) -> String {
    path.iter()
        .map(|cell| format!("({})", cell))
        .collect::<Vec<_>>()
        .join(" -> ")
}
