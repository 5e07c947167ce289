//! Error type for grid calculation

use ccsv_core::CellAddress;
use ccsv_formula::FormulaError;
use thiserror::Error;

/// Result type for grid calculation
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while calculating a grid
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The grid text could not be read
    #[error(transparent)]
    Core(#[from] ccsv_core::Error),

    /// A formula failed outside of any grid cell
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// A formula cell of the grid failed
    #[error("{cell}: {error}")]
    Cell {
        /// The top-level cell being computed when the error surfaced
        cell: CellAddress,
        error: FormulaError,
    },
}

impl Error {
    /// The underlying formula error, if any
    pub fn formula_error(&self) -> Option<&FormulaError> {
        match self {
            Error::Formula(error) | Error::Cell { error, .. } => Some(error),
            Error::Core(_) => None,
        }
    }

    /// The grid cell that failed, if the error came from one
    pub fn cell(&self) -> Option<CellAddress> {
        match self {
            Error::Cell { cell, .. } => Some(*cell),
            _ => None,
        }
    }
}
