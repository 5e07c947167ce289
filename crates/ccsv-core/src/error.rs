//! Error types for ccsv-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ccsv-core
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The separator cannot be used to split fields
    #[error("Invalid separator {0:?}: line terminators cannot separate fields")]
    InvalidSeparator(char),
}
