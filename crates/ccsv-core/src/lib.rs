//! # ccsv-core
//!
//! Core data structures for ccsv calculated grids.
//!
//! This crate provides the fundamental types used throughout ccsv:
//! - [`Grid`] - The header row and data rows parsed from delimited text
//! - [`CellValue`] - A cell's value once read or evaluated (number or text)
//! - [`CellAddress`] - A cell's location (0-based data row and column)
//!
//! ## Example
//!
//! ```rust
//! use ccsv_core::{CellValue, Grid, GridOptions};
//!
//! let grid = Grid::parse("a,b\n1,x\n2", &GridOptions::default()).unwrap();
//!
//! assert_eq!(grid.headers(), ["a", "b"]);
//! assert_eq!(grid.row_count(), 2);
//! assert_eq!(grid.cell_at(0, 1), "x");
//! assert_eq!(grid.cell_at(1, 1), "");
//! assert_eq!(CellValue::from_raw(grid.cell_at(1, 0)), CellValue::Number(2.0));
//! ```

pub mod cell;
pub mod error;
pub mod grid;

// Re-exports for convenience
pub use cell::{format_number, parse_number, CellAddress, CellValue};
pub use error::{Error, Result};
pub use grid::{is_formula, Grid, GridOptions, LineEnding};

/// Prefix that marks a cell as a formula
pub const FORMULA_MARKER: char = '=';

/// Default field separator
pub const DEFAULT_SEPARATOR: char = ',';
