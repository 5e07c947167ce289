//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value of a cell, read from text or produced by a formula
//! - [`CellAddress`] - A cell's location in the data rows

mod address;
mod value;

pub use address::CellAddress;
pub use value::{format_number, parse_number, CellValue};
