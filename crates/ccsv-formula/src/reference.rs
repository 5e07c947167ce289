//! Reference resolution
//!
//! Turns a parsed reference into grid coordinates relative to the cell that
//! contains the formula. The row is checked before the column.

use crate::ast::{ColumnSpec, Reference, RowSpec, Term};
use crate::error::{FormulaError, FormulaResult};
use crate::parser::parse_term;
use ccsv_core::{CellAddress, Grid};

/// What a reference points at once resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceTarget {
    /// A number written in place (sign already applied)
    Literal(f64),
    /// A single cell
    Cell(CellAddress),
    /// Every data row of one column
    Column(usize),
    /// Every cell of one data row
    Row(usize),
}

/// A resolved reference plus its negation marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedReference {
    pub target: ReferenceTarget,
    pub negated: bool,
}

impl ResolvedReference {
    /// The cell this reference names, if it names exactly one
    pub fn cell(&self) -> Option<CellAddress> {
        match self.target {
            ReferenceTarget::Cell(addr) => Some(addr),
            _ => None,
        }
    }
}

/// Resolve a parsed reference from the point of view of `current`
pub fn resolve(
    reference: &Reference,
    current: CellAddress,
    grid: &Grid,
) -> FormulaResult<ResolvedReference> {
    let token = reference.token.as_str();

    let row = match reference.row {
        RowSpec::All => None,
        RowSpec::Line(line) => Some(check_row(token, to_index(line).saturating_sub(1), grid)?),
        RowSpec::Offset(offset) => {
            Some(check_row(token, to_index(current.row).saturating_add(offset), grid)?)
        }
    };

    let col = match &reference.column {
        ColumnSpec::All => None,
        ColumnSpec::Name(name) => Some(grid.column_index(name).ok_or_else(|| {
            FormulaError::UnknownHeader {
                name: name.clone(),
                token: token.to_string(),
            }
        })?),
        ColumnSpec::Offset(offset) => {
            Some(check_column(token, to_index(current.col).saturating_add(*offset), grid)?)
        }
    };

    let target = match (col, row) {
        (Some(col), Some(row)) => ReferenceTarget::Cell(CellAddress::new(row, col)),
        (Some(col), None) => ReferenceTarget::Column(col),
        (None, Some(row)) => ReferenceTarget::Row(row),
        (None, None) => {
            return Err(FormulaError::malformed_reference(
                token,
                "a reference needs a column or a line",
            ))
        }
    };

    Ok(ResolvedReference {
        target,
        negated: reference.negated,
    })
}

/// Resolve a literal or a reference
pub fn resolve_term(term: &Term, current: CellAddress, grid: &Grid) -> FormulaResult<ResolvedReference> {
    match term {
        Term::Literal(n) => Ok(ResolvedReference {
            target: ReferenceTarget::Literal(*n),
            negated: false,
        }),
        Term::Reference(reference) => resolve(reference, current, grid),
    }
}

/// Parse and resolve a reference token in one step
///
/// # Example
/// ```rust
/// use ccsv_core::{CellAddress, Grid, GridOptions};
/// use ccsv_formula::{resolve_reference, ReferenceTarget};
///
/// let grid = Grid::parse("a,b\n1,2\n3,4", &GridOptions::default()).unwrap();
/// let here = CellAddress::new(1, 1);
///
/// let resolved = resolve_reference("#-1:#-1", here, &grid).unwrap();
/// assert_eq!(resolved.target, ReferenceTarget::Cell(CellAddress::new(0, 0)));
/// ```
pub fn resolve_reference(
    token: &str,
    current: CellAddress,
    grid: &Grid,
) -> FormulaResult<ResolvedReference> {
    resolve_term(&parse_term(token.trim())?, current, grid)
}

/// Offsets saturate, so anything past `i64::MAX` still lands out of bounds
fn to_index(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

fn check_row(token: &str, row: i64, grid: &Grid) -> FormulaResult<usize> {
    let rows = grid.row_count();
    match usize::try_from(row) {
        Ok(index) if index < rows => Ok(index),
        _ => Err(FormulaError::RowOutOfBounds {
            token: token.to_string(),
            line: row.saturating_add(1),
            rows,
        }),
    }
}

fn check_column(token: &str, col: i64, grid: &Grid) -> FormulaResult<usize> {
    let columns = grid.header_count();
    match usize::try_from(col) {
        Ok(index) if index < columns => Ok(index),
        _ => Err(FormulaError::ColumnOutOfBounds {
            token: token.to_string(),
            column: col,
            columns,
        }),
    }
}
