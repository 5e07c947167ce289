//! Dependency tracking for formula evaluation
//!
//! References are followed recursively, so the chain of cells currently
//! being evaluated is a stack. A cell that shows up again while it is still
//! on the stack is part of a cycle.

use crate::error::{FormulaError, FormulaResult};
use ahash::AHashSet;
use ccsv_core::CellAddress;

/// Cells currently being evaluated, outermost first
#[derive(Debug, Default)]
pub struct EvaluationStack {
    path: Vec<CellAddress>,
    in_flight: AHashSet<CellAddress>,
}

impl EvaluationStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a cell, failing if it is already being evaluated
    ///
    /// The error path runs from the first occurrence of the cell to the
    /// repeated one.
    pub fn enter(&mut self, cell: CellAddress) -> FormulaResult<()> {
        if !self.in_flight.insert(cell) {
            let start = self.path.iter().position(|&c| c == cell).unwrap_or(0);
            let mut path = self.path[start..].to_vec();
            path.push(cell);
            return Err(FormulaError::CircularReference { cell, path });
        }
        self.path.push(cell);
        Ok(())
    }

    /// Pop the innermost cell
    pub fn exit(&mut self) {
        if let Some(cell) = self.path.pop() {
            self.in_flight.remove(&cell);
        }
    }

    /// Number of cells being evaluated
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Whether a cell is being evaluated
    pub fn contains(&self, cell: CellAddress) -> bool {
        self.in_flight.contains(&cell)
    }

    /// The current chain, outermost first
    pub fn path(&self) -> &[CellAddress] {
        &self.path
    }
}
