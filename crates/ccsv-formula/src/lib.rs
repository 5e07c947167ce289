//! # ccsv-formula
//!
//! Formula parser and evaluator for ccsv grids.
//!
//! This crate provides:
//! - Formula parsing (text → [`Formula`])
//! - Reference resolution against a [`Grid`](ccsv_core::Grid)
//! - Formula evaluation with cycle detection and per-run memoization
//! - The aggregate functions `sum`, `avg`, `min`, `max` and `len`
//!
//! ## Example
//!
//! ```rust
//! use ccsv_core::{CellAddress, CellValue, Grid, GridOptions};
//! use ccsv_formula::{EvaluationContext, EvaluationOptions};
//!
//! let grid = Grid::parse("a,b\n10,1\n20,2\n=sum(a),=b:1+b:2", &GridOptions::default())?;
//! let mut ctx = EvaluationContext::new(&grid, EvaluationOptions::default());
//!
//! assert_eq!(ctx.evaluate_at(CellAddress::new(2, 0))?, CellValue::Number(30.0));
//! assert_eq!(ctx.evaluate_at(CellAddress::new(2, 1))?, CellValue::Number(3.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod reference;

pub use ast::{
    AggregateCall, ColumnSpec, Formula, Operand, Operator, Param, RangeReference, Reference,
    RowSpec, Term,
};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{
    evaluate, EvaluationContext, EvaluationOptions, EvaluationStats, DEFAULT_MAX_DEPTH,
};
pub use functions::AggregateFunction;
pub use parser::parse_formula;
pub use reference::{resolve_reference, ReferenceTarget, ResolvedReference};
