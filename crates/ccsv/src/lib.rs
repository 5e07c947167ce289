//! # ccsv
//!
//! Evaluate formulas embedded in delimited text grids.
//!
//! A grid is plain delimited text: the first line names the columns, every
//! following line is a data row. A cell that starts with `=` is a formula
//! over other cells, for example `=price:1*#-1:#0` or `=sum(price)`.
//! Calculating a grid replaces every formula with its value and leaves
//! everything else byte for byte as it was.
//!
//! ## Features
//!
//! - Absolute (`name:line`) and relative (`#-1:#0`) references
//! - Strict left-to-right arithmetic with `+ - * /`
//! - Aggregates over columns, rows and ranges: `sum`, `avg`, `min`, `max`, `len`
//! - Cycle detection and a per-run result cache
//!
//! ## Example
//!
//! ```rust
//! let output = ccsv::run("a\n30,=a:1-a:2\n10,=a:2-a:1", ',')?;
//! assert_eq!(output, "a\n30,20\n10,-20");
//! # Ok::<(), ccsv::Error>(())
//! ```

pub mod calculation;
pub mod error;
pub mod prelude;

// Re-export calculation types
pub use calculation::{
    calculate, calculate_with_stats, run, CalculationOptions, CalculationStats,
    GridCalculationExt,
};
pub use error::{Error, Result};

// Re-export core types
pub use ccsv_core::{
    format_number, is_formula, parse_number, CellAddress, CellValue, Grid, GridOptions,
    LineEnding, DEFAULT_SEPARATOR, FORMULA_MARKER,
};

// Re-export formula types
pub use ccsv_formula::{
    evaluate, parse_formula, AggregateFunction, EvaluationContext, EvaluationOptions,
    EvaluationStats, Formula, FormulaError, FormulaResult, DEFAULT_MAX_DEPTH,
};
