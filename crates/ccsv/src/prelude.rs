//! Prelude module - common imports for ccsv users
//!
//! ```rust
//! use ccsv::prelude::*;
//! ```

pub use crate::{
    // Calculation types
    CalculationOptions,
    CalculationStats,
    // Cell types
    CellAddress,
    CellValue,
    // Error types
    Error,
    FormulaError,
    // Main types
    Grid,
    // Extension traits
    GridCalculationExt,
    GridOptions,
    Result,
};
