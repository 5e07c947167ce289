//! Built-in aggregate functions

pub mod aggregate;

use ccsv_core::CellValue;
use std::fmt;
use std::str::FromStr;

/// Function implementation signature
///
/// Receives every expanded value, numeric or not, and reduces them to one
/// number.
pub type FunctionImpl = fn(&[CellValue]) -> f64;

/// Function definition
pub struct FunctionDef {
    /// Function name (lowercase, as written in formulas)
    pub name: &'static str,
    /// Function this definition describes
    pub function: AggregateFunction,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// All built-in functions
pub static FUNCTIONS: [FunctionDef; 5] = [
    FunctionDef {
        name: "sum",
        function: AggregateFunction::Sum,
        implementation: aggregate::fn_sum,
    },
    FunctionDef {
        name: "avg",
        function: AggregateFunction::Avg,
        implementation: aggregate::fn_avg,
    },
    FunctionDef {
        name: "min",
        function: AggregateFunction::Min,
        implementation: aggregate::fn_min,
    },
    FunctionDef {
        name: "max",
        function: AggregateFunction::Max,
        implementation: aggregate::fn_max,
    },
    FunctionDef {
        name: "len",
        function: AggregateFunction::Len,
        implementation: aggregate::fn_len,
    },
];

/// Aggregate functions a formula can call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Sum,
    Avg,
    Min,
    Max,
    Len,
}

impl AggregateFunction {
    /// Look up a function by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        FUNCTIONS
            .iter()
            .find(|def| def.name.eq_ignore_ascii_case(name))
            .map(|def| def.function)
    }

    /// The definition for this function
    pub fn def(self) -> &'static FunctionDef {
        let index = match self {
            AggregateFunction::Sum => 0,
            AggregateFunction::Avg => 1,
            AggregateFunction::Min => 2,
            AggregateFunction::Max => 3,
            AggregateFunction::Len => 4,
        };
        &FUNCTIONS[index]
    }

    /// Name as written in formulas
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Reduce expanded values
    pub fn apply(self, values: &[CellValue]) -> f64 {
        (self.def().implementation)(values)
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregateFunction {
    type Err = crate::error::FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| crate::error::FormulaError::UnknownFunction(s.to_string()))
    }
}
