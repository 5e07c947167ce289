//! Formula syntax types
//!
//! A formula is a flat, left-to-right sequence: one operand, then any number
//! of `(operator, operand)` pairs. There is no nesting and no precedence.

use crate::functions::AggregateFunction;

/// A parsed formula body
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    /// Leading operand
    pub first: Operand,
    /// Remaining operator/operand pairs, in source order
    pub rest: Vec<(Operator, Operand)>,
}

impl Formula {
    /// Number of operands
    pub fn operand_count(&self) -> usize {
        1 + self.rest.len()
    }
}

/// One operand of a formula
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A number or a reference
    Term(Term),
    /// Aggregate function call
    Aggregate(AggregateCall),
}

/// A bare number or a reference
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Numeric literal
    Literal(f64),
    /// Reference to a cell, column or row
    Reference(Reference),
}

/// A reference before it is resolved against a grid position
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Source text, kept for error messages
    pub token: String,
    /// Leading `-` marker
    pub negated: bool,
    /// Header part (before `:`)
    pub column: ColumnSpec,
    /// Line part (after `:`)
    pub row: RowSpec,
}

/// Header part of a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// Column named in the header row (`price`)
    Name(String),
    /// Offset from the current column (`#-1`)
    Offset(i64),
    /// No column: the reference spans a whole row (`##`)
    All,
}

/// Line part of a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSpec {
    /// 1-based line number among the data rows (`:3`)
    Line(usize),
    /// Offset from the current row (`:#-1`)
    Offset(i64),
    /// No row: the reference spans a whole column (`:##` or no line part)
    All,
}

/// Aggregate function call, e.g. `sum(price;#0:1>#0:#-1)`
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall {
    pub function: AggregateFunction,
    /// Leading `-` before the function name
    pub negated: bool,
    pub params: Vec<Param>,
}

/// One aggregate parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// A single number, cell, column or row
    Single(Term),
    /// Inclusive run of rows within one column (`from>to`)
    Range(RangeReference),
}

/// Range parameter: both endpoints name cells of the same column
#[derive(Debug, Clone, PartialEq)]
pub struct RangeReference {
    pub from: Reference,
    pub to: Reference,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Operator for a symbol
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Symbol as written in formulas
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Apply with IEEE-754 semantics (division by zero is infinite or NaN)
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
        }
    }
}
