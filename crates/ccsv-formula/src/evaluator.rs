//! Formula evaluator
//!
//! Evaluates formulas against an immutable [`Grid`]. Every reference is a
//! recursive evaluation of the target cell; the context guards that
//! recursion with a cycle check and a depth limit, and caches finished
//! cells for the lifetime of the context.

use crate::ast::{AggregateCall, Formula, Operand, Param, RangeReference, Term};
use crate::dependency::EvaluationStack;
use crate::error::{FormulaError, FormulaResult};
use crate::parser::parse_formula;
use crate::reference::{resolve, resolve_term, ReferenceTarget, ResolvedReference};
use ahash::AHashMap;
use ccsv_core::{is_formula, CellAddress, CellValue, Grid};

/// Default limit on nested cell references
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for evaluating formulas
#[derive(Debug, Clone)]
pub struct EvaluationOptions {
    /// Cache finished formula cells (default: true)
    pub memoize: bool,
    /// Maximum number of formula cells on the evaluation stack (default: 256)
    pub max_depth: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            memoize: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Counters collected while evaluating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationStats {
    /// Formula cells computed (cache hits not included)
    pub cells_evaluated: usize,
    /// Formula cells answered from the cache
    pub cache_hits: usize,
    /// Deepest evaluation stack seen
    pub max_depth_reached: usize,
}

/// Per-run evaluation state
///
/// Holds the in-flight stack, the cache and the statistics. Independent
/// contexts share nothing.
pub struct EvaluationContext<'a> {
    grid: &'a Grid,
    options: EvaluationOptions,
    stack: EvaluationStack,
    cache: AHashMap<CellAddress, CellValue>,
    stats: EvaluationStats,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context
    pub fn new(grid: &'a Grid, options: EvaluationOptions) -> Self {
        Self {
            grid,
            options,
            stack: EvaluationStack::new(),
            cache: AHashMap::new(),
            stats: EvaluationStats::default(),
        }
    }

    /// Counters collected so far
    pub fn stats(&self) -> EvaluationStats {
        self.stats
    }

    /// Evaluate the cell at an address
    ///
    /// Plain cells read as their value. Formula cells are computed with the
    /// cell pushed on the evaluation stack, so a reference back to it is
    /// reported as a cycle.
    pub fn evaluate_at(&mut self, addr: CellAddress) -> FormulaResult<CellValue> {
        let grid = self.grid;
        let raw = grid.cell(addr);
        if !is_formula(raw) {
            return Ok(CellValue::from_raw(raw));
        }

        if self.options.memoize {
            if let Some(value) = self.cache.get(&addr) {
                self.stats.cache_hits += 1;
                return Ok(value.clone());
            }
        }

        if self.stack.depth() >= self.options.max_depth {
            return Err(FormulaError::DepthLimitExceeded {
                cell: addr,
                limit: self.options.max_depth,
            });
        }

        self.stack.enter(addr)?;
        self.stats.max_depth_reached = self.stats.max_depth_reached.max(self.stack.depth());
        let result = self.evaluate_formula(raw, addr);
        self.stack.exit();

        let value = result?;
        self.stats.cells_evaluated += 1;
        tracing::trace!(cell = %addr, formula = raw, value = %value, "evaluated cell");

        if self.options.memoize {
            self.cache.insert(addr, value.clone());
        }
        Ok(value)
    }

    /// Evaluate raw cell text as if it were written at `current`
    pub fn evaluate_cell(&mut self, raw: &str, current: CellAddress) -> FormulaResult<CellValue> {
        if is_formula(raw) {
            self.evaluate_formula(raw, current)
        } else {
            Ok(CellValue::from_raw(raw))
        }
    }

    /// Parse and evaluate formula text at `current`
    pub fn evaluate_formula(&mut self, text: &str, current: CellAddress) -> FormulaResult<CellValue> {
        let formula = parse_formula(text)?;
        self.evaluate(&formula, current)
    }

    /// Evaluate a parsed formula at `current`
    ///
    /// A lone operand keeps its value (text included). Otherwise operands are
    /// folded strictly left to right, with text coercing to `NaN`.
    pub fn evaluate(&mut self, formula: &Formula, current: CellAddress) -> FormulaResult<CellValue> {
        let first = self.evaluate_operand(&formula.first, current)?;
        // not coerced: `=day:1` copies a date, `=a:1` copies an empty cell
        if formula.rest.is_empty() {
            return Ok(first);
        }

        let mut acc = first.to_number();
        for (op, operand) in &formula.rest {
            let value = self.evaluate_operand(operand, current)?;
            acc = op.apply(acc, value.to_number());
        }
        Ok(CellValue::Number(acc))
    }

    fn evaluate_operand(&mut self, operand: &Operand, current: CellAddress) -> FormulaResult<CellValue> {
        match operand {
            Operand::Aggregate(call) => {
                let value = self.evaluate_aggregate(call, current)?;
                Ok(CellValue::Number(if call.negated { -value } else { value }))
            }
            Operand::Term(term) => {
                let resolved = resolve_term(term, current, self.grid)?;
                match resolved.target {
                    ReferenceTarget::Literal(n) => Ok(CellValue::Number(n)),
                    ReferenceTarget::Cell(addr) => {
                        let value = self.evaluate_at(addr)?;
                        Ok(if resolved.negated { value.negate() } else { value })
                    }
                    ReferenceTarget::Column(_) | ReferenceTarget::Row(_) => {
                        Err(FormulaError::malformed_reference(
                            term_token(term),
                            "whole columns and rows can only be used inside aggregate functions",
                        ))
                    }
                }
            }
        }
    }

    /// Expand the parameters of an aggregate call and reduce them
    pub fn evaluate_aggregate(&mut self, call: &AggregateCall, current: CellAddress) -> FormulaResult<f64> {
        let mut values = Vec::new();
        for param in &call.params {
            match param {
                Param::Single(term) => {
                    let resolved = resolve_term(term, current, self.grid)?;
                    self.expand_single(resolved, current, &mut values)?;
                }
                Param::Range(range) => self.expand_range(range, current, &mut values)?,
            }
        }
        Ok(call.function.apply(&values))
    }

    fn expand_single(
        &mut self,
        resolved: ResolvedReference,
        current: CellAddress,
        values: &mut Vec<CellValue>,
    ) -> FormulaResult<()> {
        let negated = resolved.negated;
        match resolved.target {
            ReferenceTarget::Literal(n) => values.push(CellValue::Number(n)),
            ReferenceTarget::Cell(addr) => values.push(negate_numbers(self.evaluate_at(addr)?, negated)),
            ReferenceTarget::Column(col) => {
                for row in (0..self.grid.row_count()).filter(|&row| row != current.row) {
                    let value = self.evaluate_at(CellAddress::new(row, col))?;
                    values.push(negate_numbers(value, negated));
                }
            }
            ReferenceTarget::Row(row) => {
                let len = self.grid.row(row).map_or(0, |fields| fields.len());
                for col in (0..len).filter(|&col| col != current.col) {
                    let value = self.evaluate_at(CellAddress::new(row, col))?;
                    values.push(negate_numbers(value, negated));
                }
            }
        }
        Ok(())
    }

    fn expand_range(
        &mut self,
        range: &RangeReference,
        current: CellAddress,
        values: &mut Vec<CellValue>,
    ) -> FormulaResult<()> {
        let from = resolve(&range.from, current, self.grid)?;
        let to = resolve(&range.to, current, self.grid)?;

        let token = || format!("{}>{}", range.from.token, range.to.token);
        let (Some(start), Some(end)) = (from.cell(), to.cell()) else {
            return Err(FormulaError::malformed_reference(
                &token(),
                "range endpoints must name single cells",
            ));
        };
        if start.col != end.col {
            return Err(FormulaError::malformed_reference(
                &token(),
                "range endpoints must be in the same column",
            ));
        }

        for row in start.row.min(end.row)..=start.row.max(end.row) {
            let value = self.evaluate_at(CellAddress::new(row, start.col))?;
            values.push(negate_numbers(value, from.negated));
        }
        Ok(())
    }
}

/// Evaluate one formula written at `current`, with default options
///
/// # Example
/// ```rust
/// use ccsv_core::{CellAddress, CellValue, Grid, GridOptions};
///
/// let grid = Grid::parse("a,b\n30,x\n10,y", &GridOptions::default()).unwrap();
/// let value = ccsv_formula::evaluate("=a:1-a:2", CellAddress::new(0, 1), &grid).unwrap();
/// assert_eq!(value, CellValue::Number(20.0));
/// ```
pub fn evaluate(formula: &str, current: CellAddress, grid: &Grid) -> FormulaResult<CellValue> {
    EvaluationContext::new(grid, EvaluationOptions::default()).evaluate_formula(formula, current)
}

/// Negation inside aggregates flips numbers and leaves text alone, so `len`
/// still counts it
fn negate_numbers(value: CellValue, negated: bool) -> CellValue {
    match value {
        CellValue::Number(n) if negated => CellValue::Number(-n),
        other => other,
    }
}

fn term_token(term: &Term) -> &str {
    match term {
        Term::Reference(reference) => &reference.token,
        Term::Literal(_) => "",
    }
}
