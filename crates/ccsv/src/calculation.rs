//! Grid calculation engine
//!
//! Copies the header line and every plain cell through unchanged and
//! replaces each formula cell with its evaluated value. All per-run state
//! (evaluation stack, cache, counters) lives in one evaluation context, so
//! separate runs share nothing.
//!
//! # Example
//!
//! ```rust
//! use ccsv::calculation::{calculate_with_stats, CalculationOptions};
//!
//! let text = "a,b\n10,=#-1:#0\n20,=#-1:#0\n=sum(a),=sum(b)";
//! let (output, stats) = calculate_with_stats(text, &CalculationOptions::default())?;
//!
//! assert_eq!(output, "a,b\n10,10\n20,20\n30,30");
//! assert_eq!(stats.formula_count, 4);
//! # Ok::<(), ccsv::Error>(())
//! ```

use crate::{Error, Result};
use ccsv_core::{is_formula, CellAddress, Grid, GridOptions, DEFAULT_SEPARATOR};
use ccsv_formula::{EvaluationContext, EvaluationOptions, DEFAULT_MAX_DEPTH};

/// Options for grid calculation
#[derive(Debug, Clone)]
pub struct CalculationOptions {
    /// Field separator (default: comma)
    pub separator: char,
    /// Cache finished formula cells for the duration of the run (default: true)
    pub memoize: bool,
    /// Maximum depth of nested cell references (default: 256)
    pub max_depth: usize,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            memoize: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CalculationOptions {
    /// Default options with a different separator
    pub fn with_separator(separator: char) -> Self {
        Self {
            separator,
            ..Default::default()
        }
    }

    fn grid_options(&self) -> GridOptions {
        GridOptions {
            separator: self.separator,
        }
    }

    fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            memoize: self.memoize,
            max_depth: self.max_depth,
        }
    }
}

/// Statistics from a calculation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Number of data rows
    pub rows: usize,
    /// Number of formula cells in the grid
    pub formula_count: usize,
    /// Formula evaluations performed, including nested references
    pub cells_evaluated: usize,
    /// Formula results served from the cache
    pub cache_hits: usize,
}

/// Calculate grid text with the default options and a given separator
pub fn run(text: &str, separator: char) -> Result<String> {
    calculate(text, &CalculationOptions::with_separator(separator))
}

/// Calculate grid text
pub fn calculate(text: &str, options: &CalculationOptions) -> Result<String> {
    calculate_with_stats(text, options).map(|(output, _)| output)
}

/// Calculate grid text and report what the run did
pub fn calculate_with_stats(
    text: &str,
    options: &CalculationOptions,
) -> Result<(String, CalculationStats)> {
    let grid = Grid::parse(text, &options.grid_options())?;
    grid.calculate_with_options(options)
}

/// Extension trait for Grid to add calculation methods
pub trait GridCalculationExt {
    /// Calculate all formulas with default options, returning the output text
    fn calculate(&self) -> Result<String>;

    /// Calculate all formulas with custom options
    ///
    /// The separator of `options` is ignored: a parsed grid keeps the one it
    /// was parsed with.
    fn calculate_with_options(&self, options: &CalculationOptions)
        -> Result<(String, CalculationStats)>;
}

impl GridCalculationExt for Grid {
    fn calculate(&self) -> Result<String> {
        self.calculate_with_options(&CalculationOptions::default())
            .map(|(output, _)| output)
    }

    fn calculate_with_options(
        &self,
        options: &CalculationOptions,
    ) -> Result<(String, CalculationStats)> {
        let mut engine = CalculationEngine::new(self, options);
        let output = engine.calculate_all()?;
        Ok((output, engine.stats()))
    }
}

/// The calculation engine
struct CalculationEngine<'a> {
    grid: &'a Grid,
    ctx: EvaluationContext<'a>,
    formula_count: usize,
}

impl<'a> CalculationEngine<'a> {
    fn new(grid: &'a Grid, options: &CalculationOptions) -> Self {
        Self {
            grid,
            ctx: EvaluationContext::new(grid, options.evaluation_options()),
            formula_count: 0,
        }
    }

    /// Evaluate every row and assemble the output text
    fn calculate_all(&mut self) -> Result<String> {
        let grid = self.grid;
        let mut lines = Vec::with_capacity(grid.row_count());
        for (row, fields) in grid.rows().enumerate() {
            lines.push(self.calculate_row(row, fields)?);
        }

        let stats = self.stats();
        tracing::debug!(
            rows = stats.rows,
            formulas = stats.formula_count,
            cells_evaluated = stats.cells_evaluated,
            cache_hits = stats.cache_hits,
            "calculated grid"
        );

        Ok(grid.render(lines))
    }

    fn calculate_row(&mut self, row: usize, fields: &[String]) -> Result<String> {
        let mut out = Vec::with_capacity(fields.len());
        for (col, raw) in fields.iter().enumerate() {
            if !is_formula(raw) {
                out.push(raw.clone());
                continue;
            }

            self.formula_count += 1;
            let cell = CellAddress::new(row, col);
            let value = self.ctx.evaluate_at(cell).map_err(|error| {
                tracing::debug!(%cell, %error, "formula failed");
                Error::Cell { cell, error }
            })?;
            out.push(value.to_string());
        }
        Ok(self.grid.join_fields(&out))
    }

    fn stats(&self) -> CalculationStats {
        let evaluation = self.ctx.stats();
        CalculationStats {
            rows: self.grid.row_count(),
            formula_count: self.formula_count,
            cells_evaluated: evaluation.cells_evaluated,
            cache_hits: evaluation.cache_hits,
        }
    }
}
