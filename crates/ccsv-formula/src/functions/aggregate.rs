//! Aggregate functions
//!
//! Every function receives the full list of expanded values. `len` counts
//! all of them; the others only reduce the finite numbers.

use ccsv_core::CellValue;

fn finite(values: &[CellValue]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(CellValue::as_finite)
}

/// SUM function
pub fn fn_sum(values: &[CellValue]) -> f64 {
    finite(values).sum()
}

/// AVG function
///
/// The denominator is the number of expanded values, not the number of
/// numeric ones: `avg` of `10` and an empty cell is `5`.
pub fn fn_avg(values: &[CellValue]) -> f64 {
    fn_sum(values) / values.len() as f64
}

/// MIN function (`Infinity` when there are no numbers)
pub fn fn_min(values: &[CellValue]) -> f64 {
    finite(values).fold(f64::INFINITY, f64::min)
}

/// MAX function (`-Infinity` when there are no numbers)
pub fn fn_max(values: &[CellValue]) -> f64 {
    finite(values).fold(f64::NEG_INFINITY, f64::max)
}

/// LEN function
pub fn fn_len(values: &[CellValue]) -> f64 {
    values.len() as f64
}
