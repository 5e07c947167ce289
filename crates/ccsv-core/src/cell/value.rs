//! Cell value types

use std::fmt;

/// The value of a cell once read from text or produced by a formula
///
/// A grid only knows two kinds of values: numbers and text. Text covers
/// everything that is not a finite number, including the empty cell and
/// literal strings such as calendar dates, which pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Numeric value
    Number(f64),

    /// Any non-numeric text, including the empty string
    Text(String),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Interpret raw (non-formula) cell text
    ///
    /// Text that parses as a finite number becomes [`CellValue::Number`],
    /// anything else is kept verbatim.
    pub fn from_raw(raw: &str) -> Self {
        match parse_number(raw) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(raw.to_string()),
        }
    }

    /// Check if the value is a number
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    /// Get the number, if this is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    /// Get the number if it is finite (the subset aggregates reduce over)
    pub fn as_finite(&self) -> Option<f64> {
        self.as_number().filter(|n| n.is_finite())
    }

    /// Coerce to a number for arithmetic
    ///
    /// Text never parses here: a value that was numeric text has already been
    /// turned into a number by [`CellValue::from_raw`], so text is `NaN`.
    pub fn to_number(&self) -> f64 {
        self.as_number().unwrap_or(f64::NAN)
    }

    /// Arithmetic negation; text coerces to `NaN`
    pub fn negate(&self) -> Self {
        CellValue::Number(-self.to_number())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// Parse cell text as a finite number
///
/// Surrounding whitespace is ignored. Empty text, non-finite spellings
/// (`inf`, `NaN`) and anything with trailing garbage are not numbers.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Format a number the way the grid serializes results
///
/// Uses the shortest decimal representation that round-trips, switching to
/// exponent notation below `1e-6` and from `1e21` upward. Non-finite values
/// are spelled `NaN`, `Infinity` and `-Infinity`, and negative zero prints
/// as `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", n);
    }

    // `{:e}` renders `1e21` / `1.5e-7`; exponents carry an explicit sign
    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exp,
    }
}
