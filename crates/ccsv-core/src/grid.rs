//! Grid type
//!
//! A grid is the immutable view of a delimited text blob: the first line
//! holds column names, every following line is a data row. Nothing is
//! quoted or escaped, so a field is simply the text between two separators.

use crate::cell::{CellAddress, CellValue};
use crate::error::{Error, Result};
use crate::{DEFAULT_SEPARATOR, FORMULA_MARKER};

/// Options for parsing a grid
#[derive(Debug, Clone)]
pub struct GridOptions {
    /// Field separator (default: comma)
    pub separator: char,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
        }
    }
}

/// Terminator of one source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style (LF)
    #[default]
    Lf,
    /// Windows-style (CRLF)
    CrLf,
}

impl LineEnding {
    /// Split a terminated line (without its `\n`) into text and terminator
    fn split(line: &str) -> (&str, Self) {
        match line.strip_suffix('\r') {
            Some(text) => (text, LineEnding::CrLf),
            None => (line, LineEnding::Lf),
        }
    }

    /// The terminator as text
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A parsed header row plus data rows
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    separator: char,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Terminator after each line, header first; `None` for an unterminated
    /// last line
    line_endings: Vec<Option<LineEnding>>,
}

impl Grid {
    /// Parse a grid from text
    ///
    /// Every line is split on the separator; rows keep however many fields
    /// they have. Each line remembers its own terminator (`\n` or `\r\n`) so
    /// output can restore it. A terminator at the very end of the text does
    /// not start another row.
    pub fn parse(text: &str, options: &GridOptions) -> Result<Self> {
        let separator = options.separator;
        if separator == '\n' || separator == '\r' {
            return Err(Error::InvalidSeparator(separator));
        }

        let mut lines = Vec::new();
        let mut line_endings = Vec::new();
        let mut rest = text;
        while let Some(end) = rest.find('\n') {
            let (line, ending) = LineEnding::split(&rest[..end]);
            lines.push(line);
            line_endings.push(Some(ending));
            rest = &rest[end + 1..];
        }
        // an unterminated last line; empty text is a lone empty header
        if !rest.is_empty() || lines.is_empty() {
            lines.push(rest);
            line_endings.push(None);
        }

        let split = |line: &&str| -> Vec<String> {
            line.split(separator).map(str::to_string).collect()
        };

        let headers = lines.first().map(split).unwrap_or_default();
        let rows = lines.iter().skip(1).map(split).collect();

        Ok(Self {
            separator,
            headers,
            rows,
            line_endings,
        })
    }

    /// Build a grid directly from headers and rows
    pub fn from_rows<H, R>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator,
        <R::Item as IntoIterator>::Item: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let mut line_endings = vec![Some(LineEnding::Lf); rows.len()];
        line_endings.push(None);

        Self {
            separator: DEFAULT_SEPARATOR,
            headers: headers.into_iter().map(Into::into).collect(),
            rows,
            line_endings,
        }
    }

    // === Shape ===

    /// Field separator the grid was parsed with
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Terminator after a source line (0 is the header line); `None` past
    /// the last terminator
    pub fn line_ending(&self, line: usize) -> Option<LineEnding> {
        self.line_endings.get(line).copied().flatten()
    }

    /// Whether the source text ended with a line terminator
    pub fn has_trailing_newline(&self) -> bool {
        self.line_endings.last().copied().flatten().is_some()
    }

    /// Column names from the header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of columns named by the header row
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (the header row is not counted)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with exactly this name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    // === Cell Access ===

    /// Raw fields of a data row
    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Iterate over the data rows
    pub fn rows(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Raw text of a cell; cells past the end of their row read as empty
    pub fn cell_at(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|fields| fields.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Raw text of a cell by address
    pub fn cell(&self, addr: CellAddress) -> &str {
        self.cell_at(addr.row, addr.col)
    }

    /// Whether the cell exists in its row (as opposed to reading past the end)
    pub fn contains(&self, addr: CellAddress) -> bool {
        self.rows
            .get(addr.row)
            .map_or(false, |fields| addr.col < fields.len())
    }

    /// Iterate over every existing data cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &str)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, fields)| {
            fields
                .iter()
                .enumerate()
                .map(move |(col, raw)| (CellAddress::new(row, col), raw.as_str()))
        })
    }

    /// Iterate over the addresses of all formula cells
    pub fn formula_cells(&self) -> impl Iterator<Item = CellAddress> + '_ {
        self.cells()
            .filter(|(_, raw)| is_formula(raw))
            .map(|(addr, _)| addr)
    }

    /// Read a non-formula cell as a value
    pub fn value_at(&self, row: usize, col: usize) -> CellValue {
        CellValue::from_raw(self.cell_at(row, col))
    }

    // === Output ===

    /// The header line exactly as it appeared in the input
    pub fn header_line(&self) -> String {
        self.join_fields(&self.headers)
    }

    /// Join fields with the grid's separator
    pub fn join_fields<S: AsRef<str>>(&self, fields: &[S]) -> String {
        let mut line = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                line.push(self.separator);
            }
            line.push_str(field.as_ref());
        }
        line
    }

    /// Assemble output text: header line, then the given rows, each followed
    /// by the terminator its source line had
    pub fn render<I>(&self, rows: I) -> String
    where
        I: IntoIterator<Item = String>,
    {
        let mut out = self.header_line();
        for (line, row) in rows.into_iter().enumerate() {
            // rows beyond the source are joined with `\n`
            out.push_str(self.line_ending(line).unwrap_or_default().as_str());
            out.push_str(&row);
        }
        if let Some(ending) = self.line_ending(self.rows.len()) {
            out.push_str(ending.as_str());
        }
        out
    }
}

/// Check if raw cell text is a formula
pub fn is_formula(raw: &str) -> bool {
    raw.starts_with(FORMULA_MARKER)
}
