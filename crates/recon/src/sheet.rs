//! Tabular sheet abstraction consumed by the extractor.
//!
//! Rows are 1-based (row 1 is the first spreadsheet row), columns are 0-based
//! (column 0 is `A`). Decoders for real spreadsheet formats live outside this
//! crate and feed [`GridSheet`].

use serde::Serialize;

use crate::error::ReconError;

/// A single decoded cell scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Render the scalar the way it reads in the spreadsheet.
    ///
    /// Integral numbers drop their fractional part so that a port numbered
    /// `12` compares equal whether the decoder saw text or a float.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Self::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Used range of a sheet: the last populated row (1-based) and column (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetExtent {
    pub last_row: usize,
    pub last_col: usize,
}

/// Cell-addressable grid.
pub trait TabularSheet {
    /// Used range, or `None` for a sheet with no cells at all.
    fn extent(&self) -> Option<SheetExtent>;

    /// Cell value at (column, row), or `None` when absent.
    fn cell(&self, column: usize, row: usize) -> Option<CellValue>;

    /// Cell rendered as text; blank cells yield `None`.
    fn text(&self, column: usize, row: usize) -> Option<String> {
        self.cell(column, row)
            .map(|v| v.as_text())
            .filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// In-memory grid
// ---------------------------------------------------------------------------

/// Dense in-memory sheet. `rows[0]` is spreadsheet row 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSheet {
    name: String,
    rows: Vec<Vec<Option<CellValue>>>,
}

impl GridSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build from text rows; empty strings become absent cells.
    pub fn from_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|s| {
                        let s = s.as_ref();
                        if s.is_empty() {
                            None
                        } else {
                            Some(CellValue::Text(s.to_string()))
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Parse headerless CSV text. Every record becomes one row, header rows
    /// included, so row numbers match what a spreadsheet app shows.
    ///
    /// The csv reader drops blank lines; each one is put back as an empty
    /// row. A quoted field spanning several lines is still a single row.
    pub fn from_csv_str(name: impl Into<String>, data: &str, delimiter: u8) -> Result<Self, ReconError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(data.as_bytes());

        let mut rows: Vec<Vec<String>> = Vec::new();
        // Physical line the next record starts on when no blank line intervenes
        let mut next_line: u64 = 1;
        for record in reader.records() {
            let record = record.map_err(|e| ReconError::Csv(e.to_string()))?;
            if let Some(pos) = record.position() {
                let line = pos.line();
                for _ in next_line..line {
                    rows.push(Vec::new());
                }
                let embedded: u64 = record.iter().map(|f| f.matches('\n').count() as u64).sum();
                next_line = line + embedded + 1;
            }
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(Self::from_rows(name, rows))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a cell, growing the grid as needed. Row 0 does not exist and is ignored.
    pub fn set(&mut self, column: usize, row: usize, value: CellValue) {
        let Some(r) = row.checked_sub(1) else {
            return;
        };
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= column {
            cells.resize(column + 1, None);
        }
        cells[column] = Some(value);
    }
}

impl TabularSheet for GridSheet {
    fn extent(&self) -> Option<SheetExtent> {
        if self.rows.is_empty() {
            return None;
        }
        let last_col = self.rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Some(SheetExtent {
            last_row: self.rows.len(),
            last_col: last_col.saturating_sub(1),
        })
    }

    fn cell(&self, column: usize, row: usize) -> Option<CellValue> {
        if row == 0 {
            return None;
        }
        self.rows.get(row - 1)?.get(column)?.clone()
    }
}

// ---------------------------------------------------------------------------
// Column letters
// ---------------------------------------------------------------------------

/// Convert a spreadsheet column label (`A`, `N`, `AA`) to a 0-based index.
pub fn column_index(label: &str) -> Option<usize> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let mut index: usize = 0;
    for ch in label.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// Inverse of [`column_index`].
pub fn column_label(mut index: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("c"), Some(2));
        assert_eq!(column_index("N"), Some(13));
        assert_eq!(column_index("Z"), Some(25));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index("AB"), Some(27));
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);

        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(701), "ZZ");
    }

    #[test]
    fn number_rendering() {
        assert_eq!(CellValue::Number(12.0).as_text(), "12");
        assert_eq!(CellValue::Number(1.5).as_text(), "1.5");
        assert_eq!(CellValue::Bool(true).as_text(), "TRUE");
        assert_eq!(CellValue::from("x").as_text(), "x");
    }

    #[test]
    fn grid_extent_and_lookup() {
        let sheet = GridSheet::from_rows("s", vec![vec!["a", "b"], vec!["", "", "c"]]);
        assert_eq!(
            sheet.extent(),
            Some(SheetExtent {
                last_row: 2,
                last_col: 2
            })
        );
        assert_eq!(sheet.text(0, 1).as_deref(), Some("a"));
        assert_eq!(sheet.text(0, 2), None);
        assert_eq!(sheet.text(2, 2).as_deref(), Some("c"));
        assert_eq!(sheet.cell(0, 0), None);
        assert_eq!(sheet.cell(9, 9), None);
    }

    #[test]
    fn empty_grid_has_no_extent() {
        assert_eq!(GridSheet::new("empty").extent(), None);
    }

    #[test]
    fn set_grows_grid() {
        let mut sheet = GridSheet::new("s");
        sheet.set(3, 5, CellValue::Number(7.0));
        assert_eq!(sheet.extent().map(|e| e.last_row), Some(5));
        assert_eq!(sheet.text(3, 5).as_deref(), Some("7"));
        assert_eq!(sheet.text(0, 1), None);
    }

    #[test]
    fn csv_keeps_header_rows() {
        let sheet = GridSheet::from_csv_str("c", "room,splitter\nR1,S1\n", b',').unwrap();
        assert_eq!(sheet.extent().map(|e| e.last_row), Some(2));
        assert_eq!(sheet.text(0, 2).as_deref(), Some("R1"));
    }

    #[test]
    fn csv_blank_lines_keep_their_rows() {
        let sheet = GridSheet::from_csv_str("c", "title\n\nroom\nR1\n", b',').unwrap();
        assert_eq!(sheet.extent().map(|e| e.last_row), Some(4));
        assert_eq!(sheet.text(0, 1).as_deref(), Some("title"));
        assert_eq!(sheet.text(0, 2), None);
        assert_eq!(sheet.text(0, 3).as_deref(), Some("room"));
        assert_eq!(sheet.text(0, 4).as_deref(), Some("R1"));

        let sheet = GridSheet::from_csv_str("c", "\r\n\r\nR1,S1\r\n\r\nR2,S2\r\n", b',').unwrap();
        assert_eq!(sheet.text(0, 3).as_deref(), Some("R1"));
        assert_eq!(sheet.text(0, 4), None);
        assert_eq!(sheet.text(1, 5).as_deref(), Some("S2"));
    }

    #[test]
    fn csv_multiline_field_is_one_row() {
        let sheet = GridSheet::from_csv_str("c", "a\n\"x\ny\",b\n\nc\n", b',').unwrap();
        assert_eq!(sheet.text(0, 2).as_deref(), Some("x\ny"));
        assert_eq!(sheet.text(1, 2).as_deref(), Some("b"));
        assert_eq!(sheet.text(0, 3), None);
        assert_eq!(sheet.text(0, 4).as_deref(), Some("c"));
        assert_eq!(sheet.extent().map(|e| e.last_row), Some(4));
    }
}
