use std::fs;
use std::path::Path;
use std::str;

use memchr::memchr_iter;

use crate::processor::{CellValue, ProcessorError};

/// In-memory tabular document backed by a CSV file.
///
/// Rows and cells are 0-indexed. Fields are typed on load (see [`CellValue`])
/// and written back in their text form on save. The reader splits on plain
/// commas; quoting is not part of this tool's file format.
///
/// # Example
/// ```rust
/// # use table_processor::processor::CellValue;
/// # use table_processor::processor::table::Table;
/// let mut table = Table::new();
/// table.create_row(0).set_cell(1, CellValue::Number(42.0));
/// assert_eq!(table.row(0).unwrap().cell(1), Some(&CellValue::Number(42.0)));
/// assert_eq!(table.row(0).unwrap().cell(0), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

/// One table row; cells may be absent (never written) as well as blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<Option<CellValue>>,
}

impl Row {
    /// Cell at `index`, or `None` when the row has no cell there.
    pub fn cell(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index).and_then(|cell| cell.as_ref())
    }

    /// Writes `value` at `index`, padding with absent cells as needed.
    pub fn set_cell(&mut self, index: usize, value: CellValue) {
        if index >= self.cells.len() {
            self.cells.resize(index + 1, None);
        }
        self.cells[index] = Some(value);
    }

    /// Number of cell slots, including absent ones.
    pub fn width(&self) -> usize {
        self.cells.len()
    }
}

impl Table {
    /// Creates an empty in-memory table
    pub fn new() -> Self {
        Table { rows: Vec::new() }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at `index` for writing, creating it and any rows before it.
    pub fn create_row(&mut self, index: usize) -> &mut Row {
        if index >= self.rows.len() {
            self.rows.resize(index + 1, Row::default());
        }
        &mut self.rows[index]
    }

    /// Loads a CSV file into a typed table
    ///
    /// Lines are split on `\n` (a trailing `\r` is stripped), fields on `,`.
    /// Empty lines are skipped. Each field is typed per [`CellValue`].
    ///
    /// # Errors
    /// Returns a [`ProcessorError`] if the file cannot be read or is not
    /// valid UTF-8.
    pub fn open_csv(path: &Path) -> Result<Self, ProcessorError> {
        let buf = fs::read(path)?;
        let data: &[u8] = &buf;

        let mut rows = Vec::new();
        let mut start = 0;
        for newline_pos in memchr_iter(b'\n', data) {
            Self::push_line(&mut rows, &data[start..newline_pos])?;
            start = newline_pos + 1;
        }
        if start < data.len() {
            Self::push_line(&mut rows, &data[start..])?;
        }

        Ok(Table { rows })
    }

    fn push_line(rows: &mut Vec<Row>, line: &[u8]) -> Result<(), ProcessorError> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            return Ok(());
        }

        let mut cells = Vec::new();
        let mut field_start = 0;
        for comma_pos in memchr_iter(b',', line) {
            cells.push(Some(Self::parse_field(&line[field_start..comma_pos])?));
            field_start = comma_pos + 1;
        }
        cells.push(Some(Self::parse_field(&line[field_start..])?));

        rows.push(Row { cells });
        Ok(())
    }

    fn parse_field(field: &[u8]) -> Result<CellValue, ProcessorError> {
        let text = str::from_utf8(field)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(CellValue::Blank);
        }
        if let Ok(value) = fast_float2::parse::<f64, _>(trimmed) {
            return Ok(CellValue::Number(value));
        }
        Ok(CellValue::Text(text.to_string()))
    }

    /// Persists the table to `path`
    ///
    /// The whole document is serialized into one buffer and committed with a
    /// single write, so a failure cannot leave a partially written file
    /// behind an earlier successful chunk.
    ///
    /// # Errors
    /// Returns a [`ProcessorError`] on write failure.
    pub fn save_csv(&self, path: &Path) -> Result<(), ProcessorError> {
        let mut out = String::new();
        for row in &self.rows {
            for (i, cell) in row.cells.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if let Some(cell) = cell {
                    out.push_str(&cell.to_string());
                }
            }
            out.push('\n');
        }
        fs::write(path, out)?;
        Ok(())
    }
}
