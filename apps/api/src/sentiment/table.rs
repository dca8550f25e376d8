//! Tabular feedback data: loading from CSV/TSV, spreadsheets or JSON, and
//! the plain-text dump embedded into the sentiment prompt.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("the workbook has no worksheets")]
    NoWorksheet,

    #[error("the file has no header row")]
    MissingHeader,

    #[error("row {row} has {found} cells but there are {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A header row plus data rows, every row exactly `columns.len()` wide.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Excel workbooks go through `load_spreadsheet`; everything else is
/// delimited text.
pub fn is_spreadsheet(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xls")
}

/// Field delimiter for the uploaded file, chosen from its extension.
pub fn delimiter_for(file_name: &str) -> u8 {
    if file_name.to_ascii_lowercase().ends_with(".tsv") {
        b'\t'
    } else {
        b','
    }
}

/// Parses delimited text with a mandatory header row. Rows with a different
/// number of cells than the header are rejected.
pub fn load_table(bytes: &[u8], delimiter: u8) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(TableError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { columns, rows })
}

/// Reads the first worksheet of an `.xlsx`/`.xls` workbook. The first row of
/// the used range is the header; empty cells become empty strings.
pub fn load_spreadsheet(bytes: &[u8]) -> Result<Table, TableError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TableError::NoWorksheet)??;

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .ok_or(TableError::MissingHeader)?
        .iter()
        .map(|cell| spreadsheet_cell_text(cell).trim().to_string())
        .collect();
    if columns.iter().all(String::is_empty) {
        return Err(TableError::MissingHeader);
    }

    let rows = rows
        .map(|row| row.iter().map(spreadsheet_cell_text).collect())
        .collect();
    Ok(Table { columns, rows })
}

fn spreadsheet_cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Table {
    /// Builds a table from JSON cells. Strings are taken as-is, `null` becomes
    /// an empty cell, anything else is rendered as compact JSON.
    pub fn from_json(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        if columns.is_empty() {
            return Err(TableError::MissingHeader);
        }

        let mut out = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RowWidth {
                    row: index,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            out.push(row.into_iter().map(cell_text).collect());
        }

        Ok(Table { columns, rows: out })
    }

    /// Aligned text dump: a header line, then one line per row prefixed
    /// with its 0-based index. Cells are right-aligned per column.
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return format!(
                "Empty table\nColumns: [{}]\nIndex: []",
                self.columns.join(", ")
            );
        }

        let index_width = (self.rows.len() - 1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, header)| {
                self.rows
                    .iter()
                    .map(|row| row[c].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        let mut header = " ".repeat(index_width);
        for (column, width) in self.columns.iter().zip(&widths) {
            header.push_str(&format!("  {column:>width$}"));
        }
        lines.push(header.trim_end().to_string());

        for (index, row) in self.rows.iter().enumerate() {
            let mut line = format!("{index:<index_width$}");
            for (cell, width) in row.iter().zip(&widths) {
                line.push_str(&format!("  {cell:>width$}"));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}
