//! In-memory CSV tables
//!
//! A table is a header row plus rows of string values aligned with it.
//! Columns keep their source order; values are addressed by column name at
//! runtime since column sets are supplied by the user.

use crate::error::{RecordsError, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Where the table came from, used in error messages
    source: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A borrowed view of one row, addressable by column name
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> Record<'a> {
    /// Value of the first column named `column`, if the table has one
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }
}

impl Table {
    pub fn new(source: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            source: source.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Load a table from a CSV file with a mandatory header row
    pub fn read_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| RecordsError::io(path, e))?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Load a table from any CSV source; `source` names it in errors
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| csv_error(source, e))?
            .iter()
            .map(String::from)
            .collect();

        let mut table = Table::new(source, headers);
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(source, e))?;
            table.rows.push(record.iter().map(String::from).collect());
        }

        tracing::debug!(
            source,
            rows = table.rows.len(),
            columns = table.headers.len(),
            "Loaded table"
        );
        Ok(table)
    }

    /// Write the header and every row, terminating rows with a single linefeed
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        writer
            .write_record(&self.headers)
            .map_err(|e| csv_error("output", e))?;
        for row in &self.rows {
            writer.write_record(row).map_err(|e| csv_error("output", e))?;
        }
        writer
            .flush()
            .map_err(|e| RecordsError::io("output", e))?;
        Ok(())
    }

    /// Write to a file, or to standard output when `path` is `-`
    pub fn write_path(&self, path: &Path) -> Result<()> {
        if path == Path::new("-") {
            return self.write_to(std::io::stdout().lock());
        }
        let file = File::create(path).map_err(|e| RecordsError::io(path, e))?;
        self.write_to(file)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|values| Record {
            headers: &self.headers,
            values,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|values| Record {
            headers: &self.headers,
            values,
        })
    }

    /// Index of a required column, or a schema error naming this table
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| RecordsError::Schema {
                table: self.source.clone(),
                column: column.to_string(),
            })
    }

    /// Append a row; it must be exactly as wide as the header
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(RecordsError::Format(format!(
                "{}: row has {} values but the header has {} columns",
                self.source,
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }
}

fn csv_error(source: &str, err: csv::Error) -> RecordsError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => RecordsError::io(source, e),
        _ => RecordsError::Format(format!("{}: {}", source, message)),
    }
}
