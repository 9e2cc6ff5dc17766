//! Form values out of PDFs, one table row per document

use crate::error::Result;
use crate::form::FormDocument;
use crate::table::Table;
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Prepend a column with this name holding each document's file name
    pub filename_column: Option<String>,
}

/// Split a comma-separated field list, trimming around each name
pub fn parse_field_list(spec: &str) -> Vec<String> {
    spec.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Read document paths one per line, skipping blank lines
pub fn read_path_list<R: BufRead>(reader: R) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }
    Ok(paths)
}

/// One row per document holding the requested fields in the order given.
///
/// A field the document lacks is logged as a warning and left empty; a
/// document that cannot be read or is not a form aborts the extraction.
pub fn extract_fields<P: AsRef<Path>>(
    field_names: &[String],
    documents: &[P],
    options: &ExtractOptions,
) -> Result<Table> {
    let mut headers = Vec::with_capacity(field_names.len() + 1);
    if let Some(column) = &options.filename_column {
        headers.push(column.clone());
    }
    headers.extend(field_names.iter().cloned());
    let mut table = Table::new("extracted fields", headers);

    for document in documents {
        let form = FormDocument::load(document.as_ref())?;
        let fields = form.fields()?;

        let mut row = Vec::with_capacity(table.width());
        if options.filename_column.is_some() {
            row.push(form.file_name());
        }
        for name in field_names {
            match fields.iter().find(|f| &f.name == name) {
                Some(field) => row.push(field.value.clone().unwrap_or_default()),
                None => {
                    tracing::warn!(
                        document = %form.path().display(),
                        field = %name,
                        "Field not present in form, leaving it empty"
                    );
                    row.push(String::new());
                }
            }
        }
        table.push_row(row)?;
    }

    tracing::info!(
        documents = table.len(),
        fields = field_names.len(),
        "Extracted form fields"
    );
    Ok(table)
}
