//! Fill PDF form templates from table rows
//!
//! For every (row, template) pair, in row-major order:
//! 1. Resolve the destination path from the row and the template's file name
//! 2. Fail if the destination exists (or was already produced by this run)
//! 3. Create missing parent directories
//! 4. Copy the template, fill matching fields, write it with create-new
//!
//! The first failure halts the run. Outputs already written stay in place.

use crate::error::{RecordsError, Result};
use crate::form::FormDocument;
use crate::table::Table;
use crate::template::PathTemplate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct FillOptions {
    /// Resolve and check every destination without writing anything
    pub dry_run: bool,
}

/// Load every template up front so a bad document fails before any output
pub fn load_templates<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<FormDocument>> {
    paths
        .iter()
        .map(|p| FormDocument::load(p.as_ref()))
        .collect()
}

/// Fill each template once per row; returns the destination paths in order
pub fn fill_documents(
    table: &Table,
    destination: &PathTemplate,
    templates: &[FormDocument],
    options: FillOptions,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(table.len() * templates.len());
    let mut seen = HashSet::new();

    for record in table.records() {
        for template in templates {
            let path = destination.resolve(&record, &template.file_name())?;
            if path.exists() || !seen.insert(path.clone()) {
                return Err(RecordsError::DestinationExists(path));
            }

            if options.dry_run {
                tracing::info!(
                    source = %template.path().display(),
                    destination = %path.display(),
                    "Would write"
                );
                written.push(path);
                continue;
            }

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| RecordsError::io(parent, e))?;
            }

            let mut filled = template.clone();
            let count = filled.fill(&record)?;
            filled.save_new(&path)?;
            tracing::info!(
                source = %template.path().display(),
                destination = %path.display(),
                fields = count,
                "Wrote filled form"
            );
            written.push(path);
        }
    }

    Ok(written)
}
