//! Destination path templates
//!
//! A template is a path containing `%column%` placeholders, resolved against
//! one table row. `%pdf%` is reserved for the source document's file name.

use crate::error::{RecordsError, Result};
use crate::table::Record;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};

/// Placeholder naming the source document instead of a column
pub const SOURCE_PLACEHOLDER: &str = "%pdf%";

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"%([^%]+)%").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
}

impl PathTemplate {
    /// A template naming only a directory gets `%pdf%` appended, so the
    /// source file name is kept
    pub fn new(template: impl Into<String>) -> Self {
        let mut template = template.into();
        if !template.contains(SOURCE_PLACEHOLDER) && ends_with_separator(&template) {
            template.push_str(SOURCE_PLACEHOLDER);
        }
        Self { template }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Substitute every placeholder from `record` and `source_file_name`.
    ///
    /// Unless `%pdf%` ends the template, the source name has its extension
    /// stripped so it can serve as a directory or name stem. Placeholders
    /// naming no column fail with `MissingField`, listing each name once.
    pub fn resolve(&self, record: &Record<'_>, source_file_name: &str) -> Result<PathBuf> {
        let source = if self.template.ends_with(SOURCE_PLACEHOLDER) {
            source_file_name.to_string()
        } else {
            strip_extension(source_file_name)
        };

        let mut missing: Vec<String> = Vec::new();
        let resolved = PLACEHOLDER.replace_all(&self.template, |caps: &Captures<'_>| {
            let name = &caps[1];
            if name == "pdf" {
                return source.clone();
            }
            match record.get(name) {
                Some(value) => value.to_string(),
                None => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });

        if !missing.is_empty() {
            return Err(RecordsError::MissingField(missing));
        }
        Ok(PathBuf::from(resolved.into_owned()))
    }
}

/// Resolve `template` for one row and source document
pub fn resolve_template(
    template: &str,
    record: &Record<'_>,
    source_file_name: &str,
) -> Result<PathBuf> {
    PathTemplate::new(template).resolve(record, source_file_name)
}

fn ends_with_separator(template: &str) -> bool {
    template.ends_with('/') || template.ends_with(std::path::MAIN_SEPARATOR)
}

fn strip_extension(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}
