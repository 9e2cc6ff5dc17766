//! Academic record-keeping utilities
//!
//! Batch operations over CSV tables and PDF forms, driven by the
//! `join-csv`, `extract-pdf`, `merge-pdf` and `copy-numbered` tools:
//! - `join::outer_join`: case-insensitive sort-merge full outer join
//! - `extract::extract_fields`: form values out of PDFs, one row per document
//! - `fill::fill_documents`: form values into PDFs at templated paths
//! - `replicate::replicate`: numbered copies of files

pub mod error;
pub mod extract;
pub mod fill;
pub mod form;
pub mod join;
pub mod replicate;
pub mod table;
pub mod template;

pub use error::{RecordsError, Result};
pub use extract::{extract_fields, parse_field_list, read_path_list, ExtractOptions};
pub use fill::{fill_documents, load_templates, FillOptions};
pub use form::{FieldKind, FormDocument, FormField};
pub use join::{outer_join, JoinKey};
pub use replicate::{matching_files, numbered_name, replicate};
pub use table::{Record, Table};
pub use template::{resolve_template, PathTemplate};
