use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Column '{column}' not found in {table}")]
    Schema { table: String, column: String },

    #[error("Malformed input: {0}")]
    Format(String),

    #[error("Unresolved placeholders in path template: {}", .0.join(", "))]
    MissingField(Vec<String>),

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Duplicate join key '{key}' in {table}")]
    DuplicateKey { table: String, key: String },
}

impl RecordsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecordsError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordsError>;
