//! Numbered copies of files
//!
//! `a.pdf` copied three times becomes `a-001.pdf`, `a-002.pdf`, `a-003.pdf`
//! next to the original.

use crate::error::{RecordsError, Result};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Files in `dir` matching a glob `pattern`, in sorted order
pub fn matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let entries = glob::glob(&full_pattern.to_string_lossy())
        .map_err(|e| RecordsError::Format(format!("Invalid pattern '{}': {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            RecordsError::io(path, e.into_error())
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `<stem>-<seq>.<ext>` with `seq` zero-padded to three digits
pub fn numbered_name(path: &Path, seq: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}-{:03}.{}", stem, seq, ext.to_string_lossy()),
        None => format!("{}-{:03}", stem, seq),
    };
    path.with_file_name(name)
}

/// Copy every file `count` times; returns the copies in creation order.
///
/// Stops at the first failed copy. Copies already made are left in place.
pub fn replicate(files: &[PathBuf], count: NonZeroU32) -> Result<Vec<PathBuf>> {
    let mut copies = Vec::with_capacity(files.len() * count.get() as usize);
    for file in files {
        for seq in 1..=count.get() {
            let destination = numbered_name(file, seq);
            std::fs::copy(file, &destination).map_err(|e| RecordsError::io(&destination, e))?;
            tracing::debug!(
                source = %file.display(),
                destination = %destination.display(),
                "Copied"
            );
            copies.push(destination);
        }
    }
    tracing::info!(files = files.len(), copies = copies.len(), "Replicated files");
    Ok(copies)
}
