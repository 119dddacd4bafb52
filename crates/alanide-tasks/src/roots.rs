//! Project root resolution
//!
//! Walks up from a file's directory until a marker file is found.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TaskError};

/// Find the nearest ancestor of `start_dir` containing `marker` as a file
///
/// The starting directory itself is considered first. Fails with
/// [`TaskError::RootNotResolved`] when the filesystem root is reached.
pub fn resolve_root(start_dir: &Path, marker: &str) -> Result<PathBuf> {
    let mut current = start_dir;
    loop {
        let candidate = current.join(marker);
        if candidate.is_file() {
            debug!(root = %current.display(), marker = %marker, "Resolved project root");
            return Ok(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => {
                return Err(TaskError::RootNotResolved {
                    marker: marker.to_string(),
                    start: start_dir.to_path_buf(),
                })
            }
        }
    }
}
