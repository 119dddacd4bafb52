//! Error types for task execution

use std::path::PathBuf;

use thiserror::Error;

/// Task execution error
#[derive(Debug, Error)]
pub enum TaskError {
    /// No usable shell was found and none was configured
    #[error("could not locate a bash shell for executing Alan tasks; set one in the extension settings")]
    NoShellFound,

    /// The shell process could not be started
    #[error("failure executing command '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// No ancestor of the starting directory contains the marker file
    #[error("no ancestor of '{start}' contains a '{marker}' file")]
    RootNotResolved { marker: String, start: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for task operations
pub type Result<T> = std::result::Result<T, TaskError>;
