//! Lifecycle error types

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for lifecycle operations
pub type Result<T> = std::result::Result<T, LspError>;

/// Errors raised while starting or supervising a language server
///
/// None of these are fatal to the integration: every failure path ends in the
/// fallback providers being registered instead.
#[derive(Debug, Error)]
pub enum LspError {
    /// The configured tool path does not resolve to a file
    #[error("language-server tool not found: {}", path.display())]
    ToolNotFound { path: PathBuf },

    /// The tool exists but lacks execute permission
    #[error("language-server tool is not executable: {}", path.display())]
    ToolNotExecutable { path: PathBuf },

    /// The tool could not be spawned
    #[error("failed to spawn language-server tool '{}': {source}", tool.display())]
    SpawnFailed {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error while probing the tool
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
