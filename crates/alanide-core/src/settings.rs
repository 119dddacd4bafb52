//! Extension settings
//!
//! A serde-backed settings struct with defaults, optionally overridden from a
//! TOML file supplied by the host.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Settings error
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error while reading the settings file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML
    #[error("settings parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// User-facing configuration for the Alan integration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Explicit shell override for task execution
    pub task_shell: Option<String>,
    /// Reveal the output channel when a task starts
    pub show_task_output: bool,
    /// Register the fallback tooling as definition/symbol/completion providers
    pub integrate_with_go_to_definition: bool,
    /// Language-server tool path, resolved relative to a project root
    pub language_server_path: Option<String>,
    /// Optional capture target forwarded to the language server
    pub capture: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            task_shell: None,
            show_task_output: true,
            integrate_with_go_to_definition: true,
            language_server_path: None,
            capture: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, falling back to defaults for absent keys
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&text)?;
        debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Load settings from a file if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Self {
        if path.is_file() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable settings file");
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}
