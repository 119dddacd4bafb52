//! Shell resolution and path translation
//!
//! Alan tasks always run through a bash-compatible shell. On Windows the
//! shell may be WSL bash, in which case native paths must be rewritten into
//! the `/mnt/<drive>` mount convention on the way in and back out of command
//! output on the way back.

use std::path::Path;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::debug;

use alanide_core::Settings;

use crate::error::{Result, TaskError};

/// WSL launcher; its presence means WSL bash is available
pub const WSL: &str = "C:\\Windows\\System32\\wsl.exe";
/// WSL bash entry point
pub const WSL_BASH: &str = "C:\\Windows\\System32\\bash.exe";
/// Git Bash, 64-bit install
pub const GIT_BASH_X64: &str = "C:\\Program Files\\Git\\bin\\bash.exe";
/// Git Bash, 32-bit install
pub const GIT_BASH_X86: &str = "C:\\Program Files (x86)\\Git\\bin\\bash.exe";
/// Default on every non-Windows platform
pub const DEFAULT_BASH: &str = "/bin/bash";

lazy_static! {
    static ref RE_DRIVE: Regex = Regex::new(r"([a-zA-Z]):").unwrap();
    static ref RE_MNT: Regex = Regex::new(r"/mnt/([a-z])/").unwrap();
    static ref RE_ANSI: Regex = Regex::new(
        "[\u{1b}\u{9b}][\\[()#;?]*(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-ORZcf-nqry=><]"
    )
    .unwrap();
}

/// A resolved shell executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    path: String,
}

impl Shell {
    /// Wrap an explicit shell path
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The shell executable path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this shell is the WSL bash variant
    pub fn is_wsl(&self) -> bool {
        self.path == WSL_BASH
    }

    /// Rewrite a native path into the shell's path convention
    ///
    /// For WSL, `X:` becomes `/mnt/x`; separators are normalized and spaces
    /// escaped for all shells.
    pub fn to_shell_path(&self, native: &str) -> String {
        let drive_mapped = if self.is_wsl() {
            RE_DRIVE
                .replace(native, |caps: &Captures| {
                    format!("/mnt/{}", caps[1].to_lowercase())
                })
                .into_owned()
        } else {
            native.to_string()
        };
        drive_mapped.replace('\\', "/").replace(' ', "\\ ")
    }

    /// Rewrite shell-native paths inside command output back to host paths
    pub fn from_output_path(&self, text: &str) -> String {
        if self.is_wsl() {
            RE_MNT.replace_all(text, "$1:/").into_owned()
        } else {
            text.to_string()
        }
    }
}

/// Remove ANSI escape sequences from tool output
pub fn strip_ansi(text: &str) -> String {
    RE_ANSI.replace_all(text, "").into_owned()
}

/// Resolve the shell used for Alan tasks
///
/// Resolution order: explicit setting, then the platform probe list, then
/// `/bin/bash` on non-Windows platforms. Fails only on Windows when none of
/// the probe paths exist and no override is configured.
pub fn resolve_shell(settings: &Settings) -> Result<Shell> {
    if let Some(shell) = settings
        .task_shell
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        debug!(shell = %shell, "Using configured task shell");
        return Ok(Shell::new(shell));
    }

    if cfg!(windows) {
        for (probe, shell) in [
            (WSL, WSL_BASH),
            (GIT_BASH_X64, GIT_BASH_X64),
            (GIT_BASH_X86, GIT_BASH_X86),
        ] {
            if Path::new(probe).is_file() {
                debug!(shell = %shell, "Found shell via probe");
                return Ok(Shell::new(shell));
            }
        }
        Err(TaskError::NoShellFound)
    } else {
        Ok(Shell::new(DEFAULT_BASH))
    }
}
