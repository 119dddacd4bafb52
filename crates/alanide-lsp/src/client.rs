//! Language client handles
//!
//! One handle per language project root. A handle owns the server subprocess
//! and tracks its state; state changes are observable so that stops can be
//! awaited and unexpected exits reported back to the lifecycle manager.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::{Child, Command};
use tokio::sync::{mpsc, watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use alanide_core::Settings;

use crate::error::{LspError, Result};

/// Lifecycle state of one language server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Starting,
    Running,
    Stopped,
}

/// Human-readable state label for management pickers
pub fn status_string(state: ClientState) -> &'static str {
    match state {
        ClientState::Starting => "Starting",
        ClientState::Running => "Running",
        ClientState::Stopped => "Stopped",
    }
}

/// Emitted when a running server exits on its own (not via [`LanguageClient::stop`])
#[derive(Debug, Clone)]
pub struct ClientStopped {
    pub root: PathBuf,
}

/// Resolve the configured tool path against a project root
///
/// The path from settings is relative to the root; on Windows an `.exe`
/// suffix is appended when missing. The resolved file must exist and carry
/// execute permission.
pub fn resolve_tool(root: &Path, settings: &Settings) -> Result<PathBuf> {
    let configured = settings
        .language_server_path
        .as_deref()
        .ok_or_else(|| LspError::ToolNotFound {
            path: root.to_path_buf(),
        })?;

    let mut relative = configured.to_string();
    if cfg!(windows) && !relative.ends_with(".exe") {
        relative.push_str(".exe");
    }

    let tool = root.join(relative);
    if !tool.is_file() {
        return Err(LspError::ToolNotFound { path: tool });
    }
    verify_executable(&tool)?;
    Ok(tool)
}

#[cfg(unix)]
fn verify_executable(tool: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(tool)?.permissions().mode();
    if mode & 0o111 == 0 {
        return Err(LspError::ToolNotExecutable {
            path: tool.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn verify_executable(_tool: &Path) -> Result<()> {
    Ok(())
}

/// Handle to one language server, identified by its project root
pub struct LanguageClient {
    id: String,
    root: PathBuf,
    state: Arc<watch::Sender<ClientState>>,
    shutdown: Mutex<Option<CancellationToken>>,
    events: mpsc::UnboundedSender<ClientStopped>,
}

impl LanguageClient {
    /// Create a stopped handle; identity is the root relative to its
    /// workspace folder
    pub fn new(
        root: impl Into<PathBuf>,
        workspace_folder: &Path,
        events: mpsc::UnboundedSender<ClientStopped>,
    ) -> Self {
        let root = root.into();
        let relative = root.strip_prefix(workspace_folder).unwrap_or(&root);
        let id = if relative.as_os_str().is_empty() {
            root.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| root.display().to_string())
        } else {
            relative.display().to_string()
        };
        Self {
            id,
            root,
            state: Arc::new(watch::Sender::new(ClientState::Stopped)),
            shutdown: Mutex::new(None),
            events,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state(&self) -> ClientState {
        *self.state.borrow()
    }

    /// Start the server if it is not already starting or running
    ///
    /// Resolves the tool, spawns it with `--lsp` (plus `--capture <value>`
    /// when configured) over stdio, and watches the child. An exit that was
    /// not requested through [`stop`](Self::stop) is reported on the event
    /// channel after the state flips to `Stopped`.
    pub async fn start(&self, settings: &Settings) -> Result<()> {
        match self.state() {
            ClientState::Starting | ClientState::Running => return Ok(()),
            ClientState::Stopped => {}
        }
        self.state.send_replace(ClientState::Starting);

        let tool = match resolve_tool(&self.root, settings) {
            Ok(tool) => tool,
            Err(e) => {
                self.state.send_replace(ClientState::Stopped);
                return Err(e);
            }
        };

        let mut command = Command::new(&tool);
        command.arg("--lsp");
        if let Some(capture) = &settings.capture {
            command.arg("--capture").arg(capture);
        }
        command
            .current_dir(&self.root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                self.state.send_replace(ClientState::Stopped);
                return Err(LspError::SpawnFailed { tool, source });
            }
        };

        info!(client = %self.id, tool = %tool.display(), "Language server started");
        self.state.send_replace(ClientState::Running);

        let shutdown = CancellationToken::new();
        *self.shutdown.lock().await = Some(shutdown.clone());
        tokio::spawn(supervise(
            child,
            shutdown,
            self.state.clone(),
            self.events.clone(),
            self.root.clone(),
            self.id.clone(),
        ));
        Ok(())
    }

    /// Stop the server and wait for the subprocess to terminate
    pub async fn stop(&self) {
        let token = self.shutdown.lock().await.take();
        match token {
            Some(token) => {
                token.cancel();
                self.wait_until_stopped().await;
            }
            None => {
                self.state.send_replace(ClientState::Stopped);
            }
        }
    }

    /// Resolve once the state is `Stopped`
    pub async fn wait_until_stopped(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state == ClientState::Stopped).await;
    }
}

impl std::fmt::Debug for LanguageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageClient")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("state", &self.state())
            .finish()
    }
}

/// Watch the child until it exits or a stop is requested
async fn supervise(
    mut child: Child,
    shutdown: CancellationToken,
    state: Arc<watch::Sender<ClientState>>,
    events: mpsc::UnboundedSender<ClientStopped>,
    root: PathBuf,
    id: String,
) {
    let exited = tokio::select! {
        _ = shutdown.cancelled() => None,
        status = child.wait() => Some(status),
    };
    match exited {
        Some(status) => {
            let code = status.ok().and_then(|s| s.code());
            warn!(client = %id, code = ?code, "Language server exited");
            state.send_replace(ClientState::Stopped);
            let _ = events.send(ClientStopped { root });
        }
        None => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            debug!(client = %id, "Language server stopped");
            state.send_replace(ClientState::Stopped);
        }
    }
}
