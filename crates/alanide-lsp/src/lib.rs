//! Language-server lifecycle management
//!
//! Spawns one `alan` language server per discovered language root and keeps
//! it supervised. When no server can run (tool missing, not executable, or
//! exited) the project falls back to the heuristic providers, so language
//! support degrades instead of disappearing.

pub mod client;
pub mod error;
pub mod manage;
pub mod manager;

pub use client::{resolve_tool, status_string, ClientState, ClientStopped, LanguageClient};
pub use error::{LspError, Result};
pub use manage::{manage, perform, perform_all, toggle, Operation};
pub use manager::LifecycleManager;
