//! Traits abstracting the hosting IDE
//!
//! The editor front-end implements these; everything below them stays
//! host-agnostic and therefore testable with plain mock implementations.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::types::{
    CompletionItem, Document, DocumentSymbol, FileDiagnostics, Location, Position,
};

/// A disposable registration handed back by the host
///
/// Dropping the subscription (or calling [`Subscription::dispose`]) tears the
/// registration down. Used for provider registrations and any other resource
/// held on behalf of a project.
pub struct Subscription {
    on_dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Create a subscription that runs the given teardown once
    pub fn new(on_dispose: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_dispose: Some(Box::new(on_dispose)),
        }
    }

    /// A subscription with no teardown
    pub fn empty() -> Self {
        Self { on_dispose: None }
    }

    /// Tear down the registration now
    pub fn dispose(mut self) {
        if let Some(f) = self.on_dispose.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.on_dispose.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("armed", &self.on_dispose.is_some())
            .finish()
    }
}

/// The host output channel used for command output
pub trait OutputSink: Send + Sync {
    /// Discard everything shown so far
    fn clear(&self);
    /// Append text without a trailing newline
    fn append(&self, text: &str);
    /// Append a full line
    fn append_line(&self, text: &str);
    /// Bring the channel into view
    fn reveal(&self);
}

/// The host diagnostics collection
///
/// `publish` replaces the collection in one call; partial results are never
/// published mid-run.
pub trait DiagnosticsSink: Send + Sync {
    fn clear(&self);
    fn publish(&self, diagnostics: Vec<FileDiagnostics>);
}

/// The host's workspace-wide symbol index, queried by exact name
#[async_trait]
pub trait WorkspaceSymbolSource: Send + Sync {
    /// Best-effort lookup; an empty result is a legitimate answer
    async fn query(&self, name: &str) -> Vec<Location>;
}

/// Interactive surfaces: pickers, input boxes and status messages
#[async_trait]
pub trait UserInterface: Send + Sync {
    /// Present a list; returns the index of the accepted item
    async fn pick(&self, items: &[String], placeholder: &str) -> Option<usize>;
    /// Prompt for a line of text
    async fn input(&self, prompt: &str, default: &str) -> Option<String>;
    /// Transient, quiet status-bar message
    fn status_message(&self, message: &str);
    /// User-visible but non-fatal error message
    fn error_message(&self, message: &str);
}

/// Serves definitions for a document position
#[async_trait]
pub trait DefinitionProvider: Send + Sync {
    async fn definitions(
        &self,
        document: &Document,
        position: Position,
        cancel: &CancellationToken,
    ) -> Vec<Location>;
}

/// Produces a document outline
pub trait SymbolProvider: Send + Sync {
    fn symbols(&self, document: &Document) -> Vec<DocumentSymbol>;
}

/// Produces completion proposals for a document position
pub trait CompletionProvider: Send + Sync {
    fn completions(&self, document: &Document, position: Position) -> Vec<CompletionItem>;
}

/// Host slots for language feature providers, scoped to a project root
///
/// Each registration returns a [`Subscription`] that removes the provider
/// again; the lifecycle manager stores these on the owning project.
pub trait ProviderRegistry: Send + Sync {
    fn register_definition_provider(
        &self,
        root: &Path,
        provider: Arc<dyn DefinitionProvider>,
    ) -> Subscription;

    fn register_symbol_provider(
        &self,
        root: &Path,
        provider: Arc<dyn SymbolProvider>,
    ) -> Subscription;

    fn register_completion_provider(
        &self,
        root: &Path,
        provider: Arc<dyn CompletionProvider>,
    ) -> Subscription;
}
