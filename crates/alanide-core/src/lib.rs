//! Shared data model and host boundary for the Alan IDE integration
//!
//! This crate defines the position/range/diagnostic/symbol types that every
//! other `alanide-*` crate speaks, the traits that abstract the hosting IDE
//! (output channels, diagnostics collections, pickers, provider slots), and
//! the extension settings.
//!
//! Nothing in here touches the filesystem or spawns processes; those concerns
//! live in `alanide-tasks`, `alanide-projects` and `alanide-lsp`.

pub mod host;
pub mod logging;
pub mod settings;
pub mod types;

pub use host::{
    CompletionProvider, DefinitionProvider, DiagnosticsSink, OutputSink, ProviderRegistry,
    Subscription, SymbolProvider, UserInterface, WorkspaceSymbolSource,
};
pub use settings::{Settings, SettingsError};
pub use types::{
    CompletionItem, Diagnostic, Document, DocumentSymbol, FileDiagnostics, Location, Position,
    Range, Severity, SymbolKind,
};

// Cancellation is passed explicitly through every suspending operation.
pub use tokio_util::sync::CancellationToken;
