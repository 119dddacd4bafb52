//! Provider implementations over the fallback heuristics
//!
//! These adapt the parser and search functions to the host's provider
//! traits so the lifecycle manager can register them per project.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use alanide_core::{
    CompletionItem, CompletionProvider, DefinitionProvider, Document, DocumentSymbol, Location,
    Position, SymbolProvider, WorkspaceSymbolSource,
};

/// Serves definitions via the fuzzy workspace search
pub struct FallbackDefinitionProvider {
    workspace_root: PathBuf,
    symbols: Arc<dyn WorkspaceSymbolSource>,
}

impl FallbackDefinitionProvider {
    pub fn new(workspace_root: impl Into<PathBuf>, symbols: Arc<dyn WorkspaceSymbolSource>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            symbols,
        }
    }
}

#[async_trait]
impl DefinitionProvider for FallbackDefinitionProvider {
    async fn definitions(
        &self,
        document: &Document,
        position: Position,
        cancel: &CancellationToken,
    ) -> Vec<Location> {
        crate::search::fuzzy_definition_search(
            document,
            position,
            &self.workspace_root,
            self.symbols.as_ref(),
            cancel,
        )
        .await
    }
}

/// Serves the document outline via the indentation parser
pub struct FallbackSymbolProvider;

impl SymbolProvider for FallbackSymbolProvider {
    fn symbols(&self, document: &Document) -> Vec<DocumentSymbol> {
        crate::symbols::parse(&document.text)
    }
}

/// Serves completions from the live outline
pub struct FallbackCompletionProvider;

impl CompletionProvider for FallbackCompletionProvider {
    fn completions(&self, document: &Document, position: Position) -> Vec<CompletionItem> {
        crate::completion::completions(document, position)
    }
}
