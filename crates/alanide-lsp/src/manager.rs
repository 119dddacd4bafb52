//! The lifecycle manager
//!
//! Owns the project registry and at most one language client per language
//! root. Every project is in exactly one of three regimes: server-backed,
//! fallback providers, or nothing (when the go-to-definition integration is
//! disabled). A server that fails to start or exits on its own drops the
//! project back into the fallback regime.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use alanide_analysis::{
    FallbackCompletionProvider, FallbackDefinitionProvider, FallbackSymbolProvider,
};
use alanide_core::{ProviderRegistry, Settings, UserInterface, WorkspaceSymbolSource};
use alanide_projects::{discover, ProjectKind, ProjectRegistry};

use crate::client::{ClientStopped, LanguageClient};
use crate::manage::{self, Operation};

pub struct LifecycleManager {
    settings: Settings,
    host: Arc<dyn ProviderRegistry>,
    symbols: Arc<dyn WorkspaceSymbolSource>,
    projects: ProjectRegistry,
    clients: BTreeMap<PathBuf, Arc<LanguageClient>>,
    events_tx: mpsc::UnboundedSender<ClientStopped>,
    events_rx: mpsc::UnboundedReceiver<ClientStopped>,
}

impl LifecycleManager {
    pub fn new(
        settings: Settings,
        host: Arc<dyn ProviderRegistry>,
        symbols: Arc<dyn WorkspaceSymbolSource>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            settings,
            host,
            symbols,
            projects: ProjectRegistry::new(),
            clients: BTreeMap::new(),
            events_tx,
            events_rx,
        }
    }

    /// Discover projects under the workspace folders and bring up language
    /// support for every language root
    pub async fn activate(&mut self, folders: &[PathBuf]) {
        self.projects = discover(folders);
        let roots: Vec<PathBuf> = self
            .projects
            .of_kind(ProjectKind::LanguageRoot)
            .map(|p| p.root.clone())
            .collect();
        for root in roots {
            self.provide_language_support(&root).await;
        }
    }

    /// (Re)establish language support for one language root
    ///
    /// Disposes whatever the project currently holds, then tries the server;
    /// any start failure lands in the fallback providers.
    pub async fn provide_language_support(&mut self, root: &Path) {
        let workspace_folder = match self.projects.get_mut(ProjectKind::LanguageRoot, root) {
            Some(project) => {
                project.dispose_subscriptions();
                project.workspace_folder.clone()
            }
            None => return,
        };
        if let Some(previous) = self.clients.remove(root) {
            previous.stop().await;
        }

        let client = Arc::new(LanguageClient::new(
            root,
            &workspace_folder,
            self.events_tx.clone(),
        ));
        match client.start(&self.settings).await {
            Ok(()) => {
                self.clients.insert(root.to_path_buf(), client);
            }
            Err(e) => {
                debug!(
                    root = %root.display(),
                    error = %e,
                    "Language server unavailable, using fallback"
                );
                self.use_legacy_impl(root, &workspace_folder);
            }
        }
    }

    /// Register the fallback providers for one project root
    ///
    /// No-op unless the go-to-definition integration is enabled. The
    /// registrations are stored on the project so the next
    /// [`provide_language_support`](Self::provide_language_support) disposes
    /// them.
    fn use_legacy_impl(&mut self, root: &Path, workspace_folder: &Path) {
        if !self.settings.integrate_with_go_to_definition {
            return;
        }
        let definitions = Arc::new(FallbackDefinitionProvider::new(
            workspace_folder,
            self.symbols.clone(),
        ));
        let subscriptions = vec![
            self.host.register_definition_provider(root, definitions),
            self.host
                .register_symbol_provider(root, Arc::new(FallbackSymbolProvider)),
            self.host
                .register_completion_provider(root, Arc::new(FallbackCompletionProvider)),
        ];
        if let Some(project) = self.projects.get_mut(ProjectKind::LanguageRoot, root) {
            project.subscriptions.extend(subscriptions);
        }
        info!(root = %root.display(), "Registered fallback language support");
    }

    /// Wait for the next unexpected server exit
    pub async fn next_event(&mut self) -> Option<ClientStopped> {
        self.events_rx.recv().await
    }

    /// Deregister the exited client and re-enter the fallback regime
    pub async fn handle_stopped(&mut self, event: ClientStopped) {
        if self.clients.remove(&event.root).is_none() {
            return;
        }
        warn!(root = %event.root.display(), "Language server exited, switching to fallback");
        let workspace_folder = self
            .projects
            .get_mut(ProjectKind::LanguageRoot, &event.root)
            .map(|p| p.workspace_folder.clone());
        if let Some(workspace_folder) = workspace_folder {
            self.use_legacy_impl(&event.root, &workspace_folder);
        }
    }

    /// Drain and handle all pending exit events without blocking
    pub async fn process_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_stopped(event).await;
        }
    }

    /// Active client handles, in root order
    pub fn clients(&self) -> Vec<Arc<LanguageClient>> {
        self.clients.values().cloned().collect()
    }

    pub fn client(&self, root: &Path) -> Option<&Arc<LanguageClient>> {
        self.clients.get(root)
    }

    pub fn projects(&self) -> &ProjectRegistry {
        &self.projects
    }

    pub fn projects_mut(&mut self) -> &mut ProjectRegistry {
        &mut self.projects
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Drop every project under a closed workspace folder, stopping its
    /// servers and disposing its subscriptions
    pub async fn remove_workspace_folder(&mut self, folder: &Path) {
        let roots: Vec<PathBuf> = self
            .clients
            .keys()
            .filter(|root| root.starts_with(folder))
            .cloned()
            .collect();
        for root in roots {
            if let Some(client) = self.clients.remove(&root) {
                client.stop().await;
            }
        }
        self.projects.remove_workspace_folder(folder);
    }

    pub async fn start_all(&self) {
        manage::perform_all(&self.clients(), &self.settings, Operation::Start).await;
    }

    pub async fn stop_all(&self) {
        manage::perform_all(&self.clients(), &self.settings, Operation::Stop).await;
    }

    /// Restart every client, awaited one after the other
    pub async fn restart_all(&self) {
        manage::perform_all(&self.clients(), &self.settings, Operation::Restart).await;
    }

    /// Present the interactive management picker
    pub async fn manage(&self, ui: &dyn UserInterface) {
        manage::manage(&self.clients(), &self.settings, ui).await;
    }

    /// Stop every client in parallel; resolves once all have settled
    pub async fn deactivate(&mut self) {
        let clients: Vec<_> = self.clients.values().cloned().collect();
        futures::future::join_all(clients.iter().map(|client| client.stop())).await;
        self.clients.clear();
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("projects", &self.projects.len())
            .field("clients", &self.clients.len())
            .finish()
    }
}
