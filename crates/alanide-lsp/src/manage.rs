//! Interactive server management
//!
//! Start/Stop/Restart per client plus collection-wide variants, and the
//! picker that toggles whichever client the user accepts.

use std::sync::Arc;

use tracing::warn;

use alanide_core::{Settings, UserInterface};

use crate::client::{status_string, ClientState, LanguageClient};
use crate::error::Result;

/// A management instruction for one or all clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Stop,
    Restart,
}

/// Apply one operation to one client
///
/// Start is skipped when already running, stop when already stopped.
/// Restart stops first (when needed) and then starts, awaited in sequence.
pub async fn perform(
    client: &LanguageClient,
    settings: &Settings,
    operation: Operation,
) -> Result<()> {
    match operation {
        Operation::Start => {
            if client.state() != ClientState::Running {
                client.start(settings).await?;
            }
        }
        Operation::Stop => {
            if client.state() != ClientState::Stopped {
                client.stop().await;
            }
        }
        Operation::Restart => {
            if client.state() != ClientState::Stopped {
                client.stop().await;
            }
            client.start(settings).await?;
        }
    }
    Ok(())
}

/// Apply one operation to every client
///
/// Start and stop run in parallel; restart is awaited client by client so
/// servers come back one at a time.
pub async fn perform_all(
    clients: &[Arc<LanguageClient>],
    settings: &Settings,
    operation: Operation,
) {
    match operation {
        Operation::Restart => {
            for client in clients {
                report(client, perform(client, settings, operation).await);
            }
        }
        Operation::Start | Operation::Stop => {
            let results = futures::future::join_all(
                clients
                    .iter()
                    .map(|client| perform(client, settings, operation)),
            )
            .await;
            for (client, result) in clients.iter().zip(results) {
                report(client, result);
            }
        }
    }
}

/// Flip one client: starting or running stops it, stopped starts it
pub async fn toggle(client: &LanguageClient, settings: &Settings) -> Result<()> {
    match client.state() {
        ClientState::Starting | ClientState::Running => {
            client.stop().await;
            Ok(())
        }
        ClientState::Stopped => client.start(settings).await,
    }
}

fn report(client: &LanguageClient, result: Result<()>) {
    if let Err(e) = result {
        warn!(client = %client.id(), error = %e, "Management operation failed");
    }
}

/// Present the client list and toggle the accepted item
pub async fn manage(
    clients: &[Arc<LanguageClient>],
    settings: &Settings,
    ui: &dyn UserInterface,
) {
    let labels: Vec<String> = clients
        .iter()
        .map(|client| format!("{} ({})", client.id(), status_string(client.state())))
        .collect();
    let placeholder = "Language Server (press 'Enter' to toggle the state for the selected item)";
    if let Some(index) = ui.pick(&labels, placeholder).await {
        if let Some(client) = clients.get(index) {
            report(client, toggle(client, settings).await);
        }
    }
}
