//! Broker connection lifecycle supervisor

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::broker::broker_client_task;
use crate::state::AppState;

/// Background task owning the broker client lifecycle.
///
/// Starts a client when complete connection settings exist and cycles it
/// whenever new settings are applied. Incomplete settings skip the
/// connection attempt entirely; they are not an error.
pub async fn connection_supervisor_task(state: Arc<AppState>, mut reconnects: mpsc::Receiver<()>) {
    info!("Starting connection supervisor");

    let mut client = spawn_client(&state);

    while reconnects.recv().await.is_some() {
        info!("Settings changed, cycling broker connection");
        if let Some(handle) = client.take() {
            handle.abort();
        }
        client = spawn_client(&state);
    }

    if let Some(handle) = client.take() {
        handle.abort();
    }
    info!("Connection supervisor stopping");
}

fn spawn_client(state: &Arc<AppState>) -> Option<JoinHandle<()>> {
    let settings = match state.settings() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Cannot read settings, skipping connection: {}", e);
            return None;
        }
    };

    match settings.connection() {
        Some(connection) => {
            let task_state = Arc::clone(state);
            Some(tokio::spawn(async move {
                broker_client_task(task_state, connection).await;
            }))
        }
        None => {
            info!("Broker URL or topic not configured, skipping connection");
            None
        }
    }
}
