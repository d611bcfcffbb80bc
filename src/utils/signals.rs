//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for a shutdown signal (SIGINT, SIGTERM, or SIGQUIT).
///
/// Shutdown abandons any pending alarm; the core has no drain semantics.
pub async fn shutdown_signal() {
    let mut signals = Signals::new([
        signal_hook::consts::SIGINT,
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGQUIT,
    ])
    .expect("Failed to register signal handlers");

    if let Some(signal) = signals.next().await {
        info!("Received shutdown signal {}", signal);
    }
}
