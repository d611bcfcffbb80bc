//! One-second local tick task

use std::{sync::Arc, time::Duration};

use tokio::time::interval;
use tracing::info;

use crate::events::Command;
use crate::state::AppState;

/// Background task that feeds one `Tick` per elapsed second into the
/// command mailbox.
///
/// The worker reads the current remaining value on every tick, so external
/// sets arriving between ticks are never overwritten by a stale decrement.
pub async fn ticker_task(state: Arc<AppState>) {
    info!("Starting ticker task");

    let mut interval = interval(Duration::from_secs(1));
    // A tokio interval fires immediately; swallow that first tick so the
    // countdown only decrements after a full second has passed
    interval.tick().await;

    loop {
        interval.tick().await;
        if !state.send_command(Command::Tick).await {
            break;
        }
    }

    info!("Ticker task stopping");
}
