//! Single-writer timer worker draining the command mailbox

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::{CountdownEngine, IngestFilter};
use crate::events::{Command, UiEvent};
use crate::state::AppState;

/// Background task that owns the countdown engine and the ingest filter.
///
/// Every mutation of the timer state flows through this task's mailbox, so
/// local ticks and external sets are applied strictly in arrival order and
/// can never interleave.
pub async fn timer_worker_task(
    state: Arc<AppState>,
    mut commands: mpsc::Receiver<Command>,
    repeat_window: usize,
) {
    info!(
        "Starting timer worker (repeat window {})",
        repeat_window
    );

    let mut engine = CountdownEngine::new();
    let mut filter = IngestFilter::new(repeat_window);

    while let Some(command) = commands.recv().await {
        let events = match command {
            Command::Tick => engine.tick(),
            Command::Set(seconds) => engine.set_remaining(seconds),
            Command::Press => engine.acknowledge(),
            Command::Message(payload) => match filter.ingest(&payload) {
                Ok(seconds) => engine.set_remaining(seconds as i64),
                Err(e) => {
                    // Malformed payloads are discarded without touching the timer
                    debug!("{}", e);
                    Vec::new()
                }
            },
        };

        if events.is_empty() {
            continue;
        }
        state.publish_timer_state(engine.state());
        for event in events {
            state.publish_event(UiEvent::from(event));
        }
    }

    info!("Command mailbox closed, timer worker stopping");
}
