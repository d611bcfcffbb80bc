//! Main application state management

use std::{
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::warn;

use crate::engine::format_hms;
use crate::events::{Command, UiEvent};
use crate::settings::Settings;

use super::TimerState;

/// Most recent payload received from the broker.
#[derive(Debug, Clone)]
pub struct LastMessage {
    pub payload: String,
    pub received_at: DateTime<Utc>,
}

/// Shared handles into the timer core: settings, the command mailbox, and
/// the outbound event channels.
#[derive(Debug)]
pub struct AppState {
    /// Persisted settings and where they live on disk
    pub settings: Mutex<Settings>,
    pub settings_path: PathBuf,
    /// Single-writer mailbox feeding the timer worker
    command_tx: mpsc::Sender<Command>,
    /// Outbound events for UI observers
    ui_event_tx: broadcast::Sender<UiEvent>,
    /// Latest timer snapshot
    timer_update_tx: watch::Sender<TimerState>,
    timer_update_rx: watch::Receiver<TimerState>,
    /// Asks the connection supervisor to cycle the broker client
    reconnect_tx: mpsc::Sender<()>,
    /// Process metadata
    pub start_time: Instant,
    last_message: Mutex<Option<LastMessage>>,
}

impl AppState {
    /// Create the application state together with the receivers for the
    /// timer worker (commands) and the connection supervisor (reconnects).
    pub fn new(
        settings: Settings,
        settings_path: PathBuf,
    ) -> (Self, mpsc::Receiver<Command>, mpsc::Receiver<()>) {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (reconnect_tx, reconnect_rx) = mpsc::channel(4);
        let (ui_event_tx, _) = broadcast::channel(100);
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerState::new());

        let state = Self {
            settings: Mutex::new(settings),
            settings_path,
            command_tx,
            ui_event_tx,
            timer_update_tx,
            timer_update_rx,
            reconnect_tx,
            start_time: Instant::now(),
            last_message: Mutex::new(None),
        };
        (state, command_rx, reconnect_rx)
    }

    /// Queue a command for the timer worker.
    ///
    /// Returns false once the worker is gone; callers driving a loop use
    /// that to stop.
    pub async fn send_command(&self, command: Command) -> bool {
        match self.command_tx.send(command).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Timer worker is gone, dropping command: {}", e);
                false
            }
        }
    }

    /// User pressed the display; silences an active alarm.
    pub async fn press(&self) {
        self.send_command(Command::Press).await;
    }

    /// Absolute override of the remaining time.
    pub async fn set_remaining(&self, seconds: i64) {
        self.send_command(Command::Set(seconds)).await;
    }

    /// Subscribe to outbound UI events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<UiEvent> {
        self.ui_event_tx.subscribe()
    }

    /// Broadcast an outbound event. Having no subscribers is fine.
    pub fn publish_event(&self, event: UiEvent) {
        let _ = self.ui_event_tx.send(event);
    }

    /// Publish the latest timer snapshot.
    pub fn publish_timer_state(&self, state: TimerState) {
        if let Err(e) = self.timer_update_tx.send(state) {
            warn!("Failed to publish timer snapshot: {}", e);
        }
    }

    /// Latest published timer snapshot.
    pub fn timer_state(&self) -> TimerState {
        self.timer_update_rx.borrow().clone()
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Result<Settings> {
        self.settings
            .lock()
            .map(|settings| settings.clone())
            .map_err(|e| anyhow!("Failed to lock settings: {}", e))
    }

    /// Persist new settings and cycle the broker connection.
    pub async fn apply_settings(&self, new_settings: Settings) -> Result<()> {
        new_settings.save(&self.settings_path)?;
        {
            let mut settings = self
                .settings
                .lock()
                .map_err(|e| anyhow!("Failed to lock settings: {}", e))?;
            *settings = new_settings;
        }

        if let Err(e) = self.reconnect_tx.send(()).await {
            warn!("Connection supervisor is gone: {}", e);
        }
        Ok(())
    }

    /// Persist the display position (written on drag release and recenter).
    pub fn save_position(&self, x: i32, y: i32) -> Result<()> {
        let snapshot = {
            let mut settings = self
                .settings
                .lock()
                .map_err(|e| anyhow!("Failed to lock settings: {}", e))?;
            settings.pos_x = Some(x);
            settings.pos_y = Some(y);
            settings.clone()
        };
        snapshot.save(&self.settings_path)
    }

    /// Record the most recent payload received from the broker.
    pub fn record_message(&self, payload: &str) {
        if let Ok(mut last_message) = self.last_message.lock() {
            *last_message = Some(LastMessage {
                payload: payload.to_string(),
                received_at: Utc::now(),
            });
        }
    }

    /// Most recent payload received from the broker, if any.
    pub fn last_message(&self) -> Option<LastMessage> {
        self.last_message.lock().ok().and_then(|m| m.clone())
    }

    /// Process uptime as a clock display string.
    pub fn uptime(&self) -> String {
        format_hms(self.start_time.elapsed().as_secs())
    }
}
