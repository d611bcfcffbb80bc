//! Commands into and events out of the timer core
//!
//! Collaborators (broker client, UI) talk to the timer worker through
//! [`Command`] values and observe it through [`UiEvent`] broadcasts.

use std::fmt;

use crate::engine::EngineEvent;

/// A mutation request for the countdown engine, processed serially by the
/// timer worker.
#[derive(Debug, Clone)]
pub enum Command {
    /// One-second local tick.
    Tick,
    /// Raw payload received on the subscribed topic.
    Message(String),
    /// Absolute override of the remaining time; negative values clamp to zero.
    Set(i64),
    /// User pressed the display; silences an active alarm.
    Press,
}

/// Outbound event for UI observers.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Remaining time changed; carries the new value in seconds.
    RemainingChanged(u64),
    /// The alarm started ringing.
    AlarmStarted,
    /// The alarm stopped ringing.
    AlarmStopped,
    /// A user-visible connection notification.
    Notice(Notice),
}

impl From<EngineEvent> for UiEvent {
    fn from(event: EngineEvent) -> Self {
        match event {
            EngineEvent::RemainingChanged(seconds) => UiEvent::RemainingChanged(seconds),
            EngineEvent::AlarmStarted => UiEvent::AlarmStarted,
            EngineEvent::AlarmStopped => UiEvent::AlarmStopped,
        }
    }
}

/// User-visible, non-fatal connection notification.
///
/// None of these affect the timer state; the worst outcome of any
/// connection failure is that the timer stays at its last known value.
#[derive(Debug, Clone)]
pub enum Notice {
    /// Connected to the broker and subscribed to the topic.
    Connected { topic: String },
    /// Broker unreachable or the connection was rejected.
    ConnectFailed(String),
    /// Subscription request failed after a successful connect.
    SubscribeFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Connected { topic } => write!(f, "Connected and subscribed to {}", topic),
            Notice::ConnectFailed(reason) => write!(f, "Connection failed: {}", reason),
            Notice::SubscribeFailed(reason) => write!(f, "Subscribe failed: {}", reason),
        }
    }
}
