//! Timer state snapshot shared with observers

use serde::{Deserialize, Serialize};

/// Snapshot of the countdown state, published on the watch channel.
///
/// `alarm_active` only becomes true when the remaining time reaches zero
/// from a positive value; any positive set or a user acknowledgement
/// clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub alarm_active: bool,
}

impl TimerState {
    /// Zeroed state: no time remaining, alarm silent.
    pub fn new() -> Self {
        Self {
            remaining_seconds: 0,
            alarm_active: false,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
