//! Countdown engine owning the remaining-time and alarm state

use crate::state::TimerState;

/// State transition produced by an engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Remaining time changed, or was re-asserted by an external set.
    RemainingChanged(u64),
    /// Alarm transitioned from silent to ringing.
    AlarmStarted,
    /// Alarm transitioned from ringing to silent.
    AlarmStopped,
}

/// Single source of truth for remaining time and alarm activation.
///
/// The engine is purely synchronous; every operation returns the events it
/// produced, in order. The timer worker is the only caller, so local ticks
/// and external sets never interleave.
#[derive(Debug)]
pub struct CountdownEngine {
    state: TimerState,
}

impl CountdownEngine {
    /// Create an engine at zero with the alarm silent.
    pub fn new() -> Self {
        Self {
            state: TimerState::new(),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> TimerState {
        self.state.clone()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds
    }

    pub fn alarm_active(&self) -> bool {
        self.state.alarm_active
    }

    /// One-second local decrement. No-op while already at zero.
    ///
    /// The alarm starts when the decrement lands exactly on zero.
    pub fn tick(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.state.remaining_seconds > 0 {
            self.state.remaining_seconds -= 1;
            events.push(EngineEvent::RemainingChanged(self.state.remaining_seconds));
            if self.state.remaining_seconds == 0 {
                self.start_alarm(&mut events);
            }
        }
        events
    }

    /// Absolute external override. Negative input clamps to zero.
    ///
    /// Setting zero from a positive value (re)starts the alarm even if it
    /// was previously stopped; setting any positive value silences an
    /// active alarm.
    pub fn set_remaining(&mut self, seconds: i64) -> Vec<EngineEvent> {
        let value = u64::try_from(seconds).unwrap_or(0);
        let prev = self.state.remaining_seconds;
        self.state.remaining_seconds = value;
        let mut events = vec![EngineEvent::RemainingChanged(value)];
        if value == 0 && prev != 0 {
            self.start_alarm(&mut events);
        } else if value > 0 && self.state.alarm_active {
            self.stop_alarm(&mut events);
        }
        events
    }

    /// User interaction: silences an active alarm, leaves the value alone.
    pub fn acknowledge(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.state.alarm_active {
            self.stop_alarm(&mut events);
        }
        events
    }

    fn start_alarm(&mut self, events: &mut Vec<EngineEvent>) {
        if !self.state.alarm_active {
            self.state.alarm_active = true;
            events.push(EngineEvent::AlarmStarted);
        }
    }

    fn stop_alarm(&mut self, events: &mut Vec<EngineEvent>) {
        if self.state.alarm_active {
            self.state.alarm_active = false;
            events.push(EngineEvent::AlarmStopped);
        }
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Format seconds as a zero-padded `HH:MM:SS` display string.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
