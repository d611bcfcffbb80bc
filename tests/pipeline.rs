//! End-to-end tests for the command mailbox pipeline
//!
//! Drives the timer worker through its mailbox the way the ticker and the
//! broker client do, and observes the outbound event channel the way a
//! display collaborator would.

use std::{path::PathBuf, sync::Arc, time::Duration};

use tokio::sync::broadcast;
use tokio::time::timeout;

use mqtt_countdown::{
    events::{Command, UiEvent},
    settings::Settings,
    state::AppState,
    tasks::{ticker_task, timer_worker_task},
};

fn spawn_pipeline() -> (Arc<AppState>, broadcast::Receiver<UiEvent>) {
    let (state, commands, _reconnects) =
        AppState::new(Settings::default(), PathBuf::from("settings.json"));
    let state = Arc::new(state);
    let events = state.subscribe_events();

    let worker_state = Arc::clone(&state);
    tokio::spawn(async move {
        timer_worker_task(worker_state, commands, 3).await;
    });
    (state, events)
}

async fn next_event(events: &mut broadcast::Receiver<UiEvent>) -> UiEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("event channel closed")
}

async fn expect_remaining(events: &mut broadcast::Receiver<UiEvent>, expected: u64) {
    match next_event(events).await {
        UiEvent::RemainingChanged(seconds) => assert_eq!(seconds, expected),
        other => panic!("expected RemainingChanged({}), got {:?}", expected, other),
    }
}

#[tokio::test]
async fn external_set_flows_through_to_observers() {
    let (state, mut events) = spawn_pipeline();

    state
        .send_command(Command::Message("00:05:00".to_string()))
        .await;
    expect_remaining(&mut events, 300).await;

    let snapshot = state.timer_state();
    assert_eq!(snapshot.remaining_seconds, 300);
    assert!(!snapshot.alarm_active);
}

#[tokio::test]
async fn ticks_and_messages_apply_in_arrival_order() {
    let (state, mut events) = spawn_pipeline();

    state.send_command(Command::Set(10)).await;
    state.send_command(Command::Tick).await;
    state
        .send_command(Command::Message("00:00:30".to_string()))
        .await;
    state.send_command(Command::Tick).await;

    expect_remaining(&mut events, 10).await;
    expect_remaining(&mut events, 9).await;
    expect_remaining(&mut events, 30).await;
    expect_remaining(&mut events, 29).await;
}

#[tokio::test]
async fn countdown_reaches_zero_and_alarms_exactly_once() {
    let (state, mut events) = spawn_pipeline();

    state.send_command(Command::Set(2)).await;
    state.send_command(Command::Tick).await;
    state.send_command(Command::Tick).await;
    // Extra ticks at zero must produce nothing
    state.send_command(Command::Tick).await;
    state.send_command(Command::Press).await;

    expect_remaining(&mut events, 2).await;
    expect_remaining(&mut events, 1).await;
    expect_remaining(&mut events, 0).await;
    assert!(matches!(next_event(&mut events).await, UiEvent::AlarmStarted));
    // The press is the very next event: the idle ticks emitted nothing
    assert!(matches!(next_event(&mut events).await, UiEvent::AlarmStopped));

    let snapshot = state.timer_state();
    assert_eq!(snapshot.remaining_seconds, 0);
    assert!(!snapshot.alarm_active);
}

#[tokio::test]
async fn repeated_readings_force_zero_and_a_fresh_value_recovers() {
    let (state, mut events) = spawn_pipeline();

    for _ in 0..3 {
        state
            .send_command(Command::Message("00:05:00".to_string()))
            .await;
    }
    expect_remaining(&mut events, 300).await;
    expect_remaining(&mut events, 300).await;
    // Third identical reading is suppressed down to zero and alarms
    expect_remaining(&mut events, 0).await;
    assert!(matches!(next_event(&mut events).await, UiEvent::AlarmStarted));

    // A fourth identical reading still lands on the all-equal window
    state
        .send_command(Command::Message("00:05:00".to_string()))
        .await;
    expect_remaining(&mut events, 0).await;

    // A different reading breaks the run and silences the alarm
    state
        .send_command(Command::Message("00:04:00".to_string()))
        .await;
    expect_remaining(&mut events, 240).await;
    assert!(matches!(next_event(&mut events).await, UiEvent::AlarmStopped));
}

#[tokio::test]
async fn malformed_payloads_are_discarded_silently() {
    let (state, mut events) = spawn_pipeline();

    state
        .send_command(Command::Message("not a clock".to_string()))
        .await;
    state
        .send_command(Command::Message("99:99".to_string()))
        .await;
    state.send_command(Command::Set(7)).await;

    // The first observable event is the explicit set; the garbage produced
    // no emission and no state change
    expect_remaining(&mut events, 7).await;
    assert_eq!(state.timer_state().remaining_seconds, 7);
}

#[tokio::test(start_paused = true)]
async fn ticker_drives_the_countdown_in_whole_seconds() {
    let (state, mut events) = spawn_pipeline();

    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        ticker_task(ticker_state).await;
    });

    state.send_command(Command::Set(2)).await;
    expect_remaining(&mut events, 2).await;

    // The clock is paused; each advance releases exactly one interval tick
    tokio::time::advance(Duration::from_secs(1)).await;
    expect_remaining(&mut events, 1).await;

    tokio::time::advance(Duration::from_secs(1)).await;
    expect_remaining(&mut events, 0).await;
    assert!(matches!(next_event(&mut events).await, UiEvent::AlarmStarted));
}

#[tokio::test]
async fn negative_set_clamps_and_alarms_from_positive() {
    let (state, mut events) = spawn_pipeline();

    state.send_command(Command::Set(60)).await;
    state.send_command(Command::Set(-5)).await;

    expect_remaining(&mut events, 60).await;
    expect_remaining(&mut events, 0).await;
    assert!(matches!(next_event(&mut events).await, UiEvent::AlarmStarted));
}
