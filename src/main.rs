//! mqtt-countdown - An MQTT-driven countdown timer core
//!
//! Wires the timer worker, the local ticker, and the broker connection
//! supervisor together, and logs outbound events in place of a display.

use std::sync::Arc;

use tracing::{info, warn};

use mqtt_countdown::{
    config::Config,
    engine::format_hms,
    events::UiEvent,
    settings::Settings,
    state::AppState,
    tasks::{connection_supervisor_task, ticker_task, timer_worker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("mqtt_countdown={},rumqttc=warn", config.log_level()))
        .init();

    info!("Starting mqtt-countdown");

    let settings = Settings::load(&config.settings)?;
    let appearance = settings.appearance();
    info!(
        "Settings loaded from {} (font {}pt, color {})",
        config.settings.display(),
        appearance.font_size,
        appearance.font_color
    );

    let (state, commands, reconnects) = AppState::new(settings, config.settings.clone());
    let state = Arc::new(state);

    // Single writer of the timer state: every mutation drains through here
    let worker_state = Arc::clone(&state);
    let repeat_window = config.repeat_window;
    tokio::spawn(async move {
        timer_worker_task(worker_state, commands, repeat_window).await;
    });

    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        ticker_task(ticker_state).await;
    });

    let supervisor_state = Arc::clone(&state);
    tokio::spawn(async move {
        connection_supervisor_task(supervisor_state, reconnects).await;
    });

    // Stand-in for the display collaborator: render outbound events to the log
    let display_state = Arc::clone(&state);
    tokio::spawn(async move {
        display_events(display_state).await;
    });

    shutdown_signal().await;
    info!("Shutting down after {}", state.uptime());
    Ok(())
}

/// Log outbound events the way a display collaborator would render them.
async fn display_events(state: Arc<AppState>) {
    use tokio::sync::broadcast::error::RecvError;

    let mut events = state.subscribe_events();
    loop {
        match events.recv().await {
            Ok(UiEvent::RemainingChanged(seconds)) => info!("Remaining {}", format_hms(seconds)),
            Ok(UiEvent::AlarmStarted) => info!("Alarm started"),
            Ok(UiEvent::AlarmStopped) => info!("Alarm stopped"),
            Ok(UiEvent::Notice(notice)) => info!("{}", notice),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Display fell behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
