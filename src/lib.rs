//! mqtt-countdown - An MQTT-driven countdown timer core
//!
//! This library provides the countdown engine, the message ingest filter,
//! and the connection/settings glue around them. Rendering, window chrome,
//! and audio are collaborators that subscribe to the outbound event channel.

pub mod broker;
pub mod config;
pub mod engine;
pub mod events;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{CountdownEngine, IngestFilter};
pub use events::{Command, Notice, UiEvent};
pub use settings::Settings;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
