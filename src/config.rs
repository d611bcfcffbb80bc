//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::engine::DEFAULT_REPEAT_WINDOW;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "mqtt-countdown")]
#[command(about = "An MQTT-driven countdown timer with a local tick-down and alarm events")]
#[command(version)]
pub struct Config {
    /// Path of the persisted settings file
    #[arg(short, long, default_value = "settings.json")]
    pub settings: PathBuf,

    /// Consecutive identical readings treated as a stuck publisher
    #[arg(long, default_value_t = DEFAULT_REPEAT_WINDOW)]
    pub repeat_window: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
