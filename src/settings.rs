//! Persisted key-value settings: broker connection, appearance, position

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::broker::BrokerAddress;

/// Default label font size in points.
pub const DEFAULT_FONT_SIZE: u32 = 40;
/// Default label color.
pub const DEFAULT_FONT_COLOR: &str = "#FFFFFF";

/// The persisted settings surface, stored as a JSON file.
///
/// Every key is optional on disk; missing keys take their defaults, so a
/// partial or empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Free-form broker URL: `mqtt://host:port`, `tcp://host:port`,
    /// `host:port`, or a bare `host`.
    #[serde(default)]
    pub broker_url: String,
    #[serde(default)]
    pub mqtt_topic: String,
    #[serde(default)]
    pub mqtt_user: String,
    #[serde(default)]
    pub mqtt_password: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_font_color")]
    pub font_color: String,
    /// Last on-screen position, written on drag release and on recenter.
    #[serde(default)]
    pub pos_x: Option<i32>,
    #[serde(default)]
    pub pos_y: Option<i32>,
}

/// Connection parameters derived from the persisted settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub topic: String,
    pub username: String,
    pub password: String,
}

/// Pass-through appearance values for the display collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppearanceSettings {
    pub font_size: u32,
    pub font_color: String,
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("unable to read settings file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    /// Write settings to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, format!("{text}\n"))
            .with_context(|| format!("unable to write settings file {}", path.display()))?;
        Ok(())
    }

    /// Connection parameters, or `None` while the broker URL or topic is
    /// unset. Incomplete settings skip the connection attempt entirely.
    pub fn connection(&self) -> Option<ConnectionSettings> {
        if self.broker_url.trim().is_empty() || self.mqtt_topic.trim().is_empty() {
            return None;
        }
        let address = BrokerAddress::parse(&self.broker_url);
        Some(ConnectionSettings {
            host: address.host,
            port: address.port,
            topic: self.mqtt_topic.trim().to_string(),
            username: self.mqtt_user.clone(),
            password: self.mqtt_password.clone(),
        })
    }

    /// Appearance values with fallbacks applied.
    pub fn appearance(&self) -> AppearanceSettings {
        let font_color = if self.font_color.trim().is_empty() {
            DEFAULT_FONT_COLOR.to_string()
        } else {
            self.font_color.clone()
        };
        AppearanceSettings {
            font_size: self.font_size,
            font_color,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            broker_url: String::new(),
            mqtt_topic: String::new(),
            mqtt_user: String::new(),
            mqtt_password: String::new(),
            font_size: default_font_size(),
            font_color: default_font_color(),
            pos_x: None,
            pos_y: None,
        }
    }
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_font_color() -> String {
    DEFAULT_FONT_COLOR.to_string()
}
