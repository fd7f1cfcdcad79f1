//! Game settings with persistence
//!
//! Settings are read from `~/.config/redpanda/settings.toml`

use std::fs;
use std::path::PathBuf;

use redpanda_core::TimeConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Window title, published as `game.title`
    pub title: String,
    pub window: WindowSettings,
    /// Target ticks per second (0 = unpaced)
    pub frame_rate: u32,
    /// Stop after this many ticks
    pub max_frames: Option<u64>,
    pub time: TimeConfig,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            title: "Redpanda".to_string(),
            window: WindowSettings::default(),
            frame_rate: 60,
            max_frames: Some(600),
            time: TimeConfig::default(),
        }
    }
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("redpanda"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!("Failed to parse settings: {}, using defaults", e);
                Self::default()
            }),
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Window settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}
