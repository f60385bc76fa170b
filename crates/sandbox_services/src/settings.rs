//! Settings management

use sandbox_core::config::GameConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("game.capacity {capacity} exceeds the limit of {max}")]
    CapacityOutOfRange { capacity: usize, max: usize },

    #[error("runtime.frame_dt must be a positive number of seconds, got {0}")]
    InvalidFrameDt(f32),
}

/// Everything the runtime reads at startup. Missing keys take defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameConfig,
    pub runtime: RuntimeSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Frames to simulate before exiting.
    pub frames: u32,
    /// Fixed timestep, seconds.
    pub frame_dt: f32,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            frames: 240,
            frame_dt: 1.0 / 60.0,
        }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the runtime cannot start with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.game.capacity > GameConfig::MAX_CAPACITY {
            return Err(SettingsError::CapacityOutOfRange {
                capacity: self.game.capacity,
                max: GameConfig::MAX_CAPACITY,
            });
        }
        let dt = self.runtime.frame_dt;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SettingsError::InvalidFrameDt(dt));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
