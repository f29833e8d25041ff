//! Game settings and preferences
//!
//! Loaded from a JSON file; every field is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{ASSET_DIR, POP_SOUND};
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Feedback ===
    /// Play the pop sound
    pub sound_enabled: bool,
    /// Haptic clicks on pop
    pub haptics_enabled: bool,
    /// Particle and ring explosions
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Bundled sound resource name
    pub sound_resource: String,
    /// Directory bundled resources are loaded from
    pub asset_dir: PathBuf,

    // === Accessibility ===
    /// Reduced motion (no idle breathing, no press scale-up)
    pub reduced_motion: bool,

    // === Simulation ===
    /// Fixed RNG seed (random per launch when absent)
    pub seed: Option<u64>,
    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            haptics_enabled: true,
            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            sound_resource: POP_SOUND.to_string(),
            asset_dir: PathBuf::from(ASSET_DIR),

            reduced_motion: false,

            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(settings.sanitized())
    }

    /// Load settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json, path)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Effective volume handed to the audio backend
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective press scale-up (respects reduced_motion)
    pub fn effective_press_scale(&self) -> f32 {
        if self.reduced_motion {
            1.0
        } else {
            self.tuning.press_scale
        }
    }

    /// Idle breathing animation (respects reduced_motion)
    pub fn breathing_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Repair values that would stall or panic the game
    pub(crate) fn sanitized(mut self) -> Self {
        self.tuning = self.tuning.sanitized();
        self
    }
}
