use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::ReplayError;
use crate::style::scheme_by_name;

/// Persistent player settings.
///
/// The image prefixes are carried for the navigation UI, which joins them
/// with the dataset's `stimulus_images` entries; the core never reads
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Redraw rate of the playback loop, frames per second
    pub target_fps: u32,
    /// Speed multiplier applied when playback starts
    pub default_speed: f64,
    /// Palette name, resolved against the scheme registry
    pub color_scheme: String,
    /// Path prefix for full-size stimulus images
    pub stimulus_prefix: String,
    /// Path prefix for stimulus thumbnails
    pub thumb_prefix: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            default_speed: 1.0,
            color_scheme: "classic".to_string(),
            stimulus_prefix: "stimuli/".to_string(),
            thumb_prefix: "thumbs/".to_string(),
        }
    }
}

impl PlayerConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scanplay").join("config.json"))
    }

    /// Load the persisted configuration, falling back to defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(contents) = fs::read_to_string(&path) {
                    if let Ok(config) = serde_json::from_str(&contents) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    /// Persist the configuration, best effort
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = fs::write(&path, json);
            }
        }
    }

    /// Check every recognized option before the player is built
    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.target_fps == 0 {
            return Err(ReplayError::InvalidConfig(
                "target_fps must be at least 1".to_string(),
            ));
        }
        if !(self.default_speed.is_finite() && self.default_speed > 0.0) {
            return Err(ReplayError::InvalidSpeed(self.default_speed));
        }
        if scheme_by_name(&self.color_scheme).is_none() {
            return Err(ReplayError::InvalidConfig(format!(
                "unknown color scheme '{}'",
                self.color_scheme
            )));
        }
        Ok(())
    }
}
