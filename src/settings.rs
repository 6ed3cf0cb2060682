//! Runtime settings
//!
//! Read from a JSON file; any missing field takes its default, and an
//! unreadable file falls back to defaults entirely.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::SAMPLE_RATE;

/// Runner settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Output sample rate handed to the synthesizer (Hz)
    pub sample_rate: u32,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Silence all effects
    pub muted: bool,
    /// Seed for the noise generator
    pub noise_seed: u64,

    // === Display ===
    /// Integer upscale for the presenting window. The core never reads it;
    /// it is stored here so a host shares one settings file.
    pub pixel_scale: u32,

    // === Headless runner ===
    /// Ticks to simulate before exiting
    pub demo_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            master_volume: 0.8,
            muted: false,
            noise_seed: 0x5eed,
            pixel_scale: 4,
            demo_ticks: 60 * 20,
        }
    }
}

impl Settings {
    /// Effective output gain
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Parse settings JSON, warning on failure
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(json) {
            Ok(settings) => Some(settings.sanitized()),
            Err(e) => {
                log::warn!("Invalid settings JSON: {e}");
                None
            }
        }
    }

    /// Load settings from `path`, or defaults if it can't be read
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
            }
            Err(e) => log::warn!("Could not read {}: {e}", path.display()),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Write settings to `path` as pretty JSON
    pub fn save(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not serialize settings: {e}");
                return;
            }
        };
        match std::fs::write(path, json) {
            Ok(()) => log::info!("Settings saved to {}", path.display()),
            Err(e) => log::warn!("Could not write {}: {e}", path.display()),
        }
    }

    /// Replace out-of-range values with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.sample_rate == 0 {
            self.sample_rate = defaults.sample_rate;
        }
        if self.pixel_scale == 0 {
            self.pixel_scale = defaults.pixel_scale;
        }
        if !self.master_volume.is_finite() {
            self.master_volume = defaults.master_volume;
        }
        self
    }
}
