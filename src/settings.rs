//! Game settings and preferences
//!
//! Persisted as a JSON file next to the save records, separate from them.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::PersistenceError;

/// Broad phase used by the collision pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollisionStrategy {
    /// Test every live gnome
    #[default]
    BruteForce,
    /// Bucket gnomes into square cells and test only the cells around the car
    Grid { cell_size: f32 },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Feedback ===
    /// Car and HUD shake on gnome impacts
    pub screen_shake: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Radio volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    // === Simulation ===
    pub collision: CollisionStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,

            reduced_motion: false,

            collision: CollisionStrategy::BruteForce,
        }
    }
}

impl Settings {
    /// Settings file name
    pub const FILE_NAME: &'static str = "mangosnoops_settings.json";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Pull volumes back into [0, 1]; NaN becomes 0
    pub fn clamp_volumes(&mut self) {
        for v in [
            &mut self.master_volume,
            &mut self.sfx_volume,
            &mut self.music_volume,
        ] {
            *v = if v.is_nan() { 0.0 } else { (*v).clamp(0.0, 1.0) };
        }
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, PersistenceError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                return Ok(Self::default());
            }
            Err(e) => return Err(PersistenceError::io(path, e)),
        };

        let mut settings: Self = serde_json::from_str(&json)?;
        settings.clamp_volumes();
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| PersistenceError::io(path, e))?;
        log::info!("Settings saved");
        Ok(())
    }
}
