//! Level data provider
//!
//! Levels are JSON documents listing the road length, scroll speed, the
//! soundtrack, scripted events and gnome placements:
//!
//! ```json
//! {
//!   "name": "level1",
//!   "region": "SUBURBS",
//!   "speed": 1.0,
//!   "endY": 120.0,
//!   "songs": ["dance1"],
//!   "events": [{ "y": 5.0, "type": "SUN_START" }],
//!   "gnomes": [{ "x": 0.1, "y": 14.0, "type": "FLAMINGO" }],
//!   "nedAwake": true,
//!   "noshAwake": false
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{EVENT_TOLERANCE, GNOME_RESPAWN_Y, ROAD_BASE_SPEED};
use crate::sim::entity::GnomeKind;
use crate::sim::timeline::{EventKind, LevelEvent};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid level '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// Where a level takes place (picks scenery and music)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    #[default]
    Suburbs,
    Highway,
    Midwest,
    Colorado,
}

/// Gnome placement template
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GnomeSpec {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type", default)]
    pub kind: GnomeKind,
}

/// A level as loaded from disk. Never mutated during play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelData {
    pub name: String,
    pub region: Region,
    /// Speed factor relative to `ROAD_BASE_SPEED`
    pub speed: f32,
    /// Scroll distance at which the exit appears
    pub end_y: f32,
    pub songs: Vec<String>,
    pub events: Vec<LevelEvent>,
    pub gnomes: Vec<GnomeSpec>,
    pub ned_awake: bool,
    pub nosh_awake: bool,
}

impl Default for LevelData {
    fn default() -> Self {
        Self {
            name: String::new(),
            region: Region::default(),
            speed: 1.0,
            end_y: 100.0,
            songs: Vec::new(),
            events: Vec::new(),
            gnomes: Vec::new(),
            ned_awake: true,
            nosh_awake: true,
        }
    }
}

impl LevelData {
    /// Road scroll speed in world units per second
    pub fn scroll_speed(&self) -> f32 {
        ROAD_BASE_SPEED * self.speed
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Read and validate a level file. An unnamed level takes the file stem.
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut level = Self::from_json(&json)?;
        if level.name.is_empty() {
            if let Some(stem) = path.file_stem() {
                level.name = stem.to_string_lossy().into_owned();
            }
        }
        log::info!(
            "Loaded level '{}' ({:?}, {} gnomes, {} events)",
            level.name,
            level.region,
            level.gnomes.len(),
            level.events.len()
        );
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        let invalid = |reason: String| LevelError::Invalid {
            name: self.name.clone(),
            reason,
        };

        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(invalid(format!("speed must be positive, got {}", self.speed)));
        }
        if !self.end_y.is_finite() {
            return Err(invalid("end_y is not finite".into()));
        }
        // Scroll position starts at zero and only grows
        if let Some(e) = self
            .events
            .iter()
            .find(|e| e.trigger_y.is_finite() && e.trigger_y <= -EVENT_TOLERANCE)
        {
            return Err(invalid(format!(
                "{:?} event at y={} is behind the start of the road",
                e.kind, e.trigger_y
            )));
        }
        if let Some(e) = self.events.iter().find(|e| !e.trigger_y.is_finite()) {
            return Err(invalid(format!("{:?} event has a non-finite y", e.kind)));
        }
        if let Some(g) = self
            .gnomes
            .iter()
            .find(|g| !(g.x.is_finite() && g.y.is_finite()))
        {
            return Err(invalid(format!("gnome at ({}, {}) is not finite", g.x, g.y)));
        }
        Ok(())
    }
}

/// Build a random but reproducible level for practice runs
pub fn generate_practice_level(seed: u64, gnome_count: usize) -> LevelData {
    let mut rng = Pcg32::seed_from_u64(seed);

    let gnomes = (0..gnome_count)
        .map(|_| {
            let kind = match rng.random_range(0..10) {
                0..=5 => GnomeKind::Basic,
                6..=7 => GnomeKind::Flamingo,
                _ => GnomeKind::Grill,
            };
            GnomeSpec {
                x: rng.random_range(-0.4..0.4),
                y: rng.random_range(0.0..GNOME_RESPAWN_Y),
                kind,
            }
        })
        .collect();

    let end_y = 60.0 + gnome_count as f32;
    let sun_at = rng.random_range(5.0..end_y / 2.0);
    let events = vec![
        LevelEvent::new(sun_at, EventKind::SunStart),
        LevelEvent::new(sun_at + 8.0, EventKind::SunEnd),
        LevelEvent::new(rng.random_range(10.0..end_y), EventKind::RearEnemy),
    ];

    LevelData {
        name: format!("practice-{seed}"),
        end_y,
        events,
        gnomes,
        ..LevelData::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "level1",
        "region": "HIGHWAY",
        "speed": 1.5,
        "endY": 40.0,
        "songs": ["jazz1"],
        "events": [
            { "y": 9.0, "type": "SUN_END" },
            { "y": 5.0, "type": "SUN_START" }
        ],
        "gnomes": [
            { "x": 0.1, "y": 14.0, "type": "FLAMINGO" },
            { "x": -0.2, "y": 7.5 }
        ],
        "noshAwake": false
    }"#;

    #[test]
    fn test_parse_sample() {
        let level = LevelData::from_json(SAMPLE).unwrap();
        assert_eq!(level.region, Region::Highway);
        assert_eq!(level.scroll_speed(), 1.5 * ROAD_BASE_SPEED);
        assert_eq!(level.events[1].kind, EventKind::SunStart);
        assert_eq!(level.gnomes[0].kind, GnomeKind::Flamingo);
        assert_eq!(level.gnomes[1].kind, GnomeKind::Basic);
        assert!(level.ned_awake);
        assert!(!level.nosh_awake);
    }

    #[test]
    fn test_missing_fields_default() {
        let level = LevelData::from_json("{}").unwrap();
        assert_eq!(level, LevelData::default());
    }

    #[test]
    fn test_rejects_bad_speed() {
        let err = LevelData::from_json(r#"{ "speed": 0.0 }"#).unwrap_err();
        assert!(matches!(err, LevelError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_event_behind_start() {
        let err = LevelData::from_json(r#"{ "events": [{ "y": -1.0, "type": "SUN_START" }] }"#)
            .unwrap_err();
        assert!(matches!(err, LevelError::Invalid { .. }));

        // Within the tolerance window of the start it can still fire
        let level = LevelData::from_json(r#"{ "events": [{ "y": -0.05, "type": "SUN_START" }] }"#);
        assert!(level.is_ok());
    }

    #[test]
    fn test_rejects_unknown_event() {
        let err = LevelData::from_json(r#"{ "events": [{ "y": 1.0, "type": "UFO" }] }"#)
            .unwrap_err();
        assert!(matches!(err, LevelError::Json(_)));
    }

    #[test]
    fn test_load_names_from_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("midwest2.json");
        fs::write(&path, r#"{ "region": "MIDWEST" }"#).unwrap();
        let level = LevelData::load(&path).unwrap();
        assert_eq!(level.name, "midwest2");
        assert_eq!(level.region, Region::Midwest);

        let err = LevelData::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }

    #[test]
    fn test_practice_level_is_reproducible() {
        let a = generate_practice_level(7, 25);
        let b = generate_practice_level(7, 25);
        let c = generate_practice_level(8, 25);
        assert_eq!(a, b);
        assert_ne!(a.gnomes, c.gnomes);
        assert_eq!(a.gnomes.len(), 25);
        assert!(a.validate().is_ok());
        assert!(a.gnomes.iter().all(|g| (0.0..GNOME_RESPAWN_Y).contains(&g.y)));
    }
}
