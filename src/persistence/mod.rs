//! Save records
//!
//! A small JSON record is written each time the player moves on to a new
//! non-tutorial level. Files are named `saved_level{n}.json` where `n` is
//! the level number counted without tutorials.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reading or writing files on disk
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PersistenceError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Progress snapshot taken on a level transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub num_snacks: u32,
    pub num_movies: u32,
    /// Level number, not counting tutorials
    pub current_level_num: usize,
    /// UNIX time in seconds
    pub timestamp: u64,
}

impl SaveRecord {
    pub fn file_name(&self) -> String {
        format!("saved_level{}.json", self.current_level_num)
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the record into `dir`, returning the file path
    pub fn save(&self, dir: &Path) -> Result<PathBuf, PersistenceError> {
        let path = dir.join(self.file_name());
        let json = self.to_json()?;
        fs::write(&path, json).map_err(|e| PersistenceError::io(&path, e))?;
        log::info!("Saved level {} to {}", self.current_level_num, path.display());
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        let json = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
        Self::from_json(&json)
    }
}

/// Current UNIX time in seconds (0 if the clock is before the epoch)
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
