//! Level progression across a play session

use serde::{Deserialize, Serialize};

use crate::persistence::SaveRecord;
use crate::sim::state::Inventory;

/// Ordered level list and where the player is in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub levels: Vec<String>,
    pub level_index: usize,
    /// Number of tutorial levels at the front of `levels`
    pub num_tutorials: usize,
}

impl Session {
    pub fn new(levels: Vec<String>) -> Self {
        let num_tutorials = levels.iter().take_while(|l| Self::is_tutorial(l)).count();
        Self {
            levels,
            level_index: 0,
            num_tutorials,
        }
    }

    /// Tutorial levels carry "tut" in their name
    pub fn is_tutorial(name: &str) -> bool {
        name.contains("tut")
    }

    pub fn current_level(&self) -> Option<&str> {
        self.levels.get(self.level_index).map(String::as_str)
    }

    /// Level number counted without tutorials (0 while in a tutorial)
    pub fn level_num_without_tutorials(&self) -> usize {
        self.level_index.saturating_sub(self.num_tutorials)
    }

    /// Move on after taking the exit, wrapping back to the first level.
    ///
    /// Returns the record to save for the new level, or `None` when the
    /// next level is a tutorial or there are no levels.
    pub fn advance_after_exit(&mut self, inventory: &Inventory, now: u64) -> Option<SaveRecord> {
        if self.levels.is_empty() {
            return None;
        }
        self.level_index = (self.level_index + 1) % self.levels.len();

        let name = &self.levels[self.level_index];
        log::info!("Advancing to level {} ('{}')", self.level_index, name);
        if Self::is_tutorial(name) {
            return None;
        }

        Some(SaveRecord {
            num_snacks: inventory.snacks,
            num_movies: inventory.movies,
            current_level_num: self.level_num_without_tutorials(),
            timestamp: now,
        })
    }
}
