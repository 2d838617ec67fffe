//! Rearview mirror enemy
//!
//! A single gnome that climbs up the back of the car. Once it reaches the
//! damage height it attacks the car on a fixed interval until the player
//! hits the vroom stick, at which point it shrinks away. It is not part of
//! the road entity pool and is never collected.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RearviewEnemy {
    alive: bool,
    dying: bool,
    /// Height climbed, in mirror heights
    climb_height: f32,
    /// Draw scale relative to full size (shrinks while dying)
    scale: f32,
    /// Seconds until the next attack lands
    attack_timer: f32,
}

impl Default for RearviewEnemy {
    fn default() -> Self {
        Self {
            alive: false,
            dying: false,
            climb_height: 0.0,
            scale: 1.0,
            attack_timer: 0.0,
        }
    }
}

impl RearviewEnemy {
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_dying(&self) -> bool {
        self.dying
    }

    pub fn climb_height(&self) -> f32 {
        self.climb_height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Spawn the enemy unless one is already climbing or leaving.
    /// Returns true if a new enemy appeared.
    pub fn create(&mut self) -> bool {
        if self.alive || self.dying {
            return false;
        }
        self.alive = true;
        self.climb_height = 0.0;
        self.attack_timer = 0.0;
        true
    }

    /// Start the retreat (vroom stick). Returns true if it was alive.
    pub fn destroy_if_alive(&mut self) -> bool {
        if self.alive && !self.dying {
            self.dying = true;
            return true;
        }
        false
    }

    pub fn is_attacking(&self) -> bool {
        self.alive && !self.dying && self.climb_height >= REARVIEW_DAMAGE_HEIGHT
    }

    pub fn update(&mut self, dt: f32) {
        if self.alive && !self.dying && self.climb_height < REARVIEW_DAMAGE_HEIGHT {
            self.climb_height += REARVIEW_CLIMB_SPEED * dt;
        }
        self.climb_height = self.climb_height.min(REARVIEW_DAMAGE_HEIGHT);

        // Shrinks per frame, faster as it gets smaller
        if self.dying {
            self.scale -= (1.0 - 0.6 * self.scale) * 0.04;
            if self.scale - 0.01 <= 0.0 {
                log::debug!("Rearview enemy gone");
                self.dying = false;
                self.alive = false;
                self.scale = 1.0;
            }
        }
    }

    /// Advance the attack clock. Returns true when an attack lands this tick.
    pub fn tick_attack(&mut self, dt: f32) -> bool {
        if !self.is_attacking() {
            self.attack_timer = 0.0;
            return false;
        }
        self.attack_timer -= dt;
        if self.attack_timer <= 0.0 {
            self.attack_timer += REARVIEW_ATTACK_INTERVAL;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
