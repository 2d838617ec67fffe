//! Road entities
//!
//! Everything that lives on the road shares a small capability set
//! (`RoadObject`) and a type tag used to dispatch destruction hooks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::level::GnomeSpec;

/// Type tag for road entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Car,
    Gnome,
    Image,
}

/// Gnome variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GnomeKind {
    #[default]
    Basic,
    Flamingo,
    Grill,
}

/// Capabilities shared by road entities
pub trait RoadObject {
    fn id(&self) -> u32;
    fn object_type(&self) -> ObjectType;
    fn pos(&self) -> Vec2;
    fn is_destroyed(&self) -> bool;
    fn set_destroyed(&mut self);
}

/// A gnome hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gnome {
    pub id: u32,
    /// x is lateral road position, y is distance ahead of the car
    pub pos: Vec2,
    pub kind: GnomeKind,
    pub destroyed: bool,
    /// Filmstrip frame (cosmetic)
    #[serde(skip)]
    pub anim_frame: f32,
}

impl Gnome {
    pub fn new(id: u32, pos: Vec2, kind: GnomeKind) -> Self {
        Self {
            id,
            pos,
            kind,
            destroyed: false,
            anim_frame: 0.0,
        }
    }

    /// Copy a level template into a live gnome
    pub fn from_template(spec: &GnomeSpec, id: u32) -> Self {
        Self::new(id, Vec2::new(spec.x, spec.y), spec.kind)
    }

    /// Animate and move toward the car at `GNOME_SPEED` times the road speed
    pub fn update(&mut self, dt: f32, road_speed: f32) {
        self.anim_frame += GNOME_ANIM_SPEED;
        if self.anim_frame >= GNOME_ANIM_FRAMES {
            self.anim_frame -= GNOME_ANIM_FRAMES;
        }

        self.pos.y -= road_speed * GNOME_SPEED * dt;
        if self.pos.y < GNOME_WRAP_Y {
            self.pos.y = GNOME_RESPAWN_Y;
        }
    }
}

impl RoadObject for Gnome {
    fn id(&self) -> u32 {
        self.id
    }

    fn object_type(&self) -> ObjectType {
        ObjectType::Gnome
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn set_destroyed(&mut self) {
        self.destroyed = true;
    }
}
