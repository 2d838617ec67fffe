//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (live gnomes keep spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod grid;
pub mod lifecycle;
pub mod mood;
pub mod rearview;
pub mod state;
pub mod tick;
pub mod timeline;

pub use collision::{CollisionDetector, in_hit_zone};
pub use entity::{Gnome, GnomeKind, ObjectType, RoadObject};
pub use grid::SpatialGrid;
pub use lifecycle::Collector;
pub use mood::{Child, Genre, Mood, ShiftDirection, radio_influence};
pub use rearview::RearviewEnemy;
pub use state::{Car, DropTarget, GameEvent, GamePhase, GameState, Inventory, ItemKind, Road};
pub use tick::{TickInput, tick};
pub use timeline::{EventKind, EventTargets, EventTimeline, LevelEvent};
