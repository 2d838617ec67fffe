//! Game state and core simulation types
//!
//! The level owns the template entities; a `GameState` owns the live copies
//! for one play-through of that level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionDetector;
use super::entity::{Gnome, GnomeKind, ObjectType, RoadObject};
use super::lifecycle::Collector;
use super::mood::Child;
use super::rearview::RearviewEnemy;
use super::timeline::EventTimeline;
use crate::consts::*;
use crate::level::LevelData;
use crate::settings::Settings;

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Driving
    Playing,
    /// Took the exit at the end of the road
    Exited,
    /// Car wrecked
    GameOver,
}

/// Fire-and-forget notifications for the rendering, HUD and audio layers.
///
/// Pushed during a tick, drained by the caller afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CarShake,
    HudShake,
    GnomeHit { id: u32, kind: GnomeKind },
    GnomeCollected { id: u32, pos: Vec2 },
    CarDestroyed,
    RearEnemySpawned,
    RearEnemyRetreating,
    RearEnemyAttack,
    SunStarted,
    SunEnded,
    ChildWoke { name: String },
    LevelExit,
}

/// The player's car, with Ned and Nosh in the back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    /// x is lateral road position; the car itself never moves along y
    pub pos: Vec2,
    health: u8,
    max_health: u8,
    pub destroyed: bool,
    pub exited: bool,
    /// Shake intensity, 1.0 on impact decaying to 0.0
    pub shake: f32,
    pub ned: Child,
    pub nosh: Child,
}

impl Car {
    pub fn new(ned_awake: bool, nosh_awake: bool) -> Self {
        Self {
            pos: Vec2::ZERO,
            health: CAR_MAX_HEALTH,
            max_health: CAR_MAX_HEALTH,
            destroyed: false,
            exited: false,
            shake: 0.0,
            ned: Child::new("Ned", ned_awake),
            nosh: Child::new("Nosh", nosh_awake),
        }
    }

    /// Start with the given health (clamped to the maximum)
    pub fn with_health(mut self, health: u8) -> Self {
        self.health = health.min(self.max_health);
        self.destroyed = self.health == 0;
        self
    }

    pub fn health(&self) -> u8 {
        self.health
    }

    pub fn max_health(&self) -> u8 {
        self.max_health
    }

    /// Lose one unit of health. Never goes below zero.
    pub fn damage(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    pub fn shake(&mut self) {
        self.shake = 1.0;
    }

    /// Mark the car destroyed the first time health reaches zero
    pub fn check_wrecked(&mut self, events: &mut Vec<GameEvent>) {
        if self.health == 0 && !self.destroyed {
            log::info!("Car destroyed");
            self.destroyed = true;
            events.push(GameEvent::CarDestroyed);
        }
    }

    /// Move sideways; `steer` is clamped to [-1, 1]
    pub fn steer(&mut self, steer: f32, dt: f32) {
        self.pos.x += steer.clamp(-1.0, 1.0) * CAR_STEER_SPEED * dt;
    }

    /// Per-tick update: decay shake, apply the children's pending mood shifts
    pub fn update(&mut self, dt: f32) {
        self.shake = (self.shake - CAR_SHAKE_DECAY * dt).max(0.0);
        self.ned.apply_pending_shift();
        self.nosh.apply_pending_shift();
    }

    pub fn take_exit(&mut self) {
        self.exited = true;
    }
}

impl RoadObject for Car {
    fn id(&self) -> u32 {
        0
    }

    fn object_type(&self) -> ObjectType {
        ObjectType::Car
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

/// The scrolling road
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Road {
    /// Scroll speed (world units/s)
    pub speed: f32,
    /// Distance at which the exit appears
    pub end_y: f32,
    /// Distance driven so far
    pub travelled: f32,
}

impl Road {
    pub fn new(speed: f32, end_y: f32) -> Self {
        Self {
            speed,
            end_y,
            travelled: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.travelled += self.speed * dt;
    }

    pub fn reached_end(&self) -> bool {
        self.travelled >= self.end_y
    }

    pub fn reset(&mut self) {
        self.travelled = 0.0;
    }
}

/// Items the player can hand to the children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Snack,
    Movie,
}

/// Where a held item was released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    Ned,
    Nosh,
    Inventory,
    Elsewhere,
}

/// Starting inventory for a level
pub const START_SNACKS: u32 = 1;
pub const START_MOVIES: u32 = 3;

/// Dashboard inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub snacks: u32,
    pub movies: u32,
    /// Item picked up but not yet released
    in_hand: Option<ItemKind>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            snacks: START_SNACKS,
            movies: START_MOVIES,
            in_hand: None,
        }
    }
}

impl Inventory {
    pub fn in_hand(&self) -> Option<ItemKind> {
        self.in_hand
    }

    fn count_mut(&mut self, item: ItemKind) -> &mut u32 {
        match item {
            ItemKind::Snack => &mut self.snacks,
            ItemKind::Movie => &mut self.movies,
        }
    }

    /// Pick up one item. Fails if the hand is full or none are left.
    pub fn take(&mut self, item: ItemKind) -> bool {
        if self.in_hand.is_some() {
            return false;
        }
        let count = self.count_mut(item);
        if *count == 0 {
            return false;
        }
        *count -= 1;
        self.in_hand = Some(item);
        true
    }

    /// Put the held item back
    pub fn cancel_take(&mut self) {
        if let Some(item) = self.in_hand.take() {
            *self.count_mut(item) += 1;
        }
    }

    /// The held item was handed over
    pub fn consume(&mut self) -> Option<ItemKind> {
        self.in_hand.take()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Complete state of one level play-through
#[derive(Debug, Clone)]
pub struct GameState {
    /// Level template (never mutated)
    pub level: LevelData,
    pub phase: GamePhase,
    /// Simulation frame counter
    pub frame: u64,
    pub car: Car,
    pub road: Road,
    pub rearview: RearviewEnemy,
    pub inventory: Inventory,
    pub timeline: EventTimeline,
    /// Sun glare is active
    pub sun_shine: bool,
    /// Notifications produced this tick
    pub events: Vec<GameEvent>,
    /// Live gnomes, owned by the collection pass
    pub(crate) gnomes: Vec<Gnome>,
    pub(crate) collector: Collector<Gnome>,
    pub(crate) collision: CollisionDetector,
    next_id: u32,
}

impl GameState {
    /// Create a state for `level` and start it
    pub fn new(level: LevelData, settings: &Settings) -> Self {
        let capacity = level.gnomes.len();
        let mut state = Self {
            phase: GamePhase::Playing,
            frame: 0,
            car: Car::new(level.ned_awake, level.nosh_awake),
            road: Road::new(level.scroll_speed(), level.end_y),
            rearview: RearviewEnemy::default(),
            inventory: Inventory::default(),
            timeline: EventTimeline::new(level.events.clone()),
            sun_shine: false,
            events: Vec::new(),
            gnomes: Vec::with_capacity(capacity),
            collector: Collector::with_capacity(capacity),
            collision: CollisionDetector::new(settings.collision),
            next_id: 1,
            level,
        };
        state.start();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Live gnomes in spawn order
    pub fn gnomes(&self) -> &[Gnome] {
        &self.gnomes
    }

    /// Add a gnome to the live set
    #[cfg(test)]
    pub(crate) fn spawn_gnome(&mut self, pos: Vec2, kind: GnomeKind) -> u32 {
        let id = self.next_entity_id();
        self.gnomes.push(Gnome::new(id, pos, kind));
        id
    }

    /// Seed the live gnome set by copying the level templates
    pub fn start(&mut self) {
        for i in 0..self.level.gnomes.len() {
            let id = self.next_entity_id();
            let gnome = Gnome::from_template(&self.level.gnomes[i], id);
            self.gnomes.push(gnome);
        }
        log::info!(
            "Level '{}' started: {} gnomes, {} events",
            self.level.name,
            self.gnomes.len(),
            self.timeline.len()
        );
    }

    /// Discard all in-flight state. Leaves an empty live set, zero scroll
    /// position and a rewound event cursor; call `start` to play again.
    pub fn reset(&mut self) {
        self.gnomes = Vec::with_capacity(self.level.gnomes.len());
        self.collector.reset();
        self.timeline.reset();
        self.road.reset();
        self.rearview.reset();
        self.inventory.reset();
        self.car = Car::new(self.level.ned_awake, self.level.nosh_awake);
        self.sun_shine = false;
        self.events.clear();
        self.frame = 0;
        self.phase = GamePhase::Playing;
        self.next_id = 1;
        log::info!("Level '{}' reset", self.level.name);
    }

    /// Reset and start again
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Take this tick's notifications
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// HUD shake amount respecting the player's motion preferences
    pub fn shake_intensity(&self, settings: &Settings) -> f32 {
        if settings.effective_screen_shake() {
            self.car.shake
        } else {
            0.0
        }
    }
}
