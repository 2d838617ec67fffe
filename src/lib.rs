//! Mango Snoops - a road-trip driving game
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (collisions, entity collection, level events)
//! - `level`: Level data provider (events, gnome templates, songs)
//! - `persistence`: Save records written on level transitions
//! - `session`: Level progression across a play session
//! - `settings`: Player preferences and collision tuning

pub mod level;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use level::LevelData;
pub use session::Session;
pub use settings::{CollisionStrategy, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Car hit zone: a gnome must be strictly between these scroll positions
    pub const HIT_BAND_UPPER: f32 = -10.0;
    pub const HIT_BAND_LOWER: f32 = -10.5;
    /// Horizontal distance below which a gnome in the band hits the car
    pub const HIT_RANGE: f32 = 0.15;

    /// Car defaults
    pub const CAR_MAX_HEALTH: u8 = 10;
    /// Shake decay per second (shake runs 1.0 -> 0.0)
    pub const CAR_SHAKE_DECAY: f32 = 4.0;
    /// Sideways car speed at full steering input (world units/s)
    pub const CAR_STEER_SPEED: f32 = 0.6;

    /// Gnomes approach at this multiple of the road speed
    pub const GNOME_SPEED: f32 = 2.0;
    /// A gnome that falls below this y loops back to GNOME_RESPAWN_Y
    pub const GNOME_WRAP_Y: f32 = -12.0;
    pub const GNOME_RESPAWN_Y: f32 = 14.0;
    /// Animation frame advance per update, over a two-frame filmstrip
    pub const GNOME_ANIM_SPEED: f32 = 0.25;
    pub const GNOME_ANIM_FRAMES: f32 = 2.0;

    /// Leeway between scroll position and an event's trigger position
    pub const EVENT_TOLERANCE: f32 = 0.1;

    /// Base road speed before the level's speed factor (world units/s)
    pub const ROAD_BASE_SPEED: f32 = 1.0;

    /// Rearview enemy climb rate (mirror heights per second)
    pub const REARVIEW_CLIMB_SPEED: f32 = 0.012;
    /// Height at which the rearview enemy starts attacking
    pub const REARVIEW_DAMAGE_HEIGHT: f32 = 0.05;
    /// Seconds between rearview attacks on the car
    pub const REARVIEW_ATTACK_INTERVAL: f32 = 1.0;

    /// Radio mood cadence (frames)
    pub const RADIO_STATION_PERIOD: u64 = 200;
    pub const RADIO_SILENCE_NED_PERIOD: u64 = 240;
    pub const RADIO_SILENCE_NOSH_PERIOD: u64 = 115;
}
