//! Car-gnome collision detection
//!
//! A gnome hits the car when it is inside a narrow band of scroll positions
//! just in front of the bumper and laterally within `HIT_RANGE` of the car.
//! This is a band test, not a radius test: gnomes are hit as they pass
//! through `(-10.5, -10)` regardless of their distance along y inside it.

use glam::Vec2;

use super::entity::{Gnome, RoadObject};
use super::grid::SpatialGrid;
use super::state::{Car, GameEvent};
use crate::consts::*;
use crate::settings::CollisionStrategy;

/// Extra margin on the broad-phase query rectangle for rounding at its edges
const QUERY_PAD: f32 = 1e-3;
/// Smallest accepted grid cell. A query visits every cell under the hit
/// zone, so the count grows with the inverse square of the cell size.
pub const MIN_GRID_CELL: f32 = HIT_RANGE;

/// True if a gnome at `gnome_pos` overlaps the hit zone of a car at `car_x`
#[inline]
pub fn in_hit_zone(gnome_pos: Vec2, car_x: f32) -> bool {
    gnome_pos.y < HIT_BAND_UPPER
        && gnome_pos.y > HIT_BAND_LOWER
        && (gnome_pos.x - car_x).abs() < HIT_RANGE
}

/// Resolves gnome hits against the player's car each tick
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    grid: Option<SpatialGrid>,
    /// Reused candidate buffer for grid queries
    candidates: Vec<usize>,
}

impl CollisionDetector {
    pub fn new(strategy: CollisionStrategy) -> Self {
        let grid = match strategy {
            CollisionStrategy::BruteForce => None,
            CollisionStrategy::Grid { cell_size }
                if cell_size.is_finite() && cell_size >= MIN_GRID_CELL =>
            {
                Some(SpatialGrid::new(cell_size))
            }
            CollisionStrategy::Grid { cell_size } => {
                log::warn!("Invalid grid cell size {}, using brute force", cell_size);
                None
            }
        };
        Self {
            grid,
            candidates: Vec::new(),
        }
    }

    pub fn uses_grid(&self) -> bool {
        self.grid.is_some()
    }

    /// Test every live gnome against the car and apply hit side effects.
    ///
    /// Gnomes are visited in slice order with either strategy. Gnomes already
    /// marked destroyed are skipped. Returns the number of hits.
    pub fn process_collisions(
        &mut self,
        gnomes: &mut [Gnome],
        car: &mut Car,
        events: &mut Vec<GameEvent>,
    ) -> u32 {
        process_bounds(car);

        let car_x = car.pos.x;
        let mut hits = 0;

        match &mut self.grid {
            None => {
                for gnome in gnomes.iter_mut() {
                    if handle_collision(car, gnome, events) {
                        hits += 1;
                    }
                }
            }
            Some(grid) => {
                grid.rebuild(gnomes.iter().map(|g| g.pos));
                let min = Vec2::new(car_x - HIT_RANGE - QUERY_PAD, HIT_BAND_LOWER - QUERY_PAD);
                let max = Vec2::new(car_x + HIT_RANGE + QUERY_PAD, HIT_BAND_UPPER + QUERY_PAD);
                grid.query_rect(min, max, &mut self.candidates);
                for &i in &self.candidates {
                    if handle_collision(car, &mut gnomes[i], events) {
                        hits += 1;
                    }
                }
            }
        }

        hits
    }
}

/// Out-of-window clamping for the car. Intentionally does nothing: the car
/// is allowed to leave the road.
fn process_bounds(_car: &mut Car) {}

/// Collide one gnome with the car. Returns true on a hit.
fn handle_collision(car: &mut Car, gnome: &mut Gnome, events: &mut Vec<GameEvent>) -> bool {
    if gnome.is_destroyed() || !in_hit_zone(gnome.pos, car.pos.x) {
        return false;
    }

    car.damage();
    car.shake();
    events.push(GameEvent::CarShake);
    events.push(GameEvent::HudShake);
    car.ned.react_to_collision();
    car.nosh.react_to_collision();
    gnome.set_destroyed();
    events.push(GameEvent::GnomeHit {
        id: gnome.id,
        kind: gnome.kind,
    });
    car.check_wrecked(events);

    true
}
