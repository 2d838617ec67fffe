//! Per-frame simulation step
//!
//! One call to `tick` advances the level by one frame in a fixed order:
//! world update, HUD/input resolution, collisions, entity collection and
//! finally the event timeline.

use super::mood::{Genre, Mood, radio_influence};
use super::state::{DropTarget, GameEvent, GamePhase, GameState, ItemKind};
use super::timeline::EventTargets;

/// Input commands for a single tick, already resolved by the HUD layer
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering wheel, -1.0 (left) to 1.0 (right)
    pub steer: f32,
    /// Vroom stick engaged this frame
    pub vroom: bool,
    /// Station the radio is tuned to, if any
    pub radio_station: Option<Genre>,
    /// Item picked up from the inventory (press edge)
    pub take_item: Option<ItemKind>,
    /// Where the held item was released (release edge)
    pub release: Option<DropTarget>,
}

/// Advance the level by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.frame += 1;

    // World: road and gnome positions
    state.road.update(dt);
    let road_speed = state.road.speed;
    for gnome in &mut state.gnomes {
        gnome.update(dt, road_speed);
    }

    // HUD and input
    resolve_item_drop(state, input);
    radio_influence(
        state.frame,
        input.radio_station,
        &mut state.car.ned,
        &mut state.car.nosh,
    );

    state.rearview.update(dt);
    if input.vroom && state.rearview.destroy_if_alive() {
        log::info!("Rearview enemy shaken off");
        state.events.push(GameEvent::RearEnemyRetreating);
    }
    if state.rearview.tick_attack(dt) {
        state.car.damage();
        state.events.push(GameEvent::RearEnemyAttack);
        state.car.check_wrecked(&mut state.events);
    }

    state.car.steer(input.steer, dt);
    state.car.update(dt);

    if state.road.reached_end() && !state.car.exited {
        log::info!("Level '{}' exit reached", state.level.name);
        state.car.take_exit();
        state.events.push(GameEvent::LevelExit);
        state.phase = GamePhase::Exited;
    }

    // Collisions, then reclaim whatever they destroyed
    state
        .collision
        .process_collisions(&mut state.gnomes, &mut state.car, &mut state.events);
    state.collector.collect(&mut state.gnomes, &mut state.events);

    // Scripted events
    let mut targets = EventTargets {
        ned: &mut state.car.ned,
        nosh: &mut state.car.nosh,
        rearview: &mut state.rearview,
        sun_shine: &mut state.sun_shine,
        events: &mut state.events,
    };
    state.timeline.advance(dt, road_speed, &mut targets);

    if state.car.destroyed {
        state.phase = GamePhase::GameOver;
    }
}

/// Hand the held item to whatever it was released over.
///
/// Items can't be given to a sleeping child; they go back to the inventory,
/// as does anything dropped outside a child.
fn resolve_item_drop(state: &mut GameState, input: &TickInput) {
    if let Some(item) = input.take_item {
        state.inventory.take(item);
    }

    let (Some(target), Some(item)) = (input.release, state.inventory.in_hand()) else {
        return;
    };

    let child = match target {
        DropTarget::Ned => &mut state.car.ned,
        DropTarget::Nosh => &mut state.car.nosh,
        DropTarget::Inventory | DropTarget::Elsewhere => {
            state.inventory.cancel_take();
            return;
        }
    };

    if !child.is_awake() {
        state.inventory.cancel_take();
        return;
    }

    match item {
        ItemKind::Snack => child.set_mood(Mood::Happy),
        ItemKind::Movie => child.set_mood(Mood::Sleep),
    }
    log::debug!("{:?} given to {}", item, child.name);
    state.inventory.consume();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::level::{GnomeSpec, LevelData};
    use crate::settings::{CollisionStrategy, Settings};
    use crate::sim::entity::GnomeKind;
    use crate::sim::mood::ShiftDirection;
    use crate::sim::state::START_MOVIES;
    use crate::sim::timeline::{EventKind, LevelEvent};
    use glam::Vec2;

    fn empty_level() -> LevelData {
        LevelData {
            end_y: 1000.0,
            ..LevelData::default()
        }
    }

    fn state_with(level: LevelData) -> GameState {
        GameState::new(level, &Settings::default())
    }

    #[test]
    fn test_gnome_hit_end_to_end() {
        let mut state = state_with(empty_level());
        state.car.pos.x = 0.0;
        // One frame of travel at speed 1.0 moves a gnome 2/60 down the road
        let id = state.spawn_gnome(Vec2::new(0.1, -10.2 + 2.0 * SIM_DT), GnomeKind::Basic);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.gnomes().iter().all(|g| g.id != id));
        assert_eq!(state.car.health(), CAR_MAX_HEALTH - 1);
        assert_eq!(state.car.ned.pending_shift(), Some(ShiftDirection::Negative));
        assert_eq!(state.car.nosh.pending_shift(), Some(ShiftDirection::Negative));

        let events: Vec<_> = state.drain_events().collect();
        assert!(events.contains(&GameEvent::CarShake));
        assert!(events.contains(&GameEvent::HudShake));
        assert!(events.contains(&GameEvent::GnomeCollected {
            id,
            pos: state_pos_after_hit()
        }));

        // Shifts land on the next frame
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.car.ned.mood(), Mood::Sad);
        assert_eq!(state.car.ned.pending_shift(), None);
    }

    fn state_pos_after_hit() -> Vec2 {
        let mut y = -10.2 + 2.0 * SIM_DT;
        y -= 1.0 * GNOME_SPEED * SIM_DT;
        Vec2::new(0.1, y)
    }

    #[test]
    fn test_sun_events_through_tick() {
        let level = LevelData {
            end_y: 1000.0,
            events: vec![
                LevelEvent::new(5.0, EventKind::SunStart),
                LevelEvent::new(10.0, EventKind::SunEnd),
            ],
            ..LevelData::default()
        };
        let mut state = state_with(level);
        let mut started = 0;
        let mut ended = 0;

        for _ in 0..900 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            for event in state.drain_events() {
                match event {
                    GameEvent::SunStarted => started += 1,
                    GameEvent::SunEnded => ended += 1,
                    _ => {}
                }
            }
            if state.timeline.ypos() < 4.8 {
                assert!(!state.sun_shine);
            }
        }

        assert_eq!((started, ended), (1, 1));
        assert!(!state.sun_shine);
        assert!(state.timeline.is_exhausted());
    }

    #[test]
    fn test_rearview_attack_and_vroom() {
        let level = LevelData {
            end_y: 1000.0,
            events: vec![LevelEvent::new(0.05, EventKind::RearEnemy)],
            ..LevelData::default()
        };
        let mut state = state_with(level);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.rearview.is_alive());

        // Climb to the attack height (~4.2 s) and take a hit
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.car.health() < CAR_MAX_HEALTH);
        let health = state.car.health();

        let vroom = TickInput {
            vroom: true,
            ..Default::default()
        };
        tick(&mut state, &vroom, SIM_DT);
        assert!(state.rearview.is_dying());
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.car.health(), health);
        assert!(!state.rearview.is_alive());
    }

    #[test]
    fn test_wrecked_car_ends_level() {
        let mut state = state_with(empty_level());
        state.car = state.car.clone().with_health(1);
        state.spawn_gnome(Vec2::new(0.0, -10.2), GnomeKind::Flamingo);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.car.destroyed);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Frozen afterwards
        let frame = state.frame;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_level_exit() {
        let level = LevelData {
            end_y: 0.5,
            ..LevelData::default()
        };
        let mut state = state_with(level);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Exited);
        assert!(state.car.exited);
    }

    #[test]
    fn test_item_drops() {
        let level = LevelData {
            end_y: 1000.0,
            nosh_awake: false,
            ..LevelData::default()
        };
        let mut state = state_with(level);

        // Snack to Ned
        let give = |item, target| TickInput {
            take_item: Some(item),
            release: Some(target),
            ..Default::default()
        };
        tick(&mut state, &give(ItemKind::Snack, DropTarget::Ned), SIM_DT);
        assert_eq!(state.car.ned.mood(), Mood::Happy);
        assert_eq!(state.inventory.snacks, 0);
        assert_eq!(state.inventory.in_hand(), None);

        // Movie to sleeping Nosh is refused
        tick(&mut state, &give(ItemKind::Movie, DropTarget::Nosh), SIM_DT);
        assert_eq!(state.car.nosh.mood(), Mood::Sleep);
        assert_eq!(state.inventory.movies, START_MOVIES);

        // Dropped elsewhere goes back
        tick(&mut state, &give(ItemKind::Movie, DropTarget::Elsewhere), SIM_DT);
        assert_eq!(state.inventory.movies, START_MOVIES);

        // Movie puts Ned to sleep
        tick(&mut state, &give(ItemKind::Movie, DropTarget::Ned), SIM_DT);
        assert_eq!(state.car.ned.mood(), Mood::Sleep);
        assert_eq!(state.inventory.movies, START_MOVIES - 1);
    }

    #[test]
    fn test_grid_strategy_same_outcome() {
        let gnomes: Vec<GnomeSpec> = (0..50)
            .map(|i| GnomeSpec {
                x: (i % 7) as f32 * 0.05 - 0.15,
                y: (i as f32) * 0.37 - 10.0,
                kind: GnomeKind::Basic,
            })
            .collect();
        let level = LevelData {
            end_y: 1000.0,
            gnomes,
            ..LevelData::default()
        };
        let grid = Settings {
            collision: CollisionStrategy::Grid { cell_size: 0.5 },
            ..Settings::default()
        };

        let mut brute = GameState::new(level.clone(), &Settings::default());
        let mut gridded = GameState::new(level, &grid);
        assert!(!brute.collision.uses_grid());
        assert!(gridded.collision.uses_grid());

        for _ in 0..600 {
            tick(&mut brute, &TickInput::default(), SIM_DT);
            tick(&mut gridded, &TickInput::default(), SIM_DT);
            let a: Vec<_> = brute.drain_events().collect();
            let b: Vec<_> = gridded.drain_events().collect();
            assert_eq!(a, b);
        }
        assert_eq!(brute.car.health(), gridded.car.health());
        assert_eq!(brute.gnomes().len(), gridded.gnomes().len());
    }

    #[test]
    fn test_determinism() {
        let level = crate::level::generate_practice_level(42, 30);
        let mut a = state_with(level.clone());
        let mut b = state_with(level);
        let input = TickInput {
            steer: 0.3,
            radio_station: Some(Genre::Jazz),
            ..Default::default()
        };
        for _ in 0..1200 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.car.health(), b.car.health());
        assert_eq!(a.gnomes().len(), b.gnomes().len());
        assert_eq!(a.car.ned.mood(), b.car.ned.mood());
    }
}
