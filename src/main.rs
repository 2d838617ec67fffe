//! Mango Snoops headless runner
//!
//! Plays levels with a simple autopilot at a fixed timestep and reports how
//! each went. Usage: `mangosnoops [LEVEL_JSON...]`. Levels are played in
//! order through a `Session`, writing a save record next to the first level
//! after each exit. Without arguments a seeded practice road is generated.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use mangosnoops::consts::*;
use mangosnoops::level::{LevelData, generate_practice_level};
use mangosnoops::persistence::unix_now;
use mangosnoops::sim::{GameEvent, GamePhase, GameState, Genre, TickInput, tick};
use mangosnoops::{Session, Settings};

/// Stop after ten simulated minutes whatever happens
const MAX_FRAMES: u64 = 60 * 60 * 10;
/// Wall-clock frame length fed to the accumulator (a 144 Hz display)
const FRAME_TIME: f32 = 1.0 / 144.0;
const PRACTICE_SEED: u64 = 0x5eed;
const PRACTICE_GNOMES: usize = 40;

/// Headless game loop with the same accumulator as a windowed frontend
struct Runner {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    hits: u32,
}

impl Runner {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput {
                radio_station: Some(Genre::Dance),
                ..TickInput::default()
            },
            hits: 0,
        }
    }

    /// Run simulation ticks for one rendered frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.input.steer = self.autopilot();
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs
            self.input.vroom = false;

            self.handle_events();
        }
    }

    /// Steer away from the nearest gnome about to reach the car
    fn autopilot(&self) -> f32 {
        let car_x = self.state.car.pos.x;
        let threat = self
            .state
            .gnomes()
            .iter()
            .filter(|g| !g.destroyed && g.pos.y > HIT_BAND_UPPER && g.pos.y < HIT_BAND_UPPER + 1.0)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        match threat {
            Some(g) if (g.pos.x - car_x).abs() < HIT_RANGE * 2.0 => {
                if g.pos.x >= car_x { -1.0 } else { 1.0 }
            }
            // Drift back toward the centre line
            _ => (-car_x * 4.0).clamp(-1.0, 1.0),
        }
    }

    fn handle_events(&mut self) {
        let mut vroom = false;
        for event in self.state.drain_events() {
            match event {
                GameEvent::GnomeHit { id, kind } => {
                    self.hits += 1;
                    log::debug!("Hit {kind:?} gnome {id}");
                }
                // Shake it off straight away
                GameEvent::RearEnemyAttack | GameEvent::RearEnemySpawned => vroom = true,
                GameEvent::ChildWoke { name } => log::info!("{name} woke up"),
                _ => {}
            }
        }
        self.input.vroom |= vroom;
    }
}

/// Play one level to exit, game over or the frame cap
fn play(level: LevelData, settings: &Settings) -> Runner {
    log::info!("Starting '{}'", level.name);
    let mut runner = Runner::new(GameState::new(level, settings));
    while runner.state.phase == GamePhase::Playing && runner.state.frame < MAX_FRAMES {
        runner.update(FRAME_TIME);
    }

    let state = &runner.state;
    log::info!(
        "Finished '{}' after {} frames: {:?}, health {}/{}, {} gnome hits, Ned {:?}, Nosh {:?}",
        state.level.name,
        state.frame,
        state.phase,
        state.car.health(),
        state.car.max_health(),
        runner.hits,
        state.car.ned.mood(),
        state.car.nosh.mood(),
    );
    runner
}

fn level_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let save_dir = paths
        .first()
        .and_then(|p| p.parent())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let settings =
        Settings::load_from(&save_dir.join(Settings::FILE_NAME)).context("loading settings")?;

    if paths.is_empty() {
        log::info!("No levels given, generating practice road (seed {PRACTICE_SEED:#x})");
        play(generate_practice_level(PRACTICE_SEED, PRACTICE_GNOMES), &settings);
        return Ok(());
    }

    log::info!("Mango Snoops starting with {} levels", paths.len());
    let mut session = Session::new(paths.iter().map(|p| level_name(p)).collect());

    // One pass through the level list; stop at the first level not completed
    for _ in 0..paths.len() {
        let path = &paths[session.level_index];
        let level = LevelData::load(path)
            .with_context(|| format!("loading level {}", path.display()))?;
        let runner = play(level, &settings);
        if runner.state.phase != GamePhase::Exited {
            break;
        }

        let wrapped = session.level_index + 1 == paths.len();
        if let Some(record) = session.advance_after_exit(&runner.state.inventory, unix_now()) {
            let path = record.save(&save_dir).context("writing save record")?;
            log::info!("Progress saved to {}", path.display());
        }
        if wrapped {
            log::info!("Road trip complete");
            break;
        }
    }

    Ok(())
}
