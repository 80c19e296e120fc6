//! Helix Drop headless runner
//!
//! Loads an optional JSON config, then plays frames with a simple autopilot
//! that turns the tower until a void slice sits under the ball.
//!
//! Usage: `helix-drop [config.json] [seed]`

use std::time::{SystemTime, UNIX_EPOCH};

use helix_drop::GameConfig;
use helix_drop::sim::{GameEvent, GameState, SliceKind, TickInput, tick};

/// Two minutes of simulated play
const MAX_FRAMES: u64 = 60 * 120;

fn load_config(path: Option<&str>) -> GameConfig {
    let Some(path) = path else {
        return GameConfig::default();
    };
    match GameConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load config from {}: {}, using defaults", path, e);
            GameConfig::default()
        }
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Rotate while the next floor shows anything but void under the ball
fn autopilot(state: &GameState) -> TickInput {
    let level = state.tower.passed_levels();
    let lane = state.config.ball.start_angle;
    let unit = state.config.geometry.unit_angle;

    let rotate = match state.tower.floor(level).and_then(|f| f.kind_under(lane, unit)) {
        Some(SliceKind::Void) | None => None,
        Some(_) => Some(state.config.input.rotation_step),
    };
    TickInput {
        rotate,
        ..Default::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Helix Drop (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str));
    let seed = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(seed_from_clock);

    let mut state = match GameState::new(config, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to build tower: {}", e);
            std::process::exit(1);
        }
    };

    while state.time_ticks < MAX_FRAMES {
        let input = autopilot(&state);
        match tick(&mut state, &input) {
            Ok(Some(event)) => {
                log::debug!("{:?} ({})", event, event.sound_key());
                if let GameEvent::Death { level } = event {
                    log::info!("Game over on level {}", level);
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("Fatal: {}", e);
                std::process::exit(1);
            }
        }
    }

    let stats = state.tower.stats();
    println!(
        "seed {} | score {} | ticks {} | floors held {}",
        seed, stats.score, state.time_ticks, stats.floor_count
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {}
