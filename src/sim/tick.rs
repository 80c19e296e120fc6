//! Fixed timestep simulation tick
//!
//! One frame: apply input, step physics, decode the contacts that started this
//! step and dispatch at most one outcome.

use super::ball::BallState;
use super::collision::{Outcome, resolve};
use super::state::{GameEvent, GameState};
use super::tower::ScoreUpdate;
use crate::error::GameError;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Rotate the tower by this many degrees
    pub rotate: Option<f32>,
    /// Horizontal drag movement since the last tick
    pub pan_delta: Option<f32>,
    /// Restart the game (double click)
    pub reset: bool,
}

/// A drag turns the tower one fixed step in the drag's direction
pub fn rotation_for_pan(delta: f32, step: f32) -> Option<f32> {
    if delta > 0.0 {
        Some(step)
    } else if delta < 0.0 {
        Some(-step)
    } else {
        None
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<Option<GameEvent>, GameError> {
    if input.reset {
        state.reset()?;
    }

    if let Some(degrees) = input.rotate {
        state.rotate(degrees);
    }
    if let Some(degrees) = input
        .pan_delta
        .and_then(|delta| rotation_for_pan(delta, state.config.input.rotation_step))
    {
        state.rotate(degrees);
    }

    state.contacts.clear();
    state.stage.physics.step_into(&mut state.contacts);
    state.time_ticks += 1;

    let event = match resolve(&state.contacts, &state.stage.tags) {
        Some(resolution) if state.ball.state() == BallState::Moving => {
            dispatch(state, resolution.outcome, resolution.level)?
        }
        _ => None,
    };

    state.ball.sync_mesh(&mut state.stage);
    Ok(event)
}

fn dispatch(
    state: &mut GameState,
    outcome: Outcome,
    level: Option<u32>,
) -> Result<Option<GameEvent>, GameError> {
    match outcome {
        Outcome::Bounce => {
            state.ball.reset_velocity(&mut state.stage, level)?;
            Ok(level.map(|level| GameEvent::Bounce { level }))
        }
        Outcome::Death => {
            state.ball.die(&mut state.stage, level)?;
            Ok(level.map(|level| GameEvent::Death { level }))
        }
        Outcome::Score => {
            let level = level.ok_or(GameError::MissingLevel { outcome })?;
            match state.tower.update_score(&mut state.stage, level)? {
                ScoreUpdate::Scored { score } => Ok(Some(GameEvent::Score { level, score })),
                ScoreUpdate::Duplicate => Ok(None),
            }
        }
    }
}
