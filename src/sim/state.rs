//! Game state: the stage plus the actors built into it

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::physics::ContactStart;

use super::ball::Ball;
use super::stage::Stage;
use super::tower::Tower;

/// Something that happened during a tick, for audio and UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Bounce { level: u32 },
    Death { level: u32 },
    Score { level: u32, score: u64 },
}

impl GameEvent {
    /// Sound asset to play for this event
    pub fn sound_key(&self) -> &'static str {
        match self {
            GameEvent::Bounce { .. } => "jump-ball-safe_slice",
            GameEvent::Death { .. } => "hurt-ball-danger_slice",
            GameEvent::Score { .. } => "success-ball-void",
        }
    }

    pub fn level(&self) -> u32 {
        match *self {
            GameEvent::Bounce { level } | GameEvent::Death { level } | GameEvent::Score { level, .. } => {
                level
            }
        }
    }
}

pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub stage: Stage,
    pub ball: Ball,
    pub tower: Tower,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Reused contact buffer
    pub(crate) contacts: Vec<ContactStart>,
}

impl GameState {
    /// Build the world: one batch of floors and a ball above level 0
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        let mut stage = Stage::new(&config.physics);
        let tower = Tower::new(&mut stage, &config, seed)?;
        let ball = Ball::new(&mut stage, &config.ball, &config.geometry);
        log::info!("New game with seed {}", seed);

        Ok(Self {
            config,
            seed,
            stage,
            ball,
            tower,
            time_ticks: 0,
            contacts: Vec::new(),
        })
    }

    pub fn score(&self) -> u64 {
        self.tower.score()
    }

    /// Turn the whole tower by `degrees`
    pub fn rotate(&mut self, degrees: f32) {
        self.tower.rotate(&mut self.stage, degrees);
    }

    /// Restart both tower and ball
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.tower.reset(&mut self.stage)?;
        self.ball.reset(&mut self.stage);
        self.contacts.clear();
        self.time_ticks = 0;
        log::info!("Game reset");
        Ok(())
    }
}
