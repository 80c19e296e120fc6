//! Helix Drop - An endless falling-ball arcade game on a rotating tower
//!
//! Core modules:
//! - `sim`: Tower generation, slice colliders, collision resolution, game loop
//! - `physics`: Rapier3D world wrapper (bodies, colliders, teleports, contact events)
//! - `scene`: Minimal retained scene graph consumed by a renderer
//! - `config`: Data-driven geometry, tower and ball tuning
//! - `error`: Fatal invariant violations and config loading errors

pub mod config;
pub mod error;
pub mod physics;
pub mod scene;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, GameError};

use glam::Vec2;

/// Game configuration defaults
pub mod consts {
    /// Fixed simulation timestep (render and physics tick 1:1)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Gravity along Y (units/s²)
    pub const GRAVITY: f32 = -9.81;

    /// Smallest slice span (degrees). Every slice start and span is a multiple of this.
    pub const UNIT_ANGLE: u32 = 15;

    /// Vertical distance between adjacent floors
    pub const FLOOR_OFFSET: f32 = 5.0;
    pub const FLOOR_HEIGHT: f32 = 0.2;
    pub const FLOOR_INNER_RADIUS: f32 = 1.8;
    pub const FLOOR_OUTER_RADIUS: f32 = 3.24;
    /// Points sampled along each arc edge of a slice mesh outline
    pub const ARC_SEGMENTS: usize = 8;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.3;
    /// Upward velocity after a safe landing
    pub const BALL_LAUNCH_SPEED: f32 = 8.0;
    /// Polar angle (degrees) of the ball's lane around the tower axis
    pub const BALL_START_ANGLE: f32 = 90.0;

    /// Floors added or removed per generation/pruning batch
    pub const TOWER_BATCH_SIZE: u32 = 10;
    /// Minimum generated levels kept below the ball
    pub const TOWER_LOOKAHEAD: u32 = 5;
    /// Prune once unpassed floors fall below this share of retained floors
    pub const TOWER_PRUNE_RATIO: f32 = 0.25;

    /// Rotation applied per pan gesture tick (degrees)
    pub const ROTATION_STEP: f32 = 5.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
