//! Error types
//!
//! `GameError` variants are all invariant violations: they are returned from the
//! operation that detects them and are never retried. `ConfigError` covers
//! loading tuning data, which the binary can fall back from.

use thiserror::Error;

use crate::sim::collision::Outcome;

/// Fatal game-core errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// A slice's start angle or span breaks the angular-unit rules
    #[error("invalid slice: start angle {start_angle}° with span {span} (unit {unit}°): {reason}")]
    InvalidSliceConfig {
        start_angle: u32,
        span: u32,
        unit: u32,
        reason: &'static str,
    },

    /// A derived floor layout does not close the ring
    #[error("floor layout ends at {end_angle}° instead of 360°")]
    LayoutIntegrity { end_angle: u32 },

    /// A score event referenced a level the tower did not expect
    #[error("score event for level {level} but {passed} levels have been passed")]
    InconsistentLevel { level: u32, passed: u32 },

    /// An outcome that needs a floor level was decoded without one
    #[error("{outcome:?} outcome dispatched without a floor level")]
    MissingLevel { outcome: Outcome },
}

/// Config loading/validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
