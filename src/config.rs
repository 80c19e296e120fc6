//! Game tuning and geometry
//!
//! One immutable `GameConfig` is built at startup and handed to each component
//! at construction. Loadable from JSON; every field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::layout::{TemplateGroup, reference_template};

/// Ring geometry shared by every floor and slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorGeometry {
    /// Smallest slice span (degrees)
    pub unit_angle: u32,
    /// Vertical distance between adjacent floors
    pub floor_offset: f32,
    /// Floor thickness (mesh extrusion depth)
    pub floor_height: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Points sampled per arc edge when building mesh outlines
    pub arc_segments: usize,
}

impl Default for FloorGeometry {
    fn default() -> Self {
        Self {
            unit_angle: UNIT_ANGLE,
            floor_offset: FLOOR_OFFSET,
            floor_height: FLOOR_HEIGHT,
            inner_radius: FLOOR_INNER_RADIUS,
            outer_radius: FLOOR_OUTER_RADIUS,
            arc_segments: ARC_SEGMENTS,
        }
    }
}

impl FloorGeometry {
    /// Number of unit slices in a full ring
    pub fn units_per_ring(&self) -> u32 {
        360 / self.unit_angle
    }

    /// Y coordinate of the centre of a floor's slab
    pub fn floor_y(&self, level: u32) -> f32 {
        -(level as f32) * self.floor_offset - self.floor_height / 2.0
    }

    /// Y coordinate of a floor's top surface
    pub fn surface_y(&self, level: u32) -> f32 {
        -(level as f32) * self.floor_offset
    }
}

/// Ball tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    /// Vertical velocity given on every safe landing and on reset
    pub launch_speed: f32,
    /// Polar angle (degrees) of the ball's lane
    pub start_angle: f32,
    pub restitution: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            launch_speed: BALL_LAUNCH_SPEED,
            start_angle: BALL_START_ANGLE,
            restitution: 1.0,
        }
    }
}

/// Tower growth and pruning thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    /// Floors per generation/pruning batch
    pub batch_size: u32,
    /// Generate once fewer than this many levels remain below the ball
    pub lookahead: u32,
    /// Prune once unpassed floors drop below this share of retained floors
    pub prune_ratio: f32,
    /// Base layout every floor is derived from
    pub template: Vec<TemplateGroup>,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            batch_size: TOWER_BATCH_SIZE,
            lookahead: TOWER_LOOKAHEAD,
            prune_ratio: TOWER_PRUNE_RATIO,
            template: reference_template(),
        }
    }
}

/// Physics world parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub dt: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            dt: SIM_DT,
        }
    }
}

/// Input mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Degrees the tower turns per pan gesture tick
    pub rotation_step: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            rotation_step: ROTATION_STEP,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub geometry: FloorGeometry,
    pub ball: BallConfig,
    pub tower: TowerConfig,
    pub physics: PhysicsConfig,
    pub input: InputConfig,
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check the invariants the tower relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let geo = &self.geometry;
        if geo.unit_angle == 0 || 360 % geo.unit_angle != 0 {
            return Err(ConfigError::Invalid(format!(
                "unit angle {}° does not divide 360°",
                geo.unit_angle
            )));
        }
        if geo.inner_radius <= 0.0 || geo.outer_radius <= geo.inner_radius {
            return Err(ConfigError::Invalid(format!(
                "ring radii must satisfy 0 < inner ({}) < outer ({})",
                geo.inner_radius, geo.outer_radius
            )));
        }
        if geo.floor_offset <= 0.0 || geo.floor_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "floor offset and height must be positive".to_string(),
            ));
        }

        let units = geo.units_per_ring();
        if let Some(group) = self.tower.template.iter().find(|g| g.span == 0 || g.span >= units) {
            return Err(ConfigError::Invalid(format!(
                "template group spans {} units, must be in 1..{}",
                group.span, units
            )));
        }
        let total = self
            .tower
            .template
            .iter()
            .try_fold(0u32, |acc, g| acc.checked_add(g.span));
        if total != Some(units) {
            return Err(ConfigError::Invalid(format!(
                "template spans {} units, a ring needs {}",
                total.map_or_else(|| "too many".to_string(), |t| t.to_string()),
                units
            )));
        }

        if self.tower.batch_size == 0 {
            return Err(ConfigError::Invalid("tower batch size must be positive".to_string()));
        }
        if !(self.tower.prune_ratio > 0.0 && self.tower.prune_ratio < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "prune ratio {} must be in (0, 1)",
                self.tower.prune_ratio
            )));
        }
        if self.ball.radius <= 0.0 || self.physics.dt <= 0.0 {
            return Err(ConfigError::Invalid(
                "ball radius and timestep must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SliceKind;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.geometry.units_per_ring(), 24);
        assert_eq!(config.tower.batch_size, 10);
        assert_eq!(config.tower.template.len(), 4);
    }

    #[test]
    fn test_floor_heights() {
        let geo = FloorGeometry::default();
        assert!((geo.floor_y(0) + 0.1).abs() < 1e-6);
        assert!((geo.floor_y(2) + 10.1).abs() < 1e-5);
        assert!((geo.surface_y(3) + 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = GameConfig::from_json(r#"{ "tower": { "lookahead": 7 } }"#).unwrap();
        assert_eq!(config.tower.lookahead, 7);
        assert_eq!(config.tower.batch_size, TOWER_BATCH_SIZE);
        assert_eq!(config.geometry, FloorGeometry::default());
    }

    #[test]
    fn test_template_from_json() {
        let json = r#"{
            "tower": {
                "template": [
                    { "span": 12, "kind": "safe" },
                    { "span": 4, "kind": "danger" },
                    { "span": 8, "kind": "void" }
                ]
            }
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.tower.template[1].kind, SliceKind::Danger);
        assert_eq!(config.tower.template[2].span, 8);
    }

    #[test]
    fn test_template_must_close_ring() {
        let json = r#"{ "tower": { "template": [ { "span": 6, "kind": "safe" } ] } }"#;
        assert!(matches!(
            GameConfig::from_json(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_full_ring_group_rejected() {
        let json = r#"{ "tower": { "template": [ { "span": 24, "kind": "void" } ] } }"#;
        assert!(matches!(
            GameConfig::from_json(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_overflowing_template_rejected() {
        let mut config = GameConfig::default();
        config.tower.template = vec![
            TemplateGroup { span: u32::MAX, kind: SliceKind::Safe },
            TemplateGroup { span: 25, kind: SliceKind::Void },
        ];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        // Spans that would wrap back to a full ring
        config.tower.template = vec![
            TemplateGroup { span: 23, kind: SliceKind::Safe },
            TemplateGroup { span: 23, kind: SliceKind::Danger },
            TemplateGroup { span: u32::MAX - 21, kind: SliceKind::Void },
        ];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_unit_angle_rejected() {
        let mut config = GameConfig::default();
        config.geometry.unit_angle = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
