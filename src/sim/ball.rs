//! The falling ball
//!
//! A dynamic body locked to vertical travel. Its lane around the tower axis is
//! fixed; the player turns the tower underneath it instead.

use glam::Vec3;

use crate::config::{BallConfig, FloorGeometry};
use crate::error::GameError;
use crate::physics::{BodyDesc, BodyType, ColliderDesc, ColliderHandle, ColliderShape, RigidBodyHandle};
use crate::polar_to_cartesian;
use crate::scene::{Material, NodeId, NodeKind, SphereMesh, Transform};

use super::collision::{ColliderTag, Outcome};
use super::stage::Stage;

const BALL_COLOR: u32 = 0xffff00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    Moving,
    /// Frozen until reset
    Dead,
}

#[derive(Debug)]
pub struct Ball {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    mesh: NodeId,
    state: BallState,
    radius: f32,
    launch_speed: f32,
    floor_offset: f32,
    start_position: Vec3,
}

impl Ball {
    pub fn new(stage: &mut Stage, config: &BallConfig, geometry: &FloorGeometry) -> Self {
        let lane = (geometry.inner_radius + geometry.outer_radius) / 2.0;
        let xz = polar_to_cartesian(lane, config.start_angle.to_radians());
        let start_position = Vec3::new(xz.x, config.radius, xz.y);

        let body = stage.physics.create_body(
            &BodyDesc::dynamic()
                .with_position(start_position)
                .with_velocity(Vec3::new(0.0, config.launch_speed, 0.0))
                .with_translations(false, true, false)
                .with_ccd(true),
        );
        let collider = stage.physics.attach_collider(
            body,
            &ColliderDesc::new(ColliderShape::Ball {
                radius: config.radius,
            })
            .with_restitution(config.restitution)
            .with_events(true),
        );
        stage.tags.insert(collider, ColliderTag::ball());

        let root = stage.scene.root();
        let mesh = stage.scene.add_child(
            root,
            NodeKind::Sphere(SphereMesh {
                radius: config.radius,
                material: Material::opaque(BALL_COLOR),
            }),
            Transform::from_translation(start_position),
        );

        Self {
            body,
            collider,
            mesh,
            state: BallState::Moving,
            radius: config.radius,
            launch_speed: config.launch_speed,
            floor_offset: geometry.floor_offset,
            start_position,
        }
    }

    pub fn state(&self) -> BallState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == BallState::Dead
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    pub fn mesh(&self) -> NodeId {
        self.mesh
    }

    pub fn start_position(&self) -> Vec3 {
        self.start_position
    }

    /// Current physics position, sampled by trail effects and the camera
    pub fn position(&self, stage: &Stage) -> Vec3 {
        stage.physics.translation(self.body)
    }

    pub fn velocity(&self, stage: &Stage) -> Vec3 {
        stage.physics.velocity(self.body)
    }

    /// Resting height on top of `level`
    fn height_at(&self, level: u32) -> f32 {
        -(level as f32) * self.floor_offset + self.radius
    }

    /// Safe landing: relaunch upward from the surface of `level`
    pub fn reset_velocity(&mut self, stage: &mut Stage, level: Option<u32>) -> Result<(), GameError> {
        let level = level.ok_or(GameError::MissingLevel {
            outcome: Outcome::Bounce,
        })?;
        let mut position = self.position(stage);
        position.y = self.height_at(level);
        stage.physics.teleport(
            self.body,
            position,
            Vec3::new(0.0, self.launch_speed, 0.0),
            BodyType::Dynamic,
        );
        Ok(())
    }

    /// Danger landing: freeze on the surface of `level` until reset
    pub fn die(&mut self, stage: &mut Stage, level: Option<u32>) -> Result<(), GameError> {
        let level = level.ok_or(GameError::MissingLevel {
            outcome: Outcome::Death,
        })?;
        let mut position = self.position(stage);
        position.y = self.height_at(level);
        stage
            .physics
            .teleport(self.body, position, Vec3::ZERO, BodyType::Fixed);
        self.state = BallState::Dead;
        log::info!("Ball died on level {}", level);
        Ok(())
    }

    /// Back to the canonical start, moving
    pub fn reset(&mut self, stage: &mut Stage) {
        stage.physics.teleport(
            self.body,
            self.start_position,
            Vec3::new(0.0, self.launch_speed, 0.0),
            BodyType::Dynamic,
        );
        self.state = BallState::Moving;
        self.sync_mesh(stage);
    }

    /// Copy the physics position onto the mesh
    pub fn sync_mesh(&self, stage: &mut Stage) {
        let position = self.position(stage);
        stage.scene.set_translation(self.mesh, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, PhysicsConfig};

    fn setup() -> (Stage, Ball) {
        let config = GameConfig::default();
        let mut stage = Stage::new(&PhysicsConfig::default());
        let ball = Ball::new(&mut stage, &config.ball, &config.geometry);
        (stage, ball)
    }

    fn step(stage: &mut Stage, n: usize) {
        let mut events = Vec::new();
        for _ in 0..n {
            stage.physics.step_into(&mut events);
        }
    }

    #[test]
    fn test_ball_starts_in_its_lane() {
        let (stage, ball) = setup();
        let pos = ball.position(&stage);

        // Mid radius 2.52 at 90°: on the +Z axis
        assert!(pos.x.abs() < 1e-4);
        assert!((pos.z - 2.52).abs() < 1e-4);
        assert!((pos.y - 0.3).abs() < 1e-5);
        assert!((ball.velocity(&stage).y - 8.0).abs() < 1e-5);
        assert_eq!(ball.state(), BallState::Moving);
        assert_eq!(*stage.tags.get(ball.collider()).unwrap(), ColliderTag::ball());
    }

    #[test]
    fn test_ball_only_moves_vertically() {
        let (mut stage, ball) = setup();
        let start = ball.position(&stage);
        step(&mut stage, 60);
        let pos = ball.position(&stage);

        assert!((pos.x - start.x).abs() < 1e-4);
        assert!((pos.z - start.z).abs() < 1e-4);
        assert!(pos.y != start.y);
    }

    #[test]
    fn test_reset_velocity_relaunches_from_level() {
        let (mut stage, mut ball) = setup();
        step(&mut stage, 30);
        ball.reset_velocity(&mut stage, Some(2)).unwrap();

        let pos = ball.position(&stage);
        assert!((pos.y - (-10.0 + 0.3)).abs() < 1e-5);
        assert!((pos.z - 2.52).abs() < 1e-4);
        assert!((ball.velocity(&stage).y - 8.0).abs() < 1e-5);
        assert_eq!(stage.physics.body_type(ball.body()), Some(BodyType::Dynamic));
        assert_eq!(ball.state(), BallState::Moving);
    }

    #[test]
    fn test_level_zero_is_a_real_level() {
        let (mut stage, mut ball) = setup();
        assert!(ball.reset_velocity(&mut stage, Some(0)).is_ok());
        assert!((ball.position(&stage).y - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_missing_level_is_fatal() {
        let (mut stage, mut ball) = setup();
        assert_eq!(
            ball.reset_velocity(&mut stage, None),
            Err(GameError::MissingLevel { outcome: Outcome::Bounce })
        );
        assert_eq!(
            ball.die(&mut stage, None),
            Err(GameError::MissingLevel { outcome: Outcome::Death })
        );
        assert_eq!(ball.state(), BallState::Moving);
    }

    #[test]
    fn test_die_freezes() {
        let (mut stage, mut ball) = setup();
        ball.die(&mut stage, Some(3)).unwrap();
        step(&mut stage, 30);

        assert!(ball.is_dead());
        assert_eq!(stage.physics.body_type(ball.body()), Some(BodyType::Fixed));
        assert!((ball.position(&stage).y - (-15.0 + 0.3)).abs() < 1e-5);
        assert_eq!(ball.velocity(&stage), Vec3::ZERO);
    }

    #[test]
    fn test_die_then_reset_restores_start() {
        let (mut stage, mut ball) = setup();
        let start = ball.start_position();
        ball.die(&mut stage, Some(3)).unwrap();
        ball.reset(&mut stage);

        assert_eq!(ball.state(), BallState::Moving);
        assert!((ball.position(&stage) - start).length() < 1e-5);
        assert!((ball.velocity(&stage) - Vec3::new(0.0, 8.0, 0.0)).length() < 1e-5);
        assert_eq!(stage.physics.body_type(ball.body()), Some(BodyType::Dynamic));

        let mesh = stage.scene.get(ball.mesh()).unwrap();
        assert!((mesh.transform.translation - start).length() < 1e-5);
    }

    #[test]
    fn test_sync_mesh_follows_body() {
        let (mut stage, ball) = setup();
        step(&mut stage, 20);
        ball.sync_mesh(&mut stage);

        let mesh = stage.scene.get(ball.mesh()).unwrap();
        assert!((mesh.transform.translation - ball.position(&stage)).length() < 1e-6);
    }
}
