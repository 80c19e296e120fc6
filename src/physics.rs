//! Rapier3D physics wrapper
//!
//! Owns every Rapier set and pipeline so the game core only deals in glam
//! vectors and handles. Collision-start events are collected during a step and
//! handed back as plain collider pairs.

use std::sync::{Mutex, PoisonError};

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

// ---------------------------------------------------------------------------
// Conversion helpers (private) - glam <-> nalgebra
// ---------------------------------------------------------------------------

fn vec3_to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn vec3_to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

fn na_to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_na(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn na_to_quat(q: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
    KinematicPositionBased,
    KinematicVelocityBased,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
            BodyType::KinematicPositionBased => RigidBodyType::KinematicPositionBased,
            BodyType::KinematicVelocityBased => RigidBodyType::KinematicVelocityBased,
        }
    }

    fn from_rapier(body_type: RigidBodyType) -> Self {
        match body_type {
            RigidBodyType::Dynamic => BodyType::Dynamic,
            RigidBodyType::Fixed => BodyType::Fixed,
            RigidBodyType::KinematicPositionBased => BodyType::KinematicPositionBased,
            RigidBodyType::KinematicVelocityBased => BodyType::KinematicVelocityBased,
        }
    }
}

/// Shape of a collider, in the parent body's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Ball { radius: f32 },
    /// Flat triangle (zero thickness)
    Triangle { a: Vec3, b: Vec3, c: Vec3 },
}

impl ColliderShape {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderShape::Triangle { a, b, c } => {
                ColliderBuilder::triangle(vec3_to_point(a), vec3_to_point(b), vec3_to_point(c))
            }
        }
    }
}

/// Which collision groups a collider participates in.
///
/// Everything live shares `Active`. `Isolated` colliders stay in the world but
/// never interact with `Active` ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionLayer {
    #[default]
    Active,
    Isolated,
}

impl CollisionLayer {
    fn groups(self) -> InteractionGroups {
        match self {
            CollisionLayer::Active => InteractionGroups::new(Group::GROUP_1, Group::ALL),
            CollisionLayer::Isolated => InteractionGroups::new(Group::GROUP_2, Group::GROUP_2),
        }
    }
}

/// Description of a collider to attach to a body.
#[derive(Debug, Clone, Copy)]
pub struct ColliderDesc {
    pub shape: ColliderShape,
    pub restitution: f32,
    /// Sensors report contacts but produce no physical response
    pub sensor: bool,
    pub layer: CollisionLayer,
    /// Emit collision events for contacts involving this collider
    pub report_events: bool,
}

impl ColliderDesc {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            restitution: 0.0,
            sensor: false,
            layer: CollisionLayer::Active,
            report_events: false,
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn with_events(mut self, report: bool) -> Self {
        self.report_events = report;
        self
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec3,
    pub velocity: Vec3,
    pub ccd: bool,
    /// Per-axis translation freedom (x, y, z)
    pub translations: [bool; 3],
}

impl BodyDesc {
    pub fn new(body_type: BodyType) -> Self {
        Self {
            body_type,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            ccd: false,
            translations: [true; 3],
        }
    }

    pub fn dynamic() -> Self {
        Self::new(BodyType::Dynamic)
    }

    pub fn kinematic_position_based() -> Self {
        Self::new(BodyType::KinematicPositionBased)
    }

    pub fn with_position(mut self, pos: Vec3) -> Self {
        self.position = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Restrict which axes the body may translate along.
    pub fn with_translations(mut self, x: bool, y: bool, z: bool) -> Self {
        self.translations = [x, y, z];
        self
    }
}

/// Two colliders that started touching during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactStart {
    pub a: ColliderHandle,
    pub b: ColliderHandle,
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    started: Mutex<Vec<ContactStart>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            started: Mutex::new(Vec::new()),
        }
    }

    fn drain_into(&self, out: &mut Vec<ContactStart>) {
        let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
        out.append(&mut started);
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(a, b, _) = event {
            self.started
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(ContactStart { a, b });
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier3D boilerplate into a single struct.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with gravity along Y (negative = down).
    pub fn new(gravity_y: f32) -> Self {
        Self {
            gravity: vector![0.0, gravity_y, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rigid body without colliders.
    pub fn create_body(&mut self, desc: &BodyDesc) -> RigidBodyHandle {
        let [x, y, z] = desc.translations;
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec3_to_na(desc.position))
            .linvel(vec3_to_na(desc.velocity))
            .enabled_translations(x, y, z)
            .ccd_enabled(desc.ccd)
            .build();
        self.bodies.insert(rb)
    }

    /// Attach a collider to an existing body.
    pub fn attach_collider(&mut self, body: RigidBodyHandle, desc: &ColliderDesc) -> ColliderHandle {
        let events = if desc.report_events {
            ActiveEvents::COLLISION_EVENTS
        } else {
            ActiveEvents::empty()
        };
        let collider = desc
            .shape
            .build_collider()
            .restitution(desc.restitution)
            .sensor(desc.sensor)
            .collision_groups(desc.layer.groups())
            .active_events(events)
            .build();
        self.colliders.insert_with_parent(collider, body, &mut self.bodies)
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: RigidBodyHandle) {
        self.bodies.remove(
            body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Step the simulation and append collision-start events to `events`.
    pub fn step_into(&mut self, events: &mut Vec<ContactStart>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );
        self.event_collector.drain_into(events);
    }

    /// Set a body's absolute rotation.
    pub fn set_rotation(&mut self, body: RigidBodyHandle, rotation: Quat) {
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.set_rotation(quat_to_na(rotation), true);
        }
    }

    /// Move a body to `position` with `velocity`, leaving it as `settle`.
    ///
    /// Position and velocity writes on a free dynamic body can be overridden by
    /// the integrator, so the body is switched to kinematic for the write and
    /// then switched to its final type.
    pub fn teleport(&mut self, body: RigidBodyHandle, position: Vec3, velocity: Vec3, settle: BodyType) {
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.set_body_type(RigidBodyType::KinematicVelocityBased, false);
            rb.set_linvel(vec3_to_na(velocity), false);
            rb.set_translation(vec3_to_na(position), false);
            rb.set_body_type(settle.to_rapier(), true);
        }
    }

    /// Move colliders between collision layers.
    pub fn set_collision_layer(&mut self, collider: ColliderHandle, layer: CollisionLayer) {
        if let Some(c) = self.colliders.get_mut(collider) {
            c.set_collision_groups(layer.groups());
        }
    }

    pub fn translation(&self, body: RigidBodyHandle) -> Vec3 {
        self.bodies
            .get(body)
            .map(|rb| na_to_vec3(rb.translation()))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn velocity(&self, body: RigidBodyHandle) -> Vec3 {
        self.bodies
            .get(body)
            .map(|rb| na_to_vec3(rb.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn rotation(&self, body: RigidBodyHandle) -> Quat {
        self.bodies
            .get(body)
            .map(|rb| na_to_quat(rb.rotation()))
            .unwrap_or(Quat::IDENTITY)
    }

    pub fn body_type(&self, body: RigidBodyHandle) -> Option<BodyType> {
        self.bodies.get(body).map(|rb| BodyType::from_rapier(rb.body_type()))
    }

    pub fn contains_body(&self, body: RigidBodyHandle) -> bool {
        self.bodies.contains(body)
    }

    pub fn is_sensor(&self, collider: ColliderHandle) -> bool {
        self.colliders.get(collider).is_some_and(|c| c.is_sensor())
    }

    pub fn collision_layer(&self, collider: ColliderHandle) -> Option<CollisionLayer> {
        let groups = self.colliders.get(collider)?.collision_groups();
        if groups == CollisionLayer::Isolated.groups() {
            Some(CollisionLayer::Isolated)
        } else {
            Some(CollisionLayer::Active)
        }
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of colliders in the simulation.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(radius: f32) -> ColliderDesc {
        ColliderDesc::new(ColliderShape::Ball { radius }).with_events(true)
    }

    #[test]
    fn test_create_and_remove_body() {
        let mut world = PhysicsWorld::new(0.0);
        let body = world.create_body(&BodyDesc::dynamic());
        world.attach_collider(body, &ball(1.0));
        world.attach_collider(body, &ball(0.5));
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 2);

        world.remove_body(body);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
        assert!(!world.contains_body(body));
    }

    #[test]
    fn test_gravity_affects_dynamic_body() {
        let mut world = PhysicsWorld::new(-9.81);
        world.set_dt(1.0 / 60.0);
        let body = world.create_body(&BodyDesc::dynamic().with_position(Vec3::new(0.0, 10.0, 0.0)));
        world.attach_collider(body, &ball(0.3));

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        assert!(world.translation(body).y < 10.0, "Body should fall");
    }

    #[test]
    fn test_locked_axes_only_move_vertically() {
        let mut world = PhysicsWorld::new(-9.81);
        let body = world.create_body(
            &BodyDesc::dynamic()
                .with_velocity(Vec3::new(3.0, 0.0, 3.0))
                .with_translations(false, true, false),
        );
        world.attach_collider(body, &ball(0.3));

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let pos = world.translation(body);
        assert!(pos.x.abs() < 1e-4);
        assert!(pos.z.abs() < 1e-4);
        assert!(pos.y < 0.0);
    }

    #[test]
    fn test_teleport_is_authoritative() {
        let mut world = PhysicsWorld::new(-9.81);
        let body = world.create_body(&BodyDesc::dynamic().with_velocity(Vec3::new(0.0, -3.0, 0.0)));
        world.attach_collider(body, &ball(0.3));

        let target = Vec3::new(1.0, -4.7, 2.0);
        world.teleport(body, target, Vec3::new(0.0, 8.0, 0.0), BodyType::Dynamic);

        assert_eq!(world.body_type(body), Some(BodyType::Dynamic));
        assert!((world.translation(body) - target).length() < 1e-5);
        assert!((world.velocity(body).y - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_teleport_to_fixed_freezes_body() {
        let mut world = PhysicsWorld::new(-9.81);
        world.set_dt(1.0 / 60.0);
        let body = world.create_body(&BodyDesc::dynamic());
        world.attach_collider(body, &ball(0.3));

        let target = Vec3::new(0.0, -14.7, 2.5);
        world.teleport(body, target, Vec3::ZERO, BodyType::Fixed);

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        assert_eq!(world.body_type(body), Some(BodyType::Fixed));
        assert!((world.translation(body) - target).length() < 1e-5);
        assert_eq!(world.velocity(body), Vec3::ZERO);
    }

    #[test]
    fn test_set_rotation_is_absolute() {
        let mut world = PhysicsWorld::new(0.0);
        let body = world.create_body(&BodyDesc::kinematic_position_based());

        let target = Quat::from_rotation_y(30f32.to_radians());
        world.set_rotation(body, target);
        world.set_rotation(body, target);

        assert!(world.rotation(body).angle_between(target) < 1e-4);
    }

    #[test]
    fn test_collision_layers_round_trip() {
        let mut world = PhysicsWorld::new(0.0);
        let body = world.create_body(&BodyDesc::kinematic_position_based());
        let collider = world.attach_collider(
            body,
            &ColliderDesc::new(ColliderShape::Triangle {
                a: Vec3::ZERO,
                b: Vec3::X,
                c: Vec3::Z,
            })
            .with_sensor(true),
        );

        assert!(world.is_sensor(collider));
        assert_eq!(world.collision_layer(collider), Some(CollisionLayer::Active));
        world.set_collision_layer(collider, CollisionLayer::Isolated);
        assert_eq!(world.collision_layer(collider), Some(CollisionLayer::Isolated));
    }

    #[test]
    fn test_falling_ball_reports_contact_with_triangle() {
        let mut world = PhysicsWorld::new(-9.81);
        world.set_dt(1.0 / 60.0);

        let floor = world.create_body(&BodyDesc::kinematic_position_based());
        let tri = world.attach_collider(
            floor,
            &ColliderDesc::new(ColliderShape::Triangle {
                a: Vec3::new(0.0, 0.0, 0.0),
                b: Vec3::new(3.0, 0.0, -3.0),
                c: Vec3::new(0.0, 0.0, 3.0),
            })
            .with_restitution(1.0),
        );

        let body = world.create_body(
            &BodyDesc::dynamic()
                .with_position(Vec3::new(0.5, 1.0, 0.0))
                .with_ccd(true),
        );
        let sphere = world.attach_collider(body, &ball(0.3).with_restitution(1.0));

        let mut events = Vec::new();
        for _ in 0..120 {
            world.step_into(&mut events);
        }

        assert!(!events.is_empty(), "Ball should land on the triangle");
        let first = events[0];
        let pair = [first.a, first.b];
        assert!(pair.contains(&tri));
        assert!(pair.contains(&sphere));
    }

    #[test]
    fn test_isolated_collider_is_ignored() {
        let mut world = PhysicsWorld::new(-9.81);
        world.set_dt(1.0 / 60.0);

        let floor = world.create_body(&BodyDesc::kinematic_position_based());
        let tri = world.attach_collider(
            floor,
            &ColliderDesc::new(ColliderShape::Triangle {
                a: Vec3::new(0.0, 0.0, 0.0),
                b: Vec3::new(3.0, 0.0, -3.0),
                c: Vec3::new(0.0, 0.0, 3.0),
            }),
        );
        world.set_collision_layer(tri, CollisionLayer::Isolated);

        let body = world.create_body(&BodyDesc::dynamic().with_position(Vec3::new(0.5, 1.0, 0.0)));
        world.attach_collider(body, &ball(0.3));

        let mut events = Vec::new();
        for _ in 0..120 {
            world.step_into(&mut events);
        }
        assert!(events.is_empty());
        assert!(world.translation(body).y < -1.0, "Ball should fall through");
    }
}
