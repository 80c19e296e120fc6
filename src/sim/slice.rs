//! A single wedge of a floor ring
//!
//! One kinematic body per slice, one flat triangle collider per unit angle so
//! the ball meets accurate edges. Colliders are tagged `(kind, level)` in the
//! stage's side table.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::FloorGeometry;
use crate::error::GameError;
use crate::normalize_degrees;
use crate::physics::{
    BodyDesc, ColliderDesc, ColliderHandle, ColliderShape, CollisionLayer, RigidBodyHandle,
};
use crate::scene::{ExtrudedMesh, Material, NodeId, NodeKind, Transform};

use super::arc::ArcSegment;
use super::collision::{ColliderKind, ColliderTag};
use super::stage::Stage;

/// Slice semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceKind {
    /// Ball bounces
    Safe,
    /// Ball dies
    Danger,
    /// Ball falls through and scores
    Void,
}

impl SliceKind {
    /// Pairwise-coprime identifier from the product encoding. Dispatch goes
    /// through `collision::outcome_for`.
    pub fn id(self) -> u32 {
        match self {
            SliceKind::Safe => 2,
            SliceKind::Danger => 3,
            SliceKind::Void => 5,
        }
    }

    /// Render colour (0xRRGGBB)
    pub fn color(self) -> u32 {
        match self {
            SliceKind::Safe => 0x00ff00,
            SliceKind::Danger => 0xff0000,
            SliceKind::Void => 0x000000,
        }
    }

    pub fn material(self) -> Material {
        match self {
            SliceKind::Void => Material::transparent(self.color()),
            _ => Material::opaque(self.color()),
        }
    }
}

/// Placement of one slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    /// Degrees, multiple of the unit angle
    pub start_angle: u32,
    /// Number of unit angles covered
    pub span: u32,
    pub level: u32,
    pub kind: SliceKind,
}

impl SliceSpec {
    /// Check the angular-unit rules
    pub fn validate(&self, unit: u32) -> Result<(), GameError> {
        let invalid = |reason| GameError::InvalidSliceConfig {
            start_angle: self.start_angle,
            span: self.span,
            unit,
            reason,
        };

        if unit == 0 || self.start_angle % unit != 0 {
            return Err(invalid("start angle is not a multiple of the unit"));
        }
        if self.span == 0 {
            return Err(invalid("span must be positive"));
        }
        if self.span >= 360 / unit {
            return Err(invalid("span must be less than a full ring"));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Slice {
    spec: SliceSpec,
    mesh: NodeId,
    body: RigidBodyHandle,
    colliders: Vec<ColliderHandle>,
    /// Accumulated rotation, degrees in [0, 360)
    rotation: f32,
    flown: bool,
}

impl Slice {
    pub fn new(
        stage: &mut Stage,
        parent: NodeId,
        spec: SliceSpec,
        geometry: &FloorGeometry,
    ) -> Result<Self, GameError> {
        spec.validate(geometry.unit_angle)?;

        let position = Vec3::new(0.0, geometry.floor_y(spec.level), 0.0);
        let wedge = ArcSegment::from_degrees(
            geometry.inner_radius,
            geometry.outer_radius,
            spec.start_angle as f32,
            (spec.span * geometry.unit_angle) as f32,
        );
        let is_void = spec.kind == SliceKind::Void;

        // Shape space XY maps onto the floor plane XZ
        let mesh = stage.scene.add_child(
            parent,
            NodeKind::Extruded(ExtrudedMesh {
                outline: wedge.outline(geometry.arc_segments),
                depth: geometry.floor_height,
                material: spec.kind.material(),
            }),
            Transform::from_translation(position)
                .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
        );

        let body = stage
            .physics
            .create_body(&BodyDesc::kinematic_position_based().with_position(position));

        let colliders = wedge
            .unit_triangles(spec.span)
            .into_iter()
            .map(|[a, b, c]| {
                let desc = ColliderDesc::new(ColliderShape::Triangle { a, b, c })
                    .with_restitution(1.0)
                    .with_sensor(is_void);
                let handle = stage.physics.attach_collider(body, &desc);
                stage.tags.insert(handle, ColliderTag::slice(spec.kind, spec.level));
                handle
            })
            .collect();

        Ok(Self {
            spec,
            mesh,
            body,
            colliders,
            rotation: 0.0,
            flown: false,
        })
    }

    pub fn spec(&self) -> &SliceSpec {
        &self.spec
    }

    pub fn kind(&self) -> SliceKind {
        self.spec.kind
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_flown(&self) -> bool {
        self.flown
    }

    pub fn mesh(&self) -> NodeId {
        self.mesh
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn colliders(&self) -> &[ColliderHandle] {
        &self.colliders
    }

    /// Rotate by `delta` degrees about the vertical axis.
    ///
    /// The mesh turns incrementally; the body is set to the absolute
    /// accumulated angle so float error cannot compound in physics.
    pub fn rotate(&mut self, stage: &mut Stage, delta: f32) {
        self.rotation = normalize_degrees(self.rotation + delta);
        stage.scene.rotate_on_world_y(self.mesh, delta.to_radians());
        stage
            .physics
            .set_rotation(self.body, Quat::from_rotation_y(self.rotation.to_radians()));
    }

    /// Mark the slice as passed: colliders report as void, stop touching the
    /// ball, and the mesh goes transparent. Idempotent.
    pub fn fly(&mut self, stage: &mut Stage) {
        if self.flown {
            return;
        }
        for &collider in &self.colliders {
            stage.tags.retag(collider, ColliderKind::Slice(SliceKind::Void));
            stage.physics.set_collision_layer(collider, CollisionLayer::Isolated);
        }
        stage.scene.set_material(self.mesh, Material::transparent(0x000000));
        self.flown = true;
    }

    /// Remove the body, its colliders and tags, and detach the mesh.
    pub fn destroy(self, stage: &mut Stage) {
        for collider in &self.colliders {
            stage.tags.remove(*collider);
        }
        stage.physics.remove_body(self.body);
        stage.scene.remove(self.mesh);
    }
}
