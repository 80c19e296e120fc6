//! One ring of the tower

use crate::config::FloorGeometry;
use crate::error::GameError;
use crate::normalize_degrees;
use crate::scene::{NodeId, NodeKind, Transform};

use super::layout::SliceLayout;
use super::slice::{Slice, SliceKind, SliceSpec};
use super::stage::Stage;

/// A ring of slices at one level, covering 360°
#[derive(Debug)]
pub struct Floor {
    level: u32,
    group: NodeId,
    slices: Vec<Slice>,
}

impl Floor {
    /// Build a floor from a layout that already closes the ring.
    /// On failure everything built so far is torn down again.
    pub fn new(
        stage: &mut Stage,
        parent: NodeId,
        level: u32,
        layout: &[SliceLayout],
        geometry: &FloorGeometry,
    ) -> Result<Self, GameError> {
        let group = stage.scene.add_child(parent, NodeKind::Group, Transform::default());
        let mut floor = Self {
            level,
            group,
            slices: Vec::with_capacity(layout.len()),
        };

        for entry in layout {
            let spec = SliceSpec {
                start_angle: entry.start_angle,
                span: entry.span,
                level,
                kind: entry.kind,
            };
            match Slice::new(stage, group, spec, geometry) {
                Ok(slice) => floor.slices.push(slice),
                Err(err) => {
                    floor.destroy(stage);
                    return Err(err);
                }
            }
        }

        Ok(floor)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Slice covering `angle` degrees in floor-local (unrotated) coordinates
    pub fn slice_at(&self, angle: u32, unit: u32) -> Option<&Slice> {
        let angle = angle % 360;
        self.slices.iter().find(|s| {
            let spec = s.spec();
            angle >= spec.start_angle && angle < spec.start_angle + spec.span * unit
        })
    }

    pub fn kind_at(&self, angle: u32, unit: u32) -> Option<SliceKind> {
        self.slice_at(angle, unit).map(Slice::kind)
    }

    /// Kind of slice currently beneath a fixed world angle, given the
    /// floor's rotation about the vertical axis
    pub fn kind_under(&self, world_angle: f32, unit: u32) -> Option<SliceKind> {
        let rotation = self.slices.first().map_or(0.0, Slice::rotation);
        let local = normalize_degrees(world_angle + rotation);
        self.kind_at(local as u32, unit)
    }

    pub fn rotate(&mut self, stage: &mut Stage, angle: f32) {
        for slice in &mut self.slices {
            slice.rotate(stage, angle);
        }
    }

    pub fn fly(&mut self, stage: &mut Stage) {
        for slice in &mut self.slices {
            slice.fly(stage);
        }
    }

    pub fn destroy(self, stage: &mut Stage) {
        for slice in self.slices {
            slice.destroy(stage);
        }
        stage.scene.remove(self.group);
    }
}
