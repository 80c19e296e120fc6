//! Shared world the tower and ball build into
//!
//! Physics bodies, scene nodes and collider tags are created and destroyed
//! together, so they travel as one value.

use crate::config::PhysicsConfig;
use crate::physics::PhysicsWorld;
use crate::scene::SceneGraph;

use super::collision::ColliderTags;

pub struct Stage {
    pub physics: PhysicsWorld,
    pub scene: SceneGraph,
    pub tags: ColliderTags,
}

impl Stage {
    pub fn new(config: &PhysicsConfig) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.dt);
        Self {
            physics,
            scene: SceneGraph::new(),
            tags: ColliderTags::new(),
        }
    }
}
