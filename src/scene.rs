//! Minimal retained scene graph
//!
//! The renderer is an external collaborator; the game core only attaches and
//! detaches nodes, moves them, and swaps materials. Nodes live in a flat arena
//! addressed by generation-checked ids so stale ids never alias a new node.

use glam::{Quat, Vec2, Vec3};

/// Handle to a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Flat-coloured material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// 0xRRGGBB
    pub color: u32,
    /// 0 = invisible, 1 = opaque
    pub opacity: f32,
}

impl Material {
    pub fn opaque(color: u32) -> Self {
        Self { color, opacity: 1.0 }
    }

    pub fn transparent(color: u32) -> Self {
        Self { color, opacity: 0.0 }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Extruded 2D outline (shape space XY, extruded along +Z)
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrudedMesh {
    pub outline: Vec<Vec2>,
    pub depth: f32,
    pub material: Material,
}

/// Sphere mesh
#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    pub radius: f32,
    pub material: Material,
}

/// What a node draws
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure grouping node
    Group,
    Extruded(ExtrudedMesh),
    Sphere(SphereMesh),
}

impl NodeKind {
    pub fn material(&self) -> Option<&Material> {
        match self {
            NodeKind::Group => None,
            NodeKind::Extruded(mesh) => Some(&mesh.material),
            NodeKind::Sphere(mesh) => Some(&mesh.material),
        }
    }
}

/// Local transform relative to the parent node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub transform: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-backed scene graph with a single root group.
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    len: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node {
                    kind: NodeKind::Group,
                    transform: Transform::default(),
                    parent: None,
                    children: Vec::new(),
                }),
            }],
            free: Vec::new(),
            root,
            len: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Attach a new node under `parent`. A stale parent falls back to the root.
    pub fn add_child(&mut self, parent: NodeId, kind: NodeKind, transform: Transform) -> NodeId {
        let parent = if self.contains(parent) {
            parent
        } else {
            log::warn!("add_child on missing parent {:?}, attaching to root", parent);
            self.root
        };

        let node = Node {
            kind,
            transform,
            parent: Some(parent),
            children: Vec::new(),
        };

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };

        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        self.len += 1;
        id
    }

    /// Detach a node and drop it with its whole subtree.
    /// Returns false if the node was already gone (or is the root).
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }

        if let Some(parent) = self.get(id).and_then(|n| n.parent) {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|&c| c != id);
            }
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let slot = &mut self.slots[next.index as usize];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(next.index);
                self.len -= 1;
            }
        }
        true
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Rotate a node about the world vertical axis (pre-multiplied).
    pub fn rotate_on_world_y(&mut self, id: NodeId, radians: f32) {
        if let Some(node) = self.get_mut(id) {
            node.transform.rotation = Quat::from_rotation_y(radians) * node.transform.rotation;
        }
    }

    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) {
        if let Some(node) = self.get_mut(id) {
            node.transform.translation = translation;
        }
    }

    /// Replace the material of a mesh node. Groups are left alone.
    pub fn set_material(&mut self, id: NodeId, material: Material) {
        if let Some(node) = self.get_mut(id) {
            match &mut node.kind {
                NodeKind::Group => {}
                NodeKind::Extruded(mesh) => mesh.material = material,
                NodeKind::Sphere(mesh) => mesh.material = material,
            }
        }
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere() -> NodeKind {
        NodeKind::Sphere(SphereMesh {
            radius: 1.0,
            material: Material::opaque(0xffff00),
        })
    }

    #[test]
    fn test_add_and_remove_child() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let id = scene.add_child(root, sphere(), Transform::default());

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(root).unwrap().children(), &[id]);
        assert_eq!(scene.get(id).unwrap().parent(), Some(root));

        assert!(scene.remove(id));
        assert!(!scene.contains(id));
        assert!(scene.get(root).unwrap().children().is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut scene = SceneGraph::new();
        let group = scene.add_child(scene.root(), NodeKind::Group, Transform::default());
        let a = scene.add_child(group, sphere(), Transform::default());
        let b = scene.add_child(group, sphere(), Transform::default());

        assert!(scene.remove(group));
        assert!(!scene.contains(a));
        assert!(!scene.contains(b));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_stale_ids_do_not_alias_reused_slots() {
        let mut scene = SceneGraph::new();
        let old = scene.add_child(scene.root(), sphere(), Transform::default());
        scene.remove(old);
        let new = scene.add_child(scene.root(), NodeKind::Group, Transform::default());

        assert_ne!(old, new);
        assert!(!scene.contains(old));
        assert!(!scene.remove(old));
        assert!(scene.contains(new));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut scene = SceneGraph::new();
        assert!(!scene.remove(scene.root()));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_world_y_rotation_accumulates() {
        let mut scene = SceneGraph::new();
        let id = scene.add_child(scene.root(), sphere(), Transform::default());
        scene.rotate_on_world_y(id, 0.25);
        scene.rotate_on_world_y(id, 0.25);

        let rotation = scene.get(id).unwrap().transform.rotation;
        assert!(rotation.angle_between(Quat::from_rotation_y(0.5)) < 1e-5);
    }

    #[test]
    fn test_set_material_swaps_opacity() {
        let mut scene = SceneGraph::new();
        let id = scene.add_child(scene.root(), sphere(), Transform::default());
        scene.set_material(id, Material::transparent(0));

        let material = scene.get(id).unwrap().kind.material().copied().unwrap();
        assert!(!material.is_visible());
    }
}
