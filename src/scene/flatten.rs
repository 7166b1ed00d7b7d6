//! Flattened scene graph output for the renderer.
//!
//! `DrawItem` is the result of walking the scene graph: one entry per visible
//! mesh, with its world transform resolved and any highlight tint inherited
//! from an ancestor already applied.

use glam::Mat4;

use crate::math::Aabb;

use super::node::SceneNodeId;

/// One entry in the flattened visible set.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    /// Source node.
    pub node: SceneNodeId,
    /// Local-to-world transform.
    pub world_transform: Mat4,
    /// Local-space bounds of the mesh.
    pub bounds: Aabb,
    /// Effective highlight tint.
    pub highlight: Option<[f32; 3]>,
}

impl DrawItem {
    /// World-space bounds of this item.
    pub fn world_bounds(&self) -> Aabb {
        self.bounds.transformed(&self.world_transform)
    }
}
