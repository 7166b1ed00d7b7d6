//! Scene graph: CPU-side hierarchy of named nodes.
//!
//! This is the query surface the inspector needs from the renderer: name
//! lookup, traversal, ray hits against meshes, world bounds, visibility and
//! highlight. Each frame, `flatten()` walks the tree and produces a flat
//! `Vec<DrawItem>` for the renderer to consume.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use crate::math::{Aabb, Ray};

use super::flatten::DrawItem;
use super::node::{LocalTransform, NodeContent, SceneNode, SceneNodeId};

/// A ray hit against a mesh node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: SceneNodeId,
    /// World-space distance from the ray origin.
    pub distance: f32,
}

/// CPU-side scene graph owning one loaded model.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
}

impl SceneGraph {
    /// Create a new scene graph with a root Group node.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, root_name, NodeContent::Group);

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a child node under `parent`. Returns the new node's ID.
    pub fn add_child(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        content: NodeContent,
    ) -> SceneNodeId {
        let id = self.alloc_id();
        let mut node = SceneNode::new(id, name, content);
        node.parent = Some(parent);

        self.nodes.insert(id, node);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        id
    }

    /// Add a mesh child with local `bounds` at `position`.
    pub fn add_mesh(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        position: Vec3,
        bounds: Aabb,
    ) -> SceneNodeId {
        let id = self.add_child(parent, name, NodeContent::Mesh { bounds });
        self.set_transform(id, LocalTransform::from_position(position));
        id
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    /// Set only the local position of a node.
    pub fn set_position(&mut self, id: SceneNodeId, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform.position = position;
        }
    }

    /// Local position of a node, if it exists.
    pub fn position(&self, id: SceneNodeId) -> Option<Vec3> {
        self.nodes.get(&id).map(|n| n.local_transform.position)
    }

    /// Set the visibility flag of a node.
    pub fn set_visible(&mut self, id: SceneNodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }

    /// The node's own visibility flag.
    pub fn is_visible(&self, id: SceneNodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.visible)
    }

    /// True if the node and every ancestor are visible.
    pub fn is_effectively_visible(&self, id: SceneNodeId) -> bool {
        let mut found = false;
        for node in self.ancestors(id) {
            found = true;
            if !node.visible {
                return false;
            }
        }
        found
    }

    /// Set or clear the highlight tint of a node.
    pub fn set_highlight(&mut self, id: SceneNodeId, tint: Option<[f32; 3]>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.highlight = tint;
        }
    }

    /// The node's own highlight tint.
    pub fn highlight(&self, id: SceneNodeId) -> Option<[f32; 3]> {
        self.nodes.get(&id).and_then(|n| n.highlight)
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Name of a node, or "" for unknown ids.
    pub fn name(&self, id: SceneNodeId) -> &str {
        self.nodes.get(&id).map(|n| n.name.as_str()).unwrap_or("")
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Walk from `id` up to the root, starting with `id` itself.
    pub fn ancestors(&self, id: SceneNodeId) -> impl Iterator<Item = &SceneNode> + '_ {
        let mut next = self.nodes.get(&id);
        std::iter::from_fn(move || {
            let current = next?;
            next = current.parent.and_then(|p| self.nodes.get(&p));
            Some(current)
        })
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first pre-order visit of the subtree at `start`, in child order.
    pub fn traverse(&self, start: SceneNodeId, mut visitor: impl FnMut(&SceneNode)) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            visitor(node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Ids of the subtree at `start` (inclusive) in traversal order.
    pub fn descendants(&self, start: SceneNodeId) -> Vec<SceneNodeId> {
        let mut out = Vec::new();
        self.traverse(start, |n| out.push(n.id));
        out
    }

    /// Mesh ids of the subtree at `start` (inclusive) in traversal order.
    pub fn meshes(&self, start: SceneNodeId) -> Vec<SceneNodeId> {
        let mut out = Vec::new();
        self.traverse(start, |n| {
            if n.is_mesh() {
                out.push(n.id);
            }
        });
        out
    }

    /// First node in traversal order whose name equals `name`.
    pub fn find_by_name(&self, name: &str) -> Option<SceneNodeId> {
        let mut found = None;
        self.traverse(self.root, |n| {
            if found.is_none() && n.name == name {
                found = Some(n.id);
            }
        });
        found
    }

    /// First node in traversal order whose name contains `pattern`.
    pub fn find_containing(&self, pattern: &str) -> Option<SceneNodeId> {
        let mut found = None;
        self.traverse(self.root, |n| {
            if found.is_none() && n.name.contains(pattern) {
                found = Some(n.id);
            }
        });
        found
    }

    /// World transform of a node, composed from the root down.
    pub fn world_transform(&self, id: SceneNodeId) -> Mat4 {
        self.ancestors(id)
            .fold(Mat4::IDENTITY, |acc, node| node.local_transform.to_mat4() * acc)
    }

    /// World rotation of a node's parent (identity for the root).
    pub fn parent_world_rotation(&self, id: SceneNodeId) -> Quat {
        match self.nodes.get(&id).and_then(|n| n.parent) {
            Some(parent) => {
                let (_, rotation, _) = self.world_transform(parent).to_scale_rotation_translation();
                rotation
            }
            None => Quat::IDENTITY,
        }
    }

    /// World-space bounds of every mesh in the subtree, visible or not.
    ///
    /// `None` when the subtree holds no geometry.
    pub fn world_bounding_box(&self, id: SceneNodeId) -> Option<Aabb> {
        let mut bounds = Aabb::empty();
        for mesh in self.meshes(id) {
            let content = self.nodes.get(&mesh).map(|n| &n.content);
            if let Some(NodeContent::Mesh { bounds: local }) = content {
                bounds = bounds.merged(&local.transformed(&self.world_transform(mesh)));
            }
        }
        (!bounds.is_empty()).then_some(bounds)
    }

    /// Intersect `ray` against the effectively visible meshes in `candidates`.
    ///
    /// Hits are sorted nearest first.
    pub fn intersect(&self, ray: &Ray, candidates: &[SceneNodeId]) -> Vec<Hit> {
        let mut hits: Vec<Hit> = candidates
            .iter()
            .filter(|id| self.is_effectively_visible(**id))
            .filter_map(|id| {
                let node = self.nodes.get(id)?;
                let NodeContent::Mesh { bounds } = &node.content else {
                    return None;
                };
                let distance = ray.intersects_oriented(bounds, &self.world_transform(*id))?;
                Some(Hit { node: *id, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Walk the tree and collect every visible mesh as a draw item.
    pub fn flatten(&self) -> Vec<DrawItem> {
        let mut out = Vec::new();
        self.collect_visible(self.root, Mat4::IDENTITY, None, &mut out);
        out
    }

    /// Recursively collect visible meshes, propagating transform and highlight.
    fn collect_visible(
        &self,
        node_id: SceneNodeId,
        parent_world: Mat4,
        inherited_highlight: Option<[f32; 3]>,
        out: &mut Vec<DrawItem>,
    ) {
        let node = match self.nodes.get(&node_id) {
            Some(n) => n,
            None => return,
        };

        if !node.visible {
            return;
        }

        let world = parent_world * node.local_transform.to_mat4();
        let highlight = node.highlight.or(inherited_highlight);

        if let NodeContent::Mesh { bounds } = &node.content {
            out.push(DrawItem {
                node: node_id,
                world_transform: world,
                bounds: *bounds,
                highlight,
            });
        }

        for &child_id in &node.children {
            self.collect_visible(child_id, world, highlight, out);
        }
    }
}
