//! Serialized model description.
//!
//! Models arrive as JSON: a named root with a tree of nodes, each carrying a
//! transform and optional mesh bounds. Geometry itself belongs to the
//! renderer; the inspector only needs names, hierarchy and bounds.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::math::Aabb;

use super::graph::SceneGraph;
use super::node::{LocalTransform, NodeContent, SceneNodeId};

/// Top-level model file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneDescription {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
}

/// Mesh bounds in the node's local space.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MeshDescription {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// One node of the model tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default)]
    pub position: [f32; 3],
    /// Quaternion as `[x, y, z, w]`.
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub mesh: Option<MeshDescription>,
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_visible() -> bool {
    true
}

impl SceneDescription {
    /// Parse a model from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Built-in graphics card assembly used when no model is given.
    pub fn demo() -> Result<Self> {
        Self::from_json_str(DEMO_ASSEMBLY)
    }

    /// Instantiate a fresh scene graph for this model.
    pub fn build(&self) -> SceneGraph {
        let mut graph = SceneGraph::new(self.name.clone());
        let root = graph.root();
        for node in &self.nodes {
            add_node(&mut graph, root, node);
        }
        graph
    }
}

fn add_node(graph: &mut SceneGraph, parent: SceneNodeId, desc: &NodeDescription) {
    let content = match desc.mesh {
        Some(mesh) => NodeContent::Mesh {
            bounds: Aabb::new(Vec3::from(mesh.min), Vec3::from(mesh.max)),
        },
        None => NodeContent::Group,
    };
    let id = graph.add_child(parent, desc.name.clone(), content);
    graph.set_transform(
        id,
        LocalTransform {
            position: Vec3::from(desc.position),
            rotation: unit_rotation(desc.rotation),
            scale: Vec3::from(desc.scale),
        },
    );
    graph.set_visible(id, desc.visible);
    for child in &desc.children {
        add_node(graph, id, child);
    }
}

/// Normalized rotation; zero-length or non-finite input falls back to identity.
fn unit_rotation(xyzw: [f32; 4]) -> Quat {
    let q = Quat::from_array(xyzw);
    let len_sq = q.length_squared();
    if len_sq.is_finite() && len_sq > f32::EPSILON {
        q.normalize()
    } else {
        Quat::IDENTITY
    }
}

/// A dual-fan graphics card lying on the XZ plane, fans facing up.
const DEMO_ASSEMBLY: &str = r#"{
  "name": "GPU Assembly",
  "nodes": [
    { "name": "RTX 5090", "position": [0.0, 0.6, 0.0],
      "mesh": { "min": [-3.0, -0.1, -1.2], "max": [3.0, 0.1, 1.2] },
      "children": [
        { "name": "GDDR7 Memory", "position": [0.0, 0.15, 0.0],
          "mesh": { "min": [-0.9, -0.05, -0.7], "max": [0.9, 0.05, 0.7] } },
        { "name": "PCIe Connector", "position": [0.5, -0.1, -1.25],
          "mesh": { "min": [-1.4, -0.05, -0.1], "max": [1.4, 0.05, 0.1] } }
      ] },
    { "name": "Shroud", "position": [0.0, 1.2, 0.0],
      "mesh": { "min": [-3.1, -0.3, -1.3], "max": [3.1, 0.3, 1.3] } },
    { "name": "Fan", "position": [-1.5, 1.6, 0.0],
      "mesh": { "min": [-0.9, -0.1, -0.9], "max": [0.9, 0.1, 0.9] } },
    { "name": "Fan.001", "position": [1.5, 1.6, 0.0],
      "mesh": { "min": [-0.9, -0.1, -0.9], "max": [0.9, 0.1, 0.9] } },
    { "name": "Fan_Heatsink", "position": [0.0, 0.95, 0.0],
      "children": [
        { "name": "Fin Stack A", "position": [-1.5, 0.0, 0.0],
          "mesh": { "min": [-1.3, -0.2, -1.0], "max": [1.3, 0.2, 1.0] } },
        { "name": "Fin Stack B", "position": [1.5, 0.0, 0.0],
          "mesh": { "min": [-1.3, -0.2, -1.0], "max": [1.3, 0.2, 1.0] } }
      ] },
    { "name": "Fan_Backplate", "position": [0.0, 0.4, 0.0],
      "mesh": { "min": [-3.0, -0.05, -1.2], "max": [3.0, 0.05, 1.2] } },
    { "name": "Power Connector 16-pin", "position": [1.8, 1.2, 1.35],
      "mesh": { "min": [-0.3, -0.15, -0.1], "max": [0.3, 0.15, 0.1] } },
    { "name": "Display Outputs", "position": [-3.2, 0.8, 0.0],
      "mesh": { "min": [-0.05, -0.4, -1.1], "max": [0.05, 0.4, 1.1] } },
    { "name": "Display Stand", "position": [0.0, 0.0, 0.0],
      "mesh": { "min": [-4.0, -0.05, -2.0], "max": [4.0, 0.05, 2.0] } }
  ]
}"#;
