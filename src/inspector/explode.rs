//! Exploded-view animation.
//!
//! Directions are computed once per load. A single scalar eases between 0
//! and 1 and every part is placed at `original + direction * t * distance`.

use crate::core::types::Vec3;
use crate::math::Damped;
use crate::scene::{SceneGraph, SceneNodeId};

use super::config::Tuning;

/// One displaced mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplodePart {
    pub node: SceneNodeId,
    /// Local position at load time.
    pub original: Vec3,
    /// Unit displacement direction in the parent's local space.
    pub direction: Vec3,
}

/// World-space outward direction from `center` to `part_center`.
///
/// The vertical component never drops below `min_lift`, and a degenerate
/// offset falls back to straight up.
pub fn outward_direction(center: Vec3, part_center: Vec3, min_lift: f32) -> Vec3 {
    let mut offset = part_center - center;
    offset.y = offset.y.max(min_lift);
    let direction = offset.normalize_or_zero();
    if direction == Vec3::ZERO || !direction.is_finite() {
        Vec3::Y
    } else {
        direction
    }
}

/// Explode state for one loaded model.
#[derive(Clone, Debug)]
pub struct ExplodeRig {
    parts: Vec<ExplodePart>,
    exploded: bool,
    t: Damped<f32>,
    distance: f32,
}

impl ExplodeRig {
    /// Compute a part for every mesh below the model root.
    pub fn build(graph: &SceneGraph, tuning: &Tuning) -> Self {
        let root = graph.root();
        let center = graph.world_bounding_box(root).map(|b| b.center());

        let parts = match center {
            Some(center) => graph
                .meshes(root)
                .into_iter()
                .filter(|id| *id != root)
                .filter_map(|id| {
                    let part_center = graph.world_bounding_box(id)?.center();
                    let world = outward_direction(center, part_center, tuning.explode_min_lift);
                    let local = graph.parent_world_rotation(id).inverse() * world;
                    Some(ExplodePart {
                        node: id,
                        original: graph.position(id)?,
                        direction: local.normalize_or(Vec3::Y),
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        Self {
            parts,
            exploded: false,
            t: Damped::new(0.0, tuning.explode_smoothing),
            distance: tuning.explode_distance,
        }
    }

    pub fn parts(&self) -> &[ExplodePart] {
        &self.parts
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    pub fn set_exploded(&mut self, exploded: bool) {
        self.exploded = exploded;
        self.t.set_target(if exploded { 1.0 } else { 0.0 });
    }

    pub fn toggle(&mut self) {
        self.set_exploded(!self.exploded);
    }

    /// Current animation parameter in [0, 1].
    pub fn t(&self) -> f32 {
        *self.t.current()
    }

    /// Advance one frame and reposition every part.
    pub fn update(&mut self, graph: &mut SceneGraph) {
        let t = *self.t.update();
        let offset = t * self.distance;
        for part in &self.parts {
            graph.set_position(part.node, part.original + part.direction * offset);
        }
    }
}
