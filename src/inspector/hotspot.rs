//! Screen-space hotspot annotations anchored to named parts.

use serde::{Deserialize, Serialize};

use crate::core::camera::Camera;
use crate::core::types::{Vec2, Vec3};
use crate::math::Ray;
use crate::scene::{SceneGraph, SceneNodeId};

use super::config::HotspotDescriptor;

/// Which side of its marker a detail card sits on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSide {
    #[default]
    Right,
    Left,
}

/// One resolved annotation.
#[derive(Clone, Debug)]
pub struct HotspotInstance {
    pub title: String,
    pub description: String,
    pub anchor: SceneNodeId,
    /// Marker position, normalized: (0, 0) top-left, (1, 1) bottom-right.
    pub marker: Vec2,
    pub marker_visible: bool,
    /// Card anchor point, same space as `marker`.
    pub card: Vec2,
    pub card_side: CardSide,
    pub open: bool,
}

impl HotspotInstance {
    fn new(descriptor: &HotspotDescriptor, anchor: SceneNodeId) -> Self {
        Self {
            title: descriptor.title.clone(),
            description: descriptor.description.clone(),
            anchor,
            marker: Vec2::ZERO,
            marker_visible: false,
            card: Vec2::ZERO,
            card_side: CardSide::Right,
            open: false,
        }
    }
}

/// Resolve a match token: exact name first, then substring.
pub fn resolve_anchor(graph: &SceneGraph, token: &str) -> Option<SceneNodeId> {
    graph.find_by_name(token).or_else(|| graph.find_containing(token))
}

/// Annotation state for one loaded model.
#[derive(Clone, Debug, Default)]
pub struct HotspotSet {
    instances: Vec<HotspotInstance>,
    card_offset: f32,
}

impl HotspotSet {
    /// Resolve every descriptor against `graph`, skipping those that match nothing.
    pub fn build(graph: &SceneGraph, descriptors: &[HotspotDescriptor], card_offset: f32) -> Self {
        let instances = descriptors
            .iter()
            .filter_map(|descriptor| match resolve_anchor(graph, &descriptor.token) {
                Some(anchor) => Some(HotspotInstance::new(descriptor, anchor)),
                None => {
                    log::warn!("Hotspot '{}' has no matching node, skipped", descriptor.token);
                    None
                }
            })
            .collect();
        Self {
            instances,
            card_offset,
        }
    }

    pub fn instances(&self) -> &[HotspotInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Reproject every marker through `camera`.
    pub fn update(&mut self, graph: &SceneGraph, camera: &Camera) {
        for instance in &mut self.instances {
            let world = match graph.world_bounding_box(instance.anchor) {
                Some(bounds) => bounds.center(),
                None => graph.world_transform(instance.anchor).transform_point3(Vec3::ZERO),
            };
            let projected = camera.project(world);
            if projected.behind {
                instance.marker_visible = false;
                instance.open = false;
                continue;
            }

            let marker = Vec2::new((projected.ndc.x + 1.0) * 0.5, (1.0 - projected.ndc.y) * 0.5);
            instance.marker = marker;
            instance.marker_visible = true;
            if marker.x > 0.5 {
                instance.card_side = CardSide::Left;
                instance.card = marker - Vec2::new(self.card_offset, 0.0);
            } else {
                instance.card_side = CardSide::Right;
                instance.card = marker + Vec2::new(self.card_offset, 0.0);
            }
        }
    }

    /// Toggle the annotation owning the nearest visible geometry under `ray`.
    pub fn try_show(&mut self, graph: &SceneGraph, ray: &Ray) -> bool {
        let meshes = graph.meshes(graph.root());
        let Some(hit) = graph.intersect(ray, &meshes).into_iter().next() else {
            return false;
        };
        let index = graph
            .ancestors(hit.node)
            .find_map(|node| self.instances.iter().position(|i| i.anchor == node.id));
        match index {
            Some(index) => self.toggle(index),
            None => false,
        }
    }

    /// Flip one annotation; false for an unknown index.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.instances.get_mut(index) {
            Some(instance) => {
                instance.open = !instance.open;
                log::debug!("Hotspot '{}' open = {}", instance.title, instance.open);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::camera::ProjectionMode;
    use crate::math::Aabb;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    fn graph() -> (SceneGraph, SceneNodeId, SceneNodeId) {
        let mut graph = SceneGraph::new("root");
        let root = graph.root();
        let long_pos = Vec3::new(-2.0, 0.0, 0.0);
        let long = graph.add_mesh(root, "RTX 5090 Backplate", long_pos, unit_box());
        let exact = graph.add_mesh(root, "RTX 5090", Vec3::new(2.0, 0.0, 0.0), unit_box());
        (graph, long, exact)
    }

    fn camera() -> Camera {
        Camera::new(ProjectionMode::Orthographic, Vec3::new(0.0, 0.0, 10.0), 1.0)
    }

    #[test]
    fn test_exact_match_preferred() {
        let (graph, long, exact) = graph();
        let set = HotspotSet::build(
            &graph,
            &[
                HotspotDescriptor::new("RTX 5090", "GPU", ""),
                HotspotDescriptor::new("Backplate", "Plate", ""),
            ],
            0.03,
        );
        assert_eq!(set.instances()[0].anchor, exact);
        assert_eq!(set.instances()[1].anchor, long);
    }

    #[test]
    fn test_unresolved_dropped() {
        let (graph, ..) = graph();
        let set = HotspotSet::build(
            &graph,
            &[
                HotspotDescriptor::new("NVLink", "Bridge", ""),
                HotspotDescriptor::new("RTX 5090", "GPU", ""),
            ],
            0.03,
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.instances()[0].title, "GPU");
        assert!(!set.instances()[0].open);
    }

    #[test]
    fn test_update_places_marker_and_flips_card() {
        let (graph, ..) = graph();
        let mut set = HotspotSet::build(
            &graph,
            &[
                HotspotDescriptor::new("RTX 5090", "GPU", ""),
                HotspotDescriptor::new("Backplate", "Plate", ""),
            ],
            0.03,
        );
        set.update(&graph, &camera());

        let gpu = &set.instances()[0];
        assert!(gpu.marker_visible);
        // x=2 of a 6-wide view: ndc 2/3 -> normalized 5/6
        assert!((gpu.marker.x - 5.0 / 6.0).abs() < 1e-4);
        assert!((gpu.marker.y - 0.5).abs() < 1e-4);
        assert_eq!(gpu.card_side, CardSide::Left);
        assert!(gpu.card.x < gpu.marker.x);

        let plate = &set.instances()[1];
        assert_eq!(plate.card_side, CardSide::Right);
        assert!(plate.card.x > plate.marker.x);
    }

    #[test]
    fn test_behind_camera_closes_card() {
        let (graph, ..) = graph();
        let descriptors = [HotspotDescriptor::new("RTX 5090", "GPU", "")];
        let mut set = HotspotSet::build(&graph, &descriptors, 0.03);
        set.toggle(0);
        assert!(set.instances()[0].open);

        let mut cam = camera();
        cam.position = Vec3::new(0.0, 0.0, -10.0);
        set.update(&graph, &cam);
        assert!(!set.instances()[0].marker_visible);
        assert!(!set.instances()[0].open);
    }

    #[test]
    fn test_try_show_toggles_hit_anchor() {
        let (mut graph, _, exact) = graph();
        let descriptors = [HotspotDescriptor::new("RTX 5090", "GPU", "")];
        let mut set = HotspotSet::build(&graph, &descriptors, 0.03);
        let ray = Ray::new(Vec3::new(2.0, 0.0, 10.0), -Vec3::Z);
        assert!(set.try_show(&graph, &ray));
        assert!(set.instances()[0].open);

        // Missing the model, or hitting an unannotated part, is unhandled
        assert!(!set.try_show(&graph, &Ray::new(Vec3::new(9.0, 0.0, 10.0), -Vec3::Z)));
        assert!(!set.try_show(&graph, &Ray::new(Vec3::new(-2.0, 0.0, 10.0), -Vec3::Z)));

        // Hidden parts are not hit
        graph.set_visible(exact, false);
        assert!(!set.try_show(&graph, &ray));
        assert!(set.instances()[0].open);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let (graph, ..) = graph();
        let mut set = HotspotSet::build(&graph, &[], 0.03);
        assert!(set.is_empty());
        assert!(!set.toggle(3));
    }
}
