//! Pointer interaction: hover highlighting and click-to-toggle.

use crate::math::Ray;
use crate::scene::{SceneGraph, SceneNodeId};

use super::grouping::{ToggleUnit, ToggleUnits};

/// Forces hidden toggleable nodes visible while alive.
///
/// Prior visibility is restored on drop, so every exit path of a hit test
/// leaves the graph as it found it.
struct VisibilityOverride<'a> {
    graph: &'a mut SceneGraph,
    restore: Vec<SceneNodeId>,
}

impl<'a> VisibilityOverride<'a> {
    fn show_all(graph: &'a mut SceneGraph, nodes: impl Iterator<Item = SceneNodeId>) -> Self {
        let mut restore = Vec::new();
        for id in nodes {
            if !graph.is_visible(id) {
                graph.set_visible(id, true);
                restore.push(id);
            }
        }
        Self { graph, restore }
    }

    fn graph(&self) -> &SceneGraph {
        self.graph
    }
}

impl Drop for VisibilityOverride<'_> {
    fn drop(&mut self) {
        for id in &self.restore {
            self.graph.set_visible(*id, false);
        }
    }
}

/// Hover and toggle state for one loaded model.
#[derive(Clone, Debug)]
pub struct PointerInteraction {
    hovered: Option<ToggleUnit>,
    highlight: [f32; 3],
}

impl PointerInteraction {
    pub fn new(highlight: [f32; 3]) -> Self {
        Self {
            hovered: None,
            highlight,
        }
    }

    /// Unit currently carrying the hover tint.
    pub fn hovered(&self) -> Option<ToggleUnit> {
        self.hovered
    }

    /// Update the hover highlight from a pointer ray.
    ///
    /// Only visible toggleable geometry is considered. A miss changes
    /// nothing. Returns true when the highlight moved.
    pub fn on_pointer_move(
        &mut self,
        graph: &mut SceneGraph,
        units: &ToggleUnits,
        ray: &Ray,
    ) -> bool {
        let Some(hit) = graph.intersect(ray, units.meshes()).into_iter().next() else {
            return false;
        };
        let Some(owner) = units.owner(graph, hit.node) else {
            return false;
        };
        if self.hovered == Some(owner) {
            return false;
        }

        self.clear_hover(graph, units);
        for id in units.nodes(owner) {
            graph.set_highlight(*id, Some(self.highlight));
        }
        self.hovered = Some(owner);
        true
    }

    /// Toggle the unit under the ray, hidden parts included.
    ///
    /// Returns false, mutating nothing, when no toggleable geometry is hit.
    pub fn try_toggle(
        &mut self,
        graph: &mut SceneGraph,
        units: &mut ToggleUnits,
        ray: &Ray,
    ) -> bool {
        let owner = {
            let scope = VisibilityOverride::show_all(graph, units.toggleable_nodes());
            let graph = scope.graph();
            graph
                .intersect(ray, units.meshes())
                .into_iter()
                .find_map(|hit| units.owner(graph, hit.node))
        };
        let Some(owner) = owner else {
            return false;
        };

        self.clear_hover(graph, units);
        units.toggle(graph, owner);
        true
    }

    /// Remove the hover tint, if any.
    pub fn clear_hover(&mut self, graph: &mut SceneGraph, units: &ToggleUnits) {
        if let Some(previous) = self.hovered.take() {
            for id in units.nodes(previous) {
                graph.set_highlight(*id, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::inspector::config::GroupingTokens;
    use crate::math::Aabb;

    const TINT: [f32; 3] = [0.0, 1.0, 1.0];

    struct Fixture {
        graph: SceneGraph,
        units: ToggleUnits,
        fan: SceneNodeId,
        sink: SceneNodeId,
        plate: SceneNodeId,
    }

    /// Fan at x=-2, two group members at x=0 and x=2, an untoggleable shroud at x=4.
    fn fixture() -> Fixture {
        let mut graph = SceneGraph::new("root");
        let root = graph.root();
        let b = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let fan = graph.add_mesh(root, "Fan", Vec3::new(-2.0, 0.0, 0.0), b);
        let sink = graph.add_mesh(root, "Fan_Heatsink", Vec3::new(0.0, 0.0, 0.0), b);
        let plate = graph.add_mesh(root, "Fan_Backplate", Vec3::new(2.0, 0.0, 0.0), b);
        graph.add_mesh(root, "Shroud", Vec3::new(4.0, 0.0, 0.0), b);
        let units = ToggleUnits::build(&graph, &GroupingTokens::default());
        Fixture { graph, units, fan, sink, plate }
    }

    fn ray_at(x: f32) -> Ray {
        Ray::new(Vec3::new(x, 0.0, 10.0), -Vec3::Z)
    }

    fn highlighted(graph: &SceneGraph) -> Vec<SceneNodeId> {
        graph
            .descendants(graph.root())
            .into_iter()
            .filter(|id| graph.highlight(*id).is_some())
            .collect()
    }

    #[test]
    fn test_hover_highlights_whole_group() {
        let mut f = fixture();
        let mut pointer = PointerInteraction::new(TINT);
        assert!(pointer.on_pointer_move(&mut f.graph, &f.units, &ray_at(0.0)));
        assert_eq!(highlighted(&f.graph), vec![f.sink, f.plate]);
        assert_eq!(pointer.hovered(), Some(ToggleUnit::Group));

        // Same group again is a no-op
        assert!(!pointer.on_pointer_move(&mut f.graph, &f.units, &ray_at(2.0)));
    }

    #[test]
    fn test_hover_is_mutually_exclusive() {
        let mut f = fixture();
        let mut pointer = PointerInteraction::new(TINT);
        pointer.on_pointer_move(&mut f.graph, &f.units, &ray_at(0.0));
        pointer.on_pointer_move(&mut f.graph, &f.units, &ray_at(-2.0));
        assert_eq!(highlighted(&f.graph), vec![f.fan]);
    }

    #[test]
    fn test_miss_changes_nothing() {
        let mut f = fixture();
        let mut pointer = PointerInteraction::new(TINT);
        pointer.on_pointer_move(&mut f.graph, &f.units, &ray_at(-2.0));

        for x in [10.0, 4.0] {
            assert!(!pointer.on_pointer_move(&mut f.graph, &f.units, &ray_at(x)));
            assert!(!pointer.try_toggle(&mut f.graph, &mut f.units, &ray_at(x)));
            assert_eq!(highlighted(&f.graph), vec![f.fan]);
            assert_eq!(f.units.hidden_count(&f.graph), 0);
        }
    }

    #[test]
    fn test_hidden_parts_not_hoverable() {
        let mut f = fixture();
        let mut pointer = PointerInteraction::new(TINT);
        f.graph.set_visible(f.fan, false);
        assert!(!pointer.on_pointer_move(&mut f.graph, &f.units, &ray_at(-2.0)));
        assert!(highlighted(&f.graph).is_empty());
    }

    #[test]
    fn test_toggle_reaches_hidden_part_and_restores_others() {
        let mut f = fixture();
        let mut pointer = PointerInteraction::new(TINT);

        assert!(pointer.try_toggle(&mut f.graph, &mut f.units, &ray_at(-2.0)));
        assert!(!f.graph.is_visible(f.fan));
        assert!(pointer.try_toggle(&mut f.graph, &mut f.units, &ray_at(0.0)));
        assert!(!f.graph.is_visible(f.sink) && !f.graph.is_visible(f.plate));

        // Clicking the hidden fan again brings it back; the group stays hidden
        assert!(pointer.try_toggle(&mut f.graph, &mut f.units, &ray_at(-2.0)));
        assert!(f.graph.is_visible(f.fan));
        assert!(!f.graph.is_visible(f.sink) && !f.graph.is_visible(f.plate));
    }

    #[test]
    fn test_toggle_clears_hover() {
        let mut f = fixture();
        let mut pointer = PointerInteraction::new(TINT);
        pointer.on_pointer_move(&mut f.graph, &f.units, &ray_at(0.0));
        assert!(pointer.try_toggle(&mut f.graph, &mut f.units, &ray_at(-2.0)));
        assert!(highlighted(&f.graph).is_empty());
        assert_eq!(pointer.hovered(), None);
    }
}
