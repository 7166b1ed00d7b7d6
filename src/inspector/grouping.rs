//! Part grouping: which nodes of a loaded model the user can show and hide.
//!
//! Classification is name based. [`classify`] is a pure function of a node
//! name and the configured tokens; [`ToggleUnits::build`] applies it to every
//! node of a graph once per load.

use std::collections::HashSet;

use crate::scene::{SceneGraph, SceneNodeId};

use super::config::GroupingTokens;

/// How a single node name classifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartKind {
    /// Toggled on its own.
    Individual,
    /// Toggled together with every other group member.
    GroupMember,
}

/// Classify a node name. `None` means the node is not toggleable.
pub fn classify(name: &str, tokens: &GroupingTokens) -> Option<PartKind> {
    if !name.contains(tokens.group_token.as_str()) {
        return None;
    }
    let variant = !tokens.variant_token.is_empty() && name.contains(tokens.variant_token.as_str());
    if name == tokens.canonical_name || variant {
        Some(PartKind::Individual)
    } else {
        Some(PartKind::GroupMember)
    }
}

/// A resolved toggle handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToggleUnit {
    Individual(SceneNodeId),
    /// The single shared group of the model.
    Group,
}

/// Toggle classification of one loaded model.
#[derive(Clone, Debug, Default)]
pub struct ToggleUnits {
    individuals: Vec<SceneNodeId>,
    group_members: Vec<SceneNodeId>,
    /// Meshes inside any toggleable subtree, each listed once.
    meshes: Vec<SceneNodeId>,
    /// Visibility shared by every group member.
    group_visible: bool,
}

impl ToggleUnits {
    /// Classify every node of `graph`, in traversal order.
    pub fn build(graph: &SceneGraph, tokens: &GroupingTokens) -> Self {
        let mut units = Self {
            group_visible: true,
            ..Default::default()
        };

        graph.traverse(graph.root(), |node| match classify(&node.name, tokens) {
            Some(PartKind::Individual) => units.individuals.push(node.id),
            Some(PartKind::GroupMember) => units.group_members.push(node.id),
            None => {}
        });

        let mut seen = HashSet::new();
        for id in units.individuals.iter().chain(&units.group_members) {
            for mesh in graph.meshes(*id) {
                if seen.insert(mesh) {
                    units.meshes.push(mesh);
                }
            }
        }

        // Start from a uniform group so later toggles keep members in step.
        if let Some(first) = units.group_members.first() {
            units.group_visible = graph.is_visible(*first);
        }

        log::debug!(
            "Grouping: {} individual(s), {} group member(s), {} toggleable mesh(es)",
            units.individuals.len(),
            units.group_members.len(),
            units.meshes.len()
        );
        units
    }

    pub fn individuals(&self) -> &[SceneNodeId] {
        &self.individuals
    }

    pub fn group_members(&self) -> &[SceneNodeId] {
        &self.group_members
    }

    /// Meshes that resolve to some toggle unit.
    pub fn meshes(&self) -> &[SceneNodeId] {
        &self.meshes
    }

    pub fn group_visible(&self) -> bool {
        self.group_visible
    }

    /// Every node classified as toggleable.
    pub fn toggleable_nodes(&self) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.individuals.iter().chain(&self.group_members).copied()
    }

    /// Nodes a unit covers.
    pub fn nodes(&self, unit: ToggleUnit) -> &[SceneNodeId] {
        match unit {
            ToggleUnit::Individual(id) => {
                let index = self.individuals.iter().position(|n| *n == id);
                match index {
                    Some(i) => std::slice::from_ref(&self.individuals[i]),
                    None => &[],
                }
            }
            ToggleUnit::Group => &self.group_members,
        }
    }

    /// Walk up from `hit` and return the nearest toggle unit.
    ///
    /// The first classified ancestor wins, so an individual nested below a
    /// group member owns its own geometry.
    pub fn owner(&self, graph: &SceneGraph, hit: SceneNodeId) -> Option<ToggleUnit> {
        graph.ancestors(hit).find_map(|node| {
            if self.individuals.contains(&node.id) {
                Some(ToggleUnit::Individual(node.id))
            } else if self.group_members.contains(&node.id) {
                Some(ToggleUnit::Group)
            } else {
                None
            }
        })
    }

    /// Flip a unit's visibility.
    pub fn toggle(&mut self, graph: &mut SceneGraph, unit: ToggleUnit) {
        match unit {
            ToggleUnit::Individual(id) => {
                let visible = !graph.is_visible(id);
                graph.set_visible(id, visible);
                log::debug!("Toggled '{}' -> {}", graph.name(id), visible);
            }
            ToggleUnit::Group => {
                self.group_visible = !self.group_visible;
                for id in &self.group_members {
                    graph.set_visible(*id, self.group_visible);
                }
                log::debug!(
                    "Toggled group ({} members) -> {}",
                    self.group_members.len(),
                    self.group_visible
                );
            }
        }
    }

    /// Number of toggleable nodes currently hidden.
    pub fn hidden_count(&self, graph: &SceneGraph) -> usize {
        self.toggleable_nodes().filter(|id| !graph.is_visible(*id)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::math::Aabb;
    use crate::scene::NodeContent;

    fn tokens() -> GroupingTokens {
        GroupingTokens::default()
    }

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    #[test]
    fn test_classify() {
        let t = tokens();
        assert_eq!(classify("Fan", &t), Some(PartKind::Individual));
        assert_eq!(classify("Fan.001", &t), Some(PartKind::Individual));
        assert_eq!(classify("Fan_Heatsink", &t), Some(PartKind::GroupMember));
        assert_eq!(classify("Fan Shroud Left", &t), Some(PartKind::GroupMember));
        assert_eq!(classify("Shroud", &t), None);
        // Variant token without the group token is not toggleable
        assert_eq!(classify("Bracket.001", &t), None);
    }

    #[test]
    fn test_classify_custom_tokens() {
        let t = GroupingTokens {
            group_token: "Door".into(),
            canonical_name: "Door".into(),
            variant_token: "_L".into(),
        };
        assert_eq!(classify("Door_L", &t), Some(PartKind::Individual));
        assert_eq!(classify("Door_R", &t), Some(PartKind::GroupMember));
        assert_eq!(classify("Fan", &t), None);
    }

    #[test]
    fn test_build_collects_units_and_meshes() {
        let mut graph = SceneGraph::new("root");
        let root = graph.root();
        let fan = graph.add_mesh(root, "Fan", Vec3::ZERO, unit_box());
        let heatsink = graph.add_child(root, "Fan_Heatsink", NodeContent::Group);
        let fins = graph.add_mesh(heatsink, "Fins", Vec3::ZERO, unit_box());
        graph.add_mesh(root, "Shroud", Vec3::ZERO, unit_box());

        let units = ToggleUnits::build(&graph, &tokens());
        assert_eq!(units.individuals(), &[fan]);
        assert_eq!(units.group_members(), &[heatsink]);
        assert_eq!(units.meshes(), &[fan, fins]);
        assert_eq!(units.owner(&graph, fins), Some(ToggleUnit::Group));
        assert_eq!(units.owner(&graph, fan), Some(ToggleUnit::Individual(fan)));
    }

    #[test]
    fn test_individual_nested_in_group_member_owns_itself() {
        let mut graph = SceneGraph::new("root");
        let root = graph.root();
        let member = graph.add_child(root, "Fan_Assembly", NodeContent::Group);
        let frame = graph.add_mesh(member, "Frame", Vec3::ZERO, unit_box());
        let fan = graph.add_child(member, "Fan.001", NodeContent::Group);
        let blades = graph.add_mesh(fan, "Blades", Vec3::ZERO, unit_box());

        let units = ToggleUnits::build(&graph, &tokens());
        assert_eq!(units.owner(&graph, blades), Some(ToggleUnit::Individual(fan)));
        assert_eq!(units.owner(&graph, frame), Some(ToggleUnit::Group));
        // Shared meshes are listed once
        assert_eq!(units.meshes().len(), 2);
    }

    #[test]
    fn test_group_member_nested_in_individual_owns_itself() {
        let mut graph = SceneGraph::new("root");
        let root = graph.root();
        let fan = graph.add_child(root, "Fan", NodeContent::Group);
        let hub = graph.add_mesh(fan, "Hub", Vec3::ZERO, unit_box());
        let bracket = graph.add_child(fan, "Fan_Bracket", NodeContent::Group);
        let screw = graph.add_mesh(bracket, "Screw", Vec3::ZERO, unit_box());

        let units = ToggleUnits::build(&graph, &tokens());
        assert_eq!(units.owner(&graph, screw), Some(ToggleUnit::Group));
        assert_eq!(units.owner(&graph, hub), Some(ToggleUnit::Individual(fan)));
    }

    #[test]
    fn test_untoggleable_hit_has_no_owner() {
        let mut graph = SceneGraph::new("root");
        let root = graph.root();
        let shroud = graph.add_mesh(root, "Shroud", Vec3::ZERO, unit_box());
        let units = ToggleUnits::build(&graph, &tokens());
        assert_eq!(units.owner(&graph, shroud), None);
    }

    #[test]
    fn test_toggle_individual_twice_restores() {
        let mut graph = SceneGraph::new("root");
        let root = graph.root();
        let fan = graph.add_mesh(root, "Fan", Vec3::ZERO, unit_box());
        let mut units = ToggleUnits::build(&graph, &tokens());

        units.toggle(&mut graph, ToggleUnit::Individual(fan));
        assert!(!graph.is_visible(fan));
        assert_eq!(units.hidden_count(&graph), 1);
        units.toggle(&mut graph, ToggleUnit::Individual(fan));
        assert!(graph.is_visible(fan));
    }

    #[test]
    fn test_toggle_group_keeps_members_uniform() {
        let mut graph = SceneGraph::new("root");
        let root = graph.root();
        let a = graph.add_mesh(root, "Fan_Heatsink", Vec3::ZERO, unit_box());
        let b = graph.add_mesh(root, "Fan_Backplate", Vec3::ZERO, unit_box());
        let mut units = ToggleUnits::build(&graph, &tokens());

        // Diverge one member, then toggle the group
        graph.set_visible(b, false);
        units.toggle(&mut graph, ToggleUnit::Group);
        assert_eq!(graph.is_visible(a), graph.is_visible(b));
        units.toggle(&mut graph, ToggleUnit::Group);
        assert_eq!(graph.is_visible(a), graph.is_visible(b));
        assert_eq!(units.nodes(ToggleUnit::Group), &[a, b]);
    }
}
