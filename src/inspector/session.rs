//! Everything derived from one loaded model, owned as a single value.
//!
//! A reload builds a complete new session and swaps it in; node ids never
//! outlive the graph that issued them.

use crate::math::Aabb;
use crate::scene::SceneGraph;

use super::config::InspectorConfig;
use super::explode::ExplodeRig;
use super::grouping::ToggleUnits;
use super::hotspot::HotspotSet;
use super::interaction::PointerInteraction;

/// A loaded model plus its toggle units, explode parts and hotspots.
#[derive(Clone, Debug)]
pub struct InspectorSession {
    pub key: String,
    pub graph: SceneGraph,
    pub units: ToggleUnits,
    pub pointer: PointerInteraction,
    pub explode: ExplodeRig,
    pub hotspots: HotspotSet,
    /// World bounds at load time, before any explode offset.
    pub bounds: Option<Aabb>,
}

impl InspectorSession {
    /// Derive every per-model structure from `graph`.
    pub fn build(key: impl Into<String>, graph: SceneGraph, config: &InspectorConfig) -> Self {
        let key = key.into();
        let units = ToggleUnits::build(&graph, &config.grouping);
        let explode = ExplodeRig::build(&graph, &config.tuning);
        let hotspots = HotspotSet::build(&graph, &config.hotspots, config.tuning.card_offset);
        let bounds = graph.world_bounding_box(graph.root());

        log::info!(
            "Model '{}': {} nodes, {} toggleable, {} explode parts, {} hotspots",
            key,
            graph.node_count(),
            units.individuals().len() + units.group_members().len(),
            explode.parts().len(),
            hotspots.len()
        );

        Self {
            key,
            pointer: PointerInteraction::new(config.tuning.highlight_color),
            graph,
            units,
            explode,
            hotspots,
            bounds,
        }
    }
}
