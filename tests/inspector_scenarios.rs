//! End-to-end behaviour of the inspector through its public API.

use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};

use vitrine::core::camera::Camera;
use vitrine::inspector::{
    ClickOutcome, ContextPreset, FrameRenderer, HotspotDescriptor, Inspector, InspectorConfig,
    RenderPlan, RenderTarget, WipeMask,
};
use vitrine::math::Aabb;
use vitrine::scene::{DrawItem, ModelLoader, SceneGraph};

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 720.0;

#[derive(Default)]
struct Recorder {
    targets: Vec<RenderTarget>,
    composites: Vec<WipeMask>,
    contexts: Vec<String>,
}

impl FrameRenderer for Recorder {
    fn apply_context(&mut self, preset: &ContextPreset) {
        self.contexts.push(preset.name.clone());
    }

    fn render_scene(&mut self, target: RenderTarget, _items: &[DrawItem], _camera: &Camera) {
        self.targets.push(target);
    }

    fn composite(&mut self, mask: &WipeMask) {
        self.composites.push(*mask);
    }
}

/// Board in the middle, a fan on the left, a heatsink on the right, a plate below.
fn rig() -> SceneGraph {
    let mut graph = SceneGraph::new("Test Rig");
    let root = graph.root();
    let board = Aabb::new(Vec3::new(-1.0, -0.5, -0.5), Vec3::new(1.0, 0.5, 0.5));
    let unit = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
    graph.add_mesh(root, "RTX 5090 Backplate", Vec3::new(0.0, -2.0, 0.0), board);
    graph.add_mesh(root, "RTX 5090", Vec3::ZERO, board);
    graph.add_mesh(root, "Fan", Vec3::new(-3.0, 0.0, 0.0), unit);
    graph.add_mesh(root, "Fan_Heatsink", Vec3::new(3.0, 0.0, 0.0), unit);
    graph
}

fn config() -> InspectorConfig {
    InspectorConfig {
        hotspots: vec![
            HotspotDescriptor::new("RTX 5090", "GPU", "Main board"),
            HotspotDescriptor::new("Fan", "Fan", "Axial fan"),
            HotspotDescriptor::new("NVLink", "Bridge", "Not present"),
        ],
        ..Default::default()
    }
}

fn inspector() -> Inspector {
    let mut inspector = Inspector::new(config(), None).unwrap();
    inspector.resize(WIDTH, HEIGHT);
    inspector.install_model("rig", rig());
    inspector.update();
    inspector
}

/// Pixel under a world point for the active camera.
fn pixel_of(inspector: &Inspector, world: Vec3) -> Vec2 {
    let ndc = inspector.camera().camera().project(world).ndc;
    Vec2::new((ndc.x + 1.0) * 0.5 * WIDTH, (1.0 - ndc.y) * 0.5 * HEIGHT)
}

fn node(inspector: &Inspector, name: &str) -> vitrine::scene::SceneNodeId {
    inspector.session().unwrap().graph.find_by_name(name).unwrap()
}

fn visibility(inspector: &Inspector) -> Vec<bool> {
    let graph = &inspector.session().unwrap().graph;
    graph.descendants(graph.root()).into_iter().map(|id| graph.is_visible(id)).collect()
}

fn highlights(inspector: &Inspector) -> Vec<Option<[f32; 3]>> {
    let graph = &inspector.session().unwrap().graph;
    graph.descendants(graph.root()).into_iter().map(|id| graph.highlight(id)).collect()
}

#[test]
fn scroll_one_context_renders_settled() {
    let mut inspector = inspector();
    inspector.on_scroll(400.0);

    let state = inspector.transition().state();
    assert_eq!(state.position, 1.0);
    assert_eq!((state.from, state.to), (1, 2));

    let mut recorder = Recorder::default();
    let plan = inspector.render(&mut recorder);
    assert_eq!(plan, RenderPlan::Settled { context: 1 });
    assert_eq!(recorder.targets, vec![RenderTarget::Screen]);
    assert!(recorder.composites.is_empty());
}

#[test]
fn half_scroll_renders_both_buffers() {
    let mut inspector = inspector();
    inspector.jump_to_context(1);
    inspector.on_scroll(200.0);

    let state = inspector.transition().state();
    assert_eq!(state.position, 1.5);
    assert_eq!((state.from, state.to), (1, 2));
    assert!((state.progress - 0.5).abs() < 1e-6);

    let mut recorder = Recorder::default();
    let plan = inspector.render(&mut recorder);
    assert!(matches!(plan, RenderPlan::Crossfade { from: 1, to: 2, .. }));
    assert_eq!(recorder.targets, vec![RenderTarget::BufferA, RenderTarget::BufferB]);
    assert_eq!(recorder.composites.len(), 1);
    let contexts = &inspector.config().contexts;
    assert_eq!(recorder.contexts, vec![contexts[1].name.clone(), contexts[2].name.clone()]);
}

#[test]
fn wheel_ticks_settle_on_preset() {
    let mut inspector = inspector();
    for _ in 0..30 {
        inspector.on_scroll(40.0);
    }
    let mut recorder = Recorder::default();
    assert_eq!(inspector.render(&mut recorder), RenderPlan::Settled { context: 3 });
    assert_eq!(recorder.targets, vec![RenderTarget::Screen]);
    assert_eq!(inspector.snapshot().context_name, inspector.config().contexts[3].name);
}

#[test]
fn scroll_never_leaves_range() {
    let mut inspector = inspector();
    for delta in [1e12, -1e12, 3.5e6, -7.0] {
        inspector.on_scroll(delta);
        let p = inspector.transition().position();
        assert!((0.0..=9.0).contains(&p));
    }
}

#[test]
fn cycling_all_views_restores_targets() {
    let mut inspector = inspector();
    let n = inspector.config().views.len() as i32;
    inspector.cycle_view(1);
    let start = (inspector.camera().target_azimuth(), inspector.camera().target_elevation());
    for _ in 0..n {
        inspector.cycle_view(1);
        inspector.update();
    }
    assert_eq!((inspector.camera().target_azimuth(), inspector.camera().target_elevation()), start);
}

#[test]
fn exact_hotspot_match_beats_substring() {
    let inspector = inspector();
    let board = node(&inspector, "RTX 5090");
    let hotspots = inspector.hotspots();
    // The unresolved descriptor is dropped
    assert_eq!(hotspots.len(), 2);
    assert_eq!(hotspots[0].anchor, board);
    assert!(hotspots.iter().all(|h| !h.open));
}

#[test]
fn part_click_does_not_open_hotspot() {
    let mut inspector = inspector();
    let fan = node(&inspector, "Fan");
    let px = pixel_of(&inspector, Vec3::new(-3.0, 0.0, 0.0));

    assert_eq!(inspector.on_click(px.x, px.y), ClickOutcome::PartToggled);
    assert!(!inspector.session().unwrap().graph.is_visible(fan));
    assert!(!inspector.hotspots()[1].open);

    // The marker path is independent of part toggling
    assert!(inspector.toggle_hotspot(1));
    assert!(inspector.hotspots()[1].open);

    // A hidden part can still be clicked back into view
    assert_eq!(inspector.on_click(px.x, px.y), ClickOutcome::PartToggled);
    assert!(inspector.session().unwrap().graph.is_visible(fan));
    assert!(inspector.hotspots()[1].open);
}

#[test]
fn annotated_part_click_toggles_hotspot() {
    let mut inspector = inspector();
    let px = pixel_of(&inspector, Vec3::ZERO);
    assert_eq!(inspector.on_click(px.x, px.y), ClickOutcome::HotspotToggled);
    assert!(inspector.hotspots()[0].open);
    assert_eq!(inspector.camera().view_name(), "Front");
}

#[test]
fn empty_click_cycles_view_and_changes_nothing_else() {
    let mut inspector = inspector();
    let before_vis = visibility(&inspector);
    let before_hl = highlights(&inspector);

    assert_eq!(inspector.on_click(5.0, 5.0), ClickOutcome::ViewCycled);
    assert_eq!(inspector.camera().view_name(), "Right");
    assert_eq!(visibility(&inspector), before_vis);
    assert_eq!(highlights(&inspector), before_hl);
}

#[test]
fn hover_miss_keeps_highlight() {
    let mut inspector = inspector();
    let fan = node(&inspector, "Fan");
    let px = pixel_of(&inspector, Vec3::new(-3.0, 0.0, 0.0));
    assert!(inspector.on_pointer_move(px.x, px.y));
    let lit = highlights(&inspector);

    assert!(!inspector.on_pointer_move(5.0, 5.0));
    assert_eq!(highlights(&inspector), lit);
    assert!(inspector.session().unwrap().graph.highlight(fan).is_some());

    // Moving onto the heatsink moves the highlight
    let px = pixel_of(&inspector, Vec3::new(3.0, 0.0, 0.0));
    assert!(inspector.on_pointer_move(px.x, px.y));
    assert!(inspector.session().unwrap().graph.highlight(fan).is_none());
    assert_eq!(highlights(&inspector).iter().filter(|h| h.is_some()).count(), 1);
}

#[test]
fn explode_converges_both_ways() {
    let mut inspector = inspector();
    let session = inspector.session().unwrap();
    let parts = session.explode.parts().to_vec();
    let distance = inspector.config().tuning.explode_distance;
    let min_lift = inspector.config().tuning.explode_min_lift;
    assert_eq!(parts.len(), 4);
    for part in &parts {
        assert!(part.direction.y >= 0.0);
        assert!(part.direction.y > -min_lift);
    }

    inspector.toggle_explode();
    for _ in 0..400 {
        inspector.update();
    }
    let graph = &inspector.session().unwrap().graph;
    for part in &parts {
        let expected = part.original + part.direction * distance;
        assert!((graph.position(part.node).unwrap() - expected).length() < 1e-3);
    }

    inspector.toggle_explode();
    for _ in 0..400 {
        inspector.update();
    }
    let graph = &inspector.session().unwrap().graph;
    for part in &parts {
        assert!((graph.position(part.node).unwrap() - part.original).length() < 1e-3);
    }
}

fn update_until(inspector: &mut Inspector, done: impl Fn(&Inspector) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(inspector) && Instant::now() < deadline {
        inspector.update();
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn failed_reload_keeps_previous_model() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("box.json"),
        r#"{ "name": "Box", "nodes": [ { "name": "Fan", "mesh": { "min": [-1,-1,-1], "max": [1,1,1] } } ] }"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    let loader = ModelLoader::new(dir.path()).unwrap();
    let mut inspector = Inspector::new(config(), Some(loader)).unwrap();
    inspector.request_model("box").unwrap();
    assert!(inspector.is_loading());
    update_until(&mut inspector, |i| i.session().is_some());
    assert_eq!(inspector.session().unwrap().key, "box");
    assert!(inspector.status().is_none());
    assert!(!inspector.is_loading());
    assert!(!inspector.snapshot().loading);

    inspector.jump_to_context(4);
    inspector.set_view("Rear").unwrap();
    inspector.request_model("broken").unwrap();
    update_until(&mut inspector, |i| {
        i.status()
            .is_some_and(|s| s.contains("broken") && s.starts_with("Failed"))
    });

    assert_eq!(inspector.session().unwrap().key, "box");
    assert!(inspector.session().unwrap().graph.find_by_name("Fan").is_some());
    assert!(inspector.status().unwrap().starts_with("Failed"));

    // Viewing context survives a successful reload
    inspector.request_model("demo").unwrap();
    update_until(&mut inspector, |i| i.session().is_some_and(|s| s.key == "demo"));
    assert_eq!(inspector.session().unwrap().key, "demo");
    assert_eq!(inspector.transition().position(), 4.0);
    assert_eq!(inspector.camera().view_name(), "Rear");
}
