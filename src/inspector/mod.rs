//! The inspector: input handling and per-frame update over one loaded model.
//!
//! [`Inspector`] owns the camera controller and the context transition, both
//! of which survive model reloads, plus the current [`InspectorSession`].
//! Input handlers only move targets. [`Inspector::update`] runs once per
//! frame: finished loads are installed first, then camera, explode and
//! hotspots advance in that order. [`Inspector::render`] comes last.

pub mod config;
pub mod explode;
pub mod grouping;
pub mod hotspot;
pub mod interaction;
pub mod session;
pub mod transition;

pub use config::{ContextPreset, GroupingTokens, HotspotDescriptor, InspectorConfig, Tuning};
pub use explode::{ExplodePart, ExplodeRig};
pub use grouping::{classify, PartKind, ToggleUnit, ToggleUnits};
pub use hotspot::{CardSide, HotspotInstance, HotspotSet};
pub use interaction::PointerInteraction;
pub use session::InspectorSession;
pub use transition::{
    ContextTransition, FrameRenderer, Layer, RenderPlan, RenderTarget, TransitionState,
    WipeDirection, WipeMask, WipeUniform,
};

use vitrine_remote::{CameraSnapshot, HotspotSnapshot, InspectorSnapshot};

use crate::core::camera::ProjectionMode;
use crate::core::camera_controller::OrbitCameraController;
use crate::core::error::Error;
use crate::core::input::{InspectorInput, KeyAction};
use crate::core::types::{Result, Vec2};
use crate::math::Ray;
use crate::scene::{LoadResult, ModelLoader, SceneGraph};

/// Initial viewport until the host reports a size
const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 720.0);

/// What a click ended up doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    PartToggled,
    HotspotToggled,
    ViewCycled,
}

/// Interaction and animation state for the whole viewer.
pub struct Inspector {
    config: InspectorConfig,
    camera: OrbitCameraController,
    transition: ContextTransition,
    session: Option<InspectorSession>,
    loader: Option<ModelLoader>,
    viewport: Vec2,
    frame: u64,
    status: Option<String>,
}

impl Inspector {
    /// Create an inspector with no model installed.
    ///
    /// Without a loader, models can only be installed directly.
    pub fn new(config: InspectorConfig, loader: Option<ModelLoader>) -> Result<Self> {
        config.validate()?;
        let (width, height) = DEFAULT_VIEWPORT;
        let camera = OrbitCameraController::new(
            config.views.clone(),
            config.camera.clone(),
            width / height,
        )?;
        let transition = ContextTransition::new(
            config.contexts.len(),
            config.tuning.scroll_units_per_context,
            config.tuning.transition_epsilon,
        );
        Ok(Self {
            config,
            camera,
            transition,
            session: None,
            loader,
            viewport: Vec2::new(width, height),
            frame: 0,
            status: None,
        })
    }

    // -----------------------------------------------------------------------
    // Models
    // -----------------------------------------------------------------------

    /// Queue an asynchronous model load. It is installed by a later `update`.
    pub fn request_model(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        let loader = self
            .loader
            .as_mut()
            .ok_or_else(|| Error::Runtime("no model loader configured".into()))?;
        loader.request(key.clone())?;
        self.status = Some(format!("Loading '{}'", key));
        Ok(())
    }

    /// Replace the current model and everything derived from it.
    pub fn install_model(&mut self, key: impl Into<String>, graph: SceneGraph) {
        let session = InspectorSession::build(key, graph, &self.config);
        self.camera.set_subject_bounds(session.bounds);
        self.status = None;
        self.session = Some(session);
    }

    /// True while a requested model has not been answered yet.
    pub fn is_loading(&self) -> bool {
        self.loader.as_ref().is_some_and(|l| l.pending_count() > 0)
    }

    fn poll_loader(&mut self) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        for result in loader.poll_results() {
            match result {
                LoadResult::Loaded { key, graph } => self.install_model(key, graph),
                LoadResult::Failed { key, reason } => {
                    let err = Error::Load { key, reason };
                    log::warn!("{}", err);
                    self.status = Some(err.to_string());
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// Advance one frame.
    pub fn update(&mut self) {
        self.poll_loader();
        self.camera.update();
        if let Some(session) = self.session.as_mut() {
            session.explode.update(&mut session.graph);
            session.hotspots.update(&session.graph, self.camera.camera());
        }
        self.frame += 1;
    }

    /// Draw the frame through `renderer`.
    pub fn render<R: FrameRenderer + ?Sized>(&self, renderer: &mut R) -> RenderPlan {
        let items = self
            .session
            .as_ref()
            .map(|s| s.graph.flatten())
            .unwrap_or_default();
        self.transition
            .render(renderer, &self.config.contexts, &items, self.camera.camera())
    }

    /// Viewport size in pixels.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
            self.camera.set_aspect(width, height);
        }
    }

    /// Ray through a pixel of the viewport.
    pub fn pointer_ray(&self, x: f32, y: f32) -> Ray {
        let ndc = Vec2::new(2.0 * x / self.viewport.x - 1.0, 1.0 - 2.0 * y / self.viewport.y);
        self.camera.camera().ray_from_ndc(ndc)
    }

    // -----------------------------------------------------------------------
    // Pointer
    // -----------------------------------------------------------------------

    /// Hover update; true when the highlighted unit changed.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> bool {
        let ray = self.pointer_ray(x, y);
        match self.session.as_mut() {
            Some(s) => s.pointer.on_pointer_move(&mut s.graph, &s.units, &ray),
            None => false,
        }
    }

    /// Resolve a click: part toggle, then hotspot, then view cycling.
    pub fn on_click(&mut self, x: f32, y: f32) -> ClickOutcome {
        let ray = self.pointer_ray(x, y);
        if let Some(s) = self.session.as_mut() {
            if s.pointer.try_toggle(&mut s.graph, &mut s.units, &ray) {
                return ClickOutcome::PartToggled;
            }
            if s.hotspots.try_show(&s.graph, &ray) {
                return ClickOutcome::HotspotToggled;
            }
        }
        self.camera.cycle_next();
        ClickOutcome::ViewCycled
    }

    /// Marker click: always toggles that annotation.
    pub fn toggle_hotspot(&mut self, index: usize) -> bool {
        self.session
            .as_mut()
            .is_some_and(|s| s.hotspots.toggle(index))
    }

    // -----------------------------------------------------------------------
    // Camera
    // -----------------------------------------------------------------------

    pub fn set_view(&mut self, name: &str) -> Result<()> {
        self.camera.set_view(name)
    }

    pub fn cycle_view(&mut self, step: i32) {
        self.camera.cycle(step);
    }

    pub fn toggle_zoom(&mut self) {
        self.camera.toggle_zoom();
    }

    pub fn switch_projection(&mut self, mode: ProjectionMode) {
        self.camera.switch_projection(mode);
    }

    pub fn toggle_projection(&mut self) {
        self.camera.switch_projection(self.camera.mode().toggled());
    }

    // -----------------------------------------------------------------------
    // Explode and contexts
    // -----------------------------------------------------------------------

    pub fn toggle_explode(&mut self) {
        if let Some(s) = self.session.as_mut() {
            s.explode.toggle();
        }
    }

    pub fn on_scroll(&mut self, delta: f32) {
        self.transition.on_scroll(delta);
    }

    pub fn jump_to_context(&mut self, index: usize) {
        self.transition.jump_to(index);
    }

    pub fn set_wipe_direction(&mut self, value: u8) -> Result<()> {
        self.transition.set_direction(WipeDirection::try_from(value)?);
        Ok(())
    }

    /// Dispatch translated window input.
    pub fn handle_input(&mut self, input: InspectorInput) {
        match input {
            InspectorInput::PointerMoved { x, y } => {
                self.on_pointer_move(x, y);
            }
            InspectorInput::Clicked { x, y } => {
                let outcome = self.on_click(x, y);
                log::debug!("Click at ({:.0}, {:.0}): {:?}", x, y, outcome);
            }
            InspectorInput::Scrolled { delta } => self.on_scroll(delta),
            InspectorInput::Key(action) => match action {
                KeyAction::CycleView(step) => self.cycle_view(step),
                KeyAction::ToggleZoom => self.toggle_zoom(),
                KeyAction::ToggleExplode => self.toggle_explode(),
                KeyAction::ToggleProjection => self.toggle_projection(),
                KeyAction::JumpToContext(index) => self.jump_to_context(index),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn camera(&self) -> &OrbitCameraController {
        &self.camera
    }

    pub fn transition(&self) -> &ContextTransition {
        &self.transition
    }

    pub fn session(&self) -> Option<&InspectorSession> {
        self.session.as_ref()
    }

    /// Annotations of the current model.
    pub fn hotspots(&self) -> &[HotspotInstance] {
        self.session.as_ref().map(|s| s.hotspots.instances()).unwrap_or(&[])
    }

    /// Last load message, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> InspectorSnapshot {
        let camera = self.camera.camera();
        let state = self.transition.state();
        let context_name = self
            .config
            .contexts
            .get(state.from)
            .map(|c| c.name.clone())
            .unwrap_or_default();

        let mut snapshot = InspectorSnapshot {
            frame: self.frame,
            status: self.status.clone(),
            loading: self.is_loading(),
            camera: CameraSnapshot {
                view: self.camera.view_name().to_string(),
                projection: self.camera.mode().to_string(),
                azimuth: self.camera.azimuth().to_degrees(),
                elevation: self.camera.elevation().to_degrees(),
                frustum_size: self.camera.frustum_size(),
                zoomed: self.camera.zoomed(),
                position: camera.position.to_array(),
            },
            context_position: state.position,
            context_name,
            ..Default::default()
        };

        if let Some(s) = &self.session {
            let names = |ids: &[crate::scene::SceneNodeId]| -> Vec<String> {
                ids.iter().map(|id| s.graph.name(*id).to_string()).collect()
            };
            let hidden: Vec<_> = s
                .units
                .toggleable_nodes()
                .filter(|id| !s.graph.is_visible(*id))
                .collect();
            snapshot.model = Some(s.key.clone());
            snapshot.exploded = s.explode.exploded();
            snapshot.explode_t = s.explode.t();
            snapshot.hidden_parts = names(&hidden);
            snapshot.hovered = s
                .pointer
                .hovered()
                .map(|u| names(s.units.nodes(u)))
                .unwrap_or_default();
            snapshot.hotspots = s
                .hotspots
                .instances()
                .iter()
                .map(|h| HotspotSnapshot {
                    title: h.title.clone(),
                    open: h.open,
                    marker_visible: h.marker_visible,
                    screen: h.marker.to_array(),
                })
                .collect();
        }
        snapshot
    }
}
