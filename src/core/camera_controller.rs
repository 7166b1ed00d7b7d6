//! Orbit camera controller with named view presets
//!
//! The controller owns the logical camera pose (azimuth, elevation, zoom and
//! orbit height) and keeps two cameras, one per projection model, in sync
//! with it so the active projection can be swapped without a pose jump.
//! Input only ever moves targets; `update()` eases the current values toward
//! them once per frame.

use serde::{Deserialize, Serialize};

use crate::core::camera::{Camera, ProjectionMode};
use crate::core::error::Error;
use crate::core::types::{Result, Vec3};
use crate::math::{Aabb, Damped};

/// Elevation band a preset sits in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationTier {
    #[default]
    Standard,
    Elevated,
}

/// One named camera view
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewPreset {
    pub name: String,
    /// Orbit angle around the vertical axis, 0 = looking at the front
    pub azimuth_degrees: f32,
    #[serde(default)]
    pub elevation: ElevationTier,
}

impl ViewPreset {
    pub fn new(name: &str, azimuth_degrees: f32, elevation: ElevationTier) -> Self {
        Self {
            name: name.to_string(),
            azimuth_degrees,
            elevation,
        }
    }
}

/// Front, Right, Rear, Left, then an elevated three-quarter view
pub fn default_views() -> Vec<ViewPreset> {
    vec![
        ViewPreset::new("Front", 0.0, ElevationTier::Standard),
        ViewPreset::new("Right", 90.0, ElevationTier::Standard),
        ViewPreset::new("Rear", 180.0, ElevationTier::Standard),
        ViewPreset::new("Left", -90.0, ElevationTier::Standard),
        ViewPreset::new("Isometric", 45.0, ElevationTier::Elevated),
    ]
}

/// Camera smoothing and framing constants
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Per-frame approach rate for azimuth
    pub azimuth_smoothing: f32,
    /// Per-frame approach rate for elevation
    pub elevation_smoothing: f32,
    /// Per-frame approach rate for frustum size and orbit height
    pub zoom_smoothing: f32,
    /// Radius of the orbit sphere
    pub orbit_distance: f32,
    pub standard_elevation_degrees: f32,
    pub elevated_elevation_degrees: f32,
    /// Frustum size when not zoomed
    pub default_frustum_size: f32,
    /// Orbit target height when not zoomed
    pub default_orbit_height: f32,
    /// Fraction of the view height the subject fills when zoomed
    pub zoom_fill_ratio: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            azimuth_smoothing: 0.1,
            elevation_smoothing: 0.08,
            zoom_smoothing: 0.08,
            orbit_distance: 12.0,
            standard_elevation_degrees: 12.0,
            elevated_elevation_degrees: 35.0,
            default_frustum_size: 7.0,
            default_orbit_height: 0.8,
            zoom_fill_ratio: 0.95,
        }
    }
}

/// Orbit controller over a fixed list of view presets
pub struct OrbitCameraController {
    views: Vec<ViewPreset>,
    tuning: CameraTuning,
    view_index: usize,
    azimuth: Damped<f32>,
    elevation: Damped<f32>,
    frustum_size: Damped<f32>,
    orbit_height: Damped<f32>,
    zoomed: bool,
    /// World bounds of the inspected model, used for fill-frame zoom
    subject: Option<Aabb>,
    mode: ProjectionMode,
    orthographic: Camera,
    perspective: Camera,
}

impl OrbitCameraController {
    /// Create a controller settled on the first view.
    pub fn new(views: Vec<ViewPreset>, tuning: CameraTuning, aspect: f32) -> Result<Self> {
        let first = views
            .first()
            .cloned()
            .ok_or_else(|| Error::Config("at least one view preset is required".into()))?;

        let elevation = Self::tier_radians(&tuning, first.elevation);
        let mut controller = Self {
            azimuth: Damped::new(first.azimuth_degrees.to_radians(), tuning.azimuth_smoothing),
            elevation: Damped::new(elevation, tuning.elevation_smoothing),
            frustum_size: Damped::new(tuning.default_frustum_size, tuning.zoom_smoothing),
            orbit_height: Damped::new(tuning.default_orbit_height, tuning.zoom_smoothing),
            orthographic: Camera::new(ProjectionMode::Orthographic, Vec3::ZERO, aspect),
            perspective: Camera::new(ProjectionMode::Perspective, Vec3::ZERO, aspect),
            views,
            tuning,
            view_index: 0,
            zoomed: false,
            subject: None,
            mode: ProjectionMode::Orthographic,
        };
        controller.place_cameras();
        Ok(controller)
    }

    fn tier_radians(tuning: &CameraTuning, tier: ElevationTier) -> f32 {
        match tier {
            ElevationTier::Standard => tuning.standard_elevation_degrees.to_radians(),
            ElevationTier::Elevated => tuning.elevated_elevation_degrees.to_radians(),
        }
    }

    /// Target the named preset.
    pub fn set_view(&mut self, name: &str) -> Result<()> {
        let index = self
            .views
            .iter()
            .position(|v| v.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownView(name.to_string()))?;
        self.set_view_index(index);
        Ok(())
    }

    fn set_view_index(&mut self, index: usize) {
        let view = &self.views[index];
        self.azimuth.set_target(view.azimuth_degrees.to_radians());
        self.elevation.set_target(Self::tier_radians(&self.tuning, view.elevation));
        self.view_index = index;
        log::debug!("Camera view -> {}", view.name);
    }

    /// Step through the presets circularly; negative steps go backwards.
    pub fn cycle(&mut self, step: i32) {
        let n = self.views.len() as i64;
        let next = (self.view_index as i64 + step as i64).rem_euclid(n);
        self.set_view_index(next as usize);
    }

    pub fn cycle_next(&mut self) {
        self.cycle(1);
    }

    pub fn cycle_previous(&mut self) {
        self.cycle(-1);
    }

    /// Flip between the default framing and fill-frame framing.
    pub fn toggle_zoom(&mut self) {
        self.zoomed = !self.zoomed;
        self.retarget_zoom();
    }

    /// Record the inspected model's bounds (after a model load).
    pub fn set_subject_bounds(&mut self, bounds: Option<Aabb>) {
        self.subject = bounds;
        self.retarget_zoom();
    }

    fn retarget_zoom(&mut self) {
        match (self.zoomed, self.subject) {
            (true, Some(bounds)) => {
                let height = bounds.size().y.max(f32::EPSILON);
                self.frustum_size.set_target(height / self.tuning.zoom_fill_ratio);
                self.orbit_height.set_target(bounds.center().y);
            }
            _ => {
                self.frustum_size.set_target(self.tuning.default_frustum_size);
                self.orbit_height.set_target(self.tuning.default_orbit_height);
            }
        }
    }

    /// Make `mode` the active projection, carrying the pose across.
    pub fn switch_projection(&mut self, mode: ProjectionMode) {
        if mode == self.mode {
            return;
        }
        match mode {
            ProjectionMode::Orthographic => self.orthographic.copy_pose_from(&self.perspective),
            ProjectionMode::Perspective => self.perspective.copy_pose_from(&self.orthographic),
        }
        self.mode = mode;
        log::debug!("Camera projection -> {}", mode);
    }

    /// Advance smoothing by one frame and reposition both cameras.
    pub fn update(&mut self) {
        self.azimuth.update_angle();
        self.elevation.update();
        self.frustum_size.update();
        self.orbit_height.update();
        self.place_cameras();
    }

    /// Current orbit target
    pub fn orbit_target(&self) -> Vec3 {
        Vec3::new(0.0, *self.orbit_height.current(), 0.0)
    }

    fn place_cameras(&mut self) {
        let target = self.orbit_target();
        let azimuth = *self.azimuth.current();
        let elevation = *self.elevation.current();
        let distance = self.tuning.orbit_distance;
        let (sa, ca) = azimuth.sin_cos();
        let (se, ce) = elevation.sin_cos();
        let position = target + Vec3::new(ce * sa, se, ce * ca) * distance;
        let frustum = *self.frustum_size.current();

        for camera in [&mut self.orthographic, &mut self.perspective] {
            camera.position = position;
            camera.look_at(target, Vec3::Y);
            camera.frustum_size = frustum;
            camera.fov_y = 2.0 * (frustum * 0.5 / distance).atan();
        }
    }

    /// Camera for the active projection
    pub fn camera(&self) -> &Camera {
        match self.mode {
            ProjectionMode::Orthographic => &self.orthographic,
            ProjectionMode::Perspective => &self.perspective,
        }
    }

    /// Camera for a specific projection, active or not
    pub fn camera_for(&self, mode: ProjectionMode) -> &Camera {
        match mode {
            ProjectionMode::Orthographic => &self.orthographic,
            ProjectionMode::Perspective => &self.perspective,
        }
    }

    /// Update aspect ratio of both cameras
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.orthographic.set_aspect(width, height);
        self.perspective.set_aspect(width, height);
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn zoomed(&self) -> bool {
        self.zoomed
    }

    pub fn view_index(&self) -> usize {
        self.view_index
    }

    pub fn view_name(&self) -> &str {
        &self.views[self.view_index].name
    }

    pub fn views(&self) -> &[ViewPreset] {
        &self.views
    }

    pub fn azimuth(&self) -> f32 {
        *self.azimuth.current()
    }

    pub fn target_azimuth(&self) -> f32 {
        *self.azimuth.target()
    }

    pub fn elevation(&self) -> f32 {
        *self.elevation.current()
    }

    pub fn target_elevation(&self) -> f32 {
        *self.elevation.target()
    }

    pub fn frustum_size(&self) -> f32 {
        *self.frustum_size.current()
    }

    pub fn target_frustum_size(&self) -> f32 {
        *self.frustum_size.target()
    }

    pub fn target_orbit_height(&self) -> f32 {
        *self.orbit_height.target()
    }
}
