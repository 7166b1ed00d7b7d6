//! Inspector configuration: presets, naming conventions and tuning constants.
//!
//! Every declarative input of the inspector lives here. The whole tree is
//! serde-enabled with per-field defaults, so a partial JSON file only needs to
//! name what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::camera_controller::{default_views, CameraTuning, ViewPreset};
use crate::core::error::Error;
use crate::core::types::Result;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Full inspector configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Ordered camera views.
    pub views: Vec<ViewPreset>,
    /// Ordered presentation contexts the scroll position moves through.
    pub contexts: Vec<ContextPreset>,
    /// Annotation anchors, resolved against each loaded model.
    pub hotspots: Vec<HotspotDescriptor>,
    /// Naming conventions that classify toggleable parts.
    pub grouping: GroupingTokens,
    /// Camera smoothing and framing.
    pub camera: CameraTuning,
    /// Remaining numeric constants.
    pub tuning: Tuning,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            views: default_views(),
            contexts: default_contexts(),
            hotspots: default_hotspots(),
            grouping: GroupingTokens::default(),
            camera: CameraTuning::default(),
            tuning: Tuning::default(),
        }
    }
}

impl InspectorConfig {
    /// Parse a (possibly partial) config from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject configurations the inspector cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.views.is_empty() {
            return Err(Error::Config("views must not be empty".into()));
        }
        if self.contexts.is_empty() {
            return Err(Error::Config("contexts must not be empty".into()));
        }
        if !(self.tuning.scroll_units_per_context > 0.0) {
            return Err(Error::Config("scroll_units_per_context must be positive".into()));
        }
        if !(self.camera.zoom_fill_ratio > 0.0) {
            return Err(Error::Config("zoom_fill_ratio must be positive".into()));
        }
        if self.grouping.group_token.is_empty() {
            return Err(Error::Config("grouping.group_token must not be empty".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

/// Numeric constants outside the camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Per-frame approach rate of the explode parameter.
    pub explode_smoothing: f32,
    /// How far (world units) a fully exploded part travels.
    pub explode_distance: f32,
    /// Smallest upward component of an explode direction.
    pub explode_min_lift: f32,
    /// Scroll units that move the context position by one preset.
    pub scroll_units_per_context: f32,
    /// Progress below this counts as settled.
    pub transition_epsilon: f32,
    /// Hover tint (linear RGB).
    pub highlight_color: [f32; 3],
    /// Horizontal gap between a hotspot marker and its card, in normalized screen units.
    pub card_offset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            explode_smoothing: 0.08,
            explode_distance: 1.5,
            explode_min_lift: 0.05,
            scroll_units_per_context: 400.0,
            transition_epsilon: 1e-3,
            highlight_color: [0.35, 0.75, 1.0],
            card_offset: 0.03,
        }
    }
}

// ---------------------------------------------------------------------------
// Part grouping
// ---------------------------------------------------------------------------

/// Name tokens that mark toggleable parts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingTokens {
    /// Substring every toggleable node name contains.
    pub group_token: String,
    /// Exact name of the canonical individual part.
    pub canonical_name: String,
    /// Substring marking a numbered individual variant.
    pub variant_token: String,
}

impl Default for GroupingTokens {
    fn default() -> Self {
        Self {
            group_token: "Fan".into(),
            canonical_name: "Fan".into(),
            variant_token: ".001".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Hotspots
// ---------------------------------------------------------------------------

/// One annotation anchor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotspotDescriptor {
    /// Node name to match (exact first, then substring).
    pub token: String,
    pub title: String,
    pub description: String,
}

impl HotspotDescriptor {
    pub fn new(token: &str, title: &str, description: &str) -> Self {
        Self {
            token: token.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

fn default_hotspots() -> Vec<HotspotDescriptor> {
    vec![
        HotspotDescriptor::new(
            "RTX 5090",
            "GeForce RTX 5090",
            "Blackwell GPU on a 14-layer board.",
        ),
        HotspotDescriptor::new("GDDR7", "32 GB GDDR7", "512-bit memory interface."),
        HotspotDescriptor::new(
            "Fan",
            "Dual Flow-Through Fans",
            "Both fans push air straight through the fin stacks.",
        ),
        HotspotDescriptor::new("Power Connector", "16-pin Power", "Single 12V-2x6 connector."),
        HotspotDescriptor::new(
            "Display Outputs",
            "Display Outputs",
            "Three DisplayPort 2.1b and one HDMI 2.1b.",
        ),
        HotspotDescriptor::new("PCIe", "PCIe 5.0 x16", "Host interface."),
    ]
}

// ---------------------------------------------------------------------------
// Context presets
// ---------------------------------------------------------------------------

/// Surface material parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    pub color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
}

impl SurfaceMaterial {
    pub const fn new(color: [f32; 3], roughness: f32, metalness: f32, clearcoat: f32) -> Self {
        Self { color, roughness, metalness, clearcoat }
    }
}

/// One light of a preset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightRig {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: [f32; 3],
}

impl LightRig {
    pub const fn new(color: [f32; 3], intensity: f32, position: [f32; 3]) -> Self {
        Self { color, intensity, position }
    }
}

/// One named presentation look.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextPreset {
    pub name: String,
    pub background: [f32; 3],
    /// Wall surface.
    pub wall: SurfaceMaterial,
    /// Shelf surface.
    pub shelf: SurfaceMaterial,
    pub lights: Vec<LightRig>,
    /// Tone-mapping exposure.
    pub exposure: f32,
}

fn preset(
    name: &str,
    background: [f32; 3],
    wall: SurfaceMaterial,
    shelf: SurfaceMaterial,
    key: LightRig,
    fill: LightRig,
    exposure: f32,
) -> ContextPreset {
    ContextPreset {
        name: name.into(),
        background,
        wall,
        shelf,
        lights: vec![key, fill],
        exposure,
    }
}

/// Ten looks, ordered the way the scroll position visits them.
pub fn default_contexts() -> Vec<ContextPreset> {
    const KEY_POS: [f32; 3] = [5.0, 8.0, 6.0];
    const FILL_POS: [f32; 3] = [-6.0, 4.0, -3.0];
    vec![
        preset(
            "Studio",
            [0.92, 0.92, 0.93],
            SurfaceMaterial::new([0.95, 0.95, 0.95], 0.8, 0.0, 0.0),
            SurfaceMaterial::new([0.85, 0.85, 0.86], 0.6, 0.0, 0.1),
            LightRig::new([1.0, 1.0, 1.0], 2.5, KEY_POS),
            LightRig::new([0.9, 0.95, 1.0], 0.8, FILL_POS),
            1.0,
        ),
        preset(
            "Noir",
            [0.02, 0.02, 0.025],
            SurfaceMaterial::new([0.05, 0.05, 0.06], 0.9, 0.0, 0.0),
            SurfaceMaterial::new([0.08, 0.08, 0.09], 0.3, 0.2, 0.6),
            LightRig::new([1.0, 0.98, 0.95], 4.0, [2.0, 9.0, 3.0]),
            LightRig::new([0.3, 0.35, 0.5], 0.2, FILL_POS),
            0.8,
        ),
        preset(
            "Walnut Library",
            [0.18, 0.11, 0.07],
            SurfaceMaterial::new([0.32, 0.2, 0.12], 0.7, 0.0, 0.2),
            SurfaceMaterial::new([0.4, 0.25, 0.14], 0.45, 0.0, 0.5),
            LightRig::new([1.0, 0.82, 0.6], 2.2, KEY_POS),
            LightRig::new([1.0, 0.7, 0.45], 0.6, FILL_POS),
            1.1,
        ),
        preset(
            "Brushed Steel",
            [0.55, 0.57, 0.6],
            SurfaceMaterial::new([0.6, 0.62, 0.65], 0.35, 0.9, 0.0),
            SurfaceMaterial::new([0.7, 0.72, 0.75], 0.25, 1.0, 0.3),
            LightRig::new([0.95, 0.97, 1.0], 2.8, KEY_POS),
            LightRig::new([0.8, 0.85, 0.9], 1.0, FILL_POS),
            0.95,
        ),
        preset(
            "Neon Alley",
            [0.05, 0.01, 0.1],
            SurfaceMaterial::new([0.12, 0.05, 0.18], 0.5, 0.1, 0.4),
            SurfaceMaterial::new([0.1, 0.1, 0.12], 0.2, 0.5, 0.9),
            LightRig::new([1.0, 0.1, 0.7], 3.5, [-4.0, 5.0, 5.0]),
            LightRig::new([0.1, 0.9, 1.0], 3.0, [5.0, 3.0, -4.0]),
            1.2,
        ),
        preset(
            "Golden Hour",
            [0.98, 0.72, 0.45],
            SurfaceMaterial::new([0.95, 0.8, 0.62], 0.75, 0.0, 0.0),
            SurfaceMaterial::new([0.85, 0.65, 0.45], 0.5, 0.0, 0.2),
            LightRig::new([1.0, 0.7, 0.4], 3.0, [8.0, 3.0, 4.0]),
            LightRig::new([0.6, 0.7, 1.0], 0.5, FILL_POS),
            1.05,
        ),
        preset(
            "Arctic",
            [0.85, 0.93, 1.0],
            SurfaceMaterial::new([0.9, 0.95, 1.0], 0.85, 0.0, 0.1),
            SurfaceMaterial::new([0.8, 0.9, 0.98], 0.1, 0.0, 1.0),
            LightRig::new([0.85, 0.92, 1.0], 2.6, KEY_POS),
            LightRig::new([0.7, 0.85, 1.0], 1.2, FILL_POS),
            0.9,
        ),
        preset(
            "Terracotta",
            [0.72, 0.4, 0.28],
            SurfaceMaterial::new([0.76, 0.42, 0.3], 0.95, 0.0, 0.0),
            SurfaceMaterial::new([0.62, 0.36, 0.26], 0.8, 0.0, 0.0),
            LightRig::new([1.0, 0.88, 0.75], 2.4, KEY_POS),
            LightRig::new([1.0, 0.75, 0.6], 0.7, FILL_POS),
            1.0,
        ),
        preset(
            "Carbon Lab",
            [0.1, 0.11, 0.12],
            SurfaceMaterial::new([0.12, 0.12, 0.13], 0.4, 0.3, 0.8),
            SurfaceMaterial::new([0.2, 0.2, 0.22], 0.3, 0.6, 0.7),
            LightRig::new([0.9, 1.0, 0.95], 3.2, KEY_POS),
            LightRig::new([0.4, 1.0, 0.6], 0.9, FILL_POS),
            0.85,
        ),
        preset(
            "Gallery White",
            [1.0, 1.0, 1.0],
            SurfaceMaterial::new([1.0, 1.0, 1.0], 0.9, 0.0, 0.0),
            SurfaceMaterial::new([0.96, 0.96, 0.96], 0.2, 0.0, 0.8),
            LightRig::new([1.0, 1.0, 0.98], 2.0, [0.0, 10.0, 4.0]),
            LightRig::new([1.0, 1.0, 1.0], 1.0, FILL_POS),
            1.15,
        ),
    ]
}
