//! Scroll-driven crossfade between presentation contexts.
//!
//! A continuous position in `[0, N-1]` selects the pair of presets being
//! blended. When the position rests on an integer the scene renders once in
//! full quality; between integers it renders twice into offscreen buffers and
//! a directional wipe mask composites the two.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::core::camera::Camera;
use crate::core::error::Error;
use crate::core::types::Vec2;
use crate::scene::DrawItem;

use super::config::ContextPreset;

// ---------------------------------------------------------------------------
// Wipe directions
// ---------------------------------------------------------------------------

/// Direction the incoming context is revealed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipeDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
    /// Top-left corner first.
    DiagonalDown,
    /// Bottom-left corner first.
    DiagonalUp,
    /// Skewed diagonal sweeping rightwards.
    IsometricLeft,
    /// Skewed diagonal sweeping leftwards.
    IsometricRight,
}

impl WipeDirection {
    pub const ALL: [WipeDirection; 8] = [
        WipeDirection::LeftToRight,
        WipeDirection::RightToLeft,
        WipeDirection::TopToBottom,
        WipeDirection::BottomToTop,
        WipeDirection::DiagonalDown,
        WipeDirection::DiagonalUp,
        WipeDirection::IsometricLeft,
        WipeDirection::IsometricRight,
    ];

    /// Wire index (0..=7)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Reveal time of a screen point, in [0, 1].
    ///
    /// `uv` is normalized with (0, 0) at the top-left corner.
    pub fn field(self, uv: Vec2) -> f32 {
        let (u, v) = (uv.x, uv.y);
        match self {
            WipeDirection::LeftToRight => u,
            WipeDirection::RightToLeft => 1.0 - u,
            WipeDirection::TopToBottom => v,
            WipeDirection::BottomToTop => 1.0 - v,
            WipeDirection::DiagonalDown => (u + v) * 0.5,
            WipeDirection::DiagonalUp => (u + 1.0 - v) * 0.5,
            WipeDirection::IsometricLeft => (u + 0.5 * v) / 1.5,
            WipeDirection::IsometricRight => (1.0 - u + 0.5 * v) / 1.5,
        }
    }
}

impl TryFrom<u8> for WipeDirection {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidWipeDirection(value))
    }
}

impl fmt::Display for WipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ---------------------------------------------------------------------------
// Mask
// ---------------------------------------------------------------------------

/// Offscreen layer a composited pixel comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// Outgoing context
    A,
    /// Incoming context
    B,
}

/// Hard-threshold wipe between buffer A and buffer B.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WipeMask {
    pub direction: WipeDirection,
    pub progress: f32,
}

impl WipeMask {
    /// Layer shown at `uv`.
    pub fn select(&self, uv: Vec2) -> Layer {
        if self.direction.field(uv) < self.progress {
            Layer::B
        } else {
            Layer::A
        }
    }
}

/// Mask parameters as the compositing shader reads them
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WipeUniform {
    pub progress: f32,
    pub direction: u32,
    /// Padding to 16 bytes
    pub _pad: [u32; 2],
}

impl From<&WipeMask> for WipeUniform {
    fn from(mask: &WipeMask) -> Self {
        Self {
            progress: mask.progress,
            direction: mask.direction.index() as u32,
            _pad: [0; 2],
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer seam
// ---------------------------------------------------------------------------

/// Where a scene pass draws to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    Screen,
    BufferA,
    BufferB,
}

/// The rendering collaborator the transition engine drives.
pub trait FrameRenderer {
    /// Apply background, materials, lights and exposure of a preset.
    fn apply_context(&mut self, preset: &ContextPreset);

    /// Draw the scene into `target`.
    fn render_scene(&mut self, target: RenderTarget, items: &[DrawItem], camera: &Camera);

    /// Blend buffer A and buffer B to the screen.
    fn composite(&mut self, mask: &WipeMask);
}

/// What a frame did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderPlan {
    /// One full-quality pass of a single context.
    Settled { context: usize },
    /// Two offscreen passes plus a composite.
    Crossfade { from: usize, to: usize, mask: WipeMask },
}

// ---------------------------------------------------------------------------
// Transition state
// ---------------------------------------------------------------------------

/// Derived view of the context position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionState {
    pub position: f32,
    pub from: usize,
    pub to: usize,
    pub progress: f32,
}

impl TransitionState {
    /// True when no blending is needed.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.from == self.to || self.progress < epsilon
    }
}

/// Scroll position over N context presets.
#[derive(Clone, Debug)]
pub struct ContextTransition {
    count: usize,
    position: f32,
    units_per_context: f32,
    epsilon: f32,
    direction: WipeDirection,
}

impl ContextTransition {
    pub fn new(count: usize, units_per_context: f32, epsilon: f32) -> Self {
        Self {
            count: count.max(1),
            position: 0.0,
            units_per_context,
            epsilon,
            direction: WipeDirection::default(),
        }
    }

    fn max_position(&self) -> f32 {
        (self.count - 1) as f32
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Advance by a scroll delta; the result is clamped to the valid range.
    pub fn on_scroll(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        let position = (self.position + delta / self.units_per_context)
            .clamp(0.0, self.max_position());
        // Accumulated steps drift; land exactly on a preset when within epsilon of it
        let nearest = position.round();
        self.position = if (position - nearest).abs() < self.epsilon {
            nearest
        } else {
            position
        };
    }

    /// Jump straight to a preset; out-of-range indices clamp.
    pub fn jump_to(&mut self, index: usize) {
        self.position = (index.min(self.count - 1)) as f32;
    }

    pub fn direction(&self) -> WipeDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: WipeDirection) {
        self.direction = direction;
    }

    pub fn state(&self) -> TransitionState {
        let from = (self.position.floor() as usize).min(self.count - 1);
        let to = (from + 1).min(self.count - 1);
        TransitionState {
            position: self.position,
            from,
            to,
            progress: self.position - from as f32,
        }
    }

    /// Decide how the current frame is drawn.
    pub fn plan(&self) -> RenderPlan {
        let state = self.state();
        if state.is_settled(self.epsilon) {
            RenderPlan::Settled { context: state.from }
        } else {
            RenderPlan::Crossfade {
                from: state.from,
                to: state.to,
                mask: WipeMask {
                    direction: self.direction,
                    progress: state.progress,
                },
            }
        }
    }

    /// Drive `renderer` through one frame.
    pub fn render<R: FrameRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        contexts: &[ContextPreset],
        items: &[DrawItem],
        camera: &Camera,
    ) -> RenderPlan {
        let plan = self.plan();
        match plan {
            RenderPlan::Settled { context } => {
                if let Some(preset) = contexts.get(context) {
                    renderer.apply_context(preset);
                }
                renderer.render_scene(RenderTarget::Screen, items, camera);
            }
            RenderPlan::Crossfade { from, to, mask } => {
                if let Some(preset) = contexts.get(from) {
                    renderer.apply_context(preset);
                }
                renderer.render_scene(RenderTarget::BufferA, items, camera);
                if let Some(preset) = contexts.get(to) {
                    renderer.apply_context(preset);
                }
                renderer.render_scene(RenderTarget::BufferB, items, camera);
                renderer.composite(&mask);
            }
        }
        plan
    }
}
