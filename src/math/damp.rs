//! Exponential approach toward a target.
//!
//! Camera orbit, zoom and the explode parameter all move the same way: every
//! frame the current value covers a fixed fraction of the remaining distance
//! to its target. [`Damped`] packages that primitive once.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;

// ---------------------------------------------------------------------------
// Lerp trait
// ---------------------------------------------------------------------------

/// Trait for types that can be linearly interpolated.
pub trait Lerp: Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec3::lerp(*self, *other, t)
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// One smoothing step: move `current` by `rate` of the way to `target`.
#[inline]
pub fn approach<T: Lerp>(current: &T, target: &T, rate: f32) -> T {
    current.lerp(target, rate.clamp(0.0, 1.0))
}

/// Wrap an angle into `[-PI, PI)`.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Smoothing step for angles: always travels the short way around and keeps
/// the result wrapped.
#[inline]
pub fn approach_angle(current: f32, target: f32, rate: f32) -> f32 {
    let delta = wrap_angle(target - current);
    wrap_angle(current + delta * rate.clamp(0.0, 1.0))
}

// ---------------------------------------------------------------------------
// Damped
// ---------------------------------------------------------------------------

/// A value that chases its target by a fixed fraction per frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Damped<T: Lerp> {
    current: T,
    target: T,
    rate: f32,
}

impl<T: Lerp> Damped<T> {
    /// Start settled at `value`.
    pub fn new(value: T, rate: f32) -> Self {
        Self {
            current: value.clone(),
            target: value,
            rate,
        }
    }

    /// Smoothed value
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Value being approached
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Retarget without touching the current value.
    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Jump straight to `value`. Only used at initialization.
    pub fn snap(&mut self, value: T) {
        self.current = value.clone();
        self.target = value;
    }

    /// Advance one frame and return the new current value.
    pub fn update(&mut self) -> &T {
        self.current = approach(&self.current, &self.target, self.rate);
        &self.current
    }
}

impl Damped<f32> {
    /// Advance one frame treating the value as an angle in radians.
    pub fn update_angle(&mut self) -> f32 {
        self.current = approach_angle(self.current, self.target, self.rate);
        self.current
    }

    /// Remaining distance to the target.
    pub fn remaining(&self) -> f32 {
        (self.target - self.current).abs()
    }
}
