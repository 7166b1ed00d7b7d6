//! Mathematical utilities and data structures

pub mod aabb;
pub mod ray;
pub mod damp;

pub use aabb::Aabb;
pub use ray::Ray;
pub use damp::{approach, approach_angle, wrap_angle, Damped, Lerp};
