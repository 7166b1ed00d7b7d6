//! Vitrine - interaction and animation core for a 3D product inspector

pub mod core;
pub mod math;
pub mod scene;
pub mod inspector;
pub mod remote;
