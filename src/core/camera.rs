//! Camera with two interchangeable projection models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Mat4, Quat, Vec2, Vec3};
use crate::math::Ray;

/// Projection model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    #[default]
    Orthographic,
    Perspective,
}

impl ProjectionMode {
    pub const ALL: [ProjectionMode; 2] =
        [ProjectionMode::Orthographic, ProjectionMode::Perspective];

    pub fn label(self) -> &'static str {
        match self {
            ProjectionMode::Orthographic => "orthographic",
            ProjectionMode::Perspective => "perspective",
        }
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "orthographic" | "ortho" => Ok(ProjectionMode::Orthographic),
            "perspective" | "persp" => Ok(ProjectionMode::Perspective),
            _ => Err(Error::UnknownProjection(s.to_string())),
        }
    }
}

/// A world point carried into normalized device coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenProjection {
    /// x right, y up, both in [-1, 1] when on screen
    pub ndc: Vec2,
    /// Distance in front of the camera along its view axis
    pub depth: f32,
    /// True when the point lies behind the near plane
    pub behind: bool,
}

/// Camera pose plus projection parameters
#[derive(Clone, Debug)]
pub struct Camera {
    /// World position
    pub position: Vec3,
    /// Rotation as quaternion
    pub rotation: Quat,
    /// Which projection this camera uses
    pub mode: ProjectionMode,
    /// Orthographic vertical extent in world units
    pub frustum_size: f32,
    /// Vertical field of view in radians (perspective)
    pub fov_y: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Camera {
    /// Create a camera at `position` looking down -Z
    pub fn new(mode: ProjectionMode, position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            mode,
            frustum_size: 6.0,
            fov_y: 35.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 200.0,
        }
    }

    /// Orient the camera toward `target`
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let mut right = forward.cross(up).normalize_or_zero();
        if right == Vec3::ZERO {
            right = forward.any_orthonormal_vector();
        }
        let up = right.cross(forward);
        self.rotation = Quat::from_mat3(&glam::Mat3::from_cols(right, up, -forward));
    }

    /// Take position and orientation from another camera
    pub fn copy_pose_from(&mut self, other: &Camera) {
        self.position = other.position;
        self.rotation = other.rotation;
    }

    /// Get view matrix (world to camera space)
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation.conjugate());
        let translation_matrix = Mat4::from_translation(-self.position);
        rotation_matrix * translation_matrix
    }

    /// Get projection matrix (camera to clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        match self.mode {
            ProjectionMode::Perspective => {
                Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let half_h = self.frustum_size * 0.5;
                let half_w = half_h * self.aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        }
    }

    /// Get combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get forward direction (negative Z in camera space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get right direction (positive X in camera space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get up direction (positive Y in camera space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Update aspect ratio (call on window resize)
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 && width > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Project a world point to normalized device coordinates
    pub fn project(&self, world: Vec3) -> ScreenProjection {
        let view = self.view_matrix().transform_point3(world);
        let depth = -view.z;
        let clip = self.view_projection().project_point3(world);
        ScreenProjection {
            ndc: Vec2::new(clip.x, clip.y),
            depth,
            behind: depth < self.near,
        }
    }

    /// Ray through a point given in normalized device coordinates
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let forward = self.forward();
        let right = self.right();
        let up = self.up();
        match self.mode {
            ProjectionMode::Perspective => {
                let half_h = (0.5 * self.fov_y).tan();
                let half_w = half_h * self.aspect;
                let dir = (forward + right * (ndc.x * half_w) + up * (ndc.y * half_h))
                    .normalize_or_zero();
                Ray::new(self.position, dir)
            }
            ProjectionMode::Orthographic => {
                let half_h = self.frustum_size * 0.5;
                let half_w = half_h * self.aspect;
                let origin = self.position + right * (ndc.x * half_w) + up * (ndc.y * half_h);
                Ray::new(origin, forward)
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(ProjectionMode::Orthographic, Vec3::new(0.0, 0.0, 10.0), 16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions() {
        let camera = Camera::default();

        assert!((camera.forward().z - (-1.0)).abs() < 0.001);
        assert!((camera.right().x - 1.0).abs() < 0.001);
        assert!((camera.up().y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(10.0, 0.0, 0.0);
        camera.look_at(Vec3::ZERO, Vec3::Y);
        assert!((camera.forward() - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_project_center_and_behind() {
        for mode in ProjectionMode::ALL {
            let camera = Camera::new(mode, Vec3::new(0.0, 0.0, 10.0), 1.0);
            let front = camera.project(Vec3::ZERO);
            assert!(front.ndc.length() < 1e-4);
            assert!(!front.behind);
            assert!((front.depth - 10.0).abs() < 1e-4);

            let back = camera.project(Vec3::new(0.0, 0.0, 20.0));
            assert!(back.behind);
        }
    }

    #[test]
    fn test_project_right_is_positive_x() {
        let camera = Camera::new(ProjectionMode::Orthographic, Vec3::new(0.0, 0.0, 10.0), 1.0);
        let p = camera.project(Vec3::new(1.5, 0.0, 0.0));
        // frustum 6 wide at aspect 1: half width 3
        assert!((p.ndc.x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_ray_roundtrips_projection() {
        for mode in ProjectionMode::ALL {
            let camera = Camera::new(mode, Vec3::new(0.0, 0.0, 10.0), 1.5);
            let point = Vec3::new(0.7, -0.4, 0.0);
            let p = camera.project(point);
            let ray = camera.ray_from_ndc(p.ndc);
            // Distance from point to ray
            let to_point = point - ray.origin;
            let along = to_point.dot(ray.direction);
            let closest = ray.at(along);
            assert!((closest - point).length() < 1e-3, "{:?}", mode);
        }
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let camera = Camera::default();
        let a = camera.ray_from_ndc(Vec2::new(-1.0, 1.0));
        let b = camera.ray_from_ndc(Vec2::new(1.0, -1.0));
        assert!((a.direction - b.direction).length() < 1e-6);
        assert!((a.origin - b.origin).length() > 1.0);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Perspective".parse::<ProjectionMode>().unwrap(), ProjectionMode::Perspective);
        assert_eq!("ortho".parse::<ProjectionMode>().unwrap(), ProjectionMode::Orthographic);
        assert!("fisheye".parse::<ProjectionMode>().is_err());
    }
}
