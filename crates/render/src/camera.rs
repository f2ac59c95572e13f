use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective camera looking from `position` at `target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_degrees,
            aspect,
            near,
            far,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Recompute the aspect ratio for a viewport. Zero sizes count as 1.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Projection with depth in `[0, 1]`, as wgpu expects.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect.max(1e-6),
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 16.0 / 9.0, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_is_finite() {
        let cam = PerspectiveCamera::default().at(Vec3::new(1.0, 1.0, 2.0));
        let vp = cam.view_projection().to_cols_array();
        assert!(vp.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn set_viewport_recomputes_aspect() {
        let mut cam = PerspectiveCamera::default();
        cam.set_viewport(800, 600);
        assert!((cam.aspect - 800.0 / 600.0).abs() < 1e-6);
        cam.set_viewport(300, 0);
        assert_eq!(cam.aspect, 300.0);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = PerspectiveCamera::default()
            .at(Vec3::new(0.0, 0.0, 1.25))
            .looking_at(Vec3::ZERO);
        let clip = cam.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
