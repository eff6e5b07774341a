//! Perspective camera for the slider scene.
//!
//! The camera sits on the +Z axis looking toward the origin, where the slide
//! planes live. Its aspect ratio follows the container; on resize only the
//! aspect changes, the field of view and distance stay fixed.

use crate::math::{Mat4, Vec3};

/// Vertical field of view used by the slider, in degrees.
pub const DEFAULT_FOV_Y: f32 = 75.0;
/// Distance from the camera to the slide plane.
pub const DEFAULT_CAMERA_Z: f32 = 2.0;

/// A perspective camera looking down -Z.
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Width / height of the viewport.
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    pub position: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
        }
    }

    /// The slider camera for a `width × height` container: 75° FOV, z = 2.
    pub fn for_container(width: u32, height: u32) -> Self {
        let mut camera = Self::new(DEFAULT_FOV_Y, aspect_of(width, height), 0.1, 20.0);
        camera.position.z = DEFAULT_CAMERA_Z;
        camera
    }

    /// Update the aspect ratio after a container resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_of(width, height);
    }

    /// World → view transform. The camera never rotates.
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    /// Perspective projection with wgpu's 0..1 depth range.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Project a world-space point to normalized device coordinates.
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_projection().project_point3(point)
    }

    /// Horizontal pixel coordinate of a world-space point in a viewport
    /// `viewport_width` pixels wide (0 = left edge).
    pub fn screen_x(&self, point: Vec3, viewport_width: f32) -> f32 {
        let ndc = self.project(point);
        (ndc.x * 0.5 + 0.5) * viewport_width
    }
}

fn aspect_of(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pixels_per_world_unit;

    #[test]
    fn origin_projects_to_viewport_center() {
        let camera = PerspectiveCamera::for_container(800, 600);
        let x = camera.screen_x(Vec3::ZERO, 800.0);
        assert!((x - 400.0).abs() < 1e-3, "got {x}");
    }

    #[test]
    fn one_world_unit_matches_pixel_scale() {
        let camera = PerspectiveCamera::for_container(800, 600);
        let px = pixels_per_world_unit(800.0, 600.0, camera.fov_y, camera.position.z);
        let x = camera.screen_x(Vec3::new(1.0, 0.0, 0.0), 800.0);
        assert!((x - (400.0 + px)).abs() < 1e-2, "got {x}, expected {}", 400.0 + px);
    }

    #[test]
    fn resize_changes_only_aspect() {
        let mut camera = PerspectiveCamera::for_container(800, 600);
        camera.set_viewport(1200, 400);
        assert!((camera.aspect - 3.0).abs() < 1e-6);
        assert_eq!(camera.fov_y, DEFAULT_FOV_Y);
        assert_eq!(camera.position.z, DEFAULT_CAMERA_Z);
    }
}
