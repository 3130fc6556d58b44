use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;
use crate::core::DisplayContext;

/// A world point after projection onto the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Pixel position, origin top-left
    pub screen: Vec2,
    /// Distance along the view axis
    pub depth: f32,
    /// Pixels per world unit at this depth
    pub scale: f32,
}

/// Perspective camera that eases from its base position toward a pointer
/// driven target while always looking at a fixed point.
#[derive(Debug, Clone)]
pub struct SmoothCamera {
    base: Vec3,
    look_at: Vec3,
    target: Vec3,
    current: Vec3,
    pointer_gain: Vec3,
    smoothing: f32,
    max_step_fraction: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl SmoothCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let base = Vec3::from_array(config.base_position);
        Self {
            base,
            look_at: Vec3::from_array(config.look_at),
            target: base,
            current: base,
            pointer_gain: Vec3::from_array(config.pointer_gain),
            smoothing: config.smoothing,
            max_step_fraction: config.max_step_fraction.clamp(0.0, 1.0),
            fov_y: config.fov_degrees.to_radians(),
            aspect: aspect.max(f32::EPSILON),
            near: config.near,
            far: config.far,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.current
    }

    pub fn base(&self) -> Vec3 {
        self.base
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Retarget from a normalised pointer. Horizontal motion also pushes depth.
    pub fn set_pointer(&mut self, pointer: Vec2) {
        let g = self.pointer_gain;
        self.target = self.base + Vec3::new(pointer.x * g.x, pointer.y * g.y, pointer.x * g.z);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Share of the remaining distance covered in a tick of `delta` seconds
    pub fn step_fraction(&self, delta: f32) -> f32 {
        let frame_independent = 1.0 - (-delta.max(0.0) * self.smoothing).exp();
        frame_independent.min(self.max_step_fraction)
    }

    /// Move toward the target; returns the blend factor used
    pub fn ease(&mut self, delta: f32) -> f32 {
        let blend = self.step_fraction(delta);
        self.current += (self.target - self.current) * blend;
        blend
    }

    pub fn forward(&self) -> Vec3 {
        (self.look_at - self.current).normalize_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or(Vec3::X)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.current, self.look_at, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Project with a precomputed view-projection; `None` behind the near plane
    pub fn project_with(&self, view_projection: &Mat4, point: Vec3, context: &DisplayContext) -> Option<Projected> {
        let clip = *view_projection * point.extend(1.0);
        if clip.w <= self.near || !clip.is_finite() {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let screen = Vec2::new(
            (ndc.x * 0.5 + 0.5) * context.width as f32,
            (0.5 - ndc.y * 0.5) * context.height as f32,
        );
        Some(Projected {
            screen,
            depth: clip.w,
            scale: context.focal_length(self.fov_y) / clip.w,
        })
    }

    pub fn project(&self, point: Vec3, context: &DisplayContext) -> Option<Projected> {
        self.project_with(&self.view_projection(), point, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> SmoothCamera {
        SmoothCamera::new(&CameraConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn starts_at_base() {
        let cam = camera();
        assert_eq!(cam.position(), Vec3::new(-40.0, 170.0, 320.0));
        assert_eq!(cam.target(), cam.base());
    }

    #[test]
    fn pointer_gains_per_axis() {
        let mut cam = camera();
        cam.set_pointer(Vec2::new(1.0, -1.0));
        assert_eq!(cam.target() - cam.base(), Vec3::new(55.0, -28.0, 25.0));
    }

    #[test]
    fn step_fraction_is_capped() {
        let cam = camera();
        assert!(cam.step_fraction(1.0) <= 0.06 + f32::EPSILON);
        assert_relative_eq!(cam.step_fraction(0.016), 1.0 - (-0.016f32 * 2.14).exp(), epsilon = 1e-6);
        assert_eq!(cam.step_fraction(0.0), 0.0);
    }

    #[test]
    fn ease_converges() {
        let mut cam = camera();
        cam.set_pointer(Vec2::ONE);
        for _ in 0..2000 {
            cam.ease(1.0 / 60.0);
        }
        assert!(cam.position().distance(cam.target()) < 1e-2);
    }

    #[test]
    fn look_at_projects_to_centre() {
        let cam = camera();
        let ctx = DisplayContext::new(1600, 900);
        let p = cam.project(cam.look_at(), &ctx).unwrap();
        assert_relative_eq!(p.screen.x, 800.0, epsilon = 0.5);
        assert_relative_eq!(p.screen.y, 450.0, epsilon = 0.5);
        assert_relative_eq!(p.depth, cam.position().distance(cam.look_at()), epsilon = 0.01);
    }

    #[test]
    fn behind_camera_is_culled() {
        let cam = camera();
        let behind = cam.position() - cam.forward() * 10.0;
        assert!(cam.project(behind, &DisplayContext::default()).is_none());
    }

    #[test]
    fn basis_is_orthonormal() {
        let cam = camera();
        assert_relative_eq!(cam.up().length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(cam.right().dot(cam.forward()), 0.0, epsilon = 1e-5);
        assert!(cam.up().y > 0.0);
    }
}
