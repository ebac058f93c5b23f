use glam::{Mat4, Vec2, Vec3};

use crate::config::SceneConfig;
use crate::input::{PointerButton, SceneEvent};
use crate::math::Ray;

pub const DEFAULT_FOV_Y: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl PerspectiveCamera {
    pub fn new(position: Vec3, target: Vec3, aspect: f32, far: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: DEFAULT_FOV_Y,
            near: DEFAULT_NEAR,
            far,
            aspect,
        }
    }

    pub fn from_config(config: &SceneConfig, aspect: f32) -> Self {
        Self::new(
            config.start_position.into(),
            config.look_at.into(),
            aspect,
            config.clipping_plane,
        )
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Projects a world point to normalized device coordinates.
    /// `None` when the point is behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// World-space ray through a point given in normalized device coordinates
    pub fn ndc_ray(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far - self.position)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }
}

pub const ORBIT_ROTATE_SPEED: f32 = 0.005;
pub const ORBIT_ZOOM_STEP: f32 = 0.1;
const MIN_POLAR: f32 = 0.01;
const MIN_DISTANCE: f32 = 0.5;

/// Drag-to-orbit and wheel-to-zoom around the camera target
#[derive(Debug, Default, Clone, Copy)]
pub struct OrbitControls {
    dragging: bool,
    last: Option<Vec2>,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Returns true when the event moved the camera or changed drag state
    pub fn handle(&mut self, event: &SceneEvent, camera: &mut PerspectiveCamera) -> bool {
        match *event {
            SceneEvent::PointerDown {
                x,
                y,
                button: PointerButton::Left,
            } => {
                self.dragging = true;
                self.last = Some(Vec2::new(x, y));
                true
            }
            SceneEvent::PointerUp { .. } => {
                let was_dragging = self.dragging;
                self.dragging = false;
                self.last = None;
                was_dragging
            }
            SceneEvent::PointerMove { x, y } if self.dragging => {
                let current = Vec2::new(x, y);
                let delta = self.last.map_or(Vec2::ZERO, |last| current - last);
                self.last = Some(current);
                orbit(camera, -delta.x * ORBIT_ROTATE_SPEED, -delta.y * ORBIT_ROTATE_SPEED);
                true
            }
            SceneEvent::Wheel { delta } => {
                let factor = if delta > 0.0 {
                    1.0 + ORBIT_ZOOM_STEP
                } else {
                    1.0 - ORBIT_ZOOM_STEP
                };
                zoom(camera, factor);
                true
            }
            _ => false,
        }
    }
}

/// Rotates the camera position around its target on a sphere
pub fn orbit(camera: &mut PerspectiveCamera, delta_azimuth: f32, delta_polar: f32) {
    let offset = camera.position - camera.target;
    let radius = offset.length();
    if radius <= f32::EPSILON {
        return;
    }
    let azimuth = offset.x.atan2(offset.z) + delta_azimuth;
    let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() + delta_polar)
        .clamp(MIN_POLAR, std::f32::consts::PI - MIN_POLAR);

    camera.position = camera.target
        + Vec3::new(
            radius * polar.sin() * azimuth.sin(),
            radius * polar.cos(),
            radius * polar.sin() * azimuth.cos(),
        );
}

pub fn zoom(camera: &mut PerspectiveCamera, factor: f32) {
    let offset = camera.position - camera.target;
    let distance = (offset.length() * factor).clamp(MIN_DISTANCE, camera.far * 0.9);
    camera.position = camera.target + offset.normalize_or_zero() * distance;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO, 4.0 / 3.0, 1000.0)
    }

    #[test]
    fn test_target_projects_to_ndc_origin() {
        let ndc = camera().project(Vec3::ZERO).unwrap();
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
    }

    #[test]
    fn test_point_behind_camera_is_none() {
        let cam = camera();
        let behind = cam.position - cam.forward() * 3.0;
        assert!(cam.project(behind).is_none());
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let cam = camera();
        let ray = cam.ndc_ray(Vec2::ZERO);
        assert!(ray.direction.abs_diff_eq(cam.forward(), 1e-4));
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut cam = camera();
        let before = cam.position.distance(cam.target);
        orbit(&mut cam, 0.7, -0.2);
        assert!((cam.position.distance(cam.target) - before).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_in_moves_closer() {
        let mut cam = camera();
        let before = cam.position.length();
        zoom(&mut cam, 0.5);
        assert!(cam.position.length() < before);
    }

    #[test]
    fn test_orbit_controls_drag() {
        let mut cam = camera();
        let mut controls = OrbitControls::new();
        let start = cam.position;
        controls.handle(
            &SceneEvent::PointerDown {
                x: 10.0,
                y: 10.0,
                button: PointerButton::Left,
            },
            &mut cam,
        );
        assert!(controls.handle(&SceneEvent::PointerMove { x: 60.0, y: 10.0 }, &mut cam));
        assert!(!cam.position.abs_diff_eq(start, 1e-4));
        controls.handle(
            &SceneEvent::PointerUp {
                x: 60.0,
                y: 10.0,
                button: PointerButton::Left,
            },
            &mut cam,
        );
        assert!(!controls.is_dragging());
        assert!(!controls.handle(&SceneEvent::PointerMove { x: 90.0, y: 10.0 }, &mut cam));
    }

    #[test]
    fn test_set_aspect_rejects_nonsense() {
        let mut cam = camera();
        cam.set_aspect(0.0);
        assert!((cam.aspect - 4.0 / 3.0).abs() < 1e-6);
        cam.set_aspect(2.0);
        assert_eq!(cam.aspect, 2.0);
    }
}
