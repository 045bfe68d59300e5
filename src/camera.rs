use std::f32::consts::FRAC_PI_2;
use crate::math::{Mat4, Vec3};

const ORBIT_SENSITIVITY: f32 = 0.01;
const ZOOM_SENSITIVITY: f32 = 0.5;
const MIN_DISTANCE: f32 = 8.0;
const MAX_DISTANCE: f32 = 80.0;
/// Keeps pitch short of the poles so look-at never degenerates
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.1;
/// Yaw advance per frame while auto-rotating
const AUTO_ROTATE_SPEED: f32 = 0.003;

/// Camera orbiting a fixed target on a sphere
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    auto_rotate: bool,
    rotate_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 6.0, 0.0),
            distance: 30.0,
            yaw: 0.0,
            pitch: 0.2,
            fov: std::f32::consts::FRAC_PI_4,
            near: 0.1,
            far: 500.0,
            auto_rotate: false,
            rotate_speed: AUTO_ROTATE_SPEED,
        }
    }
}

impl OrbitCamera {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            ..Default::default()
        }
    }

    /// Drag-orbit by a pointer delta in pixels
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw += delta_x * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch + delta_y * ORBIT_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta * ZOOM_SENSITIVITY).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn enable_auto_rotate(&mut self) {
        self.auto_rotate = true;
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate
    }

    /// Per-frame update
    pub fn update(&mut self) {
        if self.auto_rotate {
            self.yaw += self.rotate_speed;
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.pitch.sin_cos();
        let (sin_y, cos_y) = self.yaw.sin_cos();
        Vec3::new(
            self.target.x + self.distance * cos_p * sin_y,
            self.target.y + self.distance * sin_p,
            self.target.z + self.distance * cos_p * cos_y,
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position(), self.target, Vec3::UP)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_on_sphere() {
        let mut cam = OrbitCamera::new(Vec3::new(0.0, 5.0, 0.0), 20.0);
        cam.orbit(123.0, -45.0);
        assert!((cam.position().distance(&cam.target) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, 10_000.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        cam.orbit(0.0, -20_000.0);
        assert_eq!(cam.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut cam = OrbitCamera::default();
        cam.zoom(-1000.0);
        assert_eq!(cam.distance, MIN_DISTANCE);
        cam.zoom(1000.0);
        assert_eq!(cam.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_auto_rotate() {
        let mut cam = OrbitCamera::default();
        cam.update();
        assert_eq!(cam.yaw, 0.0);

        cam.enable_auto_rotate();
        cam.update();
        cam.update();
        assert!((cam.yaw - 2.0 * AUTO_ROTATE_SPEED).abs() < 1e-6);
        assert!(cam.is_auto_rotating());
    }

    #[test]
    fn test_view_maps_target_in_front() {
        let cam = OrbitCamera::default();
        let p = cam.view_matrix().transform_point(cam.target);
        assert!(p.z < 0.0);
        assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
    }
}
