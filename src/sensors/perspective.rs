// Copyright @yucwang 2026

use crate::core::context::RuntimeContext;
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    near_clip: Float,
    far_clip: Float,
    width: usize,
    height: usize,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               width: usize,
               height: usize,
               near_clip: Float,
               far_clip: Float) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();
        let aspect = if height > 0 { width as Float / height as Float } else { 1.0 };

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect,
            near_clip,
            far_clip,
            width,
            height,
        }
    }

    /// Ray through normalized film coordinates, `(0, 0)` top-left and `(1, 1)` bottom-right.
    pub fn sample_ray(&self, u: &Vector2f) -> Ray3f {
        let px = (2.0 * u.x - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * u.y) * self.tan_half_fov_y;

        let d_camera = Vector3f::new(px, py, 1.0).normalize();
        let dir = (self.right * d_camera.x + self.up * d_camera.y + self.forward * d_camera.z).normalize();

        let inv_z = if d_camera.z != 0.0 { 1.0 / d_camera.z } else { std::f32::MAX };
        let near_t = self.near_clip * inv_z;
        let far_t = self.far_clip * inv_z;
        let origin = self.origin + dir * near_t;
        Ray3f::new(origin, dir, Some(0.0), Some(far_t - near_t))
    }
}

impl Sensor for PerspectiveCamera {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn generate_ray(&self, _rc: &mut RuntimeContext, raster: &Vector2f) -> Option<Ray3f> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let u = Vector2f::new(raster.x / self.width as Float, raster.y / self.height as Float);
        Some(self.sample_ray(&u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::RenderPass;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(Vector3f::zeros(),
                               Vector3f::new(0.0, 0.0, -1.0),
                               Vector3f::new(0.0, 1.0, 0.0),
                               std::f32::consts::FRAC_PI_2,
                               4, 4, 0.0, std::f32::MAX)
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let cam = camera();
        let mut rc = RuntimeContext::new(RenderPass::Normal, false);
        let ray = cam.generate_ray(&mut rc, &Vector2f::new(2.0, 2.0)).unwrap();
        assert!((ray.dir() - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_top_left_raster_points_up_left() {
        let cam = camera();
        let mut rc = RuntimeContext::new(RenderPass::Normal, false);
        let ray = cam.generate_ray(&mut rc, &Vector2f::new(0.0, 0.0)).unwrap();
        assert!(ray.dir().x < 0.0);
        assert!(ray.dir().y > 0.0);
        // 90 degree fov: corner at (-1, 1, -1)
        assert!((ray.dir() - Vector3f::new(-1.0, 1.0, -1.0).normalize()).norm() < 1e-5);
    }
}
