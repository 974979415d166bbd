// Copyright @yucwang 2026

use crate::core::computation_node::{generate_node_id, ComputationNode};
use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Two-sided parallelogram `center + a * half_u + b * half_v` for a, b in [-1, 1].
pub struct Rectangle {
    id: String,
    center: Vector3f,
    half_u: Vector3f,
    half_v: Vector3f,
    normal: Vector3f,
}

impl Rectangle {
    pub fn new(center: Vector3f, half_u: Vector3f, half_v: Vector3f) -> Self {
        let mut normal = half_u.cross(&half_v);
        if normal.norm() > 0.0 {
            normal = normal.normalize();
        } else {
            log::warn!("Rectangle: degenerate edges {:?} and {:?}.", half_u, half_v);
            normal = Vector3f::new(0.0, 0.0, 1.0);
        }

        Self { id: generate_node_id("rectangle"), center, half_u, half_v, normal }
    }

    fn intersect_local(&self, ray: &Ray3f) -> Option<(Float, Vector2f)> {
        let denom = ray.dir().dot(&self.normal);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = (self.center - ray.origin()).dot(&self.normal) / denom;
        if t <= 0.0 || !ray.test_segment(t) {
            return None;
        }

        let d = ray.at(t) - self.center;
        let a = d.dot(&self.half_u) / self.half_u.norm_squared();
        let b = d.dot(&self.half_v) / self.half_v.norm_squared();
        if a.abs() > 1.0 || b.abs() > 1.0 {
            return None;
        }

        Some((t, Vector2f::new(0.5 * (a + 1.0), 0.5 * (b + 1.0))))
    }
}

impl ComputationNode for Rectangle {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Shape for Rectangle {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let (t, uv) = self.intersect_local(ray)?;
        Some(SurfaceIntersection::new(ray.at(t), self.normal, self.normal, uv, t, *ray))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.intersect_local(ray).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Rectangle {
        Rectangle::new(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 2.0, 0.0))
    }

    #[test]
    fn test_hit_from_both_sides() {
        let rect = unit();
        let down = Ray3f::new(Vector3f::new(0.5, 1.5, 3.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = rect.ray_intersection(&down).unwrap();
        assert!((hit.t() - 3.0).abs() < 1e-5);
        assert!((hit.uv() - Vector2f::new(0.75, 0.875)).norm() < 1e-5);
        assert!(!hit.is_back_facing());

        let up = Ray3f::new(Vector3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let hit = rect.ray_intersection(&up).unwrap();
        assert!(hit.is_back_facing());
        assert!((hit.facing_normal() - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_misses() {
        let rect = unit();
        let outside = Ray3f::new(Vector3f::new(1.5, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        assert!(rect.ray_intersection(&outside).is_none());
        let parallel = Ray3f::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(1.0, 0.0, 0.0), None, None);
        assert!(!rect.ray_intersection_t(&parallel));
        let short = Ray3f::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, Some(0.5));
        assert!(!rect.ray_intersection_t(&short));
    }
}
