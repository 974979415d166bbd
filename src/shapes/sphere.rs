// Copyright @yucwang 2026

use crate::core::computation_node::{generate_node_id, ComputationNode};
use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::constants::{Float, Vector2f, Vector3f, INV_PI, PI};
use crate::math::ray::Ray3f;

pub struct Sphere {
    id: String,
    center: Vector3f,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        Self { id: generate_node_id("sphere"), center, radius: radius.abs() }
    }

    /// Nearest root inside the ray segment.
    fn nearest_t(&self, ray: &Ray3f) -> Option<Float> {
        let oc = ray.origin() - self.center;
        let b = oc.dot(&ray.dir());
        let c = oc.norm_squared() - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }

        let sq = disc.sqrt();
        [-b - sq, -b + sq].iter()
            .cloned()
            .find(|t| *t > 0.0 && ray.test_segment(*t))
    }
}

impl ComputationNode for Sphere {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Shape for Sphere {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let t = self.nearest_t(ray)?;
        let p = ray.at(t);
        let n = (p - self.center) / self.radius;
        let phi = n.y.atan2(n.x);
        let theta = n.z.max(-1.0).min(1.0).acos();
        let uv = Vector2f::new(0.5 * (phi * INV_PI + 1.0), theta / PI);
        Some(SurfaceIntersection::new(p, n, n, uv, t, *ray))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.nearest_t(ray).is_some()
    }
}
