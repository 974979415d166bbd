// Copyright @yucwang 2023

use crate::core::computation_node::ComputationNode;
use crate::core::interaction::SurfaceIntersection;
use crate::math::ray::Ray3f;

pub trait Shape: ComputationNode + Send + Sync {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection>;
    /// Occlusion test within `[ray.min_t, ray.max_t]`.
    fn ray_intersection_t(&self, ray: &Ray3f) -> bool;
}
