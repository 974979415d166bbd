// Copyright @yucwang 2026

use crate::core::context::RuntimeContext;
use crate::math::constants::Vector2f;
use crate::math::ray::Ray3f;

pub trait Sensor: Send + Sync {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Ray through a raster position in pixels, `(0, 0)` is the top-left corner.
    fn generate_ray(&self, rc: &mut RuntimeContext, raster: &Vector2f) -> Option<Ray3f>;
}
