// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

pub trait ShadowMap: Send + Sync {
    /// Visibility in [0, 1] between a point and a light, `None` when the map
    /// has no answer and a shadow ray must be traced.
    fn visibility(&self, point: &Vector3f, light_position: &Vector3f) -> Option<Float>;
}
