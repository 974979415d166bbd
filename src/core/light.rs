// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::interaction::SurfaceIntersection;
use crate::core::scene::Scene;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Non-geometric light source.
pub trait Light: Send + Sync {
    /// `None` for lights at infinity.
    fn position(&self) -> Option<Vector3f>;

    fn compute_direct_lighting(&self,
                               ri: &SurfaceIntersection,
                               scene: &Scene,
                               bsdf: &dyn BSDF,
                               receives_shadows: bool) -> RGBSpectrum;
}

/// Fraction of light reaching `ri.p()` from `light_pos` along `to_light`.
pub fn light_visibility(scene: &Scene,
                        ri: &SurfaceIntersection,
                        to_light: &Vector3f,
                        light_pos: Option<&Vector3f>,
                        max_dist: Float) -> Float {
    if let (Some(map), Some(pos)) = (scene.shadow_map(), light_pos) {
        if let Some(v) = map.visibility(&ri.p(), pos) {
            return v;
        }
    }
    if scene.intersect_shadow_ray(&ri.p(), to_light, max_dist) {
        0.0
    } else {
        1.0
    }
}
