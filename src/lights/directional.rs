// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::interaction::SurfaceIntersection;
use crate::core::light::{light_visibility, Light};
use crate::core::scene::Scene;
use crate::math::constants::{Float, Vector3f, FLOAT_MAX};
use crate::math::spectrum::{RGBSpectrum, Spectrum};

/// Light arriving from infinity along one direction.
pub struct DirectionalLight {
    /// Direction the light travels in.
    direction: Vector3f,
    color: RGBSpectrum,
    energy: Float,
}

impl DirectionalLight {
    pub fn new(direction: Vector3f, color: RGBSpectrum, energy: Float) -> Self {
        let direction = if direction.norm() > 0.0 {
            direction.normalize()
        } else {
            log::warn!("DirectionalLight: zero direction, pointing straight down.");
            Vector3f::new(0.0, 0.0, -1.0)
        };
        Self { direction, color, energy }
    }
}

impl Light for DirectionalLight {
    fn position(&self) -> Option<Vector3f> {
        None
    }

    fn compute_direct_lighting(&self,
                               ri: &SurfaceIntersection,
                               scene: &Scene,
                               bsdf: &dyn BSDF,
                               receives_shadows: bool) -> RGBSpectrum {
        let to_light = -self.direction;
        let cos = to_light.dot(&ri.facing_normal());
        if cos <= 0.0 {
            return RGBSpectrum::black();
        }

        let visibility = if receives_shadows {
            light_visibility(scene, ri, &to_light, None, FLOAT_MAX)
        } else {
            1.0
        };
        if visibility <= 0.0 {
            return RGBSpectrum::black();
        }

        self.color.component_mul(&bsdf.value(&to_light, ri)) * (visibility * cos * self.energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::INV_PI;
    use crate::shaders::test_scenes::{diffuse_floor, floor_hit};

    #[test]
    fn test_sun_overhead() {
        let mut scene = Scene::new();
        scene.add_object(diffuse_floor(1.0, 10.0));
        let ri = floor_hit(&scene, 0.0, 0.0);
        let brdf = scene.object(0).unwrap().material.bsdf().unwrap();
        let sun = DirectionalLight::new(Vector3f::new(0.0, 0.0, -2.0), RGBSpectrum::gray(1.0), 3.0);
        let c = sun.compute_direct_lighting(&ri, &scene, brdf, true);
        assert!((c.x - 3.0 * INV_PI).abs() < 1e-5);
        assert!(sun.position().is_none());
    }
}
