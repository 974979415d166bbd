// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::interaction::SurfaceIntersection;
use crate::core::light::{light_visibility, Light};
use crate::core::scene::Scene;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::{RGBSpectrum, Spectrum};

/// Isotropic point light with `1 + linear * d + quadratic * d^2` falloff.
pub struct PointLight {
    position: Vector3f,
    color: RGBSpectrum,
    energy: Float,
    linear_attenuation: Float,
    quadratic_attenuation: Float,
}

impl PointLight {
    pub fn new(position: Vector3f, color: RGBSpectrum, energy: Float) -> Self {
        Self { position, color, energy, linear_attenuation: 0.0, quadratic_attenuation: 0.0 }
    }

    pub fn with_attenuation(mut self, linear: Float, quadratic: Float) -> Self {
        self.linear_attenuation = linear;
        self.quadratic_attenuation = quadratic;
        self
    }

    fn attenuation(&self, dist: Float) -> Float {
        1.0 + self.linear_attenuation * dist + self.quadratic_attenuation * dist * dist
    }
}

impl Light for PointLight {
    fn position(&self) -> Option<Vector3f> {
        Some(self.position)
    }

    fn compute_direct_lighting(&self,
                               ri: &SurfaceIntersection,
                               scene: &Scene,
                               bsdf: &dyn BSDF,
                               receives_shadows: bool) -> RGBSpectrum {
        let to_light = self.position - ri.p();
        let dist = to_light.norm();
        if dist <= 0.0 {
            return RGBSpectrum::black();
        }
        let to_light = to_light / dist;

        let cos = to_light.dot(&ri.facing_normal());
        if cos <= 0.0 {
            return RGBSpectrum::black();
        }

        let visibility = if receives_shadows {
            light_visibility(scene, ri, &to_light, Some(&self.position), dist)
        } else {
            1.0
        };
        if visibility <= 0.0 {
            return RGBSpectrum::black();
        }

        self.color.component_mul(&bsdf.value(&to_light, ri))
            * (visibility * cos * self.energy / self.attenuation(dist))
    }
}
