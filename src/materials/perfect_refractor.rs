// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::rng::LcgRng;
use crate::core::scattered::{ScatterKind, ScatteredRay, ScatteredRaySet};
use crate::core::spf::SPF;
use crate::math::constants::Float;
use crate::math::optics::{fresnel_dielectric, reflect, refract};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};

/// Smooth dielectric. Splits into a refracted and a Fresnel-reflected ray,
/// reflecting everything under total internal reflection.
pub struct PerfectRefractorSPF {
    refractivity: RGBSpectrum,
    ior: Float,
}

impl PerfectRefractorSPF {
    pub fn new(refractivity: RGBSpectrum, ior: Float) -> Self {
        Self { refractivity, ior }
    }
}

impl SPF for PerfectRefractorSPF {
    fn scatter(&self,
               ri: &SurfaceIntersection,
               _rng: &mut LcgRng,
               ior_stack: Option<&IorStack>) -> ScatteredRaySet {
        let mut scattered = ScatteredRaySet::new();
        let d = ri.ray().dir();
        let n = ri.facing_normal();
        let entering = !ri.is_back_facing();
        let object = ri.object_id();

        // Stack the transmitted ray will carry, and the IORs on either side.
        let (through_stack, eta_i, eta_t) = match ior_stack {
            Some(stack) => {
                let mut next = stack.clone();
                if entering {
                    next.push(object, self.ior);
                    (Some(next), stack.top(), self.ior)
                } else {
                    next.pop(object);
                    let outside = next.top();
                    (Some(next), self.ior, outside)
                }
            }
            None if entering => (None, 1.0, self.ior),
            None => (None, self.ior, 1.0),
        };

        let cos_i = -d.dot(&n);
        let (refracted, reflectance) = match refract(&d, &n, eta_i / eta_t) {
            Some(dir) => (Some(dir), fresnel_dielectric(cos_i, eta_i, eta_t)),
            None => (None, 1.0),
        };

        if let Some(dir) = refracted {
            if reflectance < 1.0 {
                let weight = self.refractivity * (1.0 - reflectance);
                let mut ray = ScatteredRay::new(Ray3f::new(ri.p(), dir, None, None), ScatterKind::Refraction, weight);
                if let Some(stack) = through_stack {
                    ray = ray.with_ior_stack(stack);
                }
                scattered.push(ray);
            }
        }

        if reflectance > 0.0 {
            let dir = reflect(&d, &n);
            let mut ray = ScatteredRay::new(Ray3f::new(ri.p(), dir, None, None),
                                            ScatterKind::Reflection,
                                            RGBSpectrum::gray(reflectance));
            if let Some(stack) = ior_stack {
                ray = ray.with_ior_stack(stack.clone());
            }
            scattered.push(ray);
        }

        scattered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::Shape;
    use crate::math::constants::Vector3f;
    use crate::shapes::sphere::Sphere;

    #[test]
    fn test_enter_and_leave_glass_ball() {
        let ball = Sphere::new(Vector3f::zeros(), 1.0);
        let spf = PerfectRefractorSPF::new(RGBSpectrum::gray(1.0), 1.5);
        let mut rng = LcgRng::new(0);
        let air = IorStack::new(1.0);

        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 3.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let ri = ball.ray_intersection(&ray).unwrap();
        let set = spf.scatter(&ri, &mut rng, Some(&air));
        assert_eq!(set.len(), 2);
        let inside = set.iter().find(|s| s.kind == ScatterKind::Refraction).unwrap();
        let inside_stack = inside.ior_stack.clone().unwrap();
        assert_eq!(inside_stack.top(), 1.5);
        assert!((inside.weight.x - 0.96).abs() < 1e-3);

        let out_ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let ri = ball.ray_intersection(&out_ray).unwrap();
        let set = spf.scatter(&ri, &mut rng, Some(&inside_stack));
        let outside = set.iter().find(|s| s.kind == ScatterKind::Refraction).unwrap();
        assert_eq!(outside.ior_stack.as_ref().map(|s| s.depth()), Some(0));
        assert!((outside.ray.dir() - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_total_internal_reflection() {
        let ball = Sphere::new(Vector3f::zeros(), 1.0);
        let spf = PerfectRefractorSPF::new(RGBSpectrum::gray(1.0), 1.5);
        // Grazing exit from inside the ball.
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 0.95), Vector3f::new(1.0, 0.0, 0.0), None, None);
        let ri = ball.ray_intersection(&ray).unwrap();
        assert!(ri.is_back_facing());
        let set = spf.scatter(&ri, &mut LcgRng::new(0), None);
        assert_eq!(set.len(), 1);
        let s = set.iter().next().unwrap();
        assert_eq!(s.kind, ScatterKind::Reflection);
        assert_eq!(s.weight, RGBSpectrum::gray(1.0));
    }
}
