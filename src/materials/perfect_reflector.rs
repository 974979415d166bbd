// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::rng::LcgRng;
use crate::core::scattered::{ScatterKind, ScatteredRay, ScatteredRaySet};
use crate::core::spf::SPF;
use crate::math::optics::reflect;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

pub struct PerfectReflectorSPF {
    reflectance: RGBSpectrum,
}

impl PerfectReflectorSPF {
    pub fn new(reflectance: RGBSpectrum) -> Self {
        Self { reflectance }
    }
}

impl SPF for PerfectReflectorSPF {
    fn scatter(&self,
               ri: &SurfaceIntersection,
               _rng: &mut LcgRng,
               ior_stack: Option<&IorStack>) -> ScatteredRaySet {
        let mut scattered = ScatteredRaySet::new();
        let dir = reflect(&ri.ray().dir(), &ri.facing_normal());
        let mut ray = ScatteredRay::new(Ray3f::new(ri.p(), dir, None, None), ScatterKind::Reflection, self.reflectance);
        if let Some(stack) = ior_stack {
            ray = ray.with_ior_stack(stack.clone());
        }
        scattered.push(ray);
        scattered
    }
}
