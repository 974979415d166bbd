// Copyright @yucwang 2026

use crate::core::context::RuntimeContext;
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::{RayRole, RayState};
use crate::core::scattered::{ScatteredRay, ScatteredRaySet};
use crate::core::shader::ShaderOp;
use crate::math::constants::Float;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::RayCaster;
use crate::shaders::{consult_cache, enabled_cache, follow, store_in_cache, CacheLookup, HitDistances, TraceMask};

/// Monte Carlo estimate of indirect light from repeated scatters of the
/// material, cacheable in the irradiance cache.
pub struct DistributionOp {
    num_samples: u32,
    use_irradiance_cache: bool,
    force_check_emitters: bool,
    branch: bool,
    mask: TraceMask,
}

impl DistributionOp {
    pub fn new(num_samples: u32, use_irradiance_cache: bool, force_check_emitters: bool, branch: bool) -> Self {
        Self {
            num_samples: num_samples.max(1),
            use_irradiance_cache,
            force_check_emitters,
            branch,
            mask: TraceMask::default(),
        }
    }

    pub fn with_mask(mut self, mask: TraceMask) -> Self {
        self.mask = mask;
        self
    }

    fn trace(&self,
             rc: &mut RuntimeContext,
             ri: &SurfaceIntersection,
             caster: &RayCaster,
             rs: &RayState,
             consider_emission: bool,
             scat: &ScatteredRay,
             weight: RGBSpectrum,
             ior_stack: Option<&IorStack>,
             distances: &mut HitDistances) -> RGBSpectrum {
        let mut child = rs.spawn(scat.weight.max_value(), RayRole::FinalGather);
        child.consider_emission = consider_emission;
        let result = follow(rc, caster, ri, scat, &child, ior_stack);
        distances.record(&result);
        result.color.component_mul(&weight)
    }
}

impl ShaderOp for DistributionOp {
    fn name(&self) -> &'static str {
        "distribution"
    }

    fn perform_operation(&self,
                         rc: &mut RuntimeContext,
                         ri: &SurfaceIntersection,
                         caster: &RayCaster,
                         rs: &RayState,
                         c: &mut RGBSpectrum,
                         ior_stack: Option<&IorStack>,
                         _scattered: Option<&ScatteredRaySet>) {
        *c = RGBSpectrum::black();
        let material = match ri.material() {
            Some(m) => m,
            None => return,
        };
        let spf = match material.spf() {
            Some(spf) => spf,
            None => return,
        };

        let cache = if self.use_irradiance_cache { enabled_cache(caster) } else { None };
        match consult_cache(rc, ri, cache, false) {
            CacheLookup::Cached(value) => {
                *c = value;
                return;
            }
            CacheLookup::Skip => return,
            CacheLookup::Compute => {}
        }

        let consider_emission = self.force_check_emitters || material.bsdf().is_none();
        let mut accrued = RGBSpectrum::black();
        let mut distances = HitDistances::default();

        for _ in 0..self.num_samples {
            let scattered = spf.scatter(ri, &mut rc.rng, ior_stack);
            if self.branch {
                for scat in scattered.iter().filter(|s| self.mask.allows(s.kind)) {
                    accrued += self.trace(rc, ri, caster, rs, consider_emission, scat, scat.weight,
                                          ior_stack, &mut distances);
                }
            } else {
                let u = rc.canonical_random();
                if let Some((scat, prob)) = scattered.random_select(u) {
                    if self.mask.allows(scat.kind) {
                        accrued += self.trace(rc, ri, caster, rs, consider_emission, scat, scat.weight / prob,
                                              ior_stack, &mut distances);
                    }
                }
            }
        }

        let value = accrued / self.num_samples as Float;
        let zero = [RGBSpectrum::black(); 3];
        *c = store_in_cache(rc, ri, cache, value, &distances, zero, zero);
    }
}
