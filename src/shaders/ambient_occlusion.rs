// Copyright @yucwang 2026

use crate::core::context::RuntimeContext;
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::RayState;
use crate::core::scattered::ScatteredRaySet;
use crate::core::shader::ShaderOp;
use crate::math::constants::{Float, Vector3f, FLOAT_MAX, PI, RAY_ADVANCE, TWO_PI};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::RayCaster;
use crate::shaders::{consult_cache, enabled_cache, store_in_cache, CacheLookup, HitDistances};

/// Fraction of the cosine-weighted hemisphere that escapes the scene,
/// optionally lit by the global radiance map and weighted by the BSDF.
pub struct AmbientOcclusionOp {
    num_theta: u32,
    num_phi: u32,
    multiply_bsdf: bool,
    use_irradiance_cache: bool,
}

impl AmbientOcclusionOp {
    pub fn new(num_theta: u32, num_phi: u32, multiply_bsdf: bool, use_irradiance_cache: bool) -> Self {
        Self {
            num_theta: num_theta.max(1),
            num_phi: num_phi.max(1),
            multiply_bsdf,
            use_irradiance_cache,
        }
    }
}

impl ShaderOp for AmbientOcclusionOp {
    fn name(&self) -> &'static str {
        "ambient_occlusion"
    }

    fn perform_operation(&self,
                         rc: &mut RuntimeContext,
                         ri: &SurfaceIntersection,
                         caster: &RayCaster,
                         _rs: &RayState,
                         c: &mut RGBSpectrum,
                         _ior_stack: Option<&IorStack>,
                         _scattered: Option<&ScatteredRaySet>) {
        *c = RGBSpectrum::black();

        let cache = if self.use_irradiance_cache { enabled_cache(caster) } else { None };
        match consult_cache(rc, ri, cache, false) {
            CacheLookup::Cached(value) => {
                *c = value;
                return;
            }
            CacheLookup::Skip => return,
            CacheLookup::Compute => {}
        }

        let bsdf = ri.material().and_then(|m| m.bsdf());
        if self.multiply_bsdf && bsdf.is_none() {
            return;
        }

        let scene = caster.scene();
        let radiance_map = scene.global_radiance_map();
        let frame = ri.frame();
        let p = ri.p();

        let mut accum = RGBSpectrum::black();
        let mut distances = HitDistances::default();
        let fn_phi = self.num_phi as Float;
        let fm_theta = self.num_theta as Float;

        for i in 0..self.num_phi {
            let xi = (i as Float + rc.canonical_random()) / fn_phi;
            let (sin_phi, cos_phi) = (TWO_PI * xi).sin_cos();

            for j in 0..self.num_theta {
                let xj = (j as Float + rc.canonical_random()) / fm_theta;
                let sin_theta = xj.sqrt();
                let cos_theta = (1.0 - xj).max(0.0).sqrt();
                let dir = frame.from_local(Vector3f::new(cos_phi * sin_theta, sin_phi * sin_theta, cos_theta));
                let ray = Ray3f::new(p, dir, None, None);

                let escaped = if cache.is_some() {
                    match scene.intersect_ray(&ray.advanced(RAY_ADVANCE)) {
                        Some(hit) => {
                            distances.record_t(hit.t() + RAY_ADVANCE);
                            false
                        }
                        None => true,
                    }
                } else {
                    !caster.cast_shadow_ray(&p, &dir, FLOAT_MAX)
                };

                if escaped {
                    let incoming = radiance_map.map_or(RGBSpectrum::gray(1.0), |map| map.radiance(&ray));
                    match bsdf {
                        Some(bsdf) if self.multiply_bsdf => accum += bsdf.value(&dir, ri).component_mul(&incoming),
                        _ => accum += incoming,
                    }
                }
            }
        }

        let mut value = accum / (fn_phi * fm_theta);
        if self.multiply_bsdf {
            value *= PI;
        }

        let zero = [RGBSpectrum::black(); 3];
        *c = store_in_cache(rc, ri, cache, value, &distances, zero, zero);
    }
}
