// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::context::RuntimeContext;
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::{RayRole, RayState};
use crate::core::scattered::ScatteredRaySet;
use crate::core::shader::ShaderOp;
use crate::core::spf::SPF;
use crate::math::constants::{Float, Vector3f, FLOAT_MAX, PI, TWO_PI};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::RayCaster;
use crate::shaders::{consult_cache, enabled_cache, follow, gather_estimate, store_in_cache, CacheLookup, HitDistances};

/// Result of one hemisphere gather at a shading point.
struct Gathered {
    irradiance: RGBSpectrum,
    distances: HitDistances,
    rot_gradient: [RGBSpectrum; 3],
    trans_gradient: [RGBSpectrum; 3],
}

/// Indirect diffuse light gathered over a stratified hemisphere. Gather rays
/// only read cheap estimates (photon map or direct light) where they land.
pub struct FinalGatherOp {
    num_theta: u32,
    num_phi: u32,
    use_gradients: bool,
}

impl FinalGatherOp {
    pub fn new(num_theta: u32, num_phi: u32, use_gradients: bool) -> Self {
        Self { num_theta: num_theta.max(1), num_phi: num_phi.max(1), use_gradients }
    }

    fn gather_child(rs: &RayState) -> RayState {
        rs.spawn(1.0, RayRole::FinalGather).without_emission()
    }

    /// Stratified gather that also estimates the rotational and translational
    /// irradiance gradients (Ward and Heckbert).
    fn gather_with_gradients(&self,
                             rc: &mut RuntimeContext,
                             ri: &SurfaceIntersection,
                             caster: &RayCaster,
                             rs: &RayState,
                             bsdf: &dyn BSDF,
                             ior_stack: Option<&IorStack>) -> Gathered {
        let m = self.num_theta as usize;
        let fn_phi = self.num_phi as Float;
        let fm_theta = self.num_theta as Float;
        let frame = ri.frame();
        let child = Self::gather_child(rs);
        let black = RGBSpectrum::black();

        let mut c = black;
        let mut distances = HitDistances::default();
        let mut rot_gradient = [black; 3];
        let mut trans_gradient1 = [black; 3];
        let mut trans_gradient2 = [black; 3];

        let mut lijm = black;
        let mut rijm: Float = 0.0;
        let mut lim = vec![black; m];
        let mut rim = vec![0.0 as Float; m];
        let mut l0 = vec![black; m];
        let mut r0 = vec![0.0 as Float; m];

        for i in 0..self.num_phi {
            let xi = (i as Float + rc.canonical_random()) / fn_phi;
            let (sin_phi, cos_phi) = (TWO_PI * xi).sin_cos();
            let vi = frame.from_local(Vector3f::new(-sin_phi, cos_phi, 0.0));
            let ui = frame.from_local(Vector3f::new(cos_phi, sin_phi, 0.0));
            let phim = (TWO_PI * i as Float) / fn_phi + 0.5 * PI;
            let vim = frame.from_local(Vector3f::new(phim.cos(), phim.sin(), 0.0));

            let mut rot_temp = black;
            let mut trans1_temp = black;
            let mut trans2_temp = black;

            for j in 0..m {
                let xj = (j as Float + rc.canonical_random()) / fm_theta;
                let sin_theta = xj.sqrt();
                let cos_theta = (1.0 - xj).max(0.0).sqrt();
                let w = frame.from_local(Vector3f::new(cos_phi * sin_theta, sin_phi * sin_theta, cos_theta));

                let ray = Ray3f::new(ri.p(), w, None, None);
                let result = caster.cast_from_surface(rc, ri, &ray, &child, ior_stack);
                let lij = result.color;
                if distances.record(&result) {
                    c += lij.component_mul(&bsdf.value(&w, ri));
                    if cos_theta > 0.0 {
                        rot_temp += lij * (-sin_theta / cos_theta);
                    }
                }

                let rij = match result.distance {
                    Some(t) if t > 0.0 && t.is_finite() => t,
                    _ => FLOAT_MAX,
                };
                let sin_theta_m = (j as Float / fm_theta).sqrt();
                if j > 0 {
                    let k = sin_theta_m * (1.0 - j as Float / fm_theta) / rij.min(rijm);
                    trans1_temp = (trans1_temp + (lij - lijm)) * k;
                }
                if i > 0 {
                    let sin_theta_p = ((j + 1) as Float / fm_theta).sqrt();
                    let k = (sin_theta_p - sin_theta_m) / rij.min(rim[j]);
                    trans2_temp = (trans2_temp + (lij - lim[j])) * k;
                } else {
                    r0[j] = rij;
                    l0[j] = lij;
                }

                rijm = rij;
                lijm = lij;
                rim[j] = rij;
                lim[j] = lij;
            }

            for axis in 0..3 {
                rot_gradient[axis] += rot_temp * vi[axis];
                trans_gradient1[axis] += trans1_temp * ui[axis];
                trans_gradient2[axis] += trans2_temp * vim[axis];
            }
        }

        // Closing term between the last and the first phi strata.
        let vim = frame.from_local(Vector3f::new(0.0, 1.0, 0.0));
        let mut trans2_temp = black;
        for j in 0..m {
            let sin_theta_m = (j as Float / fm_theta).sqrt();
            let sin_theta_p = ((j + 1) as Float / fm_theta).sqrt();
            let k = (sin_theta_p - sin_theta_m) / r0[j].min(rim[j]);
            trans2_temp += (l0[j] - lim[j]) * k;
        }

        let scale2 = TWO_PI / fm_theta;
        let scale = PI / (fn_phi * fm_theta);
        for axis in 0..3 {
            trans_gradient2[axis] += trans2_temp * vim[axis];
            trans_gradient1[axis] += trans_gradient2[axis] * scale2;
            rot_gradient[axis] *= scale;
        }

        Gathered {
            irradiance: c * scale,
            distances,
            rot_gradient,
            trans_gradient: trans_gradient1,
        }
    }

    /// Plain gather through the material's diffuse scattering.
    fn gather(&self,
              rc: &mut RuntimeContext,
              ri: &SurfaceIntersection,
              caster: &RayCaster,
              rs: &RayState,
              spf: &dyn SPF,
              ior_stack: Option<&IorStack>) -> Gathered {
        let count = self.num_theta * self.num_phi;
        let child = Self::gather_child(rs);
        let mut c = RGBSpectrum::black();
        let mut distances = HitDistances::default();

        for _ in 0..count {
            let scattered = spf.scatter(ri, &mut rc.rng, ior_stack);
            let u = rc.canonical_random();
            if let Some((scat, prob)) = scattered.random_select_diffuse(u) {
                let result = follow(rc, caster, ri, scat, &child, ior_stack);
                distances.record(&result);
                c += result.color.component_mul(&(scat.weight / prob));
            }
        }

        let zero = [RGBSpectrum::black(); 3];
        Gathered {
            irradiance: c / count as Float,
            distances,
            rot_gradient: zero,
            trans_gradient: zero,
        }
    }
}

impl ShaderOp for FinalGatherOp {
    fn name(&self) -> &'static str {
        "final_gather"
    }

    fn requires_scatter_set(&self) -> bool {
        true
    }

    fn perform_operation(&self,
                         rc: &mut RuntimeContext,
                         ri: &SurfaceIntersection,
                         caster: &RayCaster,
                         rs: &RayState,
                         c: &mut RGBSpectrum,
                         ior_stack: Option<&IorStack>,
                         scattered: Option<&ScatteredRaySet>) {
        *c = RGBSpectrum::black();
        let material = match ri.material() {
            Some(m) => m,
            None => return,
        };
        let bsdf = material.bsdf();

        if rs.role == RayRole::FinalGather {
            match (bsdf, scattered) {
                (Some(bsdf), _) => *c = gather_estimate(ri, caster, bsdf),
                // Keep going until the gather ray lands somewhere with a BSDF.
                (None, Some(scattered)) => {
                    let child = rs.spawn(1.0, RayRole::FinalGather).without_emission();
                    for scat in scattered.iter() {
                        let result = follow(rc, caster, ri, scat, &child, ior_stack);
                        *c += result.color.component_mul(&scat.weight);
                    }
                }
                (None, None) => {}
            }
            return;
        }

        let bsdf = match bsdf {
            Some(bsdf) => bsdf,
            None => return,
        };

        let cache = enabled_cache(caster);
        match consult_cache(rc, ri, cache, self.use_gradients) {
            CacheLookup::Cached(value) => {
                *c = value;
                return;
            }
            CacheLookup::Skip => return,
            CacheLookup::Compute => {}
        }

        let gathered = if cache.is_some() && self.use_gradients {
            self.gather_with_gradients(rc, ri, caster, rs, bsdf, ior_stack)
        } else {
            match material.spf() {
                Some(spf) => self.gather(rc, ri, caster, rs, spf, ior_stack),
                None => return,
            }
        };

        *c = store_in_cache(rc, ri, cache, gathered.irradiance, &gathered.distances,
                            gathered.rot_gradient, gathered.trans_gradient);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::RenderPass;
    use crate::core::irradiance_cache::IrradianceCache;
    use crate::core::scene::Scene;
    use crate::emitters::uniform::UniformRadianceMap;
    use crate::shaders::precompute_marker;
    use crate::shaders::test_scenes::{assert_close, caster, context, diffuse_floor, floor_hit, shader_of};
    use std::sync::Arc;

    fn sky_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(diffuse_floor(0.5, 10.0));
        scene.set_global_radiance_map(Arc::new(UniformRadianceMap::new(RGBSpectrum::gray(1.0))));
        scene
    }

    fn shade(op: &FinalGatherOp, scene: &Scene, pass: RenderPass) -> RGBSpectrum {
        let ri = floor_hit(scene, 0.0, 0.0);
        let caster = caster(scene, shader_of(vec![]));
        let mut rc = context(pass);
        let mut c = RGBSpectrum::black();
        op.perform_operation(&mut rc, &ri, &caster, &RayState::default(), &mut c, None, None);
        c
    }

    #[test]
    fn test_plain_gather_under_sky() {
        let scene = sky_scene();
        let c = shade(&FinalGatherOp::new(4, 8, false), &scene, RenderPass::Normal);
        assert_close(&c, &RGBSpectrum::gray(0.5), 1e-5);
    }

    #[test]
    fn test_gradient_gather_fills_cache() {
        let mut scene = sky_scene();
        let cache = Arc::new(IrradianceCache::new(100.0, 0.1, 0.05, 2.0));
        scene.set_irradiance_cache(cache.clone());
        let op = FinalGatherOp::new(4, 8, true);

        assert_eq!(shade(&op, &scene, RenderPass::Precompute), precompute_marker());
        assert_eq!(cache.len(), 1);

        // Uniform sky: no translational change, same normal so no rotation.
        let c = shade(&op, &scene, RenderPass::Normal);
        assert_close(&c, &RGBSpectrum::gray(0.5), 1e-4);
    }

    fn gradient_norm(gradient: &[RGBSpectrum; 3]) -> Float {
        gradient.iter().map(|g| g.norm()).sum()
    }

    #[test]
    fn test_wall_produces_gradients() {
        let mut scene = sky_scene();
        // dark wall rising from the floor at x = 1
        let mut wall = diffuse_floor(0.0, 10.0);
        wall.shape = Arc::new(crate::shapes::rectangle::Rectangle::new(
            Vector3f::new(1.0, 0.0, 1.0), Vector3f::new(0.0, 10.0, 0.0), Vector3f::new(0.0, 0.0, 1.0)));
        scene.add_object(wall);

        let ri = floor_hit(&scene, 0.0, 0.0);
        let caster = caster(&scene, shader_of(vec![]));
        let mut rc = context(RenderPass::Precompute);
        let bsdf = ri.material().and_then(|m| m.bsdf()).unwrap();
        let gathered = FinalGatherOp::new(8, 16, true)
            .gather_with_gradients(&mut rc, &ri, &caster, &RayState::default(), bsdf, None);

        assert!(gathered.irradiance.x > 0.0 && gathered.irradiance.x < 0.5);
        assert!(gradient_norm(&gathered.trans_gradient) > 1e-3);
        assert!(gradient_norm(&gathered.rot_gradient) > 1e-3);

        let cache = IrradianceCache::new(100.0, 0.5, 0.05, 2.0);
        let n = ri.facing_normal();
        cache.insert_element(ri.p(), n, gathered.irradiance, gathered.distances.harmonic_mean(),
                             gathered.rot_gradient, gathered.trans_gradient);

        let d = Vector3f::new(0.01, 0.0, 0.0);
        let q = ri.p() + d;
        let (total, _) = cache.query(&q, &n);
        let plain = cache.interpolate(&q, &n, false).unwrap();
        let graded = cache.interpolate(&q, &n, true).unwrap();
        let linear = (gathered.trans_gradient[0] * d.x) / total;
        assert_close(&plain, &gathered.irradiance, 1e-5);
        assert_close(&(graded - plain), &linear, 1e-5);
    }

    #[test]
    fn test_gather_ray_uses_direct_light_without_photon_map() {
        use crate::lights::point::PointLight;
        use crate::math::constants::INV_PI;

        let mut scene = Scene::new();
        scene.add_object(diffuse_floor(0.5, 10.0));
        scene.add_light(Arc::new(PointLight::new(Vector3f::new(0.0, 0.0, 1.0), RGBSpectrum::gray(1.0), 1.0)));
        let ri = floor_hit(&scene, 0.0, 0.0);
        let caster = caster(&scene, shader_of(vec![]));
        let mut rc = context(RenderPass::Normal);
        let rs = RayState { role: RayRole::FinalGather, ..RayState::default() };

        let mut c = RGBSpectrum::black();
        FinalGatherOp::new(2, 2, false).perform_operation(&mut rc, &ri, &caster, &rs, &mut c, None, None);
        assert_close(&c, &RGBSpectrum::gray(0.5 * INV_PI), 1e-5);
    }
}
