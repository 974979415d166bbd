// Copyright @yucwang 2026

use crate::core::context::{RenderPass, RuntimeContext};
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::{RayRole, RayState};
use crate::core::scattered::{ScatteredRay, ScatteredRaySet};
use crate::core::shader::ShaderOp;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::RayCaster;
use crate::shaders::{follow, gather_estimate, role_for, TraceMask};

/// Continues the path through the material's scattered rays, either all of
/// them or one chosen at random.
pub struct PathTracingOp {
    branch: bool,
    force_check_emitters: bool,
    final_gather: bool,
    mask: TraceMask,
}

impl PathTracingOp {
    pub fn new(branch: bool, force_check_emitters: bool, final_gather: bool) -> Self {
        Self { branch, force_check_emitters, final_gather, mask: TraceMask::default() }
    }

    pub fn with_mask(mut self, mask: TraceMask) -> Self {
        self.mask = mask;
        self
    }

    fn child_state(&self, rs: &RayState, scat: &ScatteredRay, consider_emission: bool) -> RayState {
        let gathering = self.final_gather && matches!(rs.role, RayRole::View | RayRole::FinalGather);
        let role = if gathering { RayRole::FinalGather } else { role_for(scat.kind) };
        let mut child = rs.spawn(scat.weight.max_value(), role);
        child.consider_emission = consider_emission;
        child
    }
}

impl ShaderOp for PathTracingOp {
    fn name(&self) -> &'static str {
        "path_tracing"
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
        if rc.pass() != RenderPass::Normal && rs.role == RayRole::View {
            return;
        }

        let bsdf = ri.material().and_then(|m| m.bsdf());
        if rs.role == RayRole::FinalGather {
            if let Some(bsdf) = bsdf {
                *c = gather_estimate(ri, caster, bsdf);
                return;
            }
        }

        let scattered = match scattered {
            Some(s) => s,
            None => return,
        };
        let consider_emission = self.force_check_emitters || bsdf.is_none();

        if self.branch {
            for scat in scattered.iter() {
                if !self.mask.allows(scat.kind) || scat.weight.max_value() <= 0.0 {
                    continue;
                }
                let child = self.child_state(rs, scat, consider_emission);
                let result = follow(rc, caster, ri, scat, &child, ior_stack);
                *c += scat.weight.component_mul(&result.color);
            }
        } else {
            let u = rc.canonical_random();
            if let Some((scat, prob)) = scattered.random_select(u) {
                if self.mask.allows(scat.kind) {
                    let child = self.child_state(rs, scat, consider_emission);
                    let result = follow(rc, caster, ri, scat, &child, ior_stack);
                    *c = (scat.weight / prob).component_mul(&result.color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bsdf::BSDF;
    use crate::core::photon_map::PhotonMap;
    use crate::core::scene::Scene;
    use crate::core::shader::compute_scatter_set;
    use crate::emitters::uniform::UniformRadianceMap;
    use crate::shaders::test_scenes::{assert_close, caster, context, diffuse_floor, floor_hit, shader_of};
    use std::sync::Arc;

    struct FlatPhotons(RGBSpectrum);

    impl PhotonMap for FlatPhotons {
        fn radiance_estimate(&self, ri: &SurfaceIntersection, bsdf: &dyn BSDF) -> RGBSpectrum {
            bsdf.value(&ri.facing_normal(), ri).component_mul(&self.0)
        }
    }

    fn sky_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(diffuse_floor(0.5, 10.0));
        scene.set_global_radiance_map(Arc::new(UniformRadianceMap::new(RGBSpectrum::gray(1.0))));
        scene
    }

    fn shade(op: &PathTracingOp, scene: &Scene, rs: &RayState, pass: RenderPass) -> RGBSpectrum {
        let ri = floor_hit(scene, 0.0, 0.0);
        let caster = caster(scene, shader_of(vec![]));
        let mut rc = context(pass);
        let scattered = compute_scatter_set(&mut rc, &ri, None, true);
        let mut c = RGBSpectrum::black();
        op.perform_operation(&mut rc, &ri, &caster, rs, &mut c, None, scattered.as_ref());
        c
    }

    #[test]
    fn test_one_bounce_to_sky() {
        let scene = sky_scene();
        for branch in &[true, false] {
            let c = shade(&PathTracingOp::new(*branch, false, false), &scene, &RayState::default(), RenderPass::Normal);
            assert_close(&c, &RGBSpectrum::gray(0.5), 1e-5);
        }
    }

    #[test]
    fn test_view_ray_skipped_while_precomputing() {
        let scene = sky_scene();
        let c = shade(&PathTracingOp::new(true, false, false), &scene, &RayState::default(), RenderPass::Precompute);
        assert!(c.is_black());
    }

    #[test]
    fn test_final_gather_ray_reads_photon_map() {
        let mut scene = sky_scene();
        scene.set_global_photon_map(Arc::new(FlatPhotons(RGBSpectrum::gray(std::f32::consts::PI))));
        let rs = RayState { role: RayRole::FinalGather, ..RayState::default() };
        let c = shade(&PathTracingOp::new(true, false, true), &scene, &rs, RenderPass::Precompute);
        assert_close(&c, &RGBSpectrum::gray(0.5), 1e-5);
    }
}
