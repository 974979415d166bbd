// Copyright @yucwang 2026

use crate::core::context::{RenderPass, RuntimeContext};
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::{RayRole, RayState};
use crate::core::scattered::ScatteredRaySet;
use crate::core::shader::ShaderOp;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::RayCaster;

/// Radiance estimate read straight from the scene's global photon map.
#[derive(Debug, Default)]
pub struct GlobalPhotonMapOp;

impl GlobalPhotonMapOp {
    pub fn new() -> Self {
        GlobalPhotonMapOp
    }
}

impl ShaderOp for GlobalPhotonMapOp {
    fn name(&self) -> &'static str {
        "global_photon_map"
    }

    fn perform_operation(&self,
                         rc: &mut RuntimeContext,
                         ri: &SurfaceIntersection,
                         caster: &RayCaster,
                         rs: &RayState,
                         c: &mut RGBSpectrum,
                         _ior_stack: Option<&IorStack>,
                         _scattered: Option<&ScatteredRaySet>) {
        *c = RGBSpectrum::black();
        if rc.pass() != RenderPass::Normal && rs.role == RayRole::View {
            return;
        }
        let map = caster.scene().global_photon_map();
        let bsdf = ri.material().and_then(|m| m.bsdf());
        if let (Some(map), Some(bsdf)) = (map, bsdf) {
            *c = map.radiance_estimate(ri, bsdf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bsdf::BSDF;
    use crate::core::photon_map::PhotonMap;
    use crate::core::scene::Scene;
    use crate::shaders::test_scenes::{assert_close, caster, context, diffuse_floor, floor_hit, shader_of};
    use std::sync::Arc;

    struct Glow;

    impl PhotonMap for Glow {
        fn radiance_estimate(&self, ri: &SurfaceIntersection, bsdf: &dyn BSDF) -> RGBSpectrum {
            bsdf.value(&ri.facing_normal(), ri) * 2.0
        }
    }

    #[test]
    fn test_reads_map_when_present() {
        let mut scene = Scene::new();
        scene.add_object(diffuse_floor(0.5, 10.0));
        let ri = floor_hit(&scene, 0.0, 0.0);
        let op = GlobalPhotonMapOp::new();
        let mut c = RGBSpectrum::gray(1.0);
        let mut rc = context(RenderPass::Normal);

        {
            let caster = caster(&scene, shader_of(vec![]));
            op.perform_operation(&mut rc, &ri, &caster, &RayState::default(), &mut c, None, None);
            assert!(c.is_black());
        }

        scene.set_global_photon_map(Arc::new(Glow));
        let caster = caster(&scene, shader_of(vec![]));
        op.perform_operation(&mut rc, &ri, &caster, &RayState::default(), &mut c, None, None);
        assert_close(&c, &RGBSpectrum::gray(1.0 / std::f32::consts::PI), 1e-5);
    }
}
