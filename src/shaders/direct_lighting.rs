// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::context::{RenderPass, RuntimeContext};
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::{RayRole, RayState};
use crate::core::scattered::ScatteredRaySet;
use crate::core::shader::ShaderOp;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::RayCaster;
use std::sync::Arc;

/// Sum of every non-geometric light's contribution at the hit.
#[derive(Default)]
pub struct DirectLightingOp {
    bsdf: Option<Arc<dyn BSDF>>,
}

impl DirectLightingOp {
    pub fn new() -> Self {
        Self { bsdf: None }
    }

    /// Lights the surface with `bsdf` instead of the material's.
    pub fn with_bsdf(bsdf: Arc<dyn BSDF>) -> Self {
        Self { bsdf: Some(bsdf) }
    }
}

impl ShaderOp for DirectLightingOp {
    fn name(&self) -> &'static str {
        "direct_lighting"
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

        let bsdf = match self.bsdf.as_deref().or_else(|| ri.material().and_then(|m| m.bsdf())) {
            Some(bsdf) => bsdf,
            None => return,
        };

        let scene = caster.scene();
        let receives_shadows = scene.object(ri.object_id()).map_or(true, |o| o.receives_shadows);
        for light in scene.lights() {
            *c += light.compute_direct_lighting(ri, scene, bsdf, receives_shadows);
        }
    }
}
