// Copyright @yucwang 2026

use crate::core::context::{RenderPass, RuntimeContext};
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::{RayRole, RayState};
use crate::core::scattered::ScatteredRaySet;
use crate::core::shader::ShaderOp;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::RayCaster;

/// Radiance emitted by the surface itself.
#[derive(Debug, Default)]
pub struct EmissionOp;

impl EmissionOp {
    pub fn new() -> Self {
        EmissionOp
    }
}

impl ShaderOp for EmissionOp {
    fn name(&self) -> &'static str {
        "emission"
    }

    fn perform_operation(&self,
                         rc: &mut RuntimeContext,
                         ri: &SurfaceIntersection,
                         _caster: &RayCaster,
                         rs: &RayState,
                         c: &mut RGBSpectrum,
                         _ior_stack: Option<&IorStack>,
                         _scattered: Option<&ScatteredRaySet>) {
        *c = RGBSpectrum::black();
        if rc.pass() != RenderPass::Normal && rs.role == RayRole::View {
            return;
        }
        if !rs.consider_emission {
            return;
        }
        if let Some(emitter) = ri.material().and_then(|m| m.emitter()) {
            *c = emitter.emitted_radiance(ri, &(-ri.ray().dir()), &ri.facing_normal());
        }
    }
}
