// Copyright @yucwang 2026

use crate::core::context::RuntimeContext;
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::RayState;
use crate::core::scattered::ScatteredRaySet;
use crate::core::shader::ShaderOp;
use crate::core::texture::Texture;
use crate::math::constants::RAY_ADVANCE;
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::RayCaster;
use std::sync::Arc;

/// Blends the running color with whatever lies behind the surface.
pub struct TransparencyOp {
    factor: Arc<dyn Texture>,
    one_sided: bool,
}

impl TransparencyOp {
    pub fn new(factor: Arc<dyn Texture>, one_sided: bool) -> Self {
        Self { factor, one_sided }
    }
}

impl ShaderOp for TransparencyOp {
    fn name(&self) -> &'static str {
        "transparency"
    }

    fn perform_operation(&self,
                         rc: &mut RuntimeContext,
                         ri: &SurfaceIntersection,
                         caster: &RayCaster,
                         rs: &RayState,
                         c: &mut RGBSpectrum,
                         ior_stack: Option<&IorStack>,
                         _scattered: Option<&ScatteredRaySet>) {
        let incoming = ri.ray();
        let beyond = Ray3f::new(incoming.at(ri.t() + RAY_ADVANCE), incoming.dir(), None, None);
        let result = caster.cast_ray(rc, &beyond, rs, None, ior_stack);
        if !result.is_hit() {
            return;
        }

        let cthis = result.color;
        if self.one_sided && ri.is_back_facing() {
            *c = cthis;
        }
        let f = self.factor.eval(ri.uv());
        *c = cthis.component_mul(&f) + c.component_mul(&(RGBSpectrum::gray(1.0) - f));
    }
}
