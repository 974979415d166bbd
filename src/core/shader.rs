// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::context::RuntimeContext;
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::RayState;
use crate::core::scattered::ScatteredRaySet;
use crate::math::spectrum::RGBSpectrum;
use crate::renderers::caster::RayCaster;

/// One step of a shader. `c` holds the running color on entry and the op's
/// result on exit; the owning shader decides how results combine.
pub trait ShaderOp: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the op reads the material's scattered rays.
    fn requires_scatter_set(&self) -> bool {
        false
    }

    fn perform_operation(&self,
                         rc: &mut RuntimeContext,
                         ri: &SurfaceIntersection,
                         caster: &RayCaster,
                         rs: &RayState,
                         c: &mut RGBSpectrum,
                         ior_stack: Option<&IorStack>,
                         scattered: Option<&ScatteredRaySet>);
}

pub trait Shader: ComputationNode + Send + Sync {
    fn shade(&self,
             rc: &mut RuntimeContext,
             ri: &SurfaceIntersection,
             caster: &RayCaster,
             rs: &RayState,
             ior_stack: Option<&IorStack>) -> RGBSpectrum;
}

/// Scatters the material once for every op of a shader that needs it.
pub fn compute_scatter_set(rc: &mut RuntimeContext,
                           ri: &SurfaceIntersection,
                           ior_stack: Option<&IorStack>,
                           needed: bool) -> Option<ScatteredRaySet> {
    if !needed {
        return None;
    }
    let spf = ri.material()?.spf()?;
    Some(spf.scatter(ri, &mut rc.rng, ior_stack))
}
