// Copyright @yucwang 2026

use crate::core::computation_node::{generate_node_id, ComputationNode};
use crate::core::context::RuntimeContext;
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::RayState;
use crate::core::shader::{compute_scatter_set, Shader, ShaderOp};
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::RayCaster;
use std::sync::Arc;

/// Sums the results of its ops. Each op starts from the running color.
pub struct StandardShader {
    id: String,
    ops: Vec<Arc<dyn ShaderOp>>,
    needs_scatter: bool,
}

impl StandardShader {
    pub fn new(ops: Vec<Arc<dyn ShaderOp>>) -> Self {
        let needs_scatter = ops.iter().any(|op| op.requires_scatter_set());
        Self { id: generate_node_id("standard_shader"), ops, needs_scatter }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }
}

impl ComputationNode for StandardShader {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        let names: Vec<&str> = self.ops.iter().map(|op| op.name()).collect();
        format!("StandardShader {} [{}]", self.id, names.join(", "))
    }
}

impl Shader for StandardShader {
    fn shade(&self,
             rc: &mut RuntimeContext,
             ri: &SurfaceIntersection,
             caster: &RayCaster,
             rs: &RayState,
             ior_stack: Option<&IorStack>) -> RGBSpectrum {
        let scattered = compute_scatter_set(rc, ri, ior_stack, self.needs_scatter);

        let mut c = RGBSpectrum::black();
        for op in &self.ops {
            let mut cthis = c;
            op.perform_operation(rc, ri, caster, rs, &mut cthis, ior_stack, scattered.as_ref());
            c += cthis;
        }
        c
    }
}
