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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineOp {
    Add,
    Subtract,
    Multiply,
    /// Multiply by the component-wise inverse.
    Divide,
    Replace,
}

impl CombineOp {
    pub fn from_symbol(symbol: char) -> Option<CombineOp> {
        match symbol {
            '+' | 'a' => Some(CombineOp::Add),
            '-' | 's' => Some(CombineOp::Subtract),
            '*' | 'm' => Some(CombineOp::Multiply),
            '/' | '\\' | 'd' => Some(CombineOp::Divide),
            '=' | 'e' => Some(CombineOp::Replace),
            _ => None,
        }
    }

    pub fn apply(&self, c: &RGBSpectrum, value: &RGBSpectrum) -> RGBSpectrum {
        match self {
            CombineOp::Add => c + value,
            CombineOp::Subtract => c - value,
            CombineOp::Multiply => c.component_mul(value),
            CombineOp::Divide => c.component_mul(&value.inverse()),
            CombineOp::Replace => *value,
        }
    }
}

pub struct ShadeStep {
    pub op: Arc<dyn ShaderOp>,
    pub min_depth: u32,
    pub max_depth: u32,
    pub combine: CombineOp,
}

impl ShadeStep {
    pub fn new(op: Arc<dyn ShaderOp>, min_depth: u32, max_depth: u32, combine: CombineOp) -> Self {
        if min_depth > max_depth {
            log::warn!("ShadeStep: {} has depth range [{}, {}] and will never run.", op.name(), min_depth, max_depth);
        }
        Self { op, min_depth, max_depth, combine }
    }

    fn active_at(&self, depth: u32) -> bool {
        depth >= self.min_depth && depth <= self.max_depth
    }
}

/// Ops gated by ray depth and combined with an explicit operator.
pub struct AdvancedShader {
    id: String,
    steps: Vec<ShadeStep>,
    needs_scatter: bool,
}

impl AdvancedShader {
    pub fn new(steps: Vec<ShadeStep>) -> Self {
        let needs_scatter = steps.iter().any(|s| s.op.requires_scatter_set());
        Self { id: generate_node_id("advanced_shader"), steps, needs_scatter }
    }
}

impl ComputationNode for AdvancedShader {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Shader for AdvancedShader {
    fn shade(&self,
             rc: &mut RuntimeContext,
             ri: &SurfaceIntersection,
             caster: &RayCaster,
             rs: &RayState,
             ior_stack: Option<&IorStack>) -> RGBSpectrum {
        let scattered = compute_scatter_set(rc, ri, ior_stack, self.needs_scatter);

        let mut c = RGBSpectrum::black();
        for step in self.steps.iter().filter(|s| s.active_at(rs.depth)) {
            let mut cthis = c;
            step.op.perform_operation(rc, ri, caster, rs, &mut cthis, ior_stack, scattered.as_ref());
            c = step.combine.apply(&c, &cthis);
        }
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::RenderPass;
    use crate::core::scattered::ScatteredRaySet;
    use crate::core::scene::Scene;
    use crate::shaders::test_scenes::{assert_close, caster, context, diffuse_floor, floor_hit, shader_of};

    /// Writes a fixed color, ignoring its input.
    struct Fixed(RGBSpectrum);

    impl ShaderOp for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn perform_operation(&self, _rc: &mut RuntimeContext, _ri: &SurfaceIntersection, _caster: &RayCaster,
                             _rs: &RayState, c: &mut RGBSpectrum, _ior_stack: Option<&IorStack>,
                             _scattered: Option<&ScatteredRaySet>) {
            *c = self.0;
        }
    }

    fn fixed(v: f32) -> Arc<dyn ShaderOp> {
        Arc::new(Fixed(RGBSpectrum::new(v, v, v)))
    }

    #[test]
    fn test_combine_ops() {
        let c = RGBSpectrum::new(2.0, 4.0, 6.0);
        let v = RGBSpectrum::new(2.0, 0.0, 3.0);
        assert_eq!(CombineOp::Add.apply(&c, &v), RGBSpectrum::new(4.0, 4.0, 9.0));
        assert_eq!(CombineOp::Subtract.apply(&c, &v), RGBSpectrum::new(0.0, 4.0, 3.0));
        assert_eq!(CombineOp::Multiply.apply(&c, &v), RGBSpectrum::new(4.0, 0.0, 18.0));
        assert_eq!(CombineOp::Divide.apply(&c, &v), RGBSpectrum::new(1.0, 0.0, 2.0));
        assert_eq!(CombineOp::Replace.apply(&c, &v), v);
        assert_eq!(CombineOp::from_symbol('\\'), Some(CombineOp::Divide));
        assert_eq!(CombineOp::from_symbol('?'), None);
    }

    #[test]
    fn test_steps_gated_by_depth() {
        let mut scene = Scene::new();
        scene.add_object(diffuse_floor(0.5, 10.0));
        let ri = floor_hit(&scene, 0.0, 0.0);
        let caster = caster(&scene, shader_of(vec![]));

        let shader = AdvancedShader::new(vec![
            ShadeStep::new(fixed(1.0), 1, 10, CombineOp::Add),
            ShadeStep::new(fixed(3.0), 1, 1, CombineOp::Multiply),
            ShadeStep::new(fixed(0.5), 2, 10, CombineOp::Replace),
        ]);

        let mut rc = context(RenderPass::Normal);
        let at_one = shader.shade(&mut rc, &ri, &caster, &RayState::default(), None);
        assert_close(&at_one, &RGBSpectrum::new(3.0, 3.0, 3.0), 1e-6);

        let deeper = RayState { depth: 2, ..RayState::default() };
        let at_two = shader.shade(&mut rc, &ri, &caster, &deeper, None);
        assert_close(&at_two, &RGBSpectrum::new(0.5, 0.5, 0.5), 1e-6);
    }

    #[test]
    fn test_standard_shader_sums() {
        let mut scene = Scene::new();
        scene.add_object(diffuse_floor(0.5, 10.0));
        let ri = floor_hit(&scene, 0.0, 0.0);
        let caster = caster(&scene, shader_of(vec![]));
        let shader = shader_of(vec![fixed(1.0), fixed(0.25)]);
        let mut rc = context(RenderPass::Normal);
        let c = shader.shade(&mut rc, &ri, &caster, &RayState::default(), None);
        assert_close(&c, &RGBSpectrum::new(1.25, 1.25, 1.25), 1e-6);
    }
}
