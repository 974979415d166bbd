// Copyright @yucwang 2026

use crate::core::context::RuntimeContext;
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::RayState;
use crate::core::scattered::{ScatterKind, ScatteredRaySet};
use crate::core::shader::ShaderOp;
use crate::math::spectrum::RGBSpectrum;
use crate::renderers::caster::RayCaster;
use crate::shaders::reflection::trace_specular;

/// Transmission through the material's refracted rays. Each ray carries the
/// IOR stack for the medium it enters.
#[derive(Debug, Default)]
pub struct RefractionOp;

impl RefractionOp {
    pub fn new() -> Self {
        RefractionOp
    }
}

impl ShaderOp for RefractionOp {
    fn name(&self) -> &'static str {
        "refraction"
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
        *c = trace_specular(ScatterKind::Refraction, rc, ri, caster, rs, ior_stack, scattered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::RenderPass;
    use crate::core::material::Material;
    use crate::core::scene::{Scene, SceneObject};
    use crate::core::shader::compute_scatter_set;
    use crate::emitters::uniform::UniformRadianceMap;
    use crate::materials::perfect_refractor::PerfectRefractorSPF;
    use crate::math::constants::Vector3f;
    use crate::math::spectrum::Spectrum;
    use crate::shaders::test_scenes::{caster, context, floor_hit, shader_of};
    use crate::shapes::rectangle::Rectangle;
    use std::sync::Arc;

    #[test]
    fn test_refraction_sees_through_glass_sheet() {
        let mut scene = Scene::new();
        let material = Material::new()
            .with_spf(Arc::new(PerfectRefractorSPF::new(RGBSpectrum::gray(1.0), 1.5)));
        let shape = Rectangle::new(Vector3f::zeros(), Vector3f::new(5.0, 0.0, 0.0), Vector3f::new(0.0, 5.0, 0.0));
        scene.add_object(SceneObject::new(Arc::new(shape), Arc::new(material)));
        scene.set_global_radiance_map(Arc::new(UniformRadianceMap::new(RGBSpectrum::gray(1.0))));

        let ri = floor_hit(&scene, 0.0, 0.0);
        let caster = caster(&scene, shader_of(vec![]));
        let mut rc = context(RenderPass::Normal);
        let stack = IorStack::new(1.0);
        let scattered = compute_scatter_set(&mut rc, &ri, Some(&stack), true).unwrap();

        let refracted = scattered.iter().find(|s| s.kind == ScatterKind::Refraction).unwrap();
        assert!((refracted.ray.dir() - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-5);
        assert!(refracted.ior_stack.as_ref().map_or(false, |s| s.contains(0)));

        // Transmitted share of a normal-incidence dielectric, the sky is white.
        let mut c = RGBSpectrum::black();
        RefractionOp::new().perform_operation(&mut rc, &ri, &caster, &RayState::default(), &mut c, Some(&stack), Some(&scattered));
        assert!((c.x - 0.96).abs() < 1e-3);
        assert!(!c.is_black());
    }
}
