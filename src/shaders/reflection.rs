// Copyright @yucwang 2026

use crate::core::context::{RenderPass, RuntimeContext};
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::{RayRole, RayState};
use crate::core::scattered::{ScatterKind, ScatteredRaySet};
use crate::core::shader::ShaderOp;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::RayCaster;
use crate::shaders::follow;

/// Follows every scattered ray of `kind` as a specular ray and sums the
/// weighted results.
pub(crate) fn trace_specular(kind: ScatterKind,
                             rc: &mut RuntimeContext,
                             ri: &SurfaceIntersection,
                             caster: &RayCaster,
                             rs: &RayState,
                             ior_stack: Option<&IorStack>,
                             scattered: Option<&ScatteredRaySet>) -> RGBSpectrum {
    let mut c = RGBSpectrum::black();
    if rc.pass() != RenderPass::Normal {
        return c;
    }
    let scattered = match scattered {
        Some(s) => s,
        None => return c,
    };

    for scat in scattered.iter().filter(|s| s.kind == kind) {
        let child = rs.spawn(scat.weight.max_value(), RayRole::Specular);
        let result = follow(rc, caster, ri, scat, &child, ior_stack);
        c += result.color.component_mul(&scat.weight);
    }
    c
}

/// Mirror reflection through the material's scattered rays.
#[derive(Debug, Default)]
pub struct ReflectionOp;

impl ReflectionOp {
    pub fn new() -> Self {
        ReflectionOp
    }
}

impl ShaderOp for ReflectionOp {
    fn name(&self) -> &'static str {
        "reflection"
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
        *c = trace_specular(ScatterKind::Reflection, rc, ri, caster, rs, ior_stack, scattered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::Material;
    use crate::core::scene::{Scene, SceneObject};
    use crate::core::shader::compute_scatter_set;
    use crate::emitters::uniform::UniformRadianceMap;
    use crate::materials::perfect_reflector::PerfectReflectorSPF;
    use crate::math::constants::Vector3f;
    use crate::shaders::test_scenes::{assert_close, caster, context, floor_hit, shader_of};
    use crate::shapes::rectangle::Rectangle;
    use std::sync::Arc;

    fn mirror_under_sky() -> Scene {
        let mut scene = Scene::new();
        let material = Material::new()
            .with_spf(Arc::new(PerfectReflectorSPF::new(RGBSpectrum::new(0.9, 0.5, 0.1))));
        let shape = Rectangle::new(Vector3f::zeros(), Vector3f::new(5.0, 0.0, 0.0), Vector3f::new(0.0, 5.0, 0.0));
        scene.add_object(SceneObject::new(Arc::new(shape), Arc::new(material)));
        scene.set_global_radiance_map(Arc::new(UniformRadianceMap::new(RGBSpectrum::gray(2.0))));
        scene
    }

    #[test]
    fn test_mirror_reflects_sky() {
        let scene = mirror_under_sky();
        let ri = floor_hit(&scene, 0.0, 0.0);
        let caster = caster(&scene, shader_of(vec![]));
        let mut rc = context(RenderPass::Normal);
        let scattered = compute_scatter_set(&mut rc, &ri, None, true);
        assert_eq!(scattered.as_ref().map(|s| s.len()), Some(1));

        let mut c = RGBSpectrum::black();
        ReflectionOp::new().perform_operation(&mut rc, &ri, &caster, &RayState::default(), &mut c, None, scattered.as_ref());
        assert_close(&c, &RGBSpectrum::new(1.8, 1.0, 0.2), 1e-5);
    }

    #[test]
    fn test_object_radiance_map_replaces_global() {
        let mut scene = Scene::new();
        let material = Material::new()
            .with_spf(Arc::new(PerfectReflectorSPF::new(RGBSpectrum::gray(1.0))));
        let shape = Rectangle::new(Vector3f::zeros(), Vector3f::new(5.0, 0.0, 0.0), Vector3f::new(0.0, 5.0, 0.0));
        scene.add_object(SceneObject::new(Arc::new(shape), Arc::new(material))
            .with_radiance_map(Arc::new(UniformRadianceMap::new(RGBSpectrum::new(1.0, 0.0, 0.0)))));
        scene.set_global_radiance_map(Arc::new(UniformRadianceMap::new(RGBSpectrum::gray(2.0))));

        let ri = floor_hit(&scene, 0.0, 0.0);
        let caster = caster(&scene, shader_of(vec![]));
        let mut rc = context(RenderPass::Normal);
        let scattered = compute_scatter_set(&mut rc, &ri, None, true);

        let mut c = RGBSpectrum::black();
        ReflectionOp::new().perform_operation(&mut rc, &ri, &caster, &RayState::default(), &mut c, None, scattered.as_ref());
        assert_close(&c, &RGBSpectrum::new(1.0, 0.0, 0.0), 1e-5);
    }

    #[test]
    fn test_precompute_pass_does_nothing() {
        let scene = mirror_under_sky();
        let ri = floor_hit(&scene, 0.0, 0.0);
        let caster = caster(&scene, shader_of(vec![]));
        let mut rc = context(RenderPass::Precompute);
        let scattered = compute_scatter_set(&mut rc, &ri, None, true);

        let mut c = RGBSpectrum::gray(3.0);
        ReflectionOp::new().perform_operation(&mut rc, &ri, &caster, &RayState::default(), &mut c, None, scattered.as_ref());
        assert!(c.is_black());
    }
}
