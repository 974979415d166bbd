// Copyright @yucwang 2026

pub mod advanced;
pub mod ambient_occlusion;
pub mod direct_lighting;
pub mod distribution;
pub mod emission;
pub mod final_gather;
pub mod path_tracing;
pub mod photon_map;
pub mod reflection;
pub mod refraction;
pub mod standard;
pub mod transparency;

use crate::core::bsdf::BSDF;
use crate::core::context::{RenderPass, RuntimeContext};
use crate::core::interaction::SurfaceIntersection;
use crate::core::irradiance_cache::IrradianceCache;
use crate::core::ior_stack::IorStack;
use crate::core::ray_state::{RayRole, RayState};
use crate::core::scattered::{ScatterKind, ScatteredRay};
use crate::math::constants::{Float, FLOAT_MAX};
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::{CastResult, RayCaster};

/// Returned in place of a value freshly inserted into the irradiance cache.
/// Those pixels belong to the precompute pass and are thrown away.
pub fn precompute_marker() -> RGBSpectrum {
    RGBSpectrum::new(0.7, 0.7, 0.0)
}

/// Which kinds of scattered rays an op follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceMask {
    pub reflection: bool,
    pub refraction: bool,
    pub diffuse: bool,
    pub translucent: bool,
}

impl Default for TraceMask {
    fn default() -> Self {
        Self { reflection: true, refraction: true, diffuse: true, translucent: true }
    }
}

impl TraceMask {
    pub fn allows(&self, kind: ScatterKind) -> bool {
        match kind {
            ScatterKind::Reflection => self.reflection,
            ScatterKind::Refraction => self.refraction,
            ScatterKind::Diffuse => self.diffuse,
            ScatterKind::Translucent => self.translucent,
        }
    }
}

pub(crate) fn role_for(kind: ScatterKind) -> RayRole {
    if kind == ScatterKind::Diffuse {
        RayRole::Diffuse
    } else {
        RayRole::Specular
    }
}

/// Follows one scattered ray. The result is not yet multiplied by the ray weight.
pub(crate) fn follow(rc: &mut RuntimeContext,
                     caster: &RayCaster,
                     ri: &SurfaceIntersection,
                     scat: &ScatteredRay,
                     child: &RayState,
                     ior_stack: Option<&IorStack>) -> CastResult {
    let stack = scat.ior_stack.as_ref().or(ior_stack);
    caster.cast_from_surface(rc, ri, &scat.ray, child, stack)
}

/// Hit-distance bookkeeping for irradiance cache inserts.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct HitDistances {
    rsum: Float,
    hits: u32,
}

impl HitDistances {
    pub fn record(&mut self, result: &CastResult) -> bool {
        match result.distance {
            Some(t) => self.record_t(t),
            None => false,
        }
    }

    pub fn record_t(&mut self, t: Float) -> bool {
        if t > 0.0 {
            self.rsum += 1.0 / t;
            self.hits += 1;
            true
        } else {
            false
        }
    }

    /// Harmonic mean of the hit distances. Rays that saw nothing nearby give
    /// the largest distance, which the cache clamps to its max spacing.
    pub fn harmonic_mean(&self) -> Float {
        if self.rsum > 0.0 {
            self.hits as Float / self.rsum
        } else {
            FLOAT_MAX
        }
    }
}

/// What an op should do about the irradiance cache at this hit.
pub(crate) enum CacheLookup {
    Cached(RGBSpectrum),
    Compute,
    Skip,
}

pub(crate) fn enabled_cache<'a>(caster: &RayCaster<'a>) -> Option<&'a IrradianceCache> {
    caster.scene().irradiance_cache().filter(|cache| cache.is_enabled())
}

/// Interpolates in the final pass; in the precompute pass decides whether a
/// new sample is needed here.
pub(crate) fn consult_cache(rc: &RuntimeContext,
                            ri: &SurfaceIntersection,
                            cache: Option<&IrradianceCache>,
                            use_gradients: bool) -> CacheLookup {
    let cache = match cache {
        Some(cache) => cache,
        None if rc.pass() == RenderPass::Precompute => return CacheLookup::Skip,
        None => return CacheLookup::Compute,
    };
    let n = ri.facing_normal();
    match rc.pass() {
        RenderPass::Normal => match cache.interpolate(&ri.p(), &n, use_gradients) {
            Some(value) => CacheLookup::Cached(value),
            None => CacheLookup::Compute,
        },
        RenderPass::Precompute => {
            if cache.is_sample_needed(&ri.p(), &n) {
                CacheLookup::Compute
            } else {
                CacheLookup::Skip
            }
        }
    }
}

/// Stores a fresh value while precomputing. Returns the color the op should report.
pub(crate) fn store_in_cache(rc: &RuntimeContext,
                             ri: &SurfaceIntersection,
                             cache: Option<&IrradianceCache>,
                             value: RGBSpectrum,
                             distances: &HitDistances,
                             rot_gradient: [RGBSpectrum; 3],
                             trans_gradient: [RGBSpectrum; 3]) -> RGBSpectrum {
    match cache {
        Some(cache) if rc.pass() == RenderPass::Precompute => {
            cache.insert_element(ri.p(), ri.facing_normal(), value,
                                 distances.harmonic_mean(), rot_gradient, trans_gradient);
            precompute_marker()
        }
        _ => value,
    }
}

/// Radiance seen by a final gather ray: the global photon map when the scene
/// has one, direct lighting otherwise.
pub(crate) fn gather_estimate(ri: &SurfaceIntersection, caster: &RayCaster, bsdf: &dyn BSDF) -> RGBSpectrum {
    let scene = caster.scene();
    if let Some(map) = scene.global_photon_map() {
        return map.radiance_estimate(ri, bsdf);
    }

    let receives_shadows = scene.object(ri.object_id()).map_or(true, |o| o.receives_shadows);
    scene.lights().iter()
        .map(|light| light.compute_direct_lighting(ri, scene, bsdf, receives_shadows))
        .fold(RGBSpectrum::black(), |acc, c| acc + c)
}

#[cfg(test)]
pub(crate) mod test_scenes {
    use crate::core::context::{RenderPass, RuntimeContext};
    use crate::core::interaction::SurfaceIntersection;
    use crate::core::material::Material;
    use crate::core::scene::{Scene, SceneObject};
    use crate::core::shader::{Shader, ShaderOp};
    use crate::materials::lambertian::{LambertianBRDF, LambertianSPF};
    use crate::math::constants::{Float, Vector3f};
    use crate::math::ray::Ray3f;
    use crate::math::spectrum::{RGBSpectrum, Spectrum};
    use crate::renderers::caster::{CasterSettings, RayCaster};
    use crate::shaders::standard::StandardShader;
    use crate::shapes::rectangle::Rectangle;
    use crate::textures::constant::ConstantTexture;
    use std::sync::Arc;

    /// Diffuse square of half size `half` in the z = 0 plane facing +z.
    pub fn diffuse_floor(albedo: Float, half: Float) -> SceneObject {
        let texture = Arc::new(ConstantTexture::new(RGBSpectrum::gray(albedo)));
        let material = Material::new()
            .with_bsdf(Arc::new(LambertianBRDF::new(texture.clone())))
            .with_spf(Arc::new(LambertianSPF::new(texture)));
        let shape = Rectangle::new(Vector3f::zeros(),
                                   Vector3f::new(half, 0.0, 0.0),
                                   Vector3f::new(0.0, half, 0.0));
        SceneObject::new(Arc::new(shape), Arc::new(material))
    }

    pub fn shader_of(ops: Vec<Arc<dyn ShaderOp>>) -> Arc<dyn Shader> {
        Arc::new(StandardShader::new(ops))
    }

    pub fn caster<'a>(scene: &'a Scene, shader: Arc<dyn Shader>) -> RayCaster<'a> {
        RayCaster::new(scene, shader, CasterSettings::default())
    }

    /// Hit on the floor straight below `(x, y, 1)`.
    pub fn floor_hit(scene: &Scene, x: Float, y: Float) -> SurfaceIntersection {
        let ray = Ray3f::new(Vector3f::new(x, y, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        scene.intersect_ray(&ray).unwrap()
    }

    pub fn context(pass: RenderPass) -> RuntimeContext {
        RuntimeContext::new(pass, false)
    }

    pub fn assert_close(a: &RGBSpectrum, b: &RGBSpectrum, tol: Float) {
        assert!((a - b).norm() <= tol, "{:?} != {:?}", a, b);
    }
}
