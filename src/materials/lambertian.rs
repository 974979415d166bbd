// Copyright @yucwang 2023

use crate::core::bsdf::{BSDFValue, BSDF};
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::rng::LcgRng;
use crate::core::scattered::{ScatterKind, ScatteredRay, ScatteredRaySet};
use crate::core::spf::SPF;
use crate::core::texture::Texture;
use crate::math::constants::{Float, INV_PI, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::math::warp::sample_cosine_hemisphere;
use std::sync::Arc;

pub struct LambertianBRDF {
    reflectance: Arc<dyn Texture>,
}

impl LambertianBRDF {
    pub fn new(reflectance: Arc<dyn Texture>) -> Self {
        Self { reflectance }
    }
}

impl BSDF for LambertianBRDF {
    fn value(&self, wi: &Vector3f, ri: &SurfaceIntersection) -> BSDFValue {
        if wi.dot(&ri.facing_normal()) <= 0.0 {
            return RGBSpectrum::black();
        }
        self.reflectance.eval(ri.uv()) * INV_PI
    }
}

/// Cosine-weighted diffuse bounce. The cosine and 1/pi cancel against the
/// sampling density, leaving the reflectance as the ray weight.
pub struct LambertianSPF {
    reflectance: Arc<dyn Texture>,
}

impl LambertianSPF {
    pub fn new(reflectance: Arc<dyn Texture>) -> Self {
        Self { reflectance }
    }
}

impl SPF for LambertianSPF {
    fn scatter(&self,
               ri: &SurfaceIntersection,
               rng: &mut LcgRng,
               _ior_stack: Option<&IorStack>) -> ScatteredRaySet {
        let mut scattered = ScatteredRaySet::new();
        let u = Vector2f::new(rng.next_f32(), rng.next_f32());
        let dir = ri.frame().from_local(cosine_direction(&u));
        let ray = Ray3f::new(ri.p(), dir, None, None);
        scattered.push(ScatteredRay::new(ray, ScatterKind::Diffuse, self.reflectance.eval(ri.uv())));
        scattered
    }
}

const MIN_COS: Float = 1e-3;

/// Cosine-distributed local direction, lifted off the horizon.
fn cosine_direction(u: &Vector2f) -> Vector3f {
    let local = sample_cosine_hemisphere(u);
    Vector3f::new(local.x, local.y, local.z.max(MIN_COS)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::rectangle::Rectangle;
    use crate::core::shape::Shape;
    use crate::textures::constant::ConstantTexture;

    fn floor_hit() -> SurfaceIntersection {
        let rect = Rectangle::new(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0));
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        rect.ray_intersection(&ray).unwrap()
    }

    #[test]
    fn test_brdf_only_on_facing_side() {
        let brdf = LambertianBRDF::new(Arc::new(ConstantTexture::new(RGBSpectrum::gray(0.5))));
        let ri = floor_hit();
        let above = brdf.value(&Vector3f::new(0.0, 0.6, 0.8), &ri);
        assert!((above.x - 0.5 * INV_PI).abs() < 1e-6);
        assert!(brdf.value(&Vector3f::new(0.0, 0.0, -1.0), &ri).is_black());
    }

    #[test]
    fn test_scatter_stays_in_upper_hemisphere() {
        let spf = LambertianSPF::new(Arc::new(ConstantTexture::new(RGBSpectrum::gray(0.3))));
        let ri = floor_hit();
        let mut rng = LcgRng::new(7);
        for _ in 0..64 {
            let set = spf.scatter(&ri, &mut rng, None);
            for s in set.iter() {
                assert_eq!(s.kind, ScatterKind::Diffuse);
                assert!(s.ray.dir().z > 0.0);
                assert!((s.weight.x - 0.3).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_rim_sample_is_kept_above_horizon() {
        // u.x == 0 lands on the rim of the concentric disk
        let dir = cosine_direction(&Vector2f::new(0.0, 0.5));
        assert!(dir.z > 0.0);
        assert!((dir.norm() - 1.0).abs() < 1e-5);

        let spf = LambertianSPF::new(Arc::new(ConstantTexture::new(RGBSpectrum::gray(0.3))));
        let ri = floor_hit();
        for seed in 0..32 {
            assert_eq!(spf.scatter(&ri, &mut LcgRng::new(seed), None).len(), 1);
        }
    }
}
