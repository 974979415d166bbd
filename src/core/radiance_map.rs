// Copyright @yucwang 2026

use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Radiance arriving from infinity along a ray that escaped the scene.
pub trait RadianceMap: Send + Sync {
    fn radiance(&self, ray: &Ray3f) -> RGBSpectrum;
}
