// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::interaction::SurfaceIntersection;
use crate::math::spectrum::RGBSpectrum;

/// Read side of a prebuilt photon map.
pub trait PhotonMap: Send + Sync {
    fn radiance_estimate(&self, ri: &SurfaceIntersection, bsdf: &dyn BSDF) -> RGBSpectrum;
}
