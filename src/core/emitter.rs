// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::math::constants::Vector3f;
use crate::math::spectrum::RGBSpectrum;

pub trait Emitter: Send + Sync {
    fn emitted_radiance(&self,
                        ri: &SurfaceIntersection,
                        out_dir: &Vector3f,
                        n: &Vector3f) -> RGBSpectrum;
}
