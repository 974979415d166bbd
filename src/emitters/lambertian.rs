// Copyright @yucwang 2026

use crate::core::emitter::Emitter;
use crate::core::interaction::SurfaceIntersection;
use crate::math::constants::Vector3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};

/// Emits the same radiance in every direction of the front hemisphere.
pub struct LambertianEmitter {
    radiance: RGBSpectrum,
}

impl LambertianEmitter {
    pub fn new(radiance: RGBSpectrum) -> Self {
        Self { radiance }
    }
}

impl Emitter for LambertianEmitter {
    fn emitted_radiance(&self,
                        _ri: &SurfaceIntersection,
                        out_dir: &Vector3f,
                        n: &Vector3f) -> RGBSpectrum {
        if out_dir.dot(n) > 0.0 {
            self.radiance
        } else {
            RGBSpectrum::black()
        }
    }
}
