// Copyright @yucwang 2026

use crate::core::radiance_map::RadianceMap;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Constant sky, optionally scaled.
pub struct UniformRadianceMap {
    radiance: RGBSpectrum,
    scale: Float,
}

impl UniformRadianceMap {
    pub fn new(radiance: RGBSpectrum) -> Self {
        Self { radiance, scale: 1.0 }
    }

    pub fn with_scale(mut self, scale: Float) -> Self {
        self.scale = scale;
        self
    }
}

impl RadianceMap for UniformRadianceMap {
    fn radiance(&self, _ray: &Ray3f) -> RGBSpectrum {
        self.radiance * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;
    use crate::math::spectrum::Spectrum;

    #[test]
    fn test_same_radiance_everywhere() {
        let sky = UniformRadianceMap::new(RGBSpectrum::new(0.2, 0.4, 0.8)).with_scale(2.0);
        for d in &[Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, -1.0, 0.0)] {
            let ray = Ray3f::new(Vector3f::zeros(), *d, None, None);
            assert_eq!(sky.radiance(&ray), RGBSpectrum::new(0.4, 0.8, 1.6));
        }
        assert!(!UniformRadianceMap::new(RGBSpectrum::gray(1.0)).radiance(
            &Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None)).is_black());
    }
}
