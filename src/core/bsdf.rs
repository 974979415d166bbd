// Copyright @yucwang 2023

use crate::core::interaction::SurfaceIntersection;
use crate::math::constants::Vector3f;
use crate::math::spectrum::RGBSpectrum;

pub type BSDFValue = RGBSpectrum;

pub trait BSDF: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Value for light arriving from direction `wi` (pointing away from the
    /// surface) and leaving back along the intersection's ray.
    fn value(&self, wi: &Vector3f, ri: &SurfaceIntersection) -> BSDFValue;
}
