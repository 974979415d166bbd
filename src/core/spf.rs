// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::rng::LcgRng;
use crate::core::scattered::ScatteredRaySet;

/// Scattering probability function: how a material continues a path.
pub trait SPF: Send + Sync {
    fn scatter(&self,
               ri: &SurfaceIntersection,
               rng: &mut LcgRng,
               ior_stack: Option<&IorStack>) -> ScatteredRaySet;
}
