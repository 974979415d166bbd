// Copyright @yucwang 2026

use crate::core::ior_stack::IorStack;
use crate::math::constants::{Float, NEARZERO};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatterKind {
    Reflection,
    Refraction,
    Diffuse,
    Translucent,
}

impl ScatterKind {
    pub fn is_diffuse(&self) -> bool {
        matches!(self, ScatterKind::Diffuse | ScatterKind::Translucent)
    }
}

#[derive(Debug, Clone)]
pub struct ScatteredRay {
    pub ray: Ray3f,
    pub kind: ScatterKind,
    pub weight: RGBSpectrum,
    /// Set when the scatter crosses a dielectric boundary.
    pub ior_stack: Option<IorStack>,
}

impl ScatteredRay {
    pub fn new(ray: Ray3f, kind: ScatterKind, weight: RGBSpectrum) -> Self {
        Self { ray, kind, weight, ior_stack: None }
    }

    pub fn with_ior_stack(mut self, ior_stack: IorStack) -> Self {
        self.ior_stack = Some(ior_stack);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScatteredRaySet {
    rays: Vec<ScatteredRay>,
}

impl ScatteredRaySet {
    pub fn new() -> Self {
        Self { rays: Vec::new() }
    }

    pub fn push(&mut self, ray: ScatteredRay) {
        self.rays.push(ray);
    }

    pub fn len(&self) -> usize {
        self.rays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScatteredRay> {
        self.rays.iter()
    }

    /// Picks one ray with probability proportional to the max component of its
    /// weight. Returns the ray and the probability it was chosen with.
    pub fn random_select(&self, u: Float) -> Option<(&ScatteredRay, Float)> {
        self.select_where(u, |_| true)
    }

    pub fn random_select_diffuse(&self, u: Float) -> Option<(&ScatteredRay, Float)> {
        self.select_where(u, |r| r.kind.is_diffuse())
    }

    pub fn random_select_non_diffuse(&self, u: Float) -> Option<(&ScatteredRay, Float)> {
        self.select_where(u, |r| !r.kind.is_diffuse())
    }

    fn select_where<P>(&self, u: Float, accept: P) -> Option<(&ScatteredRay, Float)>
    where
        P: Fn(&ScatteredRay) -> bool,
    {
        let total: Float = self.rays.iter()
            .filter(|r| accept(r))
            .map(|r| r.weight.max_value().max(0.0))
            .sum();
        if total <= NEARZERO {
            return None;
        }

        let target = u * total;
        let mut cdf = 0.0;
        let mut last = None;
        for ray in self.rays.iter().filter(|r| accept(r)) {
            let w = ray.weight.max_value().max(0.0);
            if w <= 0.0 {
                continue;
            }
            cdf += w;
            last = Some((ray, w / total));
            if target < cdf {
                return last;
            }
        }
        last
    }
}
