// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f, EPSILON, NEARZERO};
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

const MAX_WEIGHT: Float = 1e10;

/// One stored indirect-irradiance sample.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheElement {
    pub position: Vector3f,
    pub normal: Vector3f,
    pub irradiance: RGBSpectrum,
    /// Harmonic mean distance to the surfaces seen from this sample, clamped.
    pub r0: Float,
    /// Filled in by `query` for the query point.
    pub weight: Float,
    pub rot_gradient: [RGBSpectrum; 3],
    pub trans_gradient: [RGBSpectrum; 3],
}

impl CacheElement {
    pub fn compute_weight(&self, p: &Vector3f, n: &Vector3f) -> Float {
        let dist = (p - self.position).norm();
        let ndot = (1.0 - n.dot(&self.normal)).max(0.0);
        let denom = dist / self.r0 + ndot.sqrt();
        if denom <= 0.0 {
            MAX_WEIGHT
        } else {
            (1.0 / denom).min(MAX_WEIGHT)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Populating,
    Populated,
}

struct OctreeNode {
    center: Vector3f,
    size: Float,
    elements: Vec<CacheElement>,
    children: [Option<Box<OctreeNode>>; 8],
}

impl OctreeNode {
    fn new(center: Vector3f, size: Float) -> Self {
        Self {
            center,
            size,
            elements: Vec::new(),
            children: Default::default(),
        }
    }

    fn child_index(&self, p: &Vector3f) -> usize {
        let mut idx = 0;
        if p.x > self.center.x { idx |= 1; }
        if p.y > self.center.y { idx |= 2; }
        if p.z > self.center.z { idx |= 4; }
        idx
    }

    fn child_center(&self, idx: usize) -> Vector3f {
        let offset = self.size * 0.25 + NEARZERO;
        let sign = |bit: usize| if idx & bit != 0 { offset } else { -offset };
        self.center + Vector3f::new(sign(1), sign(2), sign(4))
    }

    fn encloses(&self, p: &Vector3f) -> bool {
        let half = self.size * 0.5;
        (p - self.center).iter().all(|d| d.abs() <= half)
    }

    /// Lookup bounds are twice the node so neighbours' samples are seen.
    fn reaches(&self, p: &Vector3f) -> bool {
        (p - self.center).iter().all(|d| d.abs() <= self.size)
    }

    fn insert(&mut self, element: CacheElement, radius: Float) {
        if self.size < 4.0 * radius || !self.encloses(&element.position) {
            self.elements.push(element);
            return;
        }

        let idx = self.child_index(&element.position);
        if self.children[idx].is_none() {
            let child = OctreeNode::new(self.child_center(idx), self.size * 0.5 + NEARZERO);
            self.children[idx] = Some(Box::new(child));
        }
        if let Some(child) = self.children[idx].as_mut() {
            child.insert(element, radius);
        }
    }

    fn find(&self, p: &Vector3f, n: &Vector3f, min_weight: Float, out: &mut Vec<CacheElement>) -> Float {
        let mut accrued = 0.0;
        for element in &self.elements {
            let weight = element.compute_weight(p, n);
            if weight > min_weight {
                let mut found = element.clone();
                found.weight = weight;
                out.push(found);
                accrued += weight;
            }
        }
        if accrued > 0.0 {
            return accrued;
        }

        for child in self.children.iter().flatten() {
            if child.reaches(p) {
                accrued += child.find(p, n, min_weight, out);
            }
        }
        accrued
    }

    fn covered(&self, p: &Vector3f, n: &Vector3f, min_weight: Float) -> bool {
        if self.elements.iter().any(|e| e.compute_weight(p, n) > min_weight) {
            return true;
        }
        self.children.iter().flatten()
            .any(|child| child.reaches(p) && child.covered(p, n, min_weight))
    }
}

/// Octree of irradiance samples built during the precompute pass and
/// interpolated during the final pass.
pub struct IrradianceCache {
    root: RwLock<OctreeNode>,
    size: Float,
    tolerance: Float,
    min_spacing: Float,
    max_spacing: Float,
    element_count: AtomicUsize,
    precomputed: AtomicBool,
}

impl IrradianceCache {
    pub fn new(size: Float, tolerance: Float, min_spacing: Float, max_spacing: Float) -> Self {
        let min_spacing = min_spacing.max(EPSILON);
        let max_spacing = if max_spacing <= min_spacing {
            log::warn!("IrradianceCache: max spacing {} <= min spacing {}, using {}.",
                       max_spacing, min_spacing, min_spacing * 100.0);
            min_spacing * 100.0
        } else {
            max_spacing
        };

        Self {
            root: RwLock::new(OctreeNode::new(Vector3f::zeros(), size)),
            size,
            tolerance,
            min_spacing,
            max_spacing,
            element_count: AtomicUsize::new(0),
            precomputed: AtomicBool::new(false),
        }
    }

    pub fn tolerance(&self) -> Float {
        self.tolerance
    }

    /// A non-positive tolerance turns the cache off for shading.
    pub fn is_enabled(&self) -> bool {
        self.tolerance > 0.0
    }

    pub fn len(&self) -> usize {
        self.element_count.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state(&self) -> CacheState {
        if self.is_precomputed() {
            CacheState::Populated
        } else if self.is_empty() {
            CacheState::Empty
        } else {
            CacheState::Populating
        }
    }

    pub fn is_precomputed(&self) -> bool {
        self.precomputed.load(Ordering::Acquire)
    }

    pub fn finished_precomputation(&self) {
        log::info!("IrradianceCache: precomputation finished with {} samples.", self.len());
        self.precomputed.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        let mut root = self.write_root();
        *root = OctreeNode::new(Vector3f::zeros(), self.size);
        self.element_count.store(0, Ordering::Release);
        self.precomputed.store(false, Ordering::Release);
    }

    /// Clamped radius for a harmonic mean hit distance. Degenerate statistics
    /// map to the minimum spacing.
    pub fn radius_for(&self, hit_distance: Float) -> Float {
        let lo = self.min_spacing / self.tolerance;
        let hi = self.max_spacing / self.tolerance;
        if !hit_distance.is_finite() || hit_distance <= 0.0 {
            return lo;
        }
        hit_distance.max(lo).min(hi)
    }

    pub fn insert_element(&self,
                          position: Vector3f,
                          normal: Vector3f,
                          irradiance: RGBSpectrum,
                          hit_distance: Float,
                          rot_gradient: [RGBSpectrum; 3],
                          trans_gradient: [RGBSpectrum; 3]) {
        if !self.is_enabled() {
            return;
        }
        let r0 = self.radius_for(hit_distance);
        let element = CacheElement {
            position,
            normal,
            irradiance,
            r0,
            weight: 0.0,
            rot_gradient,
            trans_gradient,
        };

        let mut root = self.write_root();
        root.insert(element, r0 / self.tolerance);
        self.element_count.fetch_add(1, Ordering::AcqRel);
    }

    /// Elements valid at `(p, n)` with their weights, and the weight total.
    pub fn query(&self, p: &Vector3f, n: &Vector3f) -> (Float, Vec<CacheElement>) {
        let mut found = Vec::new();
        if !self.is_enabled() {
            return (0.0, found);
        }
        let total = self.read_root().find(p, n, 1.0 / self.tolerance, &mut found);
        (total, found)
    }

    /// Weighted blend of the valid elements, `None` when nothing covers `p`.
    pub fn interpolate(&self, p: &Vector3f, n: &Vector3f, use_gradients: bool) -> Option<RGBSpectrum> {
        let (total, elements) = self.query(p, n);
        if elements.is_empty() || total <= 0.0 {
            return None;
        }

        let mut sum = RGBSpectrum::black();
        for element in &elements {
            sum += element.irradiance * element.weight.min(MAX_WEIGHT);
            if use_gradients {
                // Gradient terms are added unweighted.
                let d = p - element.position;
                sum += element.trans_gradient[0] * d.x;
                sum += element.trans_gradient[1] * d.y;
                sum += element.trans_gradient[2] * d.z;

                let cp = n.cross(&element.normal);
                sum += element.rot_gradient[0] * cp.x;
                sum += element.rot_gradient[1] * cp.y;
                sum += element.rot_gradient[2] * cp.z;
            }
        }

        Some(sum / total)
    }

    pub fn is_sample_needed(&self, p: &Vector3f, n: &Vector3f) -> bool {
        if !self.is_enabled() {
            return true;
        }
        !self.read_root().covered(p, n, 1.0 / self.tolerance)
    }

    fn read_root(&self) -> RwLockReadGuard<'_, OctreeNode> {
        match self.root.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_root(&self) -> RwLockWriteGuard<'_, OctreeNode> {
        match self.root.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
