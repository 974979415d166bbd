// Copyright @yucwang 2026

use crate::core::rng::LcgRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    /// Populates the irradiance cache, pixel results are thrown away.
    Precompute,
    Normal,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShadingStats {
    pub shade_calls: u64,
    pub rays_cast: u64,
    pub deepest_depth: u32,
}

impl ShadingStats {
    pub fn merge(&mut self, other: &ShadingStats) {
        self.shade_calls += other.shade_calls;
        self.rays_cast += other.rays_cast;
        self.deepest_depth = self.deepest_depth.max(other.deepest_depth);
    }
}

/// Per-worker state. One per thread, never shared.
pub struct RuntimeContext {
    pub rng: LcgRng,
    pub stats: ShadingStats,
    pass: RenderPass,
    threaded: bool,
}

impl RuntimeContext {
    pub fn new(pass: RenderPass, threaded: bool) -> Self {
        Self {
            rng: LcgRng::new(0),
            stats: ShadingStats::default(),
            pass,
            threaded,
        }
    }

    pub fn pass(&self) -> RenderPass {
        self.pass
    }

    pub fn is_threaded(&self) -> bool {
        self.threaded
    }

    pub fn canonical_random(&mut self) -> f32 {
        self.rng.next_f32()
    }
}
