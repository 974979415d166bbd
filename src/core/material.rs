// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::emitter::Emitter;
use crate::core::spf::SPF;
use std::sync::Arc;

/// A surface description: any of evaluation, scattering and emission.
#[derive(Clone, Default)]
pub struct Material {
    bsdf: Option<Arc<dyn BSDF>>,
    spf: Option<Arc<dyn SPF>>,
    emitter: Option<Arc<dyn Emitter>>,
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bsdf(mut self, bsdf: Arc<dyn BSDF>) -> Self {
        self.bsdf = Some(bsdf);
        self
    }

    pub fn with_spf(mut self, spf: Arc<dyn SPF>) -> Self {
        self.spf = Some(spf);
        self
    }

    pub fn with_emitter(mut self, emitter: Arc<dyn Emitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn bsdf(&self) -> Option<&dyn BSDF> {
        self.bsdf.as_deref()
    }

    pub fn spf(&self) -> Option<&dyn SPF> {
        self.spf.as_deref()
    }

    pub fn emitter(&self) -> Option<&dyn Emitter> {
        self.emitter.as_deref()
    }
}
