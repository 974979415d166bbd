// Copyright @yucwang 2026

use crate::core::context::{RenderPass, RuntimeContext, ShadingStats};
use crate::core::error::RenderError;
use crate::core::progress::ProgressCallback;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::core::settings::RenderSettings;
use crate::core::shader::Shader;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::renderers::caster::{CasterSettings, RayCaster};
use crate::renderers::dispatcher::{DispatchSummary, WorkDispatcher};
use crate::renderers::sequence::{BlockSequence, HilbertSequence, Tile, TileOrder, TileSequence};
use std::sync::Arc;
use std::time::Instant;

pub use super::renderer::Renderer;

/// Image plus what it took to make it.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: Bitmap,
    pub stats: ShadingStats,
    /// Set when progress reporting cancelled the render. Unrendered pixels
    /// keep the clear color.
    pub aborted: bool,
}

/// Renders a scene tile by tile: an optional irradiance cache pass, then the
/// final pass into the image.
pub struct RenderOrchestrator {
    settings: RenderSettings,
    default_shader: Arc<dyn Shader>,
    progress: Option<Arc<dyn ProgressCallback>>,
    region: Option<Tile>,
    clear_color: RGBSpectrum,
}

impl Renderer for RenderOrchestrator {
    fn render(&self, scene: &Scene) -> Result<Bitmap, RenderError> {
        self.render_with_stats(scene).map(|output| output.image)
    }
}

impl RenderOrchestrator {
    pub fn new(settings: RenderSettings, default_shader: Arc<dyn Shader>) -> Self {
        Self {
            settings,
            default_shader,
            progress: None,
            region: None,
            clear_color: RGBSpectrum::black(),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Restricts rendering to an inclusive pixel rectangle.
    pub fn with_region(mut self, region: Tile) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_clear_color(mut self, color: RGBSpectrum) -> Self {
        self.clear_color = color;
        self
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn render_with_stats(&self, scene: &Scene) -> Result<RenderOutput, RenderError> {
        let camera = scene.camera().ok_or_else(|| {
            log::error!("RenderOrchestrator: scene has no camera.");
            RenderError::MissingCamera
        })?;
        let (width, height) = (camera.width(), camera.height());
        let region = self.checked_region(width, height)?;
        log::info!("RenderOrchestrator: {}x{} image, {} threads, {}x{} tiles, {} spp.",
                   width, height, self.settings.thread_count(),
                   self.settings.tile_width, self.settings.tile_height,
                   self.settings.samples_per_pixel.max(1));

        let caster = RayCaster::new(scene, self.default_shader.clone(), CasterSettings::from(&self.settings));
        let dispatcher = WorkDispatcher::new(self.settings.thread_count(), self.progress.as_deref());
        let mut image = Bitmap::filled(width, height, self.clear_color);
        let mut stats = ShadingStats::default();

        if let Some(cache) = scene.irradiance_cache() {
            if cache.is_enabled() && !cache.is_precomputed() {
                self.set_title("Irradiance Pass: ");
                let start = Instant::now();
                let mut sequence = self.sequence(self.settings.precompute_tile_order);
                let summary = dispatcher.dispatch(sequence.as_mut(), &region, RenderPass::Precompute,
                    |rc, tile| {
                        self.render_tile(rc, camera, &caster, tile);
                    },
                    |_tile, _unused| {})?;
                stats.merge(&summary.stats);
                self.log_pass("irradiance", &summary, start);

                if summary.aborted {
                    return Ok(RenderOutput { image, stats, aborted: true });
                }
                cache.finished_precomputation();
            }
        }

        self.set_title("Rasterizing Scene: ");
        let start = Instant::now();
        let mut sequence = self.sequence(self.settings.tile_order);
        let summary = dispatcher.dispatch(sequence.as_mut(), &region, RenderPass::Normal,
            |rc, tile| self.render_tile(rc, camera, &caster, tile),
            |tile, pixels| {
                let mut i = 0;
                for y in tile.top..=tile.bottom {
                    for x in tile.left..=tile.right {
                        image[(x, y)] = pixels[i];
                        i += 1;
                    }
                }
            })?;
        stats.merge(&summary.stats);
        self.log_pass("final", &summary, start);

        Ok(RenderOutput { image, stats, aborted: summary.aborted })
    }

    fn checked_region(&self, width: usize, height: usize) -> Result<Tile, RenderError> {
        let region = self.region.unwrap_or_else(|| Tile::full(width, height));
        let fits = width > 0
            && height > 0
            && region.left <= region.right
            && region.top <= region.bottom
            && region.right < width
            && region.bottom < height;
        if fits {
            return Ok(region);
        }

        log::error!("RenderOrchestrator: region {:?} does not fit a {}x{} image.", region, width, height);
        Err(RenderError::InvalidRegion {
            top: region.top,
            left: region.left,
            bottom: region.bottom,
            right: region.right,
            width,
            height,
        })
    }

    fn sequence(&self, order: TileOrder) -> Box<dyn TileSequence> {
        match self.settings.hilbert_depth {
            Some(depth) => Box::new(HilbertSequence::new(depth)),
            None => Box::new(BlockSequence::new(self.settings.tile_width, self.settings.tile_height, order)),
        }
    }

    fn set_title(&self, title: &str) {
        if let Some(progress) = self.progress.as_ref() {
            progress.set_title(title);
        }
    }

    fn log_pass(&self, name: &str, summary: &DispatchSummary, start: Instant) {
        log::info!("RenderOrchestrator: {} pass finished {} of {} tiles in {:.2}s.",
                   name, summary.completed, summary.total, start.elapsed().as_secs_f32());
        log::debug!("RenderOrchestrator: {} pass shaded {} hits over {} rays, deepest {}.",
                    name, summary.stats.shade_calls, summary.stats.rays_cast, summary.stats.deepest_depth);
    }

    /// Pixels of `tile` in row order. Each pixel reseeds the generator, so
    /// the result does not depend on which worker renders it.
    fn render_tile(&self,
                   rc: &mut RuntimeContext,
                   camera: &dyn Sensor,
                   caster: &RayCaster,
                   tile: &Tile) -> Vec<RGBSpectrum> {
        let spp = self.settings.samples_per_pixel.max(1);
        let mut pixels = Vec::with_capacity(tile.area());

        for y in tile.top..=tile.bottom {
            for x in tile.left..=tile.right {
                rc.rng.reseed(LcgRng::pixel_seed(self.settings.seed, x, y));
                let mut color = RGBSpectrum::black();
                for _ in 0..spp {
                    let raster = if spp == 1 {
                        Vector2f::new(x as Float + 0.5, y as Float + 0.5)
                    } else {
                        Vector2f::new(x as Float + rc.canonical_random(),
                                      y as Float + rc.canonical_random())
                    };
                    if let Some(ray) = camera.generate_ray(rc, &raster) {
                        color += caster.cast_view_ray(rc, &ray).color;
                    }
                }
                pixels.push(color / spp as Float);
            }
        }
        pixels
    }
}
