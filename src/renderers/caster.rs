// Copyright @yucwang 2026

use crate::core::context::RuntimeContext;
use crate::core::interaction::SurfaceIntersection;
use crate::core::ior_stack::IorStack;
use crate::core::radiance_map::RadianceMap;
use crate::core::ray_state::{RayRole, RayState};
use crate::core::scene::Scene;
use crate::core::settings::RenderSettings;
use crate::core::shader::Shader;
use crate::math::constants::{Float, Vector3f, RAY_ADVANCE};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastResult {
    pub color: RGBSpectrum,
    /// Hit distance. Infinite when an escaped ray counts as hitting the
    /// background radiance map.
    pub distance: Option<Float>,
}

impl CastResult {
    pub fn nothing() -> Self {
        Self { color: RGBSpectrum::black(), distance: None }
    }

    pub fn is_hit(&self) -> bool {
        self.distance.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CasterSettings {
    pub max_recursion: u32,
    pub min_importance: Float,
    pub show_luminaires: bool,
    pub use_ior_stack: bool,
    pub radiance_map_as_background: bool,
}

impl Default for CasterSettings {
    fn default() -> Self {
        Self::from(&RenderSettings::default())
    }
}

impl From<&RenderSettings> for CasterSettings {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            max_recursion: settings.max_recursion,
            min_importance: settings.min_importance,
            show_luminaires: settings.show_luminaires,
            use_ior_stack: settings.use_ior_stack,
            radiance_map_as_background: settings.radiance_map_as_background,
        }
    }
}

/// Casts rays into a scene and shades what they hit, recursing through the
/// shaders it calls.
pub struct RayCaster<'a> {
    scene: &'a Scene,
    default_shader: Arc<dyn Shader>,
    settings: CasterSettings,
}

impl<'a> RayCaster<'a> {
    pub fn new(scene: &'a Scene, default_shader: Arc<dyn Shader>, settings: CasterSettings) -> Self {
        Self { scene, default_shader, settings }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn settings(&self) -> &CasterSettings {
        &self.settings
    }

    /// Entry point for camera rays: fresh ray state and IOR stack.
    pub fn cast_view_ray(&self, rc: &mut RuntimeContext, ray: &Ray3f) -> CastResult {
        let rs = RayState::default();
        if self.settings.use_ior_stack {
            let ior_stack = IorStack::new(1.0);
            self.cast_ray(rc, ray, &rs, None, Some(&ior_stack))
        } else {
            self.cast_ray(rc, ray, &rs, None, None)
        }
    }

    pub fn cast_ray(&self,
                    rc: &mut RuntimeContext,
                    ray: &Ray3f,
                    rs: &RayState,
                    radiance_map: Option<&dyn RadianceMap>,
                    ior_stack: Option<&IorStack>) -> CastResult {
        if rs.depth > self.settings.max_recursion || rs.importance < self.settings.min_importance {
            return CastResult::nothing();
        }

        rc.stats.rays_cast += 1;
        rc.stats.deepest_depth = rc.stats.deepest_depth.max(rs.depth);

        let hit = self.scene.intersect_ray(ray).filter(|ri| {
            rs.role != RayRole::View
                || self.settings.show_luminaires
                || !ri.material().map_or(false, |m| m.emitter().is_some())
        });

        if let Some(ri) = hit {
            rc.stats.shade_calls += 1;
            let shader = self.scene.object(ri.object_id())
                .and_then(|object| object.shader.clone())
                .unwrap_or_else(|| self.default_shader.clone());
            let color = shader.shade(rc, &ri, self, rs, ior_stack);
            return CastResult { color, distance: Some(ri.t()) };
        }

        if let Some(map) = radiance_map {
            return CastResult { color: map.radiance(ray), distance: None };
        }

        if let Some(map) = self.scene.global_radiance_map() {
            let distance = if self.settings.radiance_map_as_background {
                Some(std::f32::INFINITY)
            } else {
                None
            };
            return CastResult { color: map.radiance(ray), distance };
        }

        CastResult::nothing()
    }

    /// Casts a secondary ray whose origin lies on a surface.
    /// The surface object's own radiance map, if any, takes over from the
    /// global one for this ray.
    pub fn cast_from_surface(&self,
                             rc: &mut RuntimeContext,
                             ri: &SurfaceIntersection,
                             ray: &Ray3f,
                             rs: &RayState,
                             ior_stack: Option<&IorStack>) -> CastResult {
        let radiance_map = self.scene.object(ri.object_id())
            .and_then(|object| object.radiance_map.as_deref());
        self.cast_ray(rc, &ray.advanced(RAY_ADVANCE), rs, radiance_map, ior_stack)
    }

    /// True when something blocks the segment from `origin` to `origin + dir * max_dist`.
    pub fn cast_shadow_ray(&self, origin: &Vector3f, dir: &Vector3f, max_dist: Float) -> bool {
        self.scene.intersect_shadow_ray(origin, dir, max_dist)
    }
}
