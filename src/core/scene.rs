// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::irradiance_cache::IrradianceCache;
use crate::core::light::Light;
use crate::core::material::Material;
use crate::core::photon_map::PhotonMap;
use crate::core::radiance_map::RadianceMap;
use crate::core::sensor::Sensor;
use crate::core::shader::Shader;
use crate::core::shadow_map::ShadowMap;
use crate::core::shape::Shape;
use crate::math::constants::{ Float, Vector3f, RAY_ADVANCE };
use crate::math::ray::Ray3f;
use std::sync::Arc;

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub material: Arc<Material>,
    pub shader: Option<Arc<dyn Shader>>,
    pub receives_shadows: bool,
    /// Seen by rays leaving this object that hit nothing.
    pub radiance_map: Option<Arc<dyn RadianceMap>>,
    pub name: Option<String>,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, material: Arc<Material>) -> Self {
        Self { shape, material, shader: None, receives_shadows: true, radiance_map: None, name: None }
    }

    pub fn with_shader(mut self, shader: Arc<dyn Shader>) -> Self {
        self.shader = Some(shader);
        self
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_radiance_map(mut self, map: Arc<dyn RadianceMap>) -> Self {
        self.radiance_map = Some(map);
        self
    }

    pub fn without_shadows(mut self) -> Self {
        self.receives_shadows = false;
        self
    }

    pub fn shape(&self) -> &Arc<dyn Shape> {
        &self.shape
    }

    pub fn shader(&self) -> Option<&dyn Shader> {
        self.shader.as_deref()
    }
}

pub struct Scene {
    objects: Vec<SceneObject>,
    camera: Option<Box<dyn Sensor>>,
    lights: Vec<Arc<dyn Light>>,
    irradiance_cache: Option<Arc<IrradianceCache>>,
    global_photon_map: Option<Arc<dyn PhotonMap>>,
    shadow_map: Option<Arc<dyn ShadowMap>>,
    global_radiance_map: Option<Arc<dyn RadianceMap>>,
    time: Float,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            camera: None,
            lights: Vec::new(),
            irradiance_cache: None,
            global_photon_map: None,
            shadow_map: None,
            global_radiance_map: None,
            time: 0.0,
        }
    }

    pub fn add_object(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn objects(&self) -> &Vec<SceneObject> {
        &self.objects
    }

    pub fn object(&self, idx: usize) -> Option<&SceneObject> {
        self.objects.get(idx)
    }

    pub fn set_camera(&mut self, camera: Box<dyn Sensor>) {
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<&dyn Sensor> {
        self.camera.as_deref()
    }

    pub fn add_light(&mut self, light: Arc<dyn Light>) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &Vec<Arc<dyn Light>> {
        &self.lights
    }

    pub fn set_irradiance_cache(&mut self, cache: Arc<IrradianceCache>) {
        self.irradiance_cache = Some(cache);
    }

    pub fn irradiance_cache(&self) -> Option<&IrradianceCache> {
        self.irradiance_cache.as_deref()
    }

    pub fn set_global_photon_map(&mut self, map: Arc<dyn PhotonMap>) {
        self.global_photon_map = Some(map);
    }

    pub fn global_photon_map(&self) -> Option<&dyn PhotonMap> {
        self.global_photon_map.as_deref()
    }

    pub fn set_shadow_map(&mut self, map: Arc<dyn ShadowMap>) {
        self.shadow_map = Some(map);
    }

    pub fn shadow_map(&self) -> Option<&dyn ShadowMap> {
        self.shadow_map.as_deref()
    }

    pub fn set_global_radiance_map(&mut self, map: Arc<dyn RadianceMap>) {
        self.global_radiance_map = Some(map);
    }

    pub fn global_radiance_map(&self) -> Option<&dyn RadianceMap> {
        self.global_radiance_map.as_deref()
    }

    pub fn time(&self) -> Float {
        self.time
    }

    /// Moving in time invalidates cached indirect lighting.
    pub fn set_time(&mut self, time: Float) {
        self.time = time;
        if let Some(cache) = self.irradiance_cache.as_ref() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Closest hit along the ray, tagged with the object and its material.
    pub fn intersect_ray(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let mut probe = *ray;
        let mut closest: Option<(usize, SurfaceIntersection)> = None;
        for (idx, object) in self.objects.iter().enumerate() {
            if let Some(hit) = object.shape.ray_intersection(&probe) {
                if probe.update(hit.t()) {
                    closest = Some((idx, hit));
                }
            }
        }

        closest.map(|(idx, hit)| hit.with_object(idx, self.objects[idx].material.clone()))
    }

    /// True when anything blocks `origin + t * dir` for t in (0, max_dist).
    pub fn intersect_shadow_ray(&self, origin: &Vector3f, dir: &Vector3f, max_dist: Float) -> bool {
        let max_t = max_dist - 2.0 * RAY_ADVANCE;
        if max_t <= 0.0 {
            return false;
        }
        let ray = Ray3f::new(*origin, *dir, Some(0.0), Some(max_t)).advanced(RAY_ADVANCE);
        self.objects.iter().any(|object| object.shape.ray_intersection_t(&ray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::standard::StandardShader;
    use crate::shapes::sphere::Sphere;

    fn ball(z: Float) -> SceneObject {
        SceneObject::new(Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, z), 0.5)), Arc::new(Material::new()))
    }

    #[test]
    fn test_closest_hit_wins() {
        let mut scene = Scene::new();
        scene.add_object(ball(-5.0));
        scene.add_object(ball(-2.0).with_shader(Arc::new(StandardShader::new(vec![]))));
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), None, None);

        let hit = scene.intersect_ray(&ray).unwrap();
        assert_eq!(hit.object_id(), 1);
        assert!((hit.t() - 1.5).abs() < 1e-5);
        assert!(scene.object(1).unwrap().shader().is_some());
        assert!(scene.intersect_shadow_ray(&Vector3f::zeros(), &Vector3f::new(0.0, 0.0, -1.0), 10.0));
        assert!(!scene.intersect_shadow_ray(&Vector3f::zeros(), &Vector3f::new(0.0, 0.0, -1.0), 1.0));
    }

    #[test]
    fn test_set_time_clears_cache() {
        let mut scene = Scene::new();
        let cache = Arc::new(IrradianceCache::new(10.0, 0.1, 0.05, 1.0));
        scene.set_irradiance_cache(cache.clone());
        cache.insert_element(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0),
                             Vector3f::new(1.0, 1.0, 1.0), 1.0,
                             [Vector3f::zeros(); 3], [Vector3f::zeros(); 3]);
        cache.finished_precomputation();
        assert_eq!(cache.len(), 1);

        scene.set_time(0.5);
        assert_eq!(scene.time(), 0.5);
        assert!(cache.is_empty());
        assert!(!cache.is_precomputed());
    }
}
