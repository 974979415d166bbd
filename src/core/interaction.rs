// Copyright @yucwang 2023

use crate::core::material::Material;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use std::sync::Arc;

/// Geometric record of a ray hitting an object.
#[derive(Clone)]
pub struct SurfaceIntersection {
    p: Vector3f,
    geo_normal: Vector3f,
    sh_normal:  Vector3f,
    uv: Vector2f,
    t: Float,
    ray: Ray3f,
    object_id: usize,
    material: Option<Arc<Material>>,
}

impl SurfaceIntersection {
    pub fn new(new_p: Vector3f,
               new_geo_normal: Vector3f,
               new_sh_normal: Vector3f,
               new_uv: Vector2f,
               new_t: Float,
               new_ray: Ray3f) -> Self {
        Self { p: new_p, geo_normal: new_geo_normal, sh_normal: new_sh_normal,
               uv: new_uv, t: new_t, ray: new_ray, object_id: 0, material: None }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn geo_normal(&self) -> Vector3f {
        self.geo_normal
    }

    pub fn sh_normal(&self) -> Vector3f {
        self.sh_normal
    }

    /// Shading normal flipped to the side the ray arrived from.
    pub fn facing_normal(&self) -> Vector3f {
        if self.ray.dir().dot(&self.geo_normal) > 0.0 {
            -self.sh_normal
        } else {
            self.sh_normal
        }
    }

    pub fn is_back_facing(&self) -> bool {
        self.ray.dir().dot(&self.geo_normal) > 0.0
    }

    pub fn frame(&self) -> Frame {
        Frame::from_normal(&self.facing_normal())
    }

    /// The ray that produced this hit.
    pub fn ray(&self) -> &Ray3f {
        &self.ray
    }

    pub fn object_id(&self) -> usize {
        self.object_id
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_deref()
    }

    pub fn with_object(mut self, object_id: usize, material: Arc<Material>) -> Self {
        self.object_id = object_id;
        self.material = Some(material);
        self
    }
}
