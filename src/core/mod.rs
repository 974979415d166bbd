// Copyright @yucwang 2021

pub mod bsdf;
pub mod computation_node;
pub mod context;
pub mod emitter;
pub mod error;
pub mod interaction;
pub mod ior_stack;
pub mod irradiance_cache;
pub mod light;
pub mod material;
pub mod photon_map;
pub mod progress;
pub mod radiance_map;
pub mod ray_state;
pub mod rng;
pub mod scattered;
pub mod scene;
pub mod sensor;
pub mod settings;
pub mod shader;
pub mod shadow_map;
pub mod shape;
pub mod spf;
pub mod texture;
