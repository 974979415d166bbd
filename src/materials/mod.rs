// Copyright @yucwang 2026

pub mod lambertian;
pub mod perfect_reflector;
pub mod perfect_refractor;
