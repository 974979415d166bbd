// Copyright @yucwang 2026

pub mod lambertian;
pub mod uniform;
