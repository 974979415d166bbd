// Copyright @yucwang 2021

pub mod caster;
pub mod dispatcher;
pub mod rasterizer;
pub mod renderer;
pub mod sequence;
