// Copyright @yucwang 2026

use crate::core::settings::SettingsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("scene has no camera attached")]
    MissingCamera,
    #[error("render region {top},{left} -> {bottom},{right} lies outside a {width}x{height} image")]
    InvalidRegion {
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
        width: usize,
        height: usize,
    },
    #[error("a render worker panicked")]
    WorkerPanicked,
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("failed to write image {path}: {message}")]
    ImageWrite { path: String, message: String },
}
