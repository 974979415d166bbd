// Copyright @yucwang 2026

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::math::constants::Float;
use crate::renderers::sequence::TileOrder;

/// Deepest Hilbert curve accepted from a settings file.
pub const MAX_HILBERT_DEPTH: u32 = 16;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed xml: {0}")]
    Xml(String),
    #[error("{0}")]
    Parse(String),
    #[error("unknown setting '{0}'")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrradianceCacheSettings {
    pub size: Float,
    pub tolerance: Float,
    pub min_spacing: Float,
    pub max_spacing: Float,
}

impl Default for IrradianceCacheSettings {
    fn default() -> Self {
        Self { size: 100.0, tolerance: 0.1, min_spacing: 0.05, max_spacing: 2.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Worker threads, 0 picks the available parallelism.
    pub threads: usize,
    pub tile_width: usize,
    pub tile_height: usize,
    pub tile_order: TileOrder,
    pub precompute_tile_order: TileOrder,
    /// When set, tiles follow a Hilbert curve of this depth.
    pub hilbert_depth: Option<u32>,
    pub samples_per_pixel: u32,
    pub seed: u64,
    pub max_recursion: u32,
    pub min_importance: Float,
    pub show_luminaires: bool,
    pub use_ior_stack: bool,
    pub radiance_map_as_background: bool,
    pub final_gather_theta: u32,
    pub final_gather_phi: u32,
    pub irradiance_cache: Option<IrradianceCacheSettings>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            threads: 0,
            tile_width: 32,
            tile_height: 24,
            tile_order: TileOrder::TopLeft,
            precompute_tile_order: TileOrder::TopToBottom,
            hilbert_depth: None,
            samples_per_pixel: 1,
            seed: 0,
            max_recursion: 10,
            min_importance: 0.01,
            show_luminaires: true,
            use_ior_stack: true,
            radiance_map_as_background: true,
            final_gather_theta: 8,
            final_gather_phi: 16,
            irradiance_cache: None,
        }
    }
}

impl RenderSettings {
    pub fn thread_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<RenderSettings, SettingsError> {
    let path = path.as_ref();
    log::info!("Loading render settings from: {}.", path.display());
    let xml = fs::read_to_string(path)?;
    parse_settings(&xml)
}

/// Parses `<settings>` holding `<integer|float|boolean|string name=".." value=".."/>`
/// entries and an optional `<irradiance_cache .../>`.
pub fn parse_settings(xml: &str) -> Result<RenderSettings, SettingsError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut settings = RenderSettings::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                match e.name().as_ref() {
                    b"settings" => {}
                    b"integer" | b"float" | b"boolean" | b"string" => {
                        let (name, value) = name_value(&e)?;
                        apply_setting(&mut settings, &name, &value)?;
                    }
                    b"irradiance_cache" => {
                        let mut cache = IrradianceCacheSettings::default();
                        for attr in e.attributes().flatten() {
                            let value = attr.unescape_value().unwrap_or_default();
                            match attr.key.as_ref() {
                                b"size" => cache.size = parse_float(&value)?,
                                b"tolerance" => cache.tolerance = parse_float(&value)?,
                                b"min_spacing" => cache.min_spacing = parse_float(&value)?,
                                b"max_spacing" => cache.max_spacing = parse_float(&value)?,
                                _ => {}
                            }
                        }
                        settings.irradiance_cache = Some(cache);
                    }
                    other => {
                        return Err(SettingsError::Unknown(String::from_utf8_lossy(other).to_string()));
                    }
                }
            }
            Ok(_) => {}
            Err(e) => return Err(SettingsError::Xml(e.to_string())),
        }
        buf.clear();
    }

    Ok(settings)
}

fn name_value(e: &BytesStart) -> Result<(String, String), SettingsError> {
    let mut name: Option<String> = None;
    let mut value: Option<String> = None;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"name" => name = Some(attr.unescape_value().unwrap_or_default().to_string()),
            b"value" => value = Some(attr.unescape_value().unwrap_or_default().to_string()),
            _ => {}
        }
    }
    match (name, value) {
        (Some(n), Some(v)) => Ok((n, v)),
        _ => Err(SettingsError::Parse("setting needs both name and value".to_string())),
    }
}

fn apply_setting(settings: &mut RenderSettings, name: &str, value: &str) -> Result<(), SettingsError> {
    match name {
        "threads" => settings.threads = parse_usize(value)?,
        "tile_width" => settings.tile_width = parse_usize(value)?.max(1),
        "tile_height" => settings.tile_height = parse_usize(value)?.max(1),
        "tile_order" => settings.tile_order = parse_order(value)?,
        "precompute_tile_order" => settings.precompute_tile_order = parse_order(value)?,
        "hilbert_depth" => {
            let depth = parse_u32(value)?;
            if depth > MAX_HILBERT_DEPTH {
                return Err(SettingsError::Parse(
                    format!("hilbert_depth {} exceeds the maximum of {}", depth, MAX_HILBERT_DEPTH)));
            }
            settings.hilbert_depth = Some(depth);
        }
        "spp" | "samples_per_pixel" => settings.samples_per_pixel = parse_u32(value)?.max(1),
        "seed" => settings.seed = value.parse::<u64>()
            .map_err(|_| SettingsError::Parse(format!("invalid integer: {}", value)))?,
        "max_recursion" => settings.max_recursion = parse_u32(value)?,
        "min_importance" => settings.min_importance = parse_float(value)?,
        "show_luminaires" => settings.show_luminaires = parse_bool(value)?,
        "use_ior_stack" => settings.use_ior_stack = parse_bool(value)?,
        "radiance_map_as_background" => settings.radiance_map_as_background = parse_bool(value)?,
        "final_gather_theta" => settings.final_gather_theta = parse_u32(value)?.max(1),
        "final_gather_phi" => settings.final_gather_phi = parse_u32(value)?.max(1),
        _ => return Err(SettingsError::Unknown(name.to_string())),
    }
    Ok(())
}

fn parse_order(value: &str) -> Result<TileOrder, SettingsError> {
    TileOrder::from_name(value).ok_or_else(|| SettingsError::Parse(format!("invalid tile order: {}", value)))
}

fn parse_float(value: &str) -> Result<Float, SettingsError> {
    value.parse::<Float>().map_err(|_| SettingsError::Parse(format!("invalid float: {}", value)))
}

fn parse_u32(value: &str) -> Result<u32, SettingsError> {
    value.parse::<u32>().map_err(|_| SettingsError::Parse(format!("invalid integer: {}", value)))
}

fn parse_usize(value: &str) -> Result<usize, SettingsError> {
    value.parse::<usize>().map_err(|_| SettingsError::Parse(format!("invalid integer: {}", value)))
}

fn parse_bool(value: &str) -> Result<bool, SettingsError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(SettingsError::Parse(format!("invalid boolean: {}", value))),
    }
}
