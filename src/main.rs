// Copyright 2020 TwoCookingMice

use financier::core::computation_node::ComputationNode;
use financier::core::error::RenderError;
use financier::core::irradiance_cache::IrradianceCache;
use financier::core::material::Material;
use financier::core::progress::IndicatifProgress;
use financier::core::scene::{Scene, SceneObject};
use financier::core::settings::{load_settings, IrradianceCacheSettings, RenderSettings};
use financier::core::shader::{Shader, ShaderOp};
use financier::emitters::uniform::UniformRadianceMap;
use financier::io::exr_utils;
use financier::lights::point::PointLight;
use financier::materials::lambertian::{LambertianBRDF, LambertianSPF};
use financier::materials::perfect_reflector::PerfectReflectorSPF;
use financier::materials::perfect_refractor::PerfectRefractorSPF;
use financier::math::constants::{Float, Vector3f};
use financier::math::spectrum::{RGBSpectrum, Spectrum};
use financier::renderers::rasterizer::RenderOrchestrator;
use financier::sensors::perspective::PerspectiveCamera;
use financier::shaders::direct_lighting::DirectLightingOp;
use financier::shaders::emission::EmissionOp;
use financier::shaders::final_gather::FinalGatherOp;
use financier::shaders::reflection::ReflectionOp;
use financier::shaders::refraction::RefractionOp;
use financier::shaders::standard::StandardShader;
use financier::shapes::rectangle::Rectangle;
use financier::shapes::sphere::Sphere;
use financier::textures::constant::ConstantTexture;

use std::env;
use std::sync::Arc;

struct Options {
    output_path: String,
    settings_path: Option<String>,
    threads: Option<usize>,
    spp: Option<u32>,
    max_depth: Option<u32>,
    seed: Option<u64>,
    width: usize,
    height: usize,
    irradiance_cache: bool,
}

fn parse_args(args: &[String]) -> Option<Options> {
    let output_path = args.get(1).filter(|a| !a.starts_with("--"))?.clone();
    let mut options = Options {
        output_path,
        settings_path: None,
        threads: None,
        spp: None,
        max_depth: None,
        seed: None,
        width: 320,
        height: 240,
        irradiance_cache: false,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--settings" => {
                i += 1;
                options.settings_path = args.get(i).cloned();
            }
            "--threads" => {
                i += 1;
                options.threads = args.get(i).and_then(|v| v.parse::<usize>().ok());
            }
            "--spp" => {
                i += 1;
                options.spp = args.get(i).and_then(|v| v.parse::<u32>().ok());
            }
            "--max-depth" => {
                i += 1;
                options.max_depth = args.get(i).and_then(|v| v.parse::<u32>().ok());
            }
            "--seed" => {
                i += 1;
                options.seed = args.get(i).and_then(|v| v.parse::<u64>().ok());
            }
            "--width" => {
                i += 1;
                options.width = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(options.width);
            }
            "--height" => {
                i += 1;
                options.height = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(options.height);
            }
            "--irradiance-cache" => options.irradiance_cache = true,
            other => log::warn!("Ignoring unknown argument {}.", other),
        }
        i += 1;
    }
    Some(options)
}

fn diffuse(albedo: RGBSpectrum) -> Material {
    let texture = Arc::new(ConstantTexture::new(albedo));
    Material::new()
        .with_bsdf(Arc::new(LambertianBRDF::new(texture.clone())))
        .with_spf(Arc::new(LambertianSPF::new(texture)))
}

fn demo_scene(options: &Options, settings: &RenderSettings) -> Scene {
    let mut scene = Scene::new();

    let floor = Rectangle::new(Vector3f::zeros(), Vector3f::new(8.0, 0.0, 0.0), Vector3f::new(0.0, 8.0, 0.0));
    scene.add_object(SceneObject::new(Arc::new(floor), Arc::new(diffuse(RGBSpectrum::new(0.6, 0.55, 0.5))))
        .with_name(String::from("floor")));

    let mirror = Material::new().with_spf(Arc::new(PerfectReflectorSPF::new(RGBSpectrum::gray(0.9))));
    scene.add_object(SceneObject::new(Arc::new(Sphere::new(Vector3f::new(-1.2, 0.5, 1.0), 1.0)), Arc::new(mirror))
        .with_name(String::from("mirror ball")));

    let glass = Material::new().with_spf(Arc::new(PerfectRefractorSPF::new(RGBSpectrum::gray(0.95), 1.5)));
    scene.add_object(SceneObject::new(Arc::new(Sphere::new(Vector3f::new(1.3, -0.6, 0.8), 0.8)), Arc::new(glass))
        .with_name(String::from("glass ball")));

    scene.add_light(Arc::new(
        PointLight::new(Vector3f::new(2.0, -3.0, 6.0), RGBSpectrum::gray(1.0), 60.0).with_attenuation(0.0, 1.0)));
    scene.set_global_radiance_map(Arc::new(UniformRadianceMap::new(RGBSpectrum::new(0.3, 0.4, 0.6))));

    let fov = (45.0 as Float).to_radians();
    scene.set_camera(Box::new(PerspectiveCamera::new(Vector3f::new(0.0, -7.0, 3.0),
                                                     Vector3f::new(0.0, 0.0, 0.8),
                                                     Vector3f::new(0.0, 0.0, 1.0),
                                                     fov, options.width, options.height, 0.0, 100.0)));

    if let Some(cache) = settings.irradiance_cache.as_ref() {
        scene.set_irradiance_cache(Arc::new(
            IrradianceCache::new(cache.size, cache.tolerance, cache.min_spacing, cache.max_spacing)));
    }
    scene
}

fn default_shader(settings: &RenderSettings) -> Arc<dyn Shader> {
    let mut ops: Vec<Arc<dyn ShaderOp>> = vec![
        Arc::new(EmissionOp::new()),
        Arc::new(DirectLightingOp::new()),
        Arc::new(ReflectionOp::new()),
        Arc::new(RefractionOp::new()),
    ];
    if settings.irradiance_cache.is_some() {
        ops.push(Arc::new(FinalGatherOp::new(settings.final_gather_theta, settings.final_gather_phi, true)));
    }
    let shader = StandardShader::new(ops).with_id("default_shader");
    log::info!("Default shader: {}.", shader.to_string());
    Arc::new(shader)
}

fn run(options: &Options) -> Result<(), RenderError> {
    let mut settings = match options.settings_path.as_ref() {
        Some(path) => load_settings(path)?,
        None => RenderSettings::default(),
    };
    if let Some(threads) = options.threads {
        settings.threads = threads;
    }
    if let Some(spp) = options.spp {
        settings.samples_per_pixel = spp.max(1);
    }
    if let Some(max_depth) = options.max_depth {
        settings.max_recursion = max_depth;
    }
    if let Some(seed) = options.seed {
        settings.seed = seed;
    }
    if options.irradiance_cache && settings.irradiance_cache.is_none() {
        settings.irradiance_cache = Some(IrradianceCacheSettings::default());
    }

    let scene = demo_scene(options, &settings);
    let progress = Arc::new(IndicatifProgress::new());
    let orchestrator = RenderOrchestrator::new(settings.clone(), default_shader(&settings))
        .with_progress(progress.clone());

    let output = orchestrator.render_with_stats(&scene);
    progress.finish();
    let output = output?;
    if output.aborted {
        log::warn!("Render was cancelled, unrendered tiles are black.");
    }
    log::info!("Shaded {} hits over {} rays, deepest recursion {}.",
               output.stats.shade_calls, output.stats.rays_cast, output.stats.deepest_depth);

    exr_utils::write_exr_to_file(&output.image, &options.output_path)
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Some(options) => options,
        None => {
            eprintln!("Usage: {} <output.exr> [--settings file.xml] [--threads N] [--spp N] [--max-depth N] \
                       [--seed N] [--width W] [--height H] [--irradiance-cache]", args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&options) {
        log::error!("Render failed: {}.", e);
        std::process::exit(2);
    }
}
