//! Lumen command-line renderer
//!
//! Loads a JSON scene description (or the built-in demo scene), renders it
//! and writes the result as a PNG.

mod cli;
mod scene;

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use lumen_core::SceneDescription;
use lumen_math::Vec3;
use lumen_renderer::{Camera, ImageBuffer, RenderConfig};

use crate::cli::Args;
use crate::scene::{build_scene, DEMO_SCENE};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    log::info!("Starting Lumen");

    let (mut description, base_dir) = match &args.scene {
        Some(path) => {
            let description = SceneDescription::load(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (description, base_dir)
        }
        None => {
            log::info!("No scene given, rendering the demo scene");
            let description = SceneDescription::from_json_str(DEMO_SCENE)
                .context("Built-in demo scene is invalid")?;
            (description, PathBuf::new())
        }
    };
    args.apply(&mut description.render);

    let render = &description.render;
    ensure!(
        render.width > 0 && render.height > 0,
        "Image size must be positive, got {}x{}",
        render.width,
        render.height
    );

    let mut scene = build_scene(&description, &base_dir);
    let camera = Camera::new(Vec3::from_array(description.camera.position));
    let config = RenderConfig {
        workers: render.workers,
        max_depth: render.reflections,
    };

    let mut image = ImageBuffer::new(render.width, render.height);
    camera.render(&mut image, &mut scene, &config);

    image
        .save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
