use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_core::description::RenderDescription;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "BSP-accelerated ray tracer")]
pub struct Args {
    /// JSON scene description; renders the built-in demo scene when omitted
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Image width in pixels (overrides the scene)
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels (overrides the scene)
    #[arg(long)]
    pub height: Option<u32>,

    /// Maximum reflection depth (overrides the scene)
    #[arg(short, long)]
    pub reflections: Option<u32>,

    /// Worker threads; defaults to the available cores
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Disable the BSP tree and test every object for every ray
    #[arg(long)]
    pub no_bsp: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Logging level, overridden by RUST_LOG when set
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command line overrides to the scene's render settings.
    pub fn apply(&self, render: &mut RenderDescription) {
        if let Some(width) = self.width {
            render.width = width;
        }
        if let Some(height) = self.height {
            render.height = height;
        }
        if let Some(reflections) = self.reflections {
            render.reflections = reflections;
        }
        if let Some(threads) = self.threads {
            render.workers = Some(threads);
        }
        if self.no_bsp {
            render.use_bsp = false;
        }
    }
}
