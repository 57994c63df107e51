//! Frame rendering.
//!
//! Implements Whitted-style ray tracing with:
//! - One primary ray per pixel through a pinhole camera
//! - Recursive mirror reflection with configurable depth
//! - Static row partitioning over a dedicated rayon pool

use std::path::Path;
use std::time::Instant;

use crate::segment::{default_workers, partition_rows, render_segment};
use crate::{Camera, Color, Scene};
use image::error::{ImageError, ParameterError, ParameterErrorKind};

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Worker threads; `None` uses the machine's available parallelism
    pub workers: Option<usize>,
    /// Maximum reflection depth
    pub max_depth: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            workers: None,
            max_depth: 5,
        }
    }
}

impl RenderConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a linear colour to 8-bit RGBA. No gamma is applied.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x)) as u8;
    let g = (255.0 * clamp_01(color.y)) as u8;
    let b = (255.0 * clamp_01(color.z)) as u8;
    [r, g, b, 255]
}

/// Row-major image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y), or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Set the pixel at (x, y). Writes outside the image are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.index(x, y);
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Write the image as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        let path = path.as_ref();
        let rgba = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba()).ok_or_else(|| {
            ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            ))
        })?;

        rgba.save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Image saved as {}", path.display());
        Ok(())
    }
}

/// Render `scene` as seen from `camera` into `image`.
///
/// Prepares the scene (transforms and tree), then renders one row segment
/// per worker on a dedicated thread pool. The result does not depend on the
/// worker count.
pub fn render(camera: &Camera, scene: &mut Scene, image: &mut ImageBuffer, config: &RenderConfig) {
    let start = Instant::now();
    scene.prepare();

    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        log::warn!("Nothing to render for a {}x{} image", width, height);
        return;
    }

    let pixel_count = width as usize * height as usize;
    if image.pixels.len() != pixel_count {
        log::warn!(
            "Image buffer holds {} pixels, expected {}; resizing",
            image.pixels.len(),
            pixel_count
        );
        image.pixels.resize(pixel_count, Color::ZERO);
    }

    let workers = config
        .workers
        .unwrap_or_else(default_workers)
        .clamp(1, height as usize);
    let segments = partition_rows(height, workers);
    let plane = camera.view_plane(width, height);
    let scene: &Scene = scene;

    // Hand each segment its own disjoint rows of the buffer
    let mut bands = Vec::with_capacity(segments.len());
    let mut rest: &mut [Color] = &mut image.pixels;
    for segment in &segments {
        let len = segment.row_count() as usize * width as usize;
        let (band, tail) = std::mem::take(&mut rest).split_at_mut(len);
        bands.push((*segment, band));
        rest = tail;
    }

    log::debug!("Rendering {} rows in {} segments", height, bands.len());

    match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("lumen-render-{i}"))
        .build()
    {
        Ok(pool) => pool.scope(|s| {
            for (segment, band) in bands {
                s.spawn(move |_| render_segment(&segment, band, width, &plane, scene, config));
            }
        }),
        Err(e) => {
            log::warn!("Failed to build render thread pool ({}), rendering on the calling thread", e);
            for (segment, band) in bands {
                render_segment(&segment, band, width, &plane, scene, config);
            }
        }
    }

    log::info!(
        "Rendered {}x{} with {} workers in {:.2?}",
        width,
        height,
        workers,
        start.elapsed()
    );
}
