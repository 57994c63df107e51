//! Row-segment partitioning for parallel rendering.
//!
//! The image is cut into contiguous bands of rows, one per worker. Bands are
//! fixed up front; a worker only ever writes the rows of its own band.

use crate::{Color, RenderConfig, Scene, ViewPlane};

/// Worker count used when the machine's parallelism cannot be queried.
pub const FALLBACK_WORKERS: usize = 4;

/// A contiguous band of image rows `[row_min, row_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSegment {
    pub row_min: u32,
    pub row_max: u32,
    /// Position of this segment in top-to-bottom order
    pub index: usize,
}

impl RowSegment {
    pub fn new(row_min: u32, row_max: u32, index: usize) -> Self {
        Self {
            row_min,
            row_max,
            index,
        }
    }

    /// Number of rows in this segment.
    pub fn row_count(&self) -> u32 {
        self.row_max - self.row_min
    }
}

/// Number of workers when none is configured.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_WORKERS)
}

/// Split `height` rows into one segment per worker.
///
/// The worker count is clamped to `1..=height`. Every segment gets
/// `height / workers` rows and the last one also takes the remainder.
pub fn partition_rows(height: u32, workers: usize) -> Vec<RowSegment> {
    if height == 0 {
        return Vec::new();
    }

    let workers = workers.clamp(1, height as usize) as u32;
    let rows_per_worker = height / workers;

    (0..workers)
        .map(|i| {
            let row_min = i * rows_per_worker;
            let row_max = if i + 1 == workers {
                height
            } else {
                row_min + rows_per_worker
            };
            RowSegment::new(row_min, row_max, i as usize)
        })
        .collect()
}

/// Render the rows of `segment` into `rows`, the segment's slice of the
/// row-major pixel buffer with `width` pixels per row.
pub fn render_segment(
    segment: &RowSegment,
    rows: &mut [Color],
    width: u32,
    plane: &ViewPlane,
    scene: &Scene,
    config: &RenderConfig,
) {
    if width == 0 {
        return;
    }

    for (offset, row) in rows.chunks_exact_mut(width as usize).enumerate() {
        let y = segment.row_min + offset as u32;
        for (x, pixel) in row.iter_mut().enumerate() {
            let ray = plane.primary_ray(x as u32, y);
            *pixel = scene.raycast(&ray, &ray, 0, config.max_depth);
        }
    }

    log::debug!(
        "Segment {} done: rows {}..{}",
        segment.index,
        segment.row_min,
        segment.row_max
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_even() {
        let segments = partition_rows(8, 4);
        assert_eq!(segments.len(), 4);
        assert!(segments.iter().all(|s| s.row_count() == 2));
    }

    #[test]
    fn test_partition_remainder_goes_last() {
        let segments = partition_rows(10, 3);
        let counts: Vec<u32> = segments.iter().map(|s| s.row_count()).collect();
        assert_eq!(counts, vec![3, 3, 4]);
    }

    #[test]
    fn test_partition_clamps_workers() {
        assert_eq!(partition_rows(3, 16).len(), 3);
        assert_eq!(partition_rows(5, 0), vec![RowSegment::new(0, 5, 0)]);
        assert!(partition_rows(0, 4).is_empty());
    }

    #[test]
    fn test_default_workers_positive() {
        assert!(default_workers() >= 1);
    }
}
