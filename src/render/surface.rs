//! Drawing-surface adapter
//!
//! Owns the RGBA canvas that overlays land on. The canvas is the one
//! shared mutable resource in the pipeline: only [`CanvasSurface::draw`]
//! writes to it, and every write starts from the freshly-letterboxed base
//! image, so overlays never accumulate across renders and a partially
//! drawn frame is never observable.

use std::path::Path;

use anyhow::{Context, Result};
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use tracing::debug;

use crate::geometry::{FitTransform, Point, Region, RegionShape};
use crate::render::projected_path;

/// Region stroke color
const STROKE: Rgba<u8> = Rgba([255, 0, 0, 255]);
/// Letterbox bar fill
const BACKGROUND: Rgba<u8> = Rgba([248, 249, 250, 255]);
/// Half-extent of the cross drawn for a marker region, in pixels
const MARKER_RADIUS: f64 = 4.0;

/// Canvas holding the letterboxed base image plus the current overlay
pub struct CanvasSurface {
    canvas: RgbaImage,
    base: RgbaImage,
}

impl CanvasSurface {
    /// Letterbox a decoded image into a fresh canvas using `transform`.
    /// The transform must have been computed from this image's natural
    /// dimensions and this canvas size.
    pub fn new(
        image: &DynamicImage,
        transform: &FitTransform,
        canvas_w: u32,
        canvas_h: u32,
    ) -> Self {
        let scaled_w = ((image.width() as f64 * transform.scale).round() as u32).max(1);
        let scaled_h = ((image.height() as f64 * transform.scale).round() as u32).max(1);
        let scaled = image
            .resize_exact(scaled_w, scaled_h, imageops::FilterType::Triangle)
            .to_rgba8();

        let mut base = RgbaImage::from_pixel(canvas_w, canvas_h, BACKGROUND);
        imageops::overlay(
            &mut base,
            &scaled,
            transform.offset_x.round() as i64,
            transform.offset_y.round() as i64,
        );

        Self {
            canvas: base.clone(),
            base,
        }
    }

    /// Redraw the overlay: clear back to the base image, then stroke each
    /// region's closed path. Region order does not affect correctness.
    pub fn draw(&mut self, regions: &[Region], transform: &FitTransform) {
        self.canvas = self.base.clone();

        for region in regions {
            let path = projected_path(&region.shape, transform);
            match region.shape {
                RegionShape::Outline(_) => {
                    for pair in path.windows(2) {
                        stroke_segment(&mut self.canvas, pair[0], pair[1]);
                    }
                }
                RegionShape::Marker(_) => stroke_marker(&mut self.canvas, path[0]),
            }
        }

        debug!("overlay redrawn with {} regions", regions.len());
    }

    /// Rendered canvas pixels
    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Write the rendered canvas to disk (format from the extension)
    pub fn save(&self, path: &Path) -> Result<()> {
        self.canvas
            .save(path)
            .with_context(|| format!("Failed to write canvas to {:?}", path))
    }
}

/// Stroke one segment at 2 px weight
fn stroke_segment(canvas: &mut RgbaImage, a: Point, b: Point) {
    let (ax, ay) = (a.x as f32, a.y as f32);
    let (bx, by) = (b.x as f32, b.y as f32);
    draw_line_segment_mut(canvas, (ax, ay), (bx, by), STROKE);
    draw_line_segment_mut(canvas, (ax + 1.0, ay), (bx + 1.0, by), STROKE);
    draw_line_segment_mut(canvas, (ax, ay + 1.0), (bx, by + 1.0), STROKE);
}

/// Draw a marker region as a small cross centered on its point
fn stroke_marker(canvas: &mut RgbaImage, center: Point) {
    stroke_segment(
        canvas,
        Point::new(center.x - MARKER_RADIUS, center.y),
        Point::new(center.x + MARKER_RADIUS, center.y),
    );
    stroke_segment(
        canvas,
        Point::new(center.x, center.y - MARKER_RADIUS),
        Point::new(center.x, center.y + MARKER_RADIUS),
    );
}
