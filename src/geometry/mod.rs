//! Coordinate mapping between source-image and canvas space
//!
//! A [`FitTransform`] letterboxes an image into the fixed canvas: one
//! uniform scale, centered on whichever axis has slack, aspect ratio
//! preserved exactly. It is computed once per loaded image from the
//! decoded natural dimensions and replaced wholesale when a new image
//! loads; a transform must never be reused across images.

use serde::Deserialize;

/// A point in source-image pixel space (or canvas space after projection)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Scale/offset mapping from source-image space into the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl FitTransform {
    /// Compute the letterbox mapping for an image into the canvas.
    ///
    /// The scaled image fits both axes and is centered on the slack axis.
    /// Upscaling is allowed when the image is smaller than the canvas;
    /// there is deliberately no `scale <= 1` clamp.
    pub fn compute(image_w: u32, image_h: u32, canvas_w: u32, canvas_h: u32) -> Self {
        let scale = (canvas_w as f64 / image_w as f64).min(canvas_h as f64 / image_h as f64);
        let scaled_w = image_w as f64 * scale;
        let scaled_h = image_h as f64 * scale;
        Self {
            scale,
            offset_x: (canvas_w as f64 - scaled_w) / 2.0,
            offset_y: (canvas_h as f64 - scaled_h) / 2.0,
        }
    }

    /// Project a source-space point into canvas space
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: p.x * self.scale + self.offset_x,
            y: p.y * self.scale + self.offset_y,
        }
    }
}

/// Geometry of a recognized text area.
///
/// The recognition service returns two shapes in practice: a multi-vertex
/// outline and a single-point marker. Neither is canonical, so both are
/// kept as distinct variants instead of coercing one into the other.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionShape {
    /// Polygon outline, vertex order as returned by the service
    Outline(Vec<Point>),
    /// Single-point marker
    Marker(Point),
}

impl RegionShape {
    /// Build from the service's vertex list. An empty list violates the
    /// contract and yields `None`.
    pub fn from_vertices(mut vertices: Vec<Point>) -> Option<Self> {
        match vertices.len() {
            0 => None,
            1 => Some(RegionShape::Marker(vertices.remove(0))),
            _ => Some(RegionShape::Outline(vertices)),
        }
    }
}

/// A recognized text area: its geometry plus the text the service read
/// there. The text is opaque to the geometry subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub text: String,
    pub shape: RegionShape,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_landscape_into_square_canvas() {
        // The worked example: 1920x1080 into 900x900
        let t = FitTransform::compute(1920, 1080, 900, 900);
        assert!((t.scale - 0.46875).abs() < EPS);
        assert!(t.offset_x.abs() < EPS);
        assert!((t.offset_y - 196.875).abs() < EPS);

        let top_left = t.apply(Point::new(0.0, 0.0));
        assert!(top_left.x.abs() < EPS);
        assert!((top_left.y - 196.875).abs() < EPS);

        let bottom_right = t.apply(Point::new(1920.0, 1080.0));
        assert!((bottom_right.x - 900.0).abs() < EPS);
        assert!((bottom_right.y - 703.125).abs() < EPS);
    }

    #[test]
    fn test_portrait_image_centers_horizontally() {
        let t = FitTransform::compute(500, 1000, 800, 400);
        assert!((t.scale - 0.4).abs() < EPS);
        assert!((t.offset_x - 300.0).abs() < EPS);
        assert!(t.offset_y.abs() < EPS);
    }

    #[test]
    fn test_small_image_is_upscaled() {
        let t = FitTransform::compute(100, 50, 900, 900);
        assert!((t.scale - 9.0).abs() < EPS);
        assert!(t.offset_x.abs() < EPS);
        assert!((t.offset_y - 225.0).abs() < EPS);
    }

    #[test]
    fn test_scaled_image_always_fits_canvas() {
        let cases = [
            (1920u32, 1080u32, 900u32, 900u32),
            (1, 1, 640, 480),
            (4096, 16, 100, 100),
            (16, 4096, 100, 100),
            (637, 911, 333, 777),
        ];
        for (iw, ih, cw, ch) in cases {
            let t = FitTransform::compute(iw, ih, cw, ch);
            assert!(t.scale > 0.0);
            let scaled_w = iw as f64 * t.scale;
            let scaled_h = ih as f64 * t.scale;
            assert!(scaled_w <= cw as f64 + EPS, "{iw}x{ih} into {cw}x{ch}");
            assert!(scaled_h <= ch as f64 + EPS, "{iw}x{ih} into {cw}x{ch}");
            // Aspect ratio preserved exactly
            assert!((scaled_w / scaled_h - iw as f64 / ih as f64).abs() < EPS);
        }
    }

    #[test]
    fn test_projected_corners_stay_in_bounds() {
        let cases = [
            (1920u32, 1080u32, 900u32, 900u32),
            (300, 300, 1000, 200),
            (7, 13, 640, 480),
        ];
        for (iw, ih, cw, ch) in cases {
            let t = FitTransform::compute(iw, ih, cw, ch);
            let corners = [
                Point::new(0.0, 0.0),
                Point::new(iw as f64, 0.0),
                Point::new(0.0, ih as f64),
                Point::new(iw as f64, ih as f64),
            ];
            for corner in corners {
                let p = t.apply(corner);
                assert!(p.x >= -EPS && p.x <= cw as f64 + EPS);
                assert!(p.y >= -EPS && p.y <= ch as f64 + EPS);
            }
        }
    }

    #[test]
    fn test_shape_from_vertices() {
        assert_eq!(RegionShape::from_vertices(vec![]), None);
        assert_eq!(
            RegionShape::from_vertices(vec![Point::new(3.0, 4.0)]),
            Some(RegionShape::Marker(Point::new(3.0, 4.0)))
        );
        let quad = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(0.0, 5.0),
        ];
        assert_eq!(
            RegionShape::from_vertices(quad.clone()),
            Some(RegionShape::Outline(quad))
        );
    }
}
