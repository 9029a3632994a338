//! Overlay rendering
//!
//! Projecting recognized regions into canvas space is pure math and
//! tested on its own; the [`surface`] module owns the pixels and performs
//! the actual clear/stroke side effects.

pub mod surface;

pub use surface::CanvasSurface;

use crate::geometry::{FitTransform, Point, RegionShape};

/// Canvas-space stroke path for a region.
///
/// Outline paths are closed explicitly: the first projected vertex is
/// appended again at the end, so consumers can stroke consecutive pairs
/// without special-casing the closing segment. A marker projects to its
/// single point.
pub fn projected_path(shape: &RegionShape, transform: &FitTransform) -> Vec<Point> {
    match shape {
        RegionShape::Outline(vertices) => {
            let mut path: Vec<Point> = vertices.iter().map(|&v| transform.apply(v)).collect();
            if let Some(&first) = path.first() {
                path.push(first);
            }
            path
        }
        RegionShape::Marker(point) => vec![transform.apply(*point)],
    }
}
