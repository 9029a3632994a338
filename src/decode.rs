//! Candidate decoding
//!
//! Turns validated bytes into pixels. Raster kinds go through the image
//! crate; SVG is rasterized at its natural size with resvg. Anything
//! unreadable is a decode failure, terminal for that candidate.

use image::DynamicImage;
use tracing::debug;

use crate::error::PipelineError;
use crate::validate::ImageKind;

/// Decode validated candidate bytes into an image
pub fn decode(content: &[u8], kind: ImageKind) -> Result<DynamicImage, PipelineError> {
    let image = match kind {
        ImageKind::Svg => rasterize_svg(content)?,
        _ => image::load_from_memory(content).map_err(|e| PipelineError::decode(e.to_string()))?,
    };

    debug!(
        "decoded {:?} image at {}x{}",
        kind,
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Rasterize an SVG at its natural size
fn rasterize_svg(content: &[u8]) -> Result<DynamicImage, PipelineError> {
    let options = resvg::usvg::Options::default();
    let tree = resvg::usvg::Tree::from_data(content, &options)
        .map_err(|e| PipelineError::decode(format!("invalid SVG: {e}")))?;

    let size = tree.size();
    let width = (size.width().ceil() as u32).max(1);
    let height = (size.height().ceil() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PipelineError::decode("SVG has invalid dimensions".to_string()))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    // resvg produces premultiplied alpha; the image crate expects straight alpha
    let mut rgba = pixmap.data().to_vec();
    for pixel in rgba.chunks_exact_mut(4) {
        let a = pixel[3] as f32 / 255.0;
        if a > 0.0 {
            pixel[0] = (pixel[0] as f32 / a).min(255.0) as u8;
            pixel[1] = (pixel[1] as f32 / a).min(255.0) as u8;
            pixel[2] = (pixel[2] as f32 / a).min(255.0) as u8;
        }
    }

    let buffer = image::RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        PipelineError::decode("failed to build image from rasterized SVG".to_string())
    })?;
    Ok(DynamicImage::ImageRgba8(buffer))
}
