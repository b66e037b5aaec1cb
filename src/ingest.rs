//! Media ingest: content-type dispatch, image validation and downsampling,
//! and placement of new media on the canvas.
//!
//! Decoding and resampling use the `image` crate so the same code path runs
//! natively under test and in the browser. Placement is pure math over the
//! current [`Viewport`].

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::error::CanvasError;
use crate::geom::{Rect, Viewport};

/// Which ingestion path an upload takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Route by declared MIME type. Anything that isn't `image/*` or
    /// `video/*` is ignored.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        let (top, sub) = essence.split_once('/')?;
        if sub.is_empty() {
            return None;
        }
        match top {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Decode an uploaded image and clamp it to `max_dimension`.
///
/// # Errors
///
/// [`CanvasError::Decode`] if the bytes are not a supported image format,
/// [`CanvasError::InvalidDimensions`] if either axis is empty.
pub fn prepare_image(bytes: &[u8], max_dimension: u32) -> Result<RgbaImage, CanvasError> {
    let decoded = image::load_from_memory(bytes)?;
    prepare_decoded(decoded, max_dimension)
}

/// Validate and clamp an already decoded image.
///
/// # Errors
///
/// [`CanvasError::InvalidDimensions`] if either axis is empty.
pub fn prepare_decoded(decoded: DynamicImage, max_dimension: u32) -> Result<RgbaImage, CanvasError> {
    let (width, height) = (decoded.width(), decoded.height());
    if width < 1 || height < 1 {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    let rgba = decoded.into_rgba8();
    let (target_w, target_h) = clamp_dimensions(width, height, max_dimension);
    if (target_w, target_h) == (width, height) {
        return Ok(rgba);
    }
    log::debug!("downsampling {width}x{height} image to {target_w}x{target_h}");
    Ok(imageops::resize(&rgba, target_w, target_h, FilterType::Lanczos3))
}

/// Scale `(width, height)` so the larger side is at most `max_dimension`,
/// preserving aspect ratio. Dimensions already within the cap are returned
/// unchanged.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let larger = width.max(height);
    if larger <= max_dimension || larger == 0 {
        return (width, height);
    }
    let scale = f64::from(max_dimension) / f64::from(larger);
    let shrink = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max_dimension);
    if width >= height { (max_dimension, shrink(height)) } else { (shrink(width), max_dimension) }
}

/// Bounds for an object shown at its natural size, centered in the viewport.
#[must_use]
pub fn center_placement(width: u32, height: u32, viewport: Viewport) -> Rect {
    let (w, h) = (f64::from(width), f64::from(height));
    let c = viewport.center();
    Rect::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
}

/// Bounds for an object uniformly scaled to fit within `ratio` of the
/// viewport on both axes, centered.
#[must_use]
pub fn fit_placement(width: u32, height: u32, viewport: Viewport, ratio: f64) -> Rect {
    let (w, h) = (f64::from(width), f64::from(height));
    let mut scale = (viewport.width * ratio / w).min(viewport.height * ratio / h);
    if !scale.is_finite() || scale <= 0.0 {
        scale = 1.0;
    }
    let (sw, sh) = (w * scale, h * scale);
    let c = viewport.center();
    Rect::new(c.x - sw / 2.0, c.y - sh / 2.0, sw, sh)
}
