//! Tunable canvas behavior, defaulting to the constants in [`crate::consts`].
//!
//! The host page may pass a JSON object to override any subset of fields.
//! Missing fields keep their defaults; values are checked by
//! [`CanvasConfig::validate`] before the engine accepts them.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BRUSH_COLOR, DEFAULT_BRUSH_SIZE, FADE_IN_MS, LONG_PRESS_MS, MAX_BRUSH_SIZE, MAX_IMAGE_DIMENSION,
    MIN_BRUSH_SIZE, REDRAW_DEBOUNCE_MS, VIDEO_FIT_RATIO, VIDEO_FRAME_INTERVAL_MS,
};
use crate::error::CanvasError;
use crate::input::parse_hex_color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Larger side of an ingested image is clamped to this many pixels.
    pub max_image_dimension: u32,
    /// Fraction of viewport width/height a new video may cover.
    pub video_fit_ratio: f64,
    /// Minimum spacing between video bitmap swaps.
    pub video_frame_interval_ms: f64,
    /// Opacity fade duration for newly placed media.
    pub fade_in_ms: f64,
    /// Debounce window for redraw requests.
    pub redraw_debounce_ms: u32,
    /// Touch hold time before a context menu opens.
    pub long_press_ms: u32,
    pub min_brush_size: u32,
    pub max_brush_size: u32,
    pub default_brush_size: u32,
    pub default_brush_color: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            max_image_dimension: MAX_IMAGE_DIMENSION,
            video_fit_ratio: VIDEO_FIT_RATIO,
            video_frame_interval_ms: VIDEO_FRAME_INTERVAL_MS,
            fade_in_ms: FADE_IN_MS,
            redraw_debounce_ms: REDRAW_DEBOUNCE_MS,
            long_press_ms: LONG_PRESS_MS,
            min_brush_size: MIN_BRUSH_SIZE,
            max_brush_size: MAX_BRUSH_SIZE,
            default_brush_size: DEFAULT_BRUSH_SIZE,
            default_brush_color: DEFAULT_BRUSH_COLOR.to_owned(),
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON override object and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] if the JSON is malformed or any value
    /// is out of range.
    pub fn from_json(raw: &str) -> Result<Self, CanvasError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| CanvasError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.max_image_dimension == 0 {
            return Err(CanvasError::Config("max_image_dimension must be positive".into()));
        }
        if !(self.video_fit_ratio > 0.0 && self.video_fit_ratio <= 1.0) {
            return Err(CanvasError::Config("video_fit_ratio must be in (0, 1]".into()));
        }
        if !(self.video_frame_interval_ms.is_finite() && self.video_frame_interval_ms >= 0.0) {
            return Err(CanvasError::Config("video_frame_interval_ms must be non-negative".into()));
        }
        if !(self.fade_in_ms.is_finite() && self.fade_in_ms >= 0.0) {
            return Err(CanvasError::Config("fade_in_ms must be non-negative".into()));
        }
        if self.min_brush_size == 0 || self.min_brush_size > self.max_brush_size {
            return Err(CanvasError::Config("brush size range is empty".into()));
        }
        if !(self.min_brush_size..=self.max_brush_size).contains(&self.default_brush_size) {
            return Err(CanvasError::Config("default_brush_size is outside the brush range".into()));
        }
        if parse_hex_color(&self.default_brush_color).is_none() {
            return Err(CanvasError::Config(format!(
                "default_brush_color {:?} is not a hex color",
                self.default_brush_color
            )));
        }
        Ok(())
    }
}
