//! Error type shared by ingest, the frame adapter, and the browser host.
//!
//! Every variant is recoverable: the caller logs it and abandons the single
//! operation that failed. Nothing here is allowed to take down the canvas.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The uploaded media could not be decoded or is not playable.
    #[error("failed to decode media: {0}")]
    Decode(String),
    /// The decoded image has a zero-sized axis.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// A drawing surface, buffer, or DOM handle could not be acquired.
    #[error("drawing surface unavailable: {0}")]
    ContextUnavailable(&'static str),
    /// The browser refused to start playback.
    #[error("playback failed: {0}")]
    Playback(String),
    /// Host-supplied configuration was malformed or out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<image::ImageError> for CanvasError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<CanvasError> for JsValue {
    fn from(err: CanvasError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Render a `JsValue` error for log lines and error payloads.
#[must_use]
pub fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
