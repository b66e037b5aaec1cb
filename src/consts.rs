//! Shared numeric constants for the canvas crate.

// ── Media ingest ────────────────────────────────────────────────

/// Largest allowed image dimension in pixels; bigger uploads are downsampled.
pub const MAX_IMAGE_DIMENSION: u32 = 4096;

/// Fraction of the viewport a freshly placed video may occupy on each axis.
pub const VIDEO_FIT_RATIO: f64 = 0.8;

/// Duration of the opacity fade applied to newly placed media.
pub const FADE_IN_MS: f64 = 300.0;

// ── Frame refresh ───────────────────────────────────────────────

/// Target refresh rate for video-backed bitmaps.
pub const VIDEO_REFRESH_HZ: f64 = 60.0;

/// Minimum time between two bitmap swaps, in milliseconds.
pub const VIDEO_FRAME_INTERVAL_MS: f64 = 1000.0 / VIDEO_REFRESH_HZ;

// ── Redraw ──────────────────────────────────────────────────────

/// Batching window for debounced redraws.
pub const REDRAW_DEBOUNCE_MS: u32 = 5;

// ── Brush ───────────────────────────────────────────────────────

/// Smallest brush size the toolbar slider produces.
pub const MIN_BRUSH_SIZE: u32 = 1;

/// Largest brush size the toolbar slider produces.
pub const MAX_BRUSH_SIZE: u32 = 50;

/// Brush size on startup.
pub const DEFAULT_BRUSH_SIZE: u32 = 5;

/// Brush color on startup.
pub const DEFAULT_BRUSH_COLOR: &str = "#000000";

/// Fill alpha of the brush-preview ring.
pub const BRUSH_PREVIEW_FILL_ALPHA: f64 = 0.15;

/// Radius of the dot at the center of the brush preview, in pixels.
pub const BRUSH_PREVIEW_DOT_RADIUS: f64 = 1.5;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for corner handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Smallest width or height a media object can be scaled down to.
pub const MIN_OBJECT_SIZE: f64 = 16.0;

// ── Gestures ────────────────────────────────────────────────────

/// Hold time that turns a touch press into a context-menu request.
pub const LONG_PRESS_MS: u32 = 500;

/// Movement (screen pixels) that cancels a pending long press.
pub const LONG_PRESS_SLOP_PX: f64 = 6.0;
