//! Input model: tools, pointer buttons, keys, and the gesture state machine.
//!
//! `Tool` is the user's chosen mode. `UiState` is everything the renderer
//! needs besides the document: the active tool, the selection, the stroke
//! style, the last pointer position for the brush preview, and the context
//! menu. `InputState` is the gesture in progress between pointer-down and
//! pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::str::FromStr;

use crate::doc::{ObjectId, StrokeStyle};
use crate::geom::Point;
use crate::hit::Corner;

/// Which tool is currently active. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Freehand painting (default).
    #[default]
    Paint,
    /// Freehand erasing with destination-out compositing.
    Erase,
    /// Select, move, and scale media objects.
    Select,
}

impl Tool {
    /// Whether this tool draws freehand strokes.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Paint | Self::Erase)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paint => "paint",
            Self::Erase => "erase",
            Self::Select => "select",
        }
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paint" | "brush" => Ok(Self::Paint),
            "erase" | "eraser" => Ok(Self::Erase),
            "select" | "selection" => Ok(Self::Select),
            other => Err(format!("unknown tool: {other}")),
        }
    }
}

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, pen, or single-finger touch.
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `PointerEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Open context menu, anchored where it was requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub at: Point,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    pub tool: Tool,
    pub selected_id: Option<ObjectId>,
    /// Style stamped onto the next committed stroke.
    pub stroke_style: StrokeStyle,
    /// Last canvas-space pointer position while painting or erasing.
    /// Drives the brush-preview ring; `None` hides it.
    pub pointer: Option<Point>,
    pub context_menu: Option<ContextMenu>,
}

impl UiState {
    #[must_use]
    pub fn new(stroke_style: StrokeStyle) -> Self {
        Self { tool: Tool::default(), selected_id: None, stroke_style, pointer: None, context_menu: None }
    }
}

/// The gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Collecting points for a freehand stroke.
    Drawing {
        /// Canvas-space points in the order they were received.
        points: Vec<Point>,
    },
    /// Moving a selected media object.
    DraggingObject {
        id: ObjectId,
        /// Pointer position at the previous event.
        last: Point,
    },
    /// Scaling a media object by one of its corner handles.
    ScalingObject {
        id: ObjectId,
        /// Corner being dragged; the opposite corner stays fixed.
        corner: Corner,
        /// The fixed corner.
        pivot: Point,
        /// Aspect ratio (width / height) to preserve.
        aspect: f64,
    },
}

/// Parse `#rgb` or `#rrggbb` into RGB components.
#[must_use]
pub fn parse_hex_color(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let Ok(value) = u32::from_str_radix(hex, 16) else {
        return None;
    };
    let rgb = match hex.len() {
        3 => ((value >> 8) & 0xf) * 0x11_0000 + ((value >> 4) & 0xf) * 0x1100 + (value & 0xf) * 0x11,
        6 => value,
        _ => return None,
    };
    let [_, r, g, b] = rgb.to_be_bytes();
    Some((r, g, b))
}

/// Clamp a slider value into the brush range and round to an integer step.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_brush_size(raw: f64, min: u32, max: u32) -> u32 {
    if !raw.is_finite() {
        return min;
    }
    raw.round().clamp(f64::from(min), f64::from(max)) as u32
}
