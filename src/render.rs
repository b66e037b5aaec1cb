//! Rendering: draws the scene and the cursor overlay to 2D contexts.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of document and UI state and produces pixels.
//! It does not mutate any application state.
//!
//! Two canvases are stacked. The scene canvas holds committed strokes and
//! media in draw order. The overlay canvas holds transient feedback: the
//! stroke being drawn and the brush-preview ring. Keeping the in-progress
//! stroke off the scene canvas means an erase gesture only cuts pixels once
//! it is committed and media have been raised above it.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

use std::collections::HashMap;
use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{BRUSH_PREVIEW_DOT_RADIUS, BRUSH_PREVIEW_FILL_ALPHA, HANDLE_RADIUS_PX};
use crate::doc::{CompositeOp, DocStore, ObjectId, ObjectKind, SceneObject, StrokeStyle};
use crate::error::CanvasError;
use crate::geom::{Point, Viewport};
use crate::hit::Corner;
use crate::input::{Tool, UiState};

/// Outline color for the selection box and its handles.
const SELECTION_COLOR: &str = "#1E88E5";

/// Ring color for the eraser preview; the eraser has no paint color.
const ERASER_PREVIEW_COLOR: &str = "#555555";

/// Color of an erase gesture before it is committed.
const ERASE_TRAIL_COLOR: &str = "rgba(85, 85, 85, 0.35)";

/// Acquire the 2D context of a canvas element.
///
/// # Errors
///
/// Returns `Err` if the element has no 2D context.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or(CanvasError::ContextUnavailable("2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| CanvasError::ContextUnavailable("2d context").into())
}

/// Draw the full scene: objects in draw order, then the selection box.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    doc: &DocStore,
    surfaces: &HashMap<ObjectId, HtmlCanvasElement>,
    ui: &UiState,
    viewport: Viewport,
) -> Result<(), JsValue> {
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);

    for obj in doc.objects() {
        match obj.kind {
            ObjectKind::Stroke => {
                if let Some(path) = &obj.stroke {
                    draw_path(ctx, &path.points, &path.style.color, path.style.width, path.composite, obj.opacity)?;
                }
            }
            ObjectKind::Image | ObjectKind::Video => draw_bitmap(ctx, obj, surfaces.get(&obj.id))?,
        }
    }

    if let Some(sel) = ui.selected_id.and_then(|id| doc.get(&id)) {
        draw_selection(ctx, sel)?;
    }
    Ok(())
}

/// Draw transient feedback: the gesture in progress and the brush preview.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw_overlay(
    ctx: &CanvasRenderingContext2d,
    ui: &UiState,
    active_stroke: Option<&[Point]>,
    viewport: Viewport,
) -> Result<(), JsValue> {
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);

    if !ui.tool.is_drawing() {
        return Ok(());
    }
    if let Some(points) = active_stroke {
        let color = if ui.tool == Tool::Erase { ERASE_TRAIL_COLOR } else { ui.stroke_style.color.as_str() };
        draw_path(ctx, points, color, ui.stroke_style.width, CompositeOp::SourceOver, 1.0)?;
    }
    if let Some(at) = ui.pointer {
        draw_brush_preview(ctx, at, &ui.stroke_style, ui.tool == Tool::Erase)?;
    }
    Ok(())
}

// =============================================================
// Strokes
// =============================================================

fn draw_path(
    ctx: &CanvasRenderingContext2d,
    points: &[Point],
    color: &str,
    width: f64,
    composite: CompositeOp,
    opacity: f64,
) -> Result<(), JsValue> {
    let Some(first) = points.first() else {
        return Ok(());
    };
    ctx.save();
    ctx.set_global_composite_operation(composite.as_css())?;
    ctx.set_global_alpha(opacity);
    ctx.begin_path();
    if points.len() == 1 {
        // A tap leaves a round dot the size of the brush.
        ctx.set_fill_style_str(color);
        ctx.arc(first.x, first.y, width / 2.0, 0.0, TAU)?;
        ctx.fill();
    } else {
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(width);
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        ctx.move_to(first.x, first.y);
        for p in &points[1..] {
            ctx.line_to(p.x, p.y);
        }
        ctx.stroke();
    }
    ctx.restore();
    Ok(())
}

// =============================================================
// Media
// =============================================================

fn draw_bitmap(
    ctx: &CanvasRenderingContext2d,
    obj: &SceneObject,
    surface: Option<&HtmlCanvasElement>,
) -> Result<(), JsValue> {
    let Some(surface) = surface else {
        log::debug!("no bitmap attached to {:?} {}", obj.kind, obj.id);
        return Ok(());
    };
    ctx.save();
    ctx.set_global_alpha(obj.opacity);
    ctx.draw_image_with_html_canvas_element_and_dw_and_dh(surface, obj.x, obj.y, obj.width, obj.height)?;
    ctx.restore();
    Ok(())
}

fn draw_selection(ctx: &CanvasRenderingContext2d, obj: &SceneObject) -> Result<(), JsValue> {
    let bounds = obj.bounds();
    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(bounds.x, bounds.y, bounds.width, bounds.height);

    if obj.controls.corners {
        let size = HANDLE_RADIUS_PX;
        ctx.set_fill_style_str("#FFFFFF");
        for corner in Corner::ALL {
            let c = corner.of(&bounds);
            ctx.fill_rect(c.x - size / 2.0, c.y - size / 2.0, size, size);
            ctx.stroke_rect(c.x - size / 2.0, c.y - size / 2.0, size, size);
        }
    }
    ctx.restore();
    Ok(())
}

// =============================================================
// Brush preview
// =============================================================

/// Outer ring, translucent fill, and center dot. The eraser adds a cross.
fn draw_brush_preview(
    ctx: &CanvasRenderingContext2d,
    at: Point,
    style: &StrokeStyle,
    eraser: bool,
) -> Result<(), JsValue> {
    let radius = (style.width / 2.0).max(1.0);
    let color = if eraser { ERASER_PREVIEW_COLOR } else { style.color.as_str() };

    ctx.save();
    ctx.begin_path();
    ctx.arc(at.x, at.y, radius, 0.0, TAU)?;
    ctx.set_global_alpha(BRUSH_PREVIEW_FILL_ALPHA);
    ctx.set_fill_style_str(color);
    ctx.fill();
    ctx.set_global_alpha(1.0);
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(1.0);
    ctx.stroke();

    ctx.begin_path();
    ctx.arc(at.x, at.y, BRUSH_PREVIEW_DOT_RADIUS, 0.0, TAU)?;
    ctx.fill();

    if eraser {
        let arm = radius * 0.5;
        ctx.begin_path();
        ctx.move_to(at.x - arm, at.y);
        ctx.line_to(at.x + arm, at.y);
        ctx.move_to(at.x, at.y - arm);
        ctx.line_to(at.x, at.y + arm);
        ctx.stroke();
    }
    ctx.restore();
    Ok(())
}
