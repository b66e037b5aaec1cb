use std::collections::HashMap;

use uuid::Uuid;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::CanvasConfig;
use crate::consts::MIN_OBJECT_SIZE;
use crate::doc::{CompositeOp, DocStore, FadeIn, ObjectId, ObjectKind, SceneObject, StrokePath, StrokeStyle};
use crate::error::CanvasError;
use crate::geom::{Point, Rect, Viewport};
use crate::hit::{self, Corner, HitPart};
use crate::ingest::{center_placement, fit_placement};
use crate::input::{Button, ContextMenu, InputState, Key, Tool, UiState, clamp_brush_size, parse_hex_color};
use crate::render;
use crate::video::{LiveBitmap, VideoSource};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Scene or overlay changed; schedule a redraw.
    RenderNeeded,
    /// The active tool changed.
    ToolChanged(Tool),
    /// Flip play/pause on the video bound to this object. Also issued once
    /// for a freshly placed video so it starts playing.
    ToggleVideo { id: ObjectId },
    /// The object left the scene; release anything bound to it.
    ObjectRemoved { id: ObjectId, kind: ObjectKind },
    /// Show the context menu at a canvas-space position.
    ShowContextMenu { at: Point },
    HideContextMenu,
    SetCursor(&'static str),
}

/// Core engine state: all logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: DocStore,
    pub ui: UiState,
    pub input: InputState,
    pub viewport: Viewport,
    pub config: CanvasConfig,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        let style = StrokeStyle {
            color: config.default_brush_color.clone(),
            width: f64::from(config.default_brush_size),
        };
        Self {
            doc: DocStore::new(),
            ui: UiState::new(style),
            input: InputState::Idle,
            viewport: Viewport::default(),
            config,
        }
    }

    // --- Viewport ---

    /// Track the drawing surface size.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport = Viewport::new(width.max(0.0), height.max(0.0));
        vec![Action::RenderNeeded]
    }

    // --- Tool state machine ---

    /// Enter `tool`, applying its entry rules even if it is already active.
    ///
    /// Drawing tools clear the selection and make every object inert. The
    /// selection tool makes media interactive with corner-only handles.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.ui.context_menu.take().is_some() {
            actions.push(Action::HideContextMenu);
        }
        self.input = InputState::Idle;
        self.ui.tool = tool;
        if tool.is_drawing() {
            self.ui.selected_id = None;
            self.doc.set_interactive(false);
        } else {
            self.ui.pointer = None;
            self.doc.set_interactive(true);
        }
        log::debug!("tool -> {}", tool.as_str());
        actions.push(Action::ToolChanged(tool));
        actions.push(Action::SetCursor(cursor_for_tool(tool)));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The context menu's only entry: switch to the selection tool.
    pub fn select_tool_from_menu(&mut self) -> Vec<Action> {
        self.set_tool(Tool::Select)
    }

    // --- Stroke style ---

    /// Set the color for future strokes. Invalid colors are rejected and the
    /// previous color kept.
    pub fn set_color(&mut self, color: &str) -> bool {
        if parse_hex_color(color).is_none() {
            log::warn!("ignoring invalid brush color {color:?}");
            return false;
        }
        self.ui.stroke_style.color = color.to_owned();
        true
    }

    /// Set the width for future strokes, clamped to the brush range.
    /// Returns the applied size.
    pub fn set_brush_size(&mut self, size: f64) -> u32 {
        let size = clamp_brush_size(size, self.config.min_brush_size, self.config.max_brush_size);
        self.ui.stroke_style.width = f64::from(size);
        size
    }

    /// Commit a finished freehand gesture as a stroke.
    ///
    /// The active style is stamped on the path. Erase strokes use
    /// destination-out and re-raise every media object above the strokes.
    /// Returns `None` for an empty gesture.
    pub fn commit_stroke(&mut self, points: Vec<Point>) -> Option<ObjectId> {
        if points.is_empty() {
            return None;
        }
        let erasing = self.ui.tool == Tool::Erase;
        let composite = if erasing { CompositeOp::DestinationOut } else { CompositeOp::SourceOver };
        let stroke = SceneObject::stroke(StrokePath { points, style: self.ui.stroke_style.clone(), composite });
        let id = stroke.id;
        self.doc.insert(stroke);
        if erasing {
            self.doc.raise_media_above_strokes();
        }
        Some(id)
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if self.ui.context_menu.take().is_some() {
            return vec![Action::HideContextMenu];
        }
        // The menu itself opens from `on_context_menu`, which the host calls
        // for the DOM `contextmenu` event and for a touch long press.
        if button != Button::Primary {
            return Vec::new();
        }

        if self.ui.tool.is_drawing() {
            self.ui.pointer = Some(pt);
            self.input = InputState::Drawing { points: vec![pt] };
            return vec![Action::RenderNeeded];
        }

        match hit::hit_test(pt, &self.doc, self.ui.selected_id) {
            Some(h) => {
                self.ui.selected_id = Some(h.object_id);
                self.input = match h.part {
                    HitPart::Body => InputState::DraggingObject { id: h.object_id, last: pt },
                    HitPart::Corner(corner) => self.begin_scale(h.object_id, corner),
                };
            }
            None => {
                self.ui.selected_id = None;
                self.input = InputState::Idle;
            }
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        if self.ui.tool.is_drawing() {
            self.ui.pointer = Some(pt);
            if let InputState::Drawing { points } = &mut self.input {
                if points.last() != Some(&pt) {
                    points.push(pt);
                }
            }
            return vec![Action::RenderNeeded];
        }

        match self.input.clone() {
            InputState::DraggingObject { id, last } => {
                if let Some(obj) = self.doc.get_mut(&id) {
                    obj.x += pt.x - last.x;
                    obj.y += pt.y - last.y;
                }
                self.input = InputState::DraggingObject { id, last: pt };
                vec![Action::RenderNeeded]
            }
            InputState::ScalingObject { id, corner, pivot, aspect } => {
                let bounds = scaled_bounds(corner, pivot, aspect, pt);
                if let Some(obj) = self.doc.get_mut(&id) {
                    obj.x = bounds.x;
                    obj.y = bounds.y;
                    obj.width = bounds.width;
                    obj.height = bounds.height;
                }
                vec![Action::RenderNeeded]
            }
            InputState::Idle | InputState::Drawing { .. } => vec![Action::SetCursor(self.hover_cursor(pt))],
        }
    }

    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Drawing { mut points } => {
                if points.last() != Some(&pt) {
                    points.push(pt);
                }
                self.commit_stroke(points);
                vec![Action::RenderNeeded]
            }
            InputState::DraggingObject { .. } | InputState::ScalingObject { .. } => vec![Action::RenderNeeded],
            InputState::Idle => Vec::new(),
        }
    }

    /// The pointer left the canvas: hide the brush preview.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if self.ui.pointer.take().is_some() {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Double-click / double-tap: toggles playback on a video in select mode.
    pub fn on_double_click(&mut self, pt: Point) -> Vec<Action> {
        if self.ui.tool != Tool::Select {
            return Vec::new();
        }
        let Some(h) = hit::hit_test(pt, &self.doc, self.ui.selected_id) else {
            return Vec::new();
        };
        match self.doc.get(&h.object_id) {
            Some(obj) if obj.kind == ObjectKind::Video => vec![Action::ToggleVideo { id: obj.id }],
            _ => Vec::new(),
        }
    }

    /// Right-click or long-press. This is the only way the menu opens; a
    /// secondary-button press on its own does nothing.
    pub fn on_context_menu(&mut self, pt: Point) -> Vec<Action> {
        self.input = InputState::Idle;
        self.ui.context_menu = Some(ContextMenu { at: pt });
        vec![Action::ShowContextMenu { at: pt }]
    }

    pub fn dismiss_context_menu(&mut self) -> Vec<Action> {
        if self.ui.context_menu.take().is_some() { vec![Action::HideContextMenu] } else { Vec::new() }
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        match key.0.as_str() {
            "Escape" => {
                let mut actions = self.dismiss_context_menu();
                if self.ui.selected_id.take().is_some() {
                    self.input = InputState::Idle;
                    actions.push(Action::RenderNeeded);
                }
                actions
            }
            "Delete" | "Backspace" => match self.ui.selected_id {
                Some(id) => self.remove_object(&id),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    // --- Media placement ---

    /// Place an ingested image at natural size, centered.
    pub fn place_image(&mut self, width: u32, height: u32, now_ms: f64) -> (ObjectId, Vec<Action>) {
        let bounds = center_placement(width, height, self.viewport);
        self.insert_media(ObjectKind::Image, width, height, bounds, now_ms)
    }

    /// Place a video scaled to fit the configured fraction of the viewport.
    pub fn place_video(&mut self, width: u32, height: u32, now_ms: f64) -> (ObjectId, Vec<Action>) {
        self.place_video_as(Uuid::new_v4(), width, height, now_ms)
    }

    /// Wrap `source` in a live bitmap, place it, and ask the host to start
    /// playback.
    ///
    /// The bitmap is built before the scene is touched, so a source with no
    /// frames or an uncapturable first frame leaves the tool, selection, and
    /// document exactly as they were.
    ///
    /// # Errors
    ///
    /// Whatever [`LiveBitmap::create`] reports.
    pub fn place_live_video<S: VideoSource, H>(
        &mut self,
        source: S,
        now_ms: f64,
    ) -> Result<(LiveBitmap<S, H>, Vec<Action>), CanvasError> {
        let (width, height) = source.dimensions();
        let id = Uuid::new_v4();
        let live = LiveBitmap::create(id, source, self.config.video_frame_interval_ms)?;
        let (_, mut actions) = self.place_video_as(id, width, height, now_ms);
        actions.push(Action::ToggleVideo { id });
        Ok((live, actions))
    }

    fn place_video_as(&mut self, id: ObjectId, width: u32, height: u32, now_ms: f64) -> (ObjectId, Vec<Action>) {
        let bounds = fit_placement(width, height, self.viewport, self.config.video_fit_ratio);
        let mut obj = SceneObject::media(ObjectKind::Video, width, height, bounds);
        obj.id = id;
        self.insert_object(obj, now_ms)
    }

    /// Insert a media object fading in from transparent, switch to the
    /// selection tool, and select it.
    pub fn insert_media(
        &mut self,
        kind: ObjectKind,
        natural_width: u32,
        natural_height: u32,
        bounds: Rect,
        now_ms: f64,
    ) -> (ObjectId, Vec<Action>) {
        self.insert_object(SceneObject::media(kind, natural_width, natural_height, bounds), now_ms)
    }

    fn insert_object(&mut self, mut obj: SceneObject, now_ms: f64) -> (ObjectId, Vec<Action>) {
        obj.opacity = 0.0;
        obj.fade = Some(FadeIn { start_ms: now_ms, duration_ms: self.config.fade_in_ms });
        let id = obj.id;
        self.doc.insert(obj);
        let actions = self.set_tool(Tool::Select);
        self.ui.selected_id = Some(id);
        (id, actions)
    }

    // --- Removal ---

    pub fn remove_object(&mut self, id: &ObjectId) -> Vec<Action> {
        let Some(obj) = self.doc.remove(id) else {
            return Vec::new();
        };
        if self.ui.selected_id == Some(*id) {
            self.ui.selected_id = None;
            self.input = InputState::Idle;
        }
        vec![Action::ObjectRemoved { id: obj.id, kind: obj.kind }, Action::RenderNeeded]
    }

    /// Remove every object.
    pub fn clear(&mut self) -> Vec<Action> {
        self.ui.selected_id = None;
        self.input = InputState::Idle;
        let mut actions: Vec<Action> =
            self.doc.clear().into_iter().map(|o| Action::ObjectRemoved { id: o.id, kind: o.kind }).collect();
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Animation ---

    /// Advance fades. Returns whether another frame is needed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.doc.advance_fades(now_ms)
    }

    /// Record that an object's bitmap changed.
    pub fn mark_dirty(&mut self, id: &ObjectId) -> bool {
        self.doc.mark_dirty(id)
    }

    // --- Queries ---

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.doc.get(id)
    }

    // --- Helpers ---

    fn begin_scale(&self, id: ObjectId, corner: Corner) -> InputState {
        let Some(obj) = self.doc.get(&id) else {
            return InputState::Idle;
        };
        let bounds = obj.bounds();
        let aspect = if bounds.height > 0.0 { bounds.width / bounds.height } else { 1.0 };
        InputState::ScalingObject { id, corner, pivot: corner.opposite().of(&bounds), aspect }
    }

    fn hover_cursor(&self, pt: Point) -> &'static str {
        if self.ui.tool.is_drawing() {
            return cursor_for_tool(self.ui.tool);
        }
        match hit::hit_test(pt, &self.doc, self.ui.selected_id).map(|h| h.part) {
            Some(HitPart::Corner(Corner::Nw | Corner::Se)) => "nwse-resize",
            Some(HitPart::Corner(Corner::Ne | Corner::Sw)) => "nesw-resize",
            Some(HitPart::Body) => "move",
            None => "default",
        }
    }
}

/// Cursor shown while a tool is idle. Drawing tools hide the system cursor
/// in favour of the brush-preview ring.
fn cursor_for_tool(tool: Tool) -> &'static str {
    if tool.is_drawing() { "none" } else { "default" }
}

/// Bounds of an object scaled uniformly about `pivot` so the dragged
/// `corner` follows `pt`. Never smaller than [`MIN_OBJECT_SIZE`] on either axis.
fn scaled_bounds(corner: Corner, pivot: Point, aspect: f64, pt: Point) -> Rect {
    let dx = (pt.x - pivot.x).abs();
    let dy = (pt.y - pivot.y).abs();
    let mut width = dx.max(dy * aspect);
    let mut height = width / aspect;
    let shortest = width.min(height);
    if shortest < MIN_OBJECT_SIZE {
        let grow = MIN_OBJECT_SIZE / shortest.max(f64::EPSILON);
        width *= grow;
        height *= grow;
    }
    let x = match corner {
        Corner::Ne | Corner::Se => pivot.x,
        Corner::Nw | Corner::Sw => pivot.x - width,
    };
    let y = match corner {
        Corner::Se | Corner::Sw => pivot.y,
        Corner::Nw | Corner::Ne => pivot.y - height,
    };
    Rect::new(x, y, width, height)
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas,
/// the cursor overlay, and the bitmaps media objects are drawn from.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    overlay: HtmlCanvasElement,
    overlay_ctx: CanvasRenderingContext2d,
    surfaces: HashMap<ObjectId, HtmlCanvasElement>,
    pub core: EngineCore,
}

impl Engine {
    /// Bind to the main canvas and its cursor overlay.
    ///
    /// # Errors
    ///
    /// Fails if either element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, overlay: HtmlCanvasElement, config: CanvasConfig) -> Result<Self, JsValue> {
        let ctx = render::context_2d(&canvas)?;
        let overlay_ctx = render::context_2d(&overlay)?;
        Ok(Self { canvas, ctx, overlay, overlay_ctx, surfaces: HashMap::new(), core: EngineCore::new(config) })
    }

    /// Resize both canvases to the viewport.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (w, h) = (width.max(0.0).round() as u32, height.max(0.0).round() as u32);
        for canvas in [&self.canvas, &self.overlay] {
            canvas.set_width(w);
            canvas.set_height(h);
        }
        self.core.set_viewport(width, height)
    }

    /// The top canvas; it receives pointer input and shows the cursor.
    #[must_use]
    pub fn overlay(&self) -> &HtmlCanvasElement {
        &self.overlay
    }

    /// Register the bitmap a media object is painted from.
    pub fn attach_surface(&mut self, id: ObjectId, surface: HtmlCanvasElement) {
        self.surfaces.insert(id, surface);
    }

    /// Forget a media object's bitmap.
    pub fn detach_surface(&mut self, id: &ObjectId) -> Option<HtmlCanvasElement> {
        self.surfaces.remove(id)
    }

    /// Draw the scene and the cursor overlay.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        render::draw(&self.ctx, &self.core.doc, &self.surfaces, &self.core.ui, self.core.viewport)?;
        let active = match &self.core.input {
            InputState::Drawing { points } => Some(points.as_slice()),
            _ => None,
        };
        render::draw_overlay(&self.overlay_ctx, &self.core.ui, active, self.core.viewport)
    }
}
