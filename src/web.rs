//! Browser host: the `CanvasApp` export and everything that touches the DOM
//! outside of drawing.
//!
//! The page owns two stacked canvases (scene below, cursor overlay above)
//! and forwards DOM input to the matching `CanvasApp` method. Uploaded files
//! arrive through [`CanvasApp::upload`]. Everything the page needs to react
//! to comes back through the optional event callback as a JSON object (see
//! [`HostEvent`]).
//!
//! All state lives behind one `Rc<RefCell<AppInner>>`. Timer and
//! animation-frame callbacks hold a `Weak` to it and do nothing once the app
//! is gone. Every pending handle (`Timeout`, [`RafHandle`]) cancels itself on
//! drop, so dropping the state tears down every callback with it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::Once;

use gloo_timers::callback::Timeout;
use image::RgbaImage;
use js_sys::{Function, Promise, Uint8Array};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use wasm_bindgen_futures::{JsFuture, future_to_promise, spawn_local};
use web_sys::{CanvasRenderingContext2d, File, HtmlCanvasElement, HtmlVideoElement, ImageData, Url};

use crate::config::CanvasConfig;
use crate::consts::LONG_PRESS_SLOP_PX;
use crate::doc::ObjectId;
use crate::engine::{Action, Engine};
use crate::error::{CanvasError, describe_js};
use crate::events::HostEvent;
use crate::geom::Point;
use crate::ingest::{MediaKind, prepare_image};
use crate::input::{Button, Key, Tool};
use crate::redraw::RedrawScheduler;
use crate::render::context_2d;
use crate::video::{FrameOutcome, LiveBitmap, VideoSource};

type LiveVideo = LiveBitmap<HtmlVideoSource, RafHandle>;

static LOGGER: Once = Once::new();

fn init_logging() {
    LOGGER.call_once(|| {
        console_error_panic_hook::set_once();
        let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
        if console_log::init_with_level(level).is_err() {
            log::debug!("logger already installed");
        }
    });
}

fn window() -> Result<web_sys::Window, CanvasError> {
    web_sys::window().ok_or(CanvasError::ContextUnavailable("window"))
}

/// Milliseconds on the same clock `requestAnimationFrame` reports.
fn now_ms() -> f64 {
    web_sys::window().and_then(|w| w.performance()).map_or_else(js_sys::Date::now, |p| p.now())
}

fn create_canvas(width: u32, height: u32) -> Result<HtmlCanvasElement, CanvasError> {
    let document = window()?.document().ok_or(CanvasError::ContextUnavailable("document"))?;
    let canvas = document
        .create_element("canvas")
        .map_err(|_| CanvasError::ContextUnavailable("canvas element"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| CanvasError::ContextUnavailable("canvas element"))?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok(canvas)
}

fn canvas_context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, CanvasError> {
    context_2d(canvas).map_err(|_| CanvasError::ContextUnavailable("2d context"))
}

// =============================================================
// Animation frames
// =============================================================

/// A pending `requestAnimationFrame` callback. Dropping it cancels the
/// callback if it has not fired yet.
pub struct RafHandle {
    id: i32,
    _closure: Closure<dyn FnMut(f64)>,
}

impl Drop for RafHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.cancel_animation_frame(self.id) {
                log::warn!("cancelAnimationFrame failed: {}", describe_js(&e));
            }
        }
    }
}

fn request_frame(callback: impl FnOnce(f64) + 'static) -> Result<RafHandle, CanvasError> {
    let closure = Closure::once(callback);
    let id = window()?
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .map_err(|e| CanvasError::Playback(describe_js(&e)))?;
    Ok(RafHandle { id, _closure: closure })
}

// =============================================================
// Blob URLs and video sources
// =============================================================

/// An object URL that is revoked when dropped.
struct BlobUrl(String);

impl BlobUrl {
    fn for_file(file: &File) -> Result<Self, CanvasError> {
        Url::create_object_url_with_blob(file)
            .map(Self)
            .map_err(|e| CanvasError::Decode(describe_js(&e)))
    }
}

impl Drop for BlobUrl {
    fn drop(&mut self) {
        if let Err(e) = Url::revoke_object_url(&self.0) {
            log::warn!("failed to revoke {}: {}", self.0, describe_js(&e));
        }
    }
}

/// Off-screen canvas a video frame is copied into before it is swapped onto
/// the visible bitmap.
pub struct ScratchCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

/// A hidden, looping `<video>` element playing an uploaded file,
/// plus the canvas the scene draws it from.
pub struct HtmlVideoSource {
    video: HtmlVideoElement,
    url: Option<BlobUrl>,
    display: HtmlCanvasElement,
    display_ctx: CanvasRenderingContext2d,
}

impl HtmlVideoSource {
    /// Load `file` into a fresh video element and wait for its first frame.
    ///
    /// # Errors
    ///
    /// [`CanvasError::Decode`] if the browser cannot load the file.
    pub async fn load(file: &File) -> Result<Self, CanvasError> {
        let url = BlobUrl::for_file(file)?;
        let document = window()?.document().ok_or(CanvasError::ContextUnavailable("document"))?;
        let video = document
            .create_element("video")
            .map_err(|_| CanvasError::ContextUnavailable("video element"))?
            .dyn_into::<HtmlVideoElement>()
            .map_err(|_| CanvasError::ContextUnavailable("video element"))?;
        video.set_loop(true);
        video.set_preload("auto");
        video
            .set_attribute("playsinline", "")
            .map_err(|_| CanvasError::ContextUnavailable("video element"))?;

        let loaded = Promise::new(&mut |resolve, reject| {
            video.set_onloadeddata(Some(&resolve));
            video.set_onerror(Some(&reject));
        });
        video.set_src(&url.0);
        let result = JsFuture::from(loaded).await;
        video.set_onloadeddata(None);
        video.set_onerror(None);
        if let Err(e) = result {
            return Err(CanvasError::Decode(format!("video failed to load: {}", describe_js(&e))));
        }

        let display = create_canvas(video.video_width(), video.video_height())?;
        let display_ctx = canvas_context(&display)?;
        log::debug!("loaded video {}x{}", video.video_width(), video.video_height());
        Ok(Self { video, url: Some(url), display, display_ctx })
    }

    #[must_use]
    pub fn display(&self) -> &HtmlCanvasElement {
        &self.display
    }
}

impl VideoSource for HtmlVideoSource {
    type Buffer = ScratchCanvas;

    fn dimensions(&self) -> (u32, u32) {
        (self.video.video_width(), self.video.video_height())
    }

    fn play(&mut self) -> Result<(), CanvasError> {
        let promise = self.video.play().map_err(|e| CanvasError::Playback(describe_js(&e)))?;
        let video = self.video.clone();
        spawn_local(async move {
            let Err(e) = JsFuture::from(promise).await else {
                return;
            };
            log::warn!("autoplay rejected ({}), retrying muted", describe_js(&e));
            video.set_muted(true);
            match video.play() {
                Ok(retry) => {
                    if let Err(e) = JsFuture::from(retry).await {
                        log::warn!("muted playback failed: {}", describe_js(&e));
                    }
                }
                Err(e) => log::warn!("muted playback failed: {}", describe_js(&e)),
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.video.pause() {
            log::warn!("video pause failed: {}", describe_js(&e));
        }
    }

    fn volume(&self) -> f64 {
        self.video.volume()
    }

    fn set_volume(&mut self, volume: f64) {
        self.video.set_volume(volume);
    }

    fn muted(&self) -> bool {
        self.video.muted()
    }

    fn set_muted(&mut self, muted: bool) {
        self.video.set_muted(muted);
    }

    fn create_buffer(&self) -> Result<ScratchCanvas, CanvasError> {
        let (width, height) = self.dimensions();
        let canvas = create_canvas(width, height)?;
        let ctx = canvas_context(&canvas)?;
        Ok(ScratchCanvas { canvas, ctx })
    }

    fn copy_frame(&self, buffer: &mut ScratchCanvas) -> Result<(), CanvasError> {
        let (w, h) = (f64::from(buffer.canvas.width()), f64::from(buffer.canvas.height()));
        buffer.ctx.clear_rect(0.0, 0.0, w, h);
        buffer
            .ctx
            .draw_image_with_html_video_element_and_dw_and_dh(&self.video, 0.0, 0.0, w, h)
            .map_err(|e| CanvasError::Playback(describe_js(&e)))
    }

    fn present(&mut self, buffer: &ScratchCanvas) -> Result<(), CanvasError> {
        let (w, h) = (f64::from(self.display.width()), f64::from(self.display.height()));
        self.display_ctx.clear_rect(0.0, 0.0, w, h);
        self.display_ctx
            .draw_image_with_html_canvas_element(&buffer.canvas, 0.0, 0.0)
            .map_err(|e| CanvasError::Playback(describe_js(&e)))
    }

    fn release(&mut self) {
        let Some(url) = self.url.take() else {
            return;
        };
        self.pause();
        if let Err(e) = self.video.remove_attribute("src") {
            log::warn!("failed to detach video source: {}", describe_js(&e));
        }
        self.video.load();
        drop(url);
    }
}

impl Drop for HtmlVideoSource {
    fn drop(&mut self) {
        self.release();
    }
}

async fn read_bytes(file: &File) -> Result<Vec<u8>, CanvasError> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(|e| CanvasError::Decode(describe_js(&e)))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

/// Paint decoded pixels onto a canvas the scene can draw from.
fn image_surface(pixels: &RgbaImage) -> Result<HtmlCanvasElement, CanvasError> {
    let (width, height) = pixels.dimensions();
    let canvas = create_canvas(width, height)?;
    let ctx = canvas_context(&canvas)?;
    let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.as_raw().as_slice()), width, height)
        .map_err(|e| CanvasError::Decode(describe_js(&e)))?;
    ctx.put_image_data(&data, 0.0, 0.0).map_err(|e| CanvasError::Decode(describe_js(&e)))?;
    Ok(canvas)
}

// =============================================================
// App state
// =============================================================

/// Delivers [`HostEvent`]s to the page callback.
struct EventSink(Option<Function>);

impl EventSink {
    fn emit(&self, events: &[HostEvent]) {
        let Some(callback) = &self.0 else {
            return;
        };
        for event in events {
            let payload = match event.to_json() {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("failed to encode {event:?}: {e}");
                    continue;
                }
            };
            let value = js_sys::JSON::parse(&payload).unwrap_or_else(|_| JsValue::from_str(&payload));
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                log::warn!("event callback threw: {}", describe_js(&e));
            }
        }
    }
}

/// A touch hold that opens the context menu if the finger stays put.
struct LongPress {
    origin: Point,
    _timer: Timeout,
}

struct AppInner {
    this: Weak<RefCell<AppInner>>,
    engine: Engine,
    sink: Rc<EventSink>,
    videos: HashMap<ObjectId, LiveVideo>,
    redraw: RedrawScheduler<Timeout>,
    fade_frame: Option<RafHandle>,
    long_press: Option<LongPress>,
    destroyed: bool,
}

/// Run `f` against the app state, carry out the actions it returns, then
/// notify the page once the state is released again.
fn dispatch(inner: &RefCell<AppInner>, f: impl FnOnce(&mut AppInner) -> Vec<Action>) {
    let (sink, events) = {
        let Ok(mut app) = inner.try_borrow_mut() else {
            log::warn!("ignoring re-entrant canvas call");
            return;
        };
        if app.destroyed {
            return;
        }
        let actions = f(&mut app);
        let events = app.apply(actions);
        (Rc::clone(&app.sink), events)
    };
    sink.emit(&events);
}

/// Like [`dispatch`] but for callbacks holding a `Weak`.
fn dispatch_weak(weak: &Weak<RefCell<AppInner>>, f: impl FnOnce(&mut AppInner) -> Vec<Action>) {
    if let Some(inner) = weak.upgrade() {
        dispatch(&inner, f);
    }
}

impl AppInner {
    fn apply(&mut self, actions: Vec<Action>) -> Vec<HostEvent> {
        let mut events = Vec::new();
        for action in actions {
            match &action {
                Action::RenderNeeded => self.request_redraw(),
                Action::SetCursor(cursor) => self.set_cursor(cursor),
                Action::ToggleVideo { id } => {
                    if let Some(playing) = self.toggle_video(*id) {
                        events.push(HostEvent::VideoToggled { id: *id, playing });
                    }
                }
                Action::ObjectRemoved { id, .. } => {
                    if let Some(mut live) = self.videos.remove(id) {
                        live.dispose();
                    }
                    self.engine.detach_surface(id);
                }
                Action::ShowContextMenu { .. } => self.long_press = None,
                Action::ToolChanged(_) | Action::HideContextMenu => {}
            }
            events.extend(HostEvent::from_action(&action));
        }
        events
    }

    fn request_redraw(&mut self) {
        let weak = self.this.clone();
        let delay = self.engine.core.config.redraw_debounce_ms;
        self.redraw.request_redraw(move || {
            Timeout::new(delay, move || {
                if let Some(inner) = weak.upgrade() {
                    if let Ok(mut app) = inner.try_borrow_mut() {
                        if app.redraw.fire() {
                            app.paint();
                        }
                    }
                }
            })
        });
    }

    fn paint(&self) {
        if self.destroyed {
            return;
        }
        if let Err(e) = self.engine.render() {
            log::warn!("render failed: {}", describe_js(&e));
        }
    }

    fn set_cursor(&self, cursor: &str) {
        if let Err(e) = self.engine.overlay().style().set_property("cursor", cursor) {
            log::warn!("failed to set cursor: {}", describe_js(&e));
        }
    }

    // --- Fades ---

    fn ensure_fade_loop(&mut self) {
        if self.fade_frame.is_some() {
            return;
        }
        let weak = self.this.clone();
        match request_frame(move |now| dispatch_weak(&weak, |app| app.on_fade_frame(now))) {
            Ok(handle) => self.fade_frame = Some(handle),
            Err(e) => {
                log::warn!("fade animation unavailable: {e}");
                self.engine.core.tick(f64::INFINITY);
            }
        }
    }

    fn on_fade_frame(&mut self, now: f64) -> Vec<Action> {
        self.fade_frame = None;
        if self.engine.core.tick(now) {
            self.ensure_fade_loop();
        }
        vec![Action::RenderNeeded]
    }

    // --- Video ---

    fn toggle_video(&mut self, id: ObjectId) -> Option<bool> {
        let weak = self.this.clone();
        let live = self.videos.get_mut(&id)?;
        match live.toggle(move || schedule_video_frame(weak, id)) {
            Ok(playing) => {
                log::debug!("video {id} playing={playing}");
                Some(playing)
            }
            Err(e) => {
                log::warn!("failed to toggle video {id}: {e}");
                None
            }
        }
    }

    fn on_video_frame(&mut self, id: ObjectId, now: f64) -> Vec<Action> {
        let weak = self.this.clone();
        let Some(live) = self.videos.get_mut(&id) else {
            return Vec::new();
        };
        match live.on_frame(now, move || schedule_video_frame(weak, id)) {
            Ok(FrameOutcome::Swapped) => {
                self.engine.core.mark_dirty(&id);
                vec![Action::RenderNeeded]
            }
            Ok(FrameOutcome::Skipped | FrameOutcome::Stopped) => Vec::new(),
            Err(e) => {
                log::warn!("video {id} frame failed: {e}");
                Vec::new()
            }
        }
    }

    // --- Media placement ---

    fn place_image(&mut self, pixels: &RgbaImage, actions: &mut Vec<Action>) -> Result<ObjectId, CanvasError> {
        let surface = image_surface(pixels)?;
        let (id, placed) = self.engine.core.place_image(pixels.width(), pixels.height(), now_ms());
        actions.extend(placed);
        self.engine.attach_surface(id, surface);
        self.ensure_fade_loop();
        Ok(id)
    }

    /// Nothing in the scene changes unless the first frame is captured. On
    /// success the returned actions include a toggle that starts playback.
    fn place_video(&mut self, source: HtmlVideoSource, actions: &mut Vec<Action>) -> Result<ObjectId, CanvasError> {
        let display = source.display().clone();
        let (live, placed): (LiveVideo, _) = self.engine.core.place_live_video(source, now_ms())?;
        let id = live.id();
        self.engine.attach_surface(id, display);
        self.videos.insert(id, live);
        actions.extend(placed);
        self.ensure_fade_loop();
        Ok(id)
    }

    // --- Long press ---

    fn arm_long_press(&mut self, origin: Point) {
        let weak = self.this.clone();
        let timer = Timeout::new(self.engine.core.config.long_press_ms, move || {
            dispatch_weak(&weak, |app| {
                let Some(press) = app.long_press.take() else {
                    return Vec::new();
                };
                app.engine.core.on_context_menu(press.origin)
            });
        });
        self.long_press = Some(LongPress { origin, _timer: timer });
    }

    fn track_long_press(&mut self, pt: Point) {
        if self.long_press.as_ref().is_some_and(|p| p.origin.distance(pt) > LONG_PRESS_SLOP_PX) {
            self.long_press = None;
        }
    }

    // --- Teardown ---

    fn teardown(&mut self) {
        self.redraw.cancel();
        self.fade_frame = None;
        self.long_press = None;
        for (_, mut live) in self.videos.drain() {
            live.dispose();
        }
        for obj in self.engine.core.doc.clear() {
            self.engine.detach_surface(&obj.id);
        }
        self.destroyed = true;
        log::debug!("canvas torn down");
    }
}

fn schedule_video_frame(weak: Weak<RefCell<AppInner>>, id: ObjectId) -> Result<RafHandle, CanvasError> {
    request_frame(move |now| dispatch_weak(&weak, |app| app.on_video_frame(id, now)))
}

async fn ingest(weak: Weak<RefCell<AppInner>>, file: File) -> Result<Option<ObjectId>, CanvasError> {
    let content_type = file.type_();
    let Some(kind) = MediaKind::from_content_type(&content_type) else {
        log::debug!("ignoring upload of type {content_type:?}");
        return Ok(None);
    };

    // Decoding happens before the state is borrowed so input keeps flowing
    // while a large file is read.
    let mut placed = None;
    let mut failure = None;
    match kind {
        MediaKind::Image => {
            let bytes = read_bytes(&file).await?;
            let Some(inner) = weak.upgrade() else {
                return Ok(None);
            };
            let max = inner.borrow().engine.core.config.max_image_dimension;
            let pixels = prepare_image(&bytes, max)?;
            log::debug!("ingested image {}x{}", pixels.width(), pixels.height());
            dispatch(&inner, |app| {
                let mut actions = Vec::new();
                match app.place_image(&pixels, &mut actions) {
                    Ok(id) => placed = Some(id),
                    Err(e) => failure = Some(e),
                }
                actions
            });
        }
        MediaKind::Video => {
            let source = HtmlVideoSource::load(&file).await?;
            dispatch_weak(&weak, |app| {
                let mut actions = Vec::new();
                match app.place_video(source, &mut actions) {
                    Ok(id) => placed = Some(id),
                    Err(e) => failure = Some(e),
                }
                actions
            });
        }
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(placed),
    }
}

// =============================================================
// Exported API
// =============================================================

/// The canvas as seen from JavaScript.
#[wasm_bindgen]
pub struct CanvasApp {
    inner: Rc<RefCell<AppInner>>,
}

#[wasm_bindgen]
impl CanvasApp {
    /// Bind to the scene canvas and the overlay stacked above it.
    ///
    /// `config_json` overrides any subset of [`CanvasConfig`] fields.
    /// `on_event` receives every [`HostEvent`] as a plain object.
    ///
    /// # Errors
    ///
    /// Invalid configuration or canvases without a 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        overlay: HtmlCanvasElement,
        config_json: Option<String>,
        on_event: Option<Function>,
    ) -> Result<CanvasApp, JsValue> {
        init_logging();
        let config = match config_json.as_deref() {
            Some(raw) => CanvasConfig::from_json(raw)?,
            None => CanvasConfig::default(),
        };
        let width = f64::from(canvas.client_width());
        let height = f64::from(canvas.client_height());
        let mut engine = Engine::new(canvas, overlay, config)?;
        let initial = engine.set_viewport(width, height);

        let inner = Rc::new_cyclic(|this| {
            RefCell::new(AppInner {
                this: this.clone(),
                engine,
                sink: Rc::new(EventSink(on_event)),
                videos: HashMap::new(),
                redraw: RedrawScheduler::new(),
                fade_frame: None,
                long_press: None,
                destroyed: false,
            })
        });
        dispatch(&inner, |app| {
            let mut actions = initial;
            actions.extend(app.engine.core.set_tool(Tool::Paint));
            actions
        });
        log::info!("canvas ready at {width}x{height}");
        Ok(Self { inner })
    }

    /// Place an uploaded image or video. Resolves to the new object's id, or
    /// `undefined` for files that are neither.
    pub fn upload(&self, file: File) -> Promise {
        let weak = Rc::downgrade(&self.inner);
        future_to_promise(async move {
            match ingest(weak.clone(), file).await {
                Ok(Some(id)) => Ok(JsValue::from_str(&id.to_string())),
                Ok(None) => Ok(JsValue::UNDEFINED),
                Err(e) => {
                    log::warn!("upload failed: {e}");
                    let reason = e.to_string();
                    if let Some(inner) = weak.upgrade() {
                        let sink = Rc::clone(&inner.borrow().sink);
                        sink.emit(&[HostEvent::UploadFailed { reason }]);
                    }
                    Err(e.into())
                }
            }
        })
    }

    /// Switch tools by name (`paint`, `erase`, `select`). Unknown names are
    /// logged and ignored. Returns whether the tool changed.
    pub fn set_tool(&self, name: &str) -> bool {
        let Ok(tool) = name.parse::<Tool>() else {
            log::warn!("unknown tool {name:?}");
            return false;
        };
        dispatch(&self.inner, |app| app.engine.core.set_tool(tool));
        true
    }

    pub fn select_tool_from_menu(&self) {
        dispatch(&self.inner, |app| app.engine.core.select_tool_from_menu());
    }

    /// Set the brush color (`#rgb` or `#rrggbb`). Returns whether it was accepted.
    pub fn set_color(&self, color: &str) -> bool {
        let mut accepted = false;
        dispatch(&self.inner, |app| {
            accepted = app.engine.core.set_color(color);
            vec![Action::RenderNeeded]
        });
        accepted
    }

    /// Set the brush size. Returns the size actually applied.
    pub fn set_brush_size(&self, size: f64) -> u32 {
        let mut applied = 0;
        dispatch(&self.inner, |app| {
            applied = app.engine.core.set_brush_size(size);
            vec![Action::RenderNeeded]
        });
        applied
    }

    /// Remove every object and release every video.
    pub fn clear(&self) {
        dispatch(&self.inner, |app| app.engine.core.clear());
    }

    pub fn resize(&self, width: f64, height: f64) {
        dispatch(&self.inner, |app| app.engine.set_viewport(width, height));
    }

    /// `button` is `PointerEvent.button`; `pointer_type` is
    /// `PointerEvent.pointerType`. Touch holds open the context menu; a
    /// secondary-button press does not, see [`CanvasApp::context_menu`].
    pub fn pointer_down(&self, x: f64, y: f64, button: i16, pointer_type: &str) {
        let pt = Point::new(x, y);
        let button = Button::from_dom(button);
        dispatch(&self.inner, |app| {
            app.long_press = None;
            let actions = app.engine.core.on_pointer_down(pt, button);
            if button == Button::Primary && pointer_type == "touch" {
                app.arm_long_press(pt);
            }
            actions
        });
    }

    pub fn pointer_move(&self, x: f64, y: f64) {
        let pt = Point::new(x, y);
        dispatch(&self.inner, |app| {
            app.track_long_press(pt);
            app.engine.core.on_pointer_move(pt)
        });
    }

    pub fn pointer_up(&self, x: f64, y: f64) {
        let pt = Point::new(x, y);
        dispatch(&self.inner, |app| {
            app.long_press = None;
            app.engine.core.on_pointer_up(pt)
        });
    }

    pub fn pointer_leave(&self) {
        dispatch(&self.inner, |app| {
            app.long_press = None;
            app.engine.core.on_pointer_leave()
        });
    }

    pub fn double_click(&self, x: f64, y: f64) {
        dispatch(&self.inner, |app| app.engine.core.on_double_click(Point::new(x, y)));
    }

    /// Forward the DOM `contextmenu` event here. This is the only path that
    /// opens the menu for a mouse, so forwarding the matching `pointerdown`
    /// as well is harmless. The page should call `preventDefault` on it.
    pub fn context_menu(&self, x: f64, y: f64) {
        dispatch(&self.inner, |app| app.engine.core.on_context_menu(Point::new(x, y)));
    }

    pub fn key_down(&self, key: String) {
        dispatch(&self.inner, |app| app.engine.core.on_key_down(&Key(key)));
    }

    /// Set a video's volume, clamped to `[0, 1]`.
    pub fn set_video_volume(&self, id: &str, volume: f64) {
        let Some(id) = parse_id(id) else {
            return;
        };
        dispatch(&self.inner, |app| {
            if let Some(live) = app.videos.get_mut(&id) {
                live.set_volume(volume);
            }
            Vec::new()
        });
    }

    pub fn set_video_muted(&self, id: &str, muted: bool) {
        let Some(id) = parse_id(id) else {
            return;
        };
        dispatch(&self.inner, |app| {
            if let Some(live) = app.videos.get_mut(&id) {
                live.set_muted(muted);
            }
            Vec::new()
        });
    }

    /// Name of the active tool.
    #[must_use]
    pub fn tool(&self) -> String {
        self.inner.borrow().engine.core.tool().as_str().to_owned()
    }

    /// Stop every video, cancel every pending callback, and revoke every
    /// blob URL. The app ignores all calls afterwards.
    pub fn destroy(&self) {
        match self.inner.try_borrow_mut() {
            Ok(mut app) => app.teardown(),
            Err(_) => log::warn!("destroy called while the canvas is busy"),
        }
    }
}

fn parse_id(raw: &str) -> Option<ObjectId> {
    match raw.parse::<ObjectId>() {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("bad object id {raw:?}: {e}");
            None
        }
    }
}
