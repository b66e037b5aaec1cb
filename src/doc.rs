//! Scene document: the objects on the canvas and their draw order.
//!
//! This module defines what a scene object is (`SceneObject`, tagged by
//! `ObjectKind`), the committed-stroke payload (`StrokePath`), per-object
//! interaction flags (`Controls`), the fade-in animation (`FadeIn`), and the
//! store that owns every live object in draw order (`DocStore`).
//!
//! Draw order is the order of the backing `Vec`: index 0 is painted first.
//! The renderer reads it through [`DocStore::objects`]. Media objects are
//! kept above strokes by [`DocStore::raise_media_above_strokes`], which the
//! engine calls after every erase commit so destination-out strokes never
//! cut holes in images or videos.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{Point, Rect};

/// Unique identifier for a scene object.
pub type ObjectId = Uuid;

/// The variant of a scene object, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Committed freehand path. Never selectable.
    Stroke,
    /// Static bitmap.
    Image,
    /// Bitmap kept in sync with a playing video.
    Video,
}

impl ObjectKind {
    /// Whether this object participates in selection and transform.
    #[must_use]
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

/// Pixel blending used when a stroke is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOp {
    /// Normal painting.
    #[default]
    SourceOver,
    /// Subtractive: clears whatever lies beneath the stroke.
    DestinationOut,
}

impl CompositeOp {
    /// The `globalCompositeOperation` keyword for this mode.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::DestinationOut => "destination-out",
        }
    }
}

/// Color and width applied to a stroke when it is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// `#rrggbb` or `#rgb` hex color.
    pub color: String,
    /// Line width in canvas pixels.
    pub width: f64,
}

/// A committed freehand path. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath {
    pub points: Vec<Point>,
    pub style: StrokeStyle,
    pub composite: CompositeOp,
}

impl StrokePath {
    /// Bounding box of the path, grown by half the line width.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::default();
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let pad = self.style.width / 2.0;
        Rect::new(min_x - pad, min_y - pad, max_x - min_x + 2.0 * pad, max_y - min_y + 2.0 * pad)
    }
}

/// Which transform handles an object shows while selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub corners: bool,
    pub edges: bool,
    pub rotate: bool,
}

impl Controls {
    /// No handles at all.
    pub const NONE: Self = Self { corners: false, edges: false, rotate: false };
    /// Corner handles only: uniform, aspect-preserving scale.
    pub const CORNERS_ONLY: Self = Self { corners: true, edges: false, rotate: false };
}

/// Linear opacity ramp from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeIn {
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl FadeIn {
    /// Opacity at `now_ms`, clamped to `[0, 1]`.
    #[must_use]
    pub fn opacity_at(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_done(&self, now_ms: f64) -> bool {
        self.opacity_at(now_ms) >= 1.0
    }
}

/// An object on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Left edge of the displayed bounds.
    pub x: f64,
    /// Top edge of the displayed bounds.
    pub y: f64,
    /// Displayed width (natural width times scale for media).
    pub width: f64,
    /// Displayed height (natural height times scale for media).
    pub height: f64,
    /// Pixel width of the backing bitmap. Zero for strokes.
    pub natural_width: f64,
    /// Pixel height of the backing bitmap. Zero for strokes.
    pub natural_height: f64,
    pub opacity: f64,
    /// Can be picked by the selection tool.
    pub selectable: bool,
    /// Receives pointer events (hit-testing, double-click).
    pub evented: bool,
    pub controls: Controls,
    pub fade: Option<FadeIn>,
    /// Bumped whenever the object's pixels change; the renderer treats a
    /// changed version as dirty.
    pub version: u64,
    /// Path payload, present only for [`ObjectKind::Stroke`].
    pub stroke: Option<StrokePath>,
}

impl SceneObject {
    /// Build a committed stroke. Strokes are never interactive.
    #[must_use]
    pub fn stroke(path: StrokePath) -> Self {
        let bounds = path.bounds();
        Self {
            id: Uuid::new_v4(),
            kind: ObjectKind::Stroke,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            natural_width: 0.0,
            natural_height: 0.0,
            opacity: 1.0,
            selectable: false,
            evented: false,
            controls: Controls::NONE,
            fade: None,
            version: 0,
            stroke: Some(path),
        }
    }

    /// Build an image or video object displayed at `bounds`.
    #[must_use]
    pub fn media(kind: ObjectKind, natural_width: u32, natural_height: u32, bounds: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            natural_width: f64::from(natural_width),
            natural_height: f64::from(natural_height),
            opacity: 1.0,
            selectable: true,
            evented: true,
            controls: Controls::CORNERS_ONLY,
            fade: None,
            version: 0,
            stroke: None,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Uniform display scale relative to the natural bitmap size.
    #[must_use]
    pub fn scale(&self) -> f64 {
        if self.natural_width > 0.0 { self.width / self.natural_width } else { 1.0 }
    }

    /// Set the interaction flags for the current tool. Strokes stay inert.
    pub fn set_interactive(&mut self, interactive: bool) {
        let on = interactive && self.kind.is_media();
        self.selectable = on;
        self.evented = on;
        self.controls = if on { Controls::CORNERS_ONLY } else { Controls::NONE };
    }
}

/// In-memory store of scene objects in draw order.
#[derive(Debug, Default)]
pub struct DocStore {
    objects: Vec<SceneObject>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: Vec::new() }
    }

    /// Append an object on top of the draw order, replacing any object with
    /// the same id in place.
    pub fn insert(&mut self, obj: SceneObject) {
        if let Some(existing) = self.get_mut(&obj.id) {
            *existing = obj;
        } else {
            self.objects.push(obj);
        }
    }

    /// Remove an object by id, returning it if it was present.
    pub fn remove(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| o.id == *id)?;
        Some(self.objects.remove(index))
    }

    /// Remove every object, returning them in draw order.
    pub fn clear(&mut self) -> Vec<SceneObject> {
        std::mem::take(&mut self.objects)
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == *id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == *id)
    }

    /// All objects, bottom first.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Position of an object in the draw order.
    #[must_use]
    pub fn draw_index(&self, id: &ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == *id)
    }

    /// Reorder so every media object is drawn after every stroke. The
    /// relative order inside each group is preserved.
    pub fn raise_media_above_strokes(&mut self) {
        let (strokes, media): (Vec<_>, Vec<_>) = self.objects.drain(..).partition(|o| !o.kind.is_media());
        self.objects = strokes;
        self.objects.extend(media);
    }

    /// Apply the interaction flags for the current tool to every object.
    pub fn set_interactive(&mut self, interactive: bool) {
        for obj in &mut self.objects {
            obj.set_interactive(interactive);
        }
    }

    /// Bump an object's version so the renderer repaints it. Returns false
    /// if the object doesn't exist.
    pub fn mark_dirty(&mut self, id: &ObjectId) -> bool {
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        obj.version += 1;
        true
    }

    /// Advance fade-in animations. Returns true while any fade changed an
    /// opacity, so the caller knows to keep redrawing.
    pub fn advance_fades(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        for obj in &mut self.objects {
            let Some(fade) = obj.fade else {
                continue;
            };
            obj.opacity = fade.opacity_at(now_ms);
            if fade.is_done(now_ms) {
                obj.fade = None;
            }
            changed = true;
        }
        changed
    }

    /// Number of objects currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store contains no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
