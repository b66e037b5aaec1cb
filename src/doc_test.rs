#![allow(clippy::float_cmp)]

use super::*;

fn style() -> StrokeStyle {
    StrokeStyle { color: "#112233".into(), width: 4.0 }
}

fn make_stroke(composite: CompositeOp) -> SceneObject {
    SceneObject::stroke(StrokePath {
        points: vec![Point::new(10.0, 10.0), Point::new(30.0, 20.0)],
        style: style(),
        composite,
    })
}

fn make_media(kind: ObjectKind) -> SceneObject {
    SceneObject::media(kind, 200, 100, Rect::new(0.0, 0.0, 200.0, 100.0))
}

fn kinds(doc: &DocStore) -> Vec<ObjectKind> {
    doc.objects().iter().map(|o| o.kind).collect()
}

// =============================================================
// ObjectKind / CompositeOp
// =============================================================

#[test]
fn only_images_and_videos_are_media() {
    assert!(!ObjectKind::Stroke.is_media());
    assert!(ObjectKind::Image.is_media());
    assert!(ObjectKind::Video.is_media());
}

#[test]
fn kind_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ObjectKind::Video).unwrap(), "\"video\"");
}

#[test]
fn composite_css_keywords() {
    assert_eq!(CompositeOp::SourceOver.as_css(), "source-over");
    assert_eq!(CompositeOp::DestinationOut.as_css(), "destination-out");
    assert_eq!(CompositeOp::default(), CompositeOp::SourceOver);
}

// =============================================================
// StrokePath / SceneObject
// =============================================================

#[test]
fn stroke_bounds_include_half_width() {
    let path = StrokePath { points: vec![Point::new(10.0, 10.0), Point::new(30.0, 20.0)], style: style(), composite: CompositeOp::SourceOver };
    assert_eq!(path.bounds(), Rect::new(8.0, 8.0, 24.0, 14.0));
}

#[test]
fn empty_stroke_bounds_are_zero() {
    let path = StrokePath { points: vec![], style: style(), composite: CompositeOp::SourceOver };
    assert_eq!(path.bounds(), Rect::default());
}

#[test]
fn stroke_objects_are_inert() {
    let s = make_stroke(CompositeOp::SourceOver);
    assert_eq!(s.kind, ObjectKind::Stroke);
    assert!(!s.selectable);
    assert!(!s.evented);
    assert_eq!(s.controls, Controls::NONE);
}

#[test]
fn media_objects_get_corner_handles_only() {
    let m = make_media(ObjectKind::Image);
    assert!(m.selectable);
    assert!(m.evented);
    assert_eq!(m.controls, Controls::CORNERS_ONLY);
    assert!(!m.controls.edges);
    assert!(!m.controls.rotate);
}

#[test]
fn set_interactive_never_enables_strokes() {
    let mut s = make_stroke(CompositeOp::SourceOver);
    s.set_interactive(true);
    assert!(!s.selectable);
    assert!(!s.evented);
}

#[test]
fn set_interactive_toggles_media() {
    let mut m = make_media(ObjectKind::Video);
    m.set_interactive(false);
    assert!(!m.selectable);
    assert_eq!(m.controls, Controls::NONE);
    m.set_interactive(true);
    assert!(m.selectable);
    assert_eq!(m.controls, Controls::CORNERS_ONLY);
}

#[test]
fn scale_is_display_over_natural() {
    let mut m = make_media(ObjectKind::Image);
    m.width = 100.0;
    m.height = 50.0;
    assert_eq!(m.scale(), 0.5);
}

// =============================================================
// FadeIn
// =============================================================

#[test]
fn fade_is_linear_and_clamped() {
    let fade = FadeIn { start_ms: 1000.0, duration_ms: 300.0 };
    assert_eq!(fade.opacity_at(900.0), 0.0);
    assert_eq!(fade.opacity_at(1000.0), 0.0);
    assert_eq!(fade.opacity_at(1150.0), 0.5);
    assert_eq!(fade.opacity_at(1300.0), 1.0);
    assert_eq!(fade.opacity_at(5000.0), 1.0);
    assert!(!fade.is_done(1299.0));
    assert!(fade.is_done(1300.0));
}

#[test]
fn zero_length_fade_is_immediately_opaque() {
    let fade = FadeIn { start_ms: 0.0, duration_ms: 0.0 };
    assert_eq!(fade.opacity_at(0.0), 1.0);
}

// =============================================================
// DocStore
// =============================================================

#[test]
fn insert_appends_on_top() {
    let mut doc = DocStore::new();
    doc.insert(make_media(ObjectKind::Image));
    doc.insert(make_stroke(CompositeOp::SourceOver));
    assert_eq!(kinds(&doc), vec![ObjectKind::Image, ObjectKind::Stroke]);
}

#[test]
fn insert_same_id_replaces_in_place() {
    let mut doc = DocStore::new();
    let mut m = make_media(ObjectKind::Image);
    doc.insert(m.clone());
    doc.insert(make_stroke(CompositeOp::SourceOver));
    m.x = 42.0;
    doc.insert(m.clone());
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.draw_index(&m.id), Some(0));
    assert_eq!(doc.get(&m.id).unwrap().x, 42.0);
}

#[test]
fn remove_returns_object() {
    let mut doc = DocStore::new();
    let m = make_media(ObjectKind::Video);
    let id = m.id;
    doc.insert(m);
    assert_eq!(doc.remove(&id).map(|o| o.kind), Some(ObjectKind::Video));
    assert!(doc.is_empty());
    assert!(doc.remove(&id).is_none());
}

#[test]
fn clear_drains_in_draw_order() {
    let mut doc = DocStore::new();
    doc.insert(make_stroke(CompositeOp::SourceOver));
    doc.insert(make_media(ObjectKind::Video));
    let drained = doc.clear();
    assert_eq!(drained.len(), 2);
    assert_eq!(drained[1].kind, ObjectKind::Video);
    assert!(doc.is_empty());
}

#[test]
fn raise_media_puts_every_media_after_every_stroke() {
    let mut doc = DocStore::new();
    let img = make_media(ObjectKind::Image);
    let vid = make_media(ObjectKind::Video);
    let s1 = make_stroke(CompositeOp::SourceOver);
    let s2 = make_stroke(CompositeOp::DestinationOut);
    let (img_id, vid_id, s1_id, s2_id) = (img.id, vid.id, s1.id, s2.id);
    doc.insert(img);
    doc.insert(s1);
    doc.insert(vid);
    doc.insert(s2);

    doc.raise_media_above_strokes();

    let order: Vec<_> = doc.objects().iter().map(|o| o.id).collect();
    assert_eq!(order, vec![s1_id, s2_id, img_id, vid_id]);
}

#[test]
fn set_interactive_applies_to_all() {
    let mut doc = DocStore::new();
    doc.insert(make_media(ObjectKind::Image));
    doc.insert(make_stroke(CompositeOp::SourceOver));
    doc.set_interactive(false);
    assert!(doc.objects().iter().all(|o| !o.selectable && !o.evented));
    doc.set_interactive(true);
    assert!(doc.objects()[0].selectable);
    assert!(!doc.objects()[1].selectable);
}

#[test]
fn mark_dirty_bumps_version() {
    let mut doc = DocStore::new();
    let m = make_media(ObjectKind::Video);
    let id = m.id;
    doc.insert(m);
    assert!(doc.mark_dirty(&id));
    assert!(doc.mark_dirty(&id));
    assert_eq!(doc.get(&id).unwrap().version, 2);
    assert!(!doc.mark_dirty(&Uuid::new_v4()));
}

#[test]
fn advance_fades_updates_and_retires() {
    let mut doc = DocStore::new();
    let mut m = make_media(ObjectKind::Image);
    m.opacity = 0.0;
    m.fade = Some(FadeIn { start_ms: 0.0, duration_ms: 300.0 });
    let id = m.id;
    doc.insert(m);

    assert!(doc.advance_fades(150.0));
    assert_eq!(doc.get(&id).unwrap().opacity, 0.5);
    assert!(doc.advance_fades(300.0));
    assert_eq!(doc.get(&id).unwrap().opacity, 1.0);
    assert!(doc.get(&id).unwrap().fade.is_none());
    assert!(!doc.advance_fades(400.0));
}
