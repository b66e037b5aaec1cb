#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_matches_constants() {
    let config = CanvasConfig::default();
    assert_eq!(config.max_image_dimension, 4096);
    assert_eq!(config.video_fit_ratio, 0.8);
    assert_eq!(config.fade_in_ms, 300.0);
    assert_eq!(config.redraw_debounce_ms, 5);
    assert_eq!(config.min_brush_size, 1);
    assert_eq!(config.max_brush_size, 50);
    assert!(config.validate().is_ok());
}

#[test]
fn empty_object_yields_defaults() {
    let config = CanvasConfig::from_json("{}").unwrap();
    assert_eq!(config, CanvasConfig::default());
}

#[test]
fn partial_override_keeps_other_defaults() {
    let config = CanvasConfig::from_json(r##"{"max_image_dimension": 2048, "default_brush_color": "#ff0000"}"##).unwrap();
    assert_eq!(config.max_image_dimension, 2048);
    assert_eq!(config.default_brush_color, "#ff0000");
    assert_eq!(config.video_fit_ratio, 0.8);
}

#[test]
fn malformed_json_is_config_error() {
    let err = CanvasConfig::from_json("{not json").unwrap_err();
    assert!(matches!(err, CanvasError::Config(_)));
}

#[test]
fn zero_fit_ratio_rejected() {
    let err = CanvasConfig::from_json(r#"{"video_fit_ratio": 0.0}"#).unwrap_err();
    assert!(err.to_string().contains("video_fit_ratio"));
}

#[test]
fn inverted_brush_range_rejected() {
    let err = CanvasConfig::from_json(r#"{"min_brush_size": 20, "max_brush_size": 10}"#).unwrap_err();
    assert!(matches!(err, CanvasError::Config(_)));
}

#[test]
fn default_brush_outside_range_rejected() {
    let err = CanvasConfig::from_json(r#"{"default_brush_size": 99}"#).unwrap_err();
    assert!(err.to_string().contains("default_brush_size"));
}

#[test]
fn bad_default_color_rejected() {
    let err = CanvasConfig::from_json(r##"{"default_brush_color": "red"}"##).unwrap_err();
    assert!(err.to_string().contains("default_brush_color"));
}
