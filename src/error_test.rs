use super::*;

#[test]
fn invalid_dimensions_message_names_both_axes() {
    let err = CanvasError::InvalidDimensions { width: 0, height: 12 };
    assert_eq!(err.to_string(), "invalid image dimensions 0x12");
}

#[test]
fn context_unavailable_message_names_surface() {
    let err = CanvasError::ContextUnavailable("scratch canvas");
    assert_eq!(err.to_string(), "drawing surface unavailable: scratch canvas");
}

#[test]
fn image_error_converts_to_decode() {
    let img_err = image::load_from_memory(b"definitely not an image").unwrap_err();
    let err = CanvasError::from(img_err);
    assert!(matches!(err, CanvasError::Decode(_)));
    assert!(err.to_string().starts_with("failed to decode media:"));
}
