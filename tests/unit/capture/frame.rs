use super::*;

#[test]
fn valid_frame_passes() {
    RawFrame::new(2, 3, vec![0; 24], false).validate().unwrap();
}

#[test]
fn zero_dimension_is_invalid_frame() {
    let err = RawFrame::new(0, 3, vec![], false).validate().unwrap_err();
    assert!(matches!(err, SnapframeError::InvalidFrame(_)));
}

#[test]
fn short_buffer_is_invalid_frame() {
    let err = RawFrame::new(2, 2, vec![0; 15], false).validate().unwrap_err();
    assert!(err.to_string().contains("expected 16"));
}

#[test]
fn oversized_frame_is_invalid_frame() {
    let err = RawFrame::new(MAX_SURFACE_DIM + 1, 1, vec![], false)
        .validate()
        .unwrap_err();
    assert!(matches!(err, SnapframeError::InvalidFrame(_)));
}

#[test]
fn into_prepared_premultiplies() {
    let frame = RawFrame::new(1, 1, vec![200, 100, 50, 0], true);
    let img = frame.into_prepared().unwrap();
    assert_eq!(img.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn from_image_keeps_dimensions_and_flag() {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(5, 4));
    let frame = RawFrame::from_image(&img, true);
    assert_eq!((frame.width, frame.height), (5, 4));
    assert_eq!(frame.rgba8.len(), 80);
    assert!(frame.is_mirrored_source);
    assert_eq!(frame.rgba8[3], 255);
}
