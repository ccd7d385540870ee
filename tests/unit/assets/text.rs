use super::*;

const WHITE: TextBrushRgba8 = TextBrushRgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

#[test]
fn brush_from_color_keeps_channels() {
    let b = TextBrushRgba8::from(Rgba8::new(1, 2, 3, 4));
    assert_eq!((b.r, b.g, b.b, b.a), (1, 2, 3, 4));
}

#[test]
fn missing_font_file_is_an_error() {
    let err = FontLibrary::from_file(Path::new("definitely/not/here.ttf")).unwrap_err();
    assert!(err.to_string().contains("not/here.ttf"));
}

#[test]
fn layout_smoke_with_system_font_if_present() {
    let Some(lib) = FontLibrary::load(None) else {
        return;
    };
    let Some(face) = lib.face(400) else {
        return;
    };

    let mut engine = TextLayoutEngine::new();
    let layout = engine.layout_line("Community", &face, 24.0, WHITE).unwrap();
    assert!(layout.lines().next().is_some());
    assert!(layout.width() > 0.0);

    // Same face registers once.
    engine.layout_line("again", &face, 12.0, WHITE).unwrap();
    assert_eq!(engine.families.len(), 1);
}

#[test]
fn rejects_non_positive_size() {
    let Some(face) = FontLibrary::load(None).and_then(|l| l.face(400)) else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    assert!(engine.layout_line("x", &face, 0.0, WHITE).is_err());
}

#[test]
fn repeated_face_lookups_share_bytes() {
    let Some(lib) = FontLibrary::load(None) else {
        return;
    };
    let (Some(a), Some(b)) = (lib.face(700), lib.face(700)) else {
        return;
    };
    assert!(Arc::ptr_eq(&a.data, &b.data));
    assert_eq!(a.index, b.index);
}
