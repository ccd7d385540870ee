use super::*;

fn px(bytes: &[u8], w: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * w + x) * 4) as usize;
    [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]
}

fn solid_image(w: u32, h: u32, c: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(c.repeat((w * h) as usize)),
    }
}

#[test]
fn rejects_zero_and_oversized_surfaces() {
    assert!(Surface::new(0, 10).is_err());
    assert!(Surface::new(10, MAX_SURFACE_DIM + 1).is_err());
}

#[test]
fn clear_fills_every_pixel() {
    let mut s = Surface::new(4, 3).unwrap();
    s.clear(Rgba8::opaque(10, 20, 30)).unwrap();
    let out = s.finish().unwrap();
    assert_eq!(out.len(), 4 * 3 * 4);
    for c in out.chunks_exact(4) {
        assert_eq!(c, &[10, 20, 30, 255]);
    }
}

#[test]
fn stretched_image_covers_only_its_destination() {
    let mut s = Surface::new(8, 8).unwrap();
    s.clear(Rgba8::WHITE).unwrap();
    s.draw_image_stretched(&solid_image(2, 2, [255, 0, 0, 255]), Rect::new(2.0, 2.0, 6.0, 6.0))
        .unwrap();
    let out = s.finish().unwrap();
    assert_eq!(px(&out, 8, 4, 4), [255, 0, 0, 255]);
    assert_eq!(px(&out, 8, 0, 0), [255, 255, 255, 255]);
    assert_eq!(px(&out, 8, 7, 7), [255, 255, 255, 255]);
}

#[test]
fn draw_image_respects_clip() {
    let mut s = Surface::new(8, 8).unwrap();
    s.clear(Rgba8::BLACK).unwrap();
    let t = Affine::scale(4.0);
    s.draw_image(
        &solid_image(4, 4, [0, 0, 255, 255]),
        t,
        Rect::new(0.0, 0.0, 4.0, 8.0),
    )
    .unwrap();
    let out = s.finish().unwrap();
    assert_eq!(px(&out, 8, 1, 6), [0, 0, 255, 255]);
    assert_eq!(px(&out, 8, 6, 1), [0, 0, 0, 255]);
}

#[test]
fn mirrored_transform_flips_image_columns() {
    // Left column red, right column green.
    let mut bytes = Vec::new();
    for _ in 0..2 {
        bytes.extend_from_slice(&[255, 0, 0, 255, 0, 255, 0, 255]);
    }
    let img = PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(bytes),
    };
    let mut s = Surface::new(8, 8).unwrap();
    s.clear(Rgba8::BLACK).unwrap();
    let flip = Affine::translate((8.0, 0.0)) * Affine::scale_non_uniform(-1.0, 1.0);
    s.draw_image(&img, flip * Affine::scale(4.0), s.bounds()).unwrap();
    let out = s.finish().unwrap();
    assert_eq!(px(&out, 8, 0, 4), [0, 255, 0, 255]);
    assert_eq!(px(&out, 8, 7, 4), [255, 0, 0, 255]);
}

#[test]
fn horizontal_gradient_runs_from_start_to_end() {
    let mut s = Surface::new(64, 4).unwrap();
    s.fill_rect(
        s.bounds(),
        FillStyle::HorizontalGradient {
            start: Rgba8::opaque(0, 0, 0),
            end: Rgba8::opaque(255, 255, 255),
        },
    )
    .unwrap();
    let out = s.finish().unwrap();
    let left = px(&out, 64, 1, 2);
    let right = px(&out, 64, 62, 2);
    assert!(left[0] < 32, "{left:?}");
    assert!(right[0] > 223, "{right:?}");
    assert_eq!(left[3], 255);
}

#[test]
fn non_invertible_transform_is_rejected() {
    let mut s = Surface::new(4, 4).unwrap();
    let err = s
        .draw_image(&solid_image(1, 1, [0, 0, 0, 255]), Affine::scale(0.0), s.bounds())
        .unwrap_err();
    assert!(matches!(err, SnapframeError::InvalidDimension(_)));
}
