use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn wider_source_fits_height_first() {
    let g = fit_cover(1280.0, 720.0, 1080.0, 1920.0).unwrap();
    assert!(approx(g.draw_height, 1920.0));
    assert!(approx(g.draw_width, 1920.0 * 1280.0 / 720.0));
    assert!(approx(g.offset_y, 0.0));
    assert!(g.offset_x < 0.0);
    assert!(approx(g.offset_x, (1080.0 - g.draw_width) / 2.0));
}

#[test]
fn taller_source_fits_width_first() {
    let g = fit_cover(720.0, 1600.0, 1080.0, 1920.0).unwrap();
    assert!(approx(g.draw_width, 1080.0));
    assert!(approx(g.draw_height, 2400.0));
    assert!(approx(g.offset_x, 0.0));
    assert!(approx(g.offset_y, -240.0));
}

#[test]
fn equal_aspect_takes_taller_branch_without_crop() {
    let g = fit_cover(540.0, 960.0, 1080.0, 1920.0).unwrap();
    assert_eq!(
        g,
        FitGeometry {
            draw_width: 1080.0,
            draw_height: 1920.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    );
}

#[test]
fn cover_has_no_gap_across_aspect_grid() {
    let sizes = [1.0, 3.0, 7.5, 64.0, 720.0, 1280.0, 1920.0, 4096.0];
    for &sw in &sizes {
        for &sh in &sizes {
            for &(tw, th) in &[(1080.0, 1920.0), (1000.0, 1000.0), (1920.0, 1080.0), (3.0, 7.0)] {
                let g = fit_cover(sw, sh, tw, th).unwrap();
                assert!(g.covers(tw, th), "{sw}x{sh} into {tw}x{th}: {g:?}");
                assert!(
                    approx(g.draw_width / g.draw_height, sw / sh),
                    "aspect preserved"
                );
            }
        }
    }
}

#[test]
fn rejects_non_positive_and_non_finite_inputs() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            fit_cover(bad, 10.0, 10.0, 10.0),
            Err(SnapframeError::InvalidDimension(_))
        ));
        assert!(matches!(
            fit_cover(10.0, 10.0, 10.0, bad),
            Err(SnapframeError::InvalidDimension(_))
        ));
    }
}

#[test]
fn rejects_extreme_aspects_and_overflowing_results() {
    for (sw, sh, tw, th) in [
        (1e308, 1e-308, 10.0, 10.0),
        (1e-308, 1e308, 10.0, 10.0),
        (10.0, 10.0, 1e308, 1e-308),
        (2.0, 1.0, 1e308, 1e308),
    ] {
        assert!(
            matches!(
                fit_cover(sw, sh, tw, th),
                Err(SnapframeError::InvalidDimension(_))
            ),
            "{sw}x{sh} onto {tw}x{th}"
        );
    }
    assert!(fit_contain_rect(1e308, 1e-308, Rect::new(0.0, 0.0, 10.0, 10.0)).is_err());
}

#[test]
fn cover_rect_is_offset_by_target_origin() {
    let inset = Rect::new(40.0, 40.0, 1040.0, 1880.0);
    let r = fit_cover_rect(1280.0, 720.0, inset).unwrap();
    assert!(approx(r.y0, 40.0));
    assert!(approx(r.y1, 1880.0));
    assert!(approx((r.x0 + r.x1) / 2.0, 540.0));
}

#[test]
fn contain_rect_stays_inside_and_centered() {
    let region = Rect::new(440.0, 60.0, 640.0, 120.0);
    let r = fit_contain_rect(400.0, 400.0, region).unwrap();
    assert!(approx(r.width(), 60.0));
    assert!(approx(r.height(), 60.0));
    assert!(approx(r.center().x, region.center().x));
    assert!(approx(r.y0, 60.0));
}
