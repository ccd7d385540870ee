use super::*;

#[test]
fn mul_div255_rounding_edges() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
}

#[test]
fn premultiply_zero_alpha_clears_color() {
    let mut px = vec![200u8, 100, 50, 0, 10, 20, 30, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0, 10, 20, 30, 255]);
}

#[test]
fn unpremultiply_inverts_half_alpha_within_rounding() {
    let mut px = vec![200u8, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    let back = unpremultiply_rgba8(&px);
    for (got, want) in back[..3].iter().zip([200u8, 100, 50]) {
        assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
    }
    assert_eq!(back[3], 128);
}

#[test]
fn flatten_alpha_0_returns_bg_and_255_is_identity() {
    let out = flatten_premul_over_bg_to_rgb8(&[0, 0, 0, 0, 1, 2, 3, 255], [10, 20, 30]);
    assert_eq!(out, vec![10, 20, 30, 1, 2, 3]);
}
