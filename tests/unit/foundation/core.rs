use super::*;

#[test]
fn hex_parse_short_and_long_forms() {
    assert_eq!(
        Rgba8::from_hex("#0c8596").unwrap(),
        Rgba8::opaque(0x0c, 0x85, 0x96)
    );
    assert_eq!(
        Rgba8::from_hex("A3216E80").unwrap(),
        Rgba8::new(0xa3, 0x21, 0x6e, 0x80)
    );
    assert!(Rgba8::from_hex("#fff").is_err());
    assert!(Rgba8::from_hex("#gg0000").is_err());
}

#[test]
fn serde_accepts_hex_and_arrays() {
    let c: Rgba8 = serde_json::from_str("\"#a3216e\"").unwrap();
    assert_eq!(c, Rgba8::opaque(0xa3, 0x21, 0x6e));

    let c: Rgba8 = serde_json::from_str("[1, 2, 3]").unwrap();
    assert_eq!(c, Rgba8::opaque(1, 2, 3));

    let c: Rgba8 = serde_json::from_str("[1, 2, 3, 4]").unwrap();
    assert_eq!(c, Rgba8::new(1, 2, 3, 4));

    assert!(serde_json::from_str::<Rgba8>("[1, 2]").is_err());
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#01020304\"");
}

#[test]
fn premultiply_rounds_to_nearest() {
    let p = Rgba8::new(100, 50, 200, 128).premultiplied();
    assert_eq!(
        p.to_array(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn lerp_endpoints() {
    let a = Rgba8::opaque(0, 100, 200);
    let b = Rgba8::opaque(200, 100, 0);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgba8::opaque(100, 100, 100));
}
