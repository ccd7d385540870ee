use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(1, 1, [100, 50, 200, 128])).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_asset_sniffs_svg_and_rasterizes_at_intrinsic_size() {
    let svg = br##"
        <svg xmlns="http://www.w3.org/2000/svg" width="8" height="4">
            <rect width="8" height="4" fill="#ff0000"/>
        </svg>"##;
    let prepared = decode_asset(svg).unwrap();
    assert_eq!((prepared.width, prepared.height), (8, 4));
    assert_eq!(prepared.rgba8_premul.len(), 8 * 4 * 4);
    assert_eq!(&prepared.rgba8_premul[..4], &[255, 0, 0, 255]);
}

#[test]
fn decode_asset_routes_raster_bytes_to_image_decoder() {
    let prepared = decode_asset(&png_bytes(3, 2, [1, 2, 3, 255])).unwrap();
    assert_eq!((prepared.width, prepared.height), (3, 2));
}

#[test]
fn garbage_and_broken_svg_are_errors() {
    assert!(decode_asset(b"not an image").is_err());
    assert!(decode_asset(b"<svg").is_err());
    assert!(decode_asset(b"").is_err());
}
