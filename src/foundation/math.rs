pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u16(u16::from(px[0]), a) as u8;
        px[1] = mul_div255_u16(u16::from(px[1]), a) as u8;
        px[2] = mul_div255_u16(u16::from(px[2]), a) as u8;
    }
}

/// Undo premultiplication into straight RGBA8. Fully transparent pixels become `[0, 0, 0, 0]`.
pub(crate) fn unpremultiply_rgba8(src_premul: &[u8]) -> Vec<u8> {
    let mut out = src_premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        match a {
            0 => px.fill(0),
            255 => {}
            _ => {
                for c in &mut px[..3] {
                    *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
    }
    out
}

/// Flatten premultiplied RGBA8 over an opaque background into packed RGB8.
pub(crate) fn flatten_premul_over_bg_to_rgb8(src_premul: &[u8], bg_rgb: [u8; 3]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src_premul.len() / 4 * 3);
    let bg = bg_rgb.map(u16::from);
    for s in src_premul.chunks_exact(4) {
        let a = u16::from(s[3]);
        if a == 255 {
            out.extend_from_slice(&s[..3]);
            continue;
        }
        let inv = 255u16 - a;
        for (c, bgc) in s[..3].iter().zip(bg) {
            let v = u16::from(*c) + mul_div255_u16(bgc, inv);
            out.push(v.min(255) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
