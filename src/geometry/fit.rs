use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{SnapframeError, SnapframeResult};

/// Placement of a uniformly scaled source inside a target rectangle.
///
/// Offsets are relative to the target's origin and are `<= 0` on the cropped axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitGeometry {
    /// Scaled source width.
    pub draw_width: f64,
    /// Scaled source height.
    pub draw_height: f64,
    /// Horizontal offset of the scaled source.
    pub offset_x: f64,
    /// Vertical offset of the scaled source.
    pub offset_y: f64,
}

impl FitGeometry {
    /// Placed rectangle for a target whose top-left corner is `origin`.
    pub fn to_rect(self, origin: Point) -> Rect {
        let x0 = origin.x + self.offset_x;
        let y0 = origin.y + self.offset_y;
        Rect::new(x0, y0, x0 + self.draw_width, y0 + self.draw_height)
    }

    /// Whether the placement leaves no gap in a `target_width × target_height` rectangle.
    ///
    /// Tolerates float error of a thousandth of a pixel.
    pub fn covers(self, target_width: f64, target_height: f64) -> bool {
        const EPS: f64 = 1e-3;
        self.offset_x <= EPS
            && self.offset_y <= EPS
            && self.offset_x + self.draw_width >= target_width - EPS
            && self.offset_y + self.draw_height >= target_height - EPS
    }
}

/// Fit-to-cover: scale the source uniformly so it covers the target with no empty space,
/// cropping the excess on one axis, and center it.
///
/// When both aspects are equal the "taller" branch is taken, which yields the same result as
/// the wider branch (no crop).
pub fn fit_cover(
    source_width: f64,
    source_height: f64,
    target_width: f64,
    target_height: f64,
) -> SnapframeResult<FitGeometry> {
    check_dims(source_width, source_height, target_width, target_height)?;

    let source_aspect = aspect("source", source_width, source_height)?;
    let target_aspect = aspect("target", target_width, target_height)?;

    let geometry = if source_aspect > target_aspect {
        let draw_height = target_height;
        let draw_width = draw_height * source_aspect;
        FitGeometry {
            draw_width,
            draw_height,
            offset_x: (target_width - draw_width) / 2.0,
            offset_y: 0.0,
        }
    } else {
        let draw_width = target_width;
        let draw_height = draw_width / source_aspect;
        FitGeometry {
            draw_width,
            draw_height,
            offset_x: 0.0,
            offset_y: (target_height - draw_height) / 2.0,
        }
    };

    let FitGeometry {
        draw_width,
        draw_height,
        offset_x,
        offset_y,
    } = geometry;
    if ![draw_width, draw_height, offset_x, offset_y]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(SnapframeError::invalid_dimension(format!(
            "cover onto {target_width}x{target_height} overflows"
        )));
    }
    Ok(geometry)
}

/// [`fit_cover`] against a rectangle; the returned rectangle is the placed source.
pub fn fit_cover_rect(
    source_width: f64,
    source_height: f64,
    target: Rect,
) -> SnapframeResult<Rect> {
    let g = fit_cover(source_width, source_height, target.width(), target.height())?;
    Ok(g.to_rect(target.origin()))
}

/// Fit-to-contain: the largest uniform scale that keeps the whole source inside the target,
/// centered. Used for placing overlays inside fixed regions.
pub fn fit_contain_rect(
    source_width: f64,
    source_height: f64,
    target: Rect,
) -> SnapframeResult<Rect> {
    check_dims(source_width, source_height, target.width(), target.height())?;
    let s = (target.width() / source_width).min(target.height() / source_height);
    let w = source_width * s;
    let h = source_height * s;
    let x0 = target.x0 + (target.width() - w) / 2.0;
    let y0 = target.y0 + (target.height() - h) / 2.0;
    let placed = Rect::new(x0, y0, x0 + w, y0 + h);
    if !placed.is_finite() || placed.is_zero_area() {
        return Err(SnapframeError::invalid_dimension(format!(
            "contain of {source_width}x{source_height} into {target:?} is degenerate"
        )));
    }
    Ok(placed)
}

// Width over height, which must itself be finite and positive.
fn aspect(name: &str, width: f64, height: f64) -> SnapframeResult<f64> {
    let a = width / height;
    if !a.is_finite() || a <= 0.0 {
        return Err(SnapframeError::invalid_dimension(format!(
            "{name} aspect {width}/{height} is out of range"
        )));
    }
    Ok(a)
}

fn check_dims(
    source_width: f64,
    source_height: f64,
    target_width: f64,
    target_height: f64,
) -> SnapframeResult<()> {
    for (name, v) in [
        ("source width", source_width),
        ("source height", source_height),
        ("target width", target_width),
        ("target height", target_height),
    ] {
        if !v.is_finite() || v <= 0.0 {
            return Err(SnapframeError::invalid_dimension(format!(
                "{name} must be finite and > 0, got {v}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/fit.rs"]
mod tests;
