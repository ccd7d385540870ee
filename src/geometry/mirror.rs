use crate::foundation::core::{Affine, Rect};

/// Optional horizontal flip about the vertical center line of an axis rectangle.
///
/// Front-facing captures arrive mirrored; flipping at export restores the preview orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MirrorTransform {
    mirrored: bool,
    axis: Rect,
}

impl MirrorTransform {
    /// `axis` is the rectangle whose vertical center line is the flip axis.
    pub fn new(should_mirror: bool, axis: Rect) -> Self {
        Self {
            mirrored: should_mirror,
            axis,
        }
    }

    /// Identity transform.
    pub fn none() -> Self {
        Self::new(false, Rect::ZERO)
    }

    /// Whether the transform flips.
    pub fn is_mirrored(self) -> bool {
        self.mirrored
    }

    /// `x -> (x0 + x1) - x` when mirrored, identity otherwise.
    pub fn affine(self) -> Affine {
        if !self.mirrored {
            return Affine::IDENTITY;
        }
        Affine::translate((self.axis.x0 + self.axis.x1, 0.0)) * Affine::scale_non_uniform(-1.0, 1.0)
    }

    /// Full source-to-surface transform for a `source_width × source_height` image placed at
    /// `placed` (usually a fit-to-cover rectangle), flipped afterwards.
    ///
    /// The fit rectangle is centered on the axis, so cropping stays centered after the flip.
    pub fn placement(self, source_width: f64, source_height: f64, placed: Rect) -> Affine {
        let fit = Affine::translate((placed.x0, placed.y0))
            * Affine::scale_non_uniform(
                placed.width() / source_width,
                placed.height() / source_height,
            );
        self.affine() * fit
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mirror.rs"]
mod tests;
