//! Clip masks applied before an action's geometry.

use std::fmt;

use crate::context::DrawContext;

/// Restricts where an action may paint.
pub trait Mask: fmt::Debug {
    /// Intersect the clip of `ctx` with the mask, in the action's local frame.
    fn clip(&self, ctx: &mut dyn DrawContext, width: f64, height: f64);
}

/// A circular mask; centre and radius are fractions of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMask {
    /// Centre as a fraction of `(width, height)`.
    pub centre: (f64, f64),
    /// Radius as a fraction of the shorter side.
    pub radius: f64,
}

impl Mask for CircleMask {
    fn clip(&self, ctx: &mut dyn DrawContext, width: f64, height: f64) {
        let r = self.radius * width.min(height);
        ctx.begin_path();
        ctx.arc(
            self.centre.0 * width,
            self.centre.1 * height,
            r,
            0.0,
            std::f64::consts::TAU,
            false,
        );
        ctx.clip();
    }
}

/// A rectangular mask in fractions of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectMask {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Mask for RectMask {
    fn clip(&self, ctx: &mut dyn DrawContext, width: f64, height: f64) {
        ctx.begin_path();
        ctx.rect(
            self.x * width,
            self.y * height,
            self.width * width,
            self.height * height,
        );
        ctx.clip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingCanvas;

    #[test]
    fn test_rect_mask_scales_to_frame() {
        let mut canvas = RecordingCanvas::new(200, 100);
        RectMask {
            x: 0.25,
            y: 0.5,
            width: 0.5,
            height: 0.25,
        }
        .clip(&mut canvas, 200.0, 100.0);
        assert_eq!(canvas.clip_rects(), vec![vec![[50.0, 50.0, 100.0, 25.0]]]);
    }
}
