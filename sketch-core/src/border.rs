//! Border clip shapes applied at the start of every tick.

use std::f64::consts::TAU;
use std::fmt;

use crate::context::DrawContext;

/// Establishes the clip region inset by the border.
///
/// Called once per tick, inside the tick's saved state, only when the
/// border is positive.
pub trait BorderClip: fmt::Debug {
    /// Clip `ctx` to the drawable region of a `width` x `height` canvas.
    fn clip(&self, ctx: &mut dyn DrawContext, width: f64, height: f64, border: f64);
}

/// Rectangle inset by the border on all four sides.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectBorder;

impl BorderClip for RectBorder {
    fn clip(&self, ctx: &mut dyn DrawContext, width: f64, height: f64, border: f64) {
        ctx.begin_path();
        ctx.rect(border, border, width - 2.0 * border, height - 2.0 * border);
        ctx.clip();
    }
}

/// Circle centred on the canvas, inset by the border from the shorter side.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleBorder;

impl BorderClip for CircleBorder {
    fn clip(&self, ctx: &mut dyn DrawContext, width: f64, height: f64, border: f64) {
        let radius = (width.min(height) / 2.0 - border).max(0.0);
        ctx.begin_path();
        ctx.arc(width / 2.0, height / 2.0, radius, 0.0, TAU, false);
        ctx.clip();
    }
}
