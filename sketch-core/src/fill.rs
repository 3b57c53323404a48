//! Fill strategies applied after an action's primary geometry.
//!
//! A fill runs with the action's own state already restored and works on
//! whatever path the action left as current.

use std::fmt;

use crate::context::{ContextGuard, DrawContext};
use crate::Hsv;

/// A decoration painted over an action's path.
pub trait Fill: fmt::Debug {
    /// Paint the decoration in `colour` over a `width` x `height` frame.
    fn apply(&self, ctx: &mut dyn DrawContext, colour: Hsv, width: f64, height: f64);
}

/// Fill the current path with a flat colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidFill {
    /// Overrides the action colour when set.
    pub colour: Option<Hsv>,
    /// Opacity of the fill.
    pub alpha: f32,
}

impl Default for SolidFill {
    fn default() -> Self {
        Self {
            colour: None,
            alpha: 1.0,
        }
    }
}

impl Fill for SolidFill {
    fn apply(&self, ctx: &mut dyn DrawContext, colour: Hsv, _width: f64, _height: f64) {
        let mut ctx = ContextGuard::new(ctx);
        ctx.set_fill_colour(self.colour.unwrap_or(colour).to_rgba(self.alpha));
        ctx.fill();
    }
}

/// Parallel hatch lines clipped to the current path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HatchFill {
    /// Distance between lines in pixels.
    pub spacing: f64,
    /// Line angle in turns.
    pub angle: f64,
    /// Stroke width in pixels.
    pub line_width: f64,
}

impl Default for HatchFill {
    fn default() -> Self {
        Self {
            spacing: 6.0,
            angle: 0.125,
            line_width: 1.0,
        }
    }
}

impl Fill for HatchFill {
    fn apply(&self, ctx: &mut dyn DrawContext, colour: Hsv, width: f64, height: f64) {
        if self.spacing <= 0.0 {
            return;
        }
        let mut ctx = ContextGuard::new(ctx);
        ctx.clip();
        ctx.reset_transform();
        ctx.set_stroke_colour(colour.to_rgba(1.0));
        ctx.set_line_width(self.line_width);

        let (cx, cy) = (width / 2.0, height / 2.0);
        let reach = width.hypot(height);
        let theta = self.angle * std::f64::consts::TAU;
        let (dx, dy) = (theta.cos(), theta.sin());
        let (nx, ny) = (-dy, dx);

        ctx.begin_path();
        let mut offset = -reach;
        while offset <= reach {
            let (ox, oy) = (cx + nx * offset, cy + ny * offset);
            ctx.move_to(ox - dx * reach, oy - dy * reach);
            ctx.line_to(ox + dx * reach, oy + dy * reach);
            offset += self.spacing;
        }
        ctx.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawCall, RecordingCanvas};

    #[test]
    fn test_solid_fill_uses_override() {
        let mut canvas = RecordingCanvas::new(10, 10);
        let fill = SolidFill {
            colour: Some(Hsv::BLACK),
            alpha: 0.5,
        };
        fill.apply(&mut canvas, Hsv::WHITE, 10.0, 10.0);
        assert!(canvas
            .calls()
            .contains(&DrawCall::FillColour(Hsv::BLACK.to_rgba(0.5))));
        assert_eq!(canvas.count(|c| *c == DrawCall::Fill), 1);
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn test_hatch_clips_then_strokes() {
        let mut canvas = RecordingCanvas::new(40, 40);
        HatchFill::default().apply(&mut canvas, Hsv::WHITE, 40.0, 40.0);
        let calls = canvas.calls();
        let clip = calls.iter().position(|c| *c == DrawCall::Clip).expect("clip");
        let stroke = calls.iter().position(|c| *c == DrawCall::Stroke).expect("stroke");
        assert!(clip < stroke);
        assert!(canvas.count(|c| matches!(c, DrawCall::MoveTo(..))) > 5);
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn test_hatch_zero_spacing_is_noop() {
        let mut canvas = RecordingCanvas::new(10, 10);
        let fill = HatchFill {
            spacing: 0.0,
            ..HatchFill::default()
        };
        fill.apply(&mut canvas, Hsv::WHITE, 10.0, 10.0);
        assert!(canvas.calls().is_empty());
    }
}
