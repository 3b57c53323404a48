use std::f64::consts::TAU;

use crate::action::{Action, ActionBase};
use crate::context::{Compositing, DrawContext};
use crate::{ActionError, Hsv};

use super::Paint;

/// A circle in the action's local frame.
#[derive(Debug, Clone)]
pub struct Circle {
    /// Shared attributes.
    pub base: ActionBase,
    /// Centre x in local pixels.
    pub x: f64,
    /// Centre y in local pixels.
    pub y: f64,
    /// Radius in pixels.
    pub radius: f64,
    /// Fill or outline.
    pub paint: Paint,
}

impl Circle {
    /// A filled circle.
    #[must_use]
    pub fn new(base: ActionBase, x: f64, y: f64, radius: f64) -> Self {
        Self {
            base,
            x,
            y,
            radius,
            paint: Paint::Fill,
        }
    }

    /// Outline instead of fill.
    #[must_use]
    pub fn stroked(mut self, line_width: f64) -> Self {
        self.paint = Paint::Stroke(line_width);
        self
    }
}

impl Action for Circle {
    fn name(&self) -> &'static str {
        "circle"
    }

    fn draw(
        &self,
        ctx: &mut dyn DrawContext,
        colour: Hsv,
        _surfaces: &mut Compositing<'_>,
    ) -> Result<(), ActionError> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(ActionError::InvalidState(format!(
                "radius must be non-negative, got {}",
                self.radius
            )));
        }
        self.base.paint(ctx, colour, |ctx| {
            ctx.begin_path();
            ctx.arc(self.x, self.y, self.radius, 0.0, TAU, false);
            match self.paint {
                Paint::Fill => {
                    ctx.set_fill_colour(colour.to_rgba(1.0));
                    ctx.fill();
                }
                Paint::Stroke(width) => {
                    ctx.set_stroke_colour(colour.to_rgba(1.0));
                    ctx.set_line_width(width);
                    ctx.stroke();
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawCall, RecordingCanvas};

    #[test]
    fn test_circle_draws_arc_inside_saved_state() {
        let mut canvas = RecordingCanvas::new(100, 100);
        let circle = Circle::new(ActionBase::new(100.0, 100.0), 50.0, 50.0, 10.0);
        circle
            .draw(&mut canvas, Hsv::WHITE, &mut Compositing::none(100, 100))
            .expect("draw");

        let calls = canvas.calls();
        assert_eq!(calls.first(), Some(&DrawCall::Save));
        assert_eq!(calls.last(), Some(&DrawCall::Restore));
        assert_eq!(canvas.count(|c| matches!(c, DrawCall::Arc { radius, .. } if *radius == 10.0)), 1);
        assert_eq!(canvas.count(|c| *c == DrawCall::Fill), 1);
    }

    #[test]
    fn test_negative_radius_fails() {
        let mut canvas = RecordingCanvas::new(10, 10);
        let circle = Circle::new(ActionBase::new(10.0, 10.0), 0.0, 0.0, -1.0);
        let result = circle.draw(&mut canvas, Hsv::WHITE, &mut Compositing::none(10, 10));
        assert!(matches!(result, Err(ActionError::InvalidState(_))));
    }
}
