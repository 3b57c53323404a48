use std::f64::consts::TAU;

use crate::action::{Action, ActionBase};
use crate::context::{Compositing, DrawContext};
use crate::{ActionError, Hsv};

use super::Paint;

/// A closed polygon in the action's local frame.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Shared attributes.
    pub base: ActionBase,
    /// Vertices in local pixels.
    pub points: Vec<(f64, f64)>,
    /// Fill or outline.
    pub paint: Paint,
}

impl Polygon {
    /// A filled polygon through `points`.
    #[must_use]
    pub fn new(base: ActionBase, points: Vec<(f64, f64)>) -> Self {
        Self {
            base,
            points,
            paint: Paint::Fill,
        }
    }

    /// A regular polygon with `sides` vertices around `(cx, cy)`.
    ///
    /// `phase` rotates the first vertex, in turns.
    #[must_use]
    pub fn regular(base: ActionBase, cx: f64, cy: f64, radius: f64, sides: u32, phase: f64) -> Self {
        let points = (0..sides)
            .map(|i| {
                let a = (f64::from(i) / f64::from(sides) + phase) * TAU;
                (cx + radius * a.cos(), cy + radius * a.sin())
            })
            .collect();
        Self::new(base, points)
    }

    /// Outline instead of fill.
    #[must_use]
    pub fn stroked(mut self, line_width: f64) -> Self {
        self.paint = Paint::Stroke(line_width);
        self
    }
}

impl Action for Polygon {
    fn name(&self) -> &'static str {
        "polygon"
    }

    fn draw(
        &self,
        ctx: &mut dyn DrawContext,
        colour: Hsv,
        _surfaces: &mut Compositing<'_>,
    ) -> Result<(), ActionError> {
        if self.points.len() < 3 {
            return Err(ActionError::InvalidState(format!(
                "polygon needs at least 3 points, got {}",
                self.points.len()
            )));
        }
        self.base.paint(ctx, colour, |ctx| {
            ctx.begin_path();
            let (x0, y0) = self.points[0];
            ctx.move_to(x0, y0);
            for &(x, y) in &self.points[1..] {
                ctx.line_to(x, y);
            }
            ctx.close_path();
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
    fn test_regular_polygon_vertices() {
        let hex = Polygon::regular(ActionBase::new(1.0, 1.0), 0.0, 0.0, 1.0, 6, 0.0);
        assert_eq!(hex.points.len(), 6);
        for (x, y) in &hex.points {
            assert!((x.hypot(*y) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_polygon_path() {
        let mut canvas = RecordingCanvas::new(10, 10);
        let tri = Polygon::new(
            ActionBase::new(10.0, 10.0),
            vec![(0.0, 0.0), (5.0, 0.0), (0.0, 5.0)],
        )
        .stroked(2.0);
        tri.draw(&mut canvas, Hsv::BLACK, &mut Compositing::none(10, 10))
            .expect("draw");
        assert_eq!(canvas.count(|c| matches!(c, DrawCall::LineTo(..))), 2);
        assert_eq!(canvas.count(|c| *c == DrawCall::ClosePath), 1);
        assert_eq!(canvas.count(|c| *c == DrawCall::Stroke), 1);
        assert!(canvas.calls().contains(&DrawCall::LineWidth(2.0)));
    }

    #[test]
    fn test_degenerate_polygon_fails() {
        let mut canvas = RecordingCanvas::new(10, 10);
        let line = Polygon::new(ActionBase::new(10.0, 10.0), vec![(0.0, 0.0), (1.0, 1.0)]);
        assert!(line
            .draw(&mut canvas, Hsv::BLACK, &mut Compositing::none(10, 10))
            .is_err());
        assert_eq!(canvas.save_depth(), 0);
    }
}
