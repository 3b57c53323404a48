use crate::action::{Action, ActionBase};
use crate::context::{Compositing, DrawContext};
use crate::{ActionError, Hsv};

/// A set of open polylines stroked in one pass.
#[derive(Debug, Clone)]
pub struct LineList {
    /// Shared attributes.
    pub base: ActionBase,
    /// Polylines in local pixels; entries with fewer than two points are skipped.
    pub lines: Vec<Vec<(f64, f64)>>,
    /// Stroke width in pixels.
    pub line_width: f64,
}

impl LineList {
    /// Stroke `lines` at `line_width`.
    #[must_use]
    pub fn new(base: ActionBase, lines: Vec<Vec<(f64, f64)>>, line_width: f64) -> Self {
        Self {
            base,
            lines,
            line_width,
        }
    }
}

impl Action for LineList {
    fn name(&self) -> &'static str {
        "line-list"
    }

    fn draw(
        &self,
        ctx: &mut dyn DrawContext,
        colour: Hsv,
        _surfaces: &mut Compositing<'_>,
    ) -> Result<(), ActionError> {
        self.base.paint(ctx, colour, |ctx| {
            ctx.set_stroke_colour(colour.to_rgba(1.0));
            ctx.set_line_width(self.line_width);
            ctx.begin_path();
            for line in self.lines.iter().filter(|l| l.len() >= 2) {
                let (x0, y0) = line[0];
                ctx.move_to(x0, y0);
                for &(x, y) in &line[1..] {
                    ctx.line_to(x, y);
                }
            }
            ctx.stroke();
            Ok(())
        })
    }
}
