use crate::actions::{Circle, LineList, Polygon};
use crate::fill::HatchFill;
use crate::mask::CircleMask;
use crate::sketch::Sketch;
use crate::stage::Stage;
use crate::{OpOrder, RunOptions, SketchResult};

/// Circles and polygons scattered across the canvas, some hatched, over a
/// loose grid of strokes.
#[derive(Debug, Clone)]
pub struct Scatter {
    /// Number of shapes.
    pub count: usize,
    /// Probability a shape gets a hatch fill.
    pub hatch_chance: f64,
}

impl Default for Scatter {
    fn default() -> Self {
        Self {
            count: 60,
            hatch_chance: 0.25,
        }
    }
}

impl Sketch for Scatter {
    fn name(&self) -> &'static str {
        "scatter"
    }

    fn draw(&self, stage: &mut Stage, _options: &RunOptions) -> SketchResult<()> {
        let (w, h) = (f64::from(stage.width()), f64::from(stage.height()));
        let unit = w.min(h);
        let fgs = stage.colours().fgs.clone();
        let fallback = stage.colours().fg;

        let mut grid = Vec::new();
        let steps = 12;
        for i in 1..steps {
            let y = f64::from(i) / f64::from(steps) * h;
            let wobble = stage.rng().range(-0.01, 0.01) * unit;
            grid.push(vec![(0.0, y), (w * 0.5, y + wobble), (w, y)]);
        }
        let grid_colour = fgs.last().copied().unwrap_or(fallback);
        stage.enqueue(
            LineList::new(stage.base().with_alpha(0.3), grid, (unit * 0.002).max(1.0)),
            grid_colour,
        );

        for _ in 0..self.count {
            let colour = stage.rng().pick(&fgs).copied().unwrap_or(fallback);
            let x = stage.rng().range(0.0, w);
            let y = stage.rng().range(0.0, h);
            let radius = stage.rng().range(0.01, 0.08) * unit;
            let alpha = stage.rng().range(0.5, 1.0);
            let order = if stage.rng().chance(0.5) {
                OpOrder::TranslateRotate
            } else {
                OpOrder::RotateTranslate
            };
            let mut base = stage
                .base()
                .with_alpha(alpha)
                .with_op_order(order)
                .with_translate(stage.rng().range(-0.02, 0.02), stage.rng().range(-0.02, 0.02))
                .with_rotate(stage.rng().range(-0.01, 0.01));
            if stage.rng().chance(self.hatch_chance) {
                base = base.with_fill(HatchFill {
                    spacing: (radius * 0.2).max(2.0),
                    angle: stage.rng().range(0.0, 0.5),
                    line_width: 1.0,
                });
            }
            if stage.rng().chance(0.1) {
                base = base.with_mask(CircleMask {
                    centre: (0.5, 0.5),
                    radius: 0.45,
                });
            }

            if stage.rng().chance(0.5) {
                let circle = Circle::new(base, x, y, radius);
                if stage.rng().chance(0.3) {
                    stage.enqueue(circle.stroked((radius * 0.1).max(1.0)), colour);
                } else {
                    stage.enqueue(circle, colour);
                }
            } else {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let sides = stage.rng().range_int(3, 8) as u32;
                let phase = stage.rng().unit();
                stage.enqueue(Polygon::regular(base, x, y, radius, sides, phase), colour);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Drawable, PaletteSet, RecordingCanvas};

    #[test]
    fn test_queue_length() {
        let options = RunOptions::pixels(64, 64).with_seed(12);
        let mut d: Drawable<RecordingCanvas> = Drawable::builder()
            .name("scatter")
            .canvas(RecordingCanvas::new(1, 1))
            .palettes(PaletteSet::default())
            .build()
            .expect("build");
        d.init(&options).expect("init");
        d.draw(&Scatter { count: 10, hatch_chance: 0.5 }, &options)
            .expect("draw");
        assert_eq!(d.remaining(), 11);
    }
}
