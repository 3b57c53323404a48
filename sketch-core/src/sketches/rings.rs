use crate::action::OpOrder;
use crate::actions::{Circle, NoiseRing};
use crate::mask::RectMask;
use crate::sketch::Sketch;
use crate::stage::Stage;
use crate::{RunOptions, SketchResult};

/// Concentric rings eroded by noise.
///
/// Needs the texture and predraw surfaces for the erosion; without them
/// the rings are plain strokes.
#[derive(Debug, Clone)]
pub struct Rings {
    /// Number of rings.
    pub count: usize,
    /// Passes per ring; each pass samples a different noise slice.
    pub passes: usize,
}

impl Default for Rings {
    fn default() -> Self {
        Self { count: 8, passes: 3 }
    }
}

impl Sketch for Rings {
    fn name(&self) -> &'static str {
        "rings"
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw(&self, stage: &mut Stage, _options: &RunOptions) -> SketchResult<()> {
        let (w, h) = (f64::from(stage.width()), f64::from(stage.height()));
        let (cx, cy) = (w / 2.0, h / 2.0);
        let max_radius = w.min(h) * 0.45;
        let fgs = stage.colours().fgs.clone();
        let fallback = stage.colours().fg;
        let noise = stage.noise();
        let compositing = stage.has_compositing();

        for i in 0..self.count {
            let radius = max_radius * (i + 1) as f64 / self.count as f64;
            let colour = fgs.get(i % fgs.len().max(1)).copied().unwrap_or(fallback);
            let thickness = max_radius / self.count as f64 * stage.rng().range(0.3, 0.8);
            for pass in 0..self.passes {
                // rings are drawn at the origin of a frame centred on the canvas,
                // so the random spin turns them in place
                let base = stage
                    .base()
                    .with_t(pass as f64 * 0.37 + i as f64)
                    .with_alpha(stage.rng().range(0.6, 1.0))
                    .with_translate(0.5, 0.5)
                    .with_op_order(OpOrder::TranslateRotate)
                    .with_rotate(stage.rng().range(0.0, 1.0));
                if compositing {
                    let threshold = stage.rng().range(0.1, 0.5);
                    stage.enqueue(
                        NoiseRing::new(base, 0.0, 0.0, radius, noise.clone())
                            .with_thickness(thickness)
                            .with_erosion(3.0 / max_radius.max(1.0), threshold),
                        colour,
                    );
                } else {
                    stage.enqueue(
                        Circle::new(base, 0.0, 0.0, radius).stroked(thickness / self.passes as f64),
                        colour,
                    );
                }
            }
        }

        let accent = fgs.first().copied().unwrap_or(fallback);
        let dot = stage.base().with_mask(RectMask {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 0.5,
        });
        stage.enqueue(Circle::new(dot, cx, cy, max_radius * 0.05), accent);
        Ok(())
    }
}
