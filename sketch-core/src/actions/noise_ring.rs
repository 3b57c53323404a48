use std::f64::consts::TAU;
use std::sync::Arc;

use crate::action::{Action, ActionBase};
use crate::context::{Compositing, CompositeMode, ContextGuard, DrawContext};
use crate::noise::SimplexNoise;
use crate::{ActionError, Hsv, Rgba};

/// A ring eroded by a noise field, composited through the scratch surfaces.
///
/// Per tick: clear texture and predraw, paint the noise cells into the
/// texture, draw the ring into predraw, cut the texture out of predraw, then
/// composite predraw onto the canvas.
#[derive(Debug, Clone)]
pub struct NoiseRing {
    /// Shared attributes; `t` selects the noise slice.
    pub base: ActionBase,
    /// Centre x in local pixels.
    pub x: f64,
    /// Centre y in local pixels.
    pub y: f64,
    /// Mid-line radius in pixels.
    pub radius: f64,
    /// Ring thickness in pixels.
    pub thickness: f64,
    /// The run's noise field.
    pub noise: Arc<SimplexNoise>,
    /// Spatial frequency of the erosion.
    pub scale: f64,
    /// Noise level above which the ring is cut away.
    pub threshold: f64,
    /// Size of an erosion cell in pixels.
    pub cell: f64,
    /// Reuse whatever the scratch surfaces hold instead of clearing them.
    pub carry_over: bool,
}

impl NoiseRing {
    /// A ring with default erosion settings.
    #[must_use]
    pub fn new(base: ActionBase, x: f64, y: f64, radius: f64, noise: Arc<SimplexNoise>) -> Self {
        Self {
            base,
            x,
            y,
            radius,
            thickness: (radius * 0.1).max(1.0),
            noise,
            scale: 0.01,
            threshold: 0.35,
            cell: 4.0,
            carry_over: false,
        }
    }

    /// Set the ring thickness.
    #[must_use]
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    /// Set the erosion frequency and threshold.
    #[must_use]
    pub fn with_erosion(mut self, scale: f64, threshold: f64) -> Self {
        self.scale = scale;
        self.threshold = threshold;
        self
    }

    fn paint_texture(&self, texture: &mut dyn DrawContext, width: f64, height: f64) {
        let mut texture = ContextGuard::new(texture);
        texture.reset_transform();
        texture.set_composite(CompositeMode::SourceOver);
        texture.set_fill_colour(Rgba {
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
        });
        let mut y = 0.0;
        while y < height {
            let mut x = 0.0;
            while x < width {
                let n = self.noise.noise3(x * self.scale, y * self.scale, self.base.t);
                if n > self.threshold {
                    texture.fill_rect(x, y, self.cell, self.cell);
                }
                x += self.cell;
            }
            y += self.cell;
        }
    }
}

impl Action for NoiseRing {
    fn name(&self) -> &'static str {
        "noise-ring"
    }

    fn draw(
        &self,
        ctx: &mut dyn DrawContext,
        colour: Hsv,
        surfaces: &mut Compositing<'_>,
    ) -> Result<(), ActionError> {
        if self.cell <= 0.0 {
            return Err(ActionError::InvalidState("erosion cell must be positive".into()));
        }
        if !self.carry_over {
            surfaces.clear_texture()?;
            surfaces.clear_predraw()?;
        }
        let (width, height) = surfaces.size();
        let (texture, predraw) = surfaces.both()?;

        self.paint_texture(texture, width, height);

        {
            let mut predraw = ContextGuard::new(predraw);
            self.base.apply(&mut *predraw);
            predraw.set_global_alpha(1.0);
            predraw.set_stroke_colour(colour.to_rgba(1.0));
            predraw.set_line_width(self.thickness);
            predraw.begin_path();
            predraw.arc(self.x, self.y, self.radius, 0.0, TAU, false);
            predraw.stroke();

            predraw.set_composite(CompositeMode::DestinationOut);
            predraw.put_image_data(&texture.image_data());
        }

        self.base.paint(ctx, colour, |ctx| {
            ctx.set_composite(CompositeMode::SourceOver);
            ctx.put_image_data(&predraw.image_data());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawCall, RecordingCanvas, SketchRng};

    fn ring() -> NoiseRing {
        let noise = Arc::new(SimplexNoise::new(&mut SketchRng::new(3)));
        NoiseRing::new(ActionBase::new(32.0, 32.0), 16.0, 16.0, 10.0, noise)
    }

    #[test]
    fn test_requires_scratch_surfaces() {
        let mut canvas = RecordingCanvas::new(32, 32);
        let result = ring().draw(&mut canvas, Hsv::WHITE, &mut Compositing::none(32, 32));
        assert!(matches!(result, Err(ActionError::MissingSurface(_))));
    }

    #[test]
    fn test_clears_then_composites() {
        let mut canvas = RecordingCanvas::new(32, 32);
        let mut texture = RecordingCanvas::new(32, 32);
        let mut predraw = RecordingCanvas::new(32, 32);
        {
            let mut surfaces = Compositing::new(Some(&mut texture), Some(&mut predraw), 32, 32);
            ring()
                .draw(&mut canvas, Hsv::WHITE, &mut surfaces)
                .expect("draw");
        }

        assert!(texture.calls().contains(&DrawCall::ClearRect([0.0, 0.0, 32.0, 32.0])));
        assert!(predraw.calls().contains(&DrawCall::ClearRect([0.0, 0.0, 32.0, 32.0])));
        assert!(predraw
            .calls()
            .contains(&DrawCall::Composite(CompositeMode::DestinationOut)));
        assert_eq!(canvas.count(|c| matches!(c, DrawCall::PutImageData { .. })), 1);
        assert_eq!(texture.save_depth(), 0);
        assert_eq!(predraw.save_depth(), 0);
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn test_carry_over_skips_clear() {
        let mut canvas = RecordingCanvas::new(8, 8);
        let mut texture = RecordingCanvas::new(8, 8);
        let mut predraw = RecordingCanvas::new(8, 8);
        let mut action = ring();
        action.carry_over = true;
        {
            let mut surfaces = Compositing::new(Some(&mut texture), Some(&mut predraw), 8, 8);
            action.draw(&mut canvas, Hsv::WHITE, &mut surfaces).expect("draw");
        }
        assert_eq!(texture.count(|c| matches!(c, DrawCall::ClearRect(_))), 0);
    }
}
