//! The action contract: one unit of deferred drawing work.
//!
//! Every concrete action carries an [`ActionBase`] and draws through
//! [`ActionBase::paint`], which runs the shared sequence:
//!
//! ```text
//! save → transform (op order) → alpha → mask clip → geometry → restore → fill
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::context::{Compositing, ContextGuard, DrawContext};
use crate::fill::Fill;
use crate::mask::Mask;
use crate::{ActionError, Hsv, SketchError, SketchResult};

/// A drawable unit of work.
///
/// Implementations must leave `ctx` in the state they found it; the engine
/// only guarantees isolation per tick, not per call.
pub trait Action: fmt::Debug {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str {
        "action"
    }

    /// Paint onto `ctx` in `colour`, optionally using the scratch surfaces.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] if the action cannot draw; the run aborts.
    fn draw(
        &self,
        ctx: &mut dyn DrawContext,
        colour: Hsv,
        surfaces: &mut Compositing<'_>,
    ) -> Result<(), ActionError>;
}

/// Which transform is applied first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpOrder {
    /// Translate, then rotate (`"TR"`).
    #[default]
    TranslateRotate,
    /// Rotate, then translate (`"RT"`).
    RotateTranslate,
}

impl FromStr for OpOrder {
    type Err = SketchError;

    fn from_str(s: &str) -> SketchResult<Self> {
        match s {
            "TR" => Ok(Self::TranslateRotate),
            "RT" => Ok(Self::RotateTranslate),
            other => Err(SketchError::InvalidOpOrder(other.to_string())),
        }
    }
}

impl fmt::Display for OpOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TranslateRotate => f.write_str("TR"),
            Self::RotateTranslate => f.write_str("RT"),
        }
    }
}

/// Attributes shared by every action.
#[derive(Debug, Clone)]
pub struct ActionBase {
    /// Pixel width of the shared reference frame.
    pub width: f64,
    /// Pixel height of the shared reference frame.
    pub height: f64,
    /// Global opacity, 0–1.
    pub alpha: f64,
    /// Translation as a fraction of `(width, height)`.
    pub translate: (f64, f64),
    /// Rotation in turns (1.0 is a full circle).
    pub rotate: f64,
    /// Pass or time index for noise lookups.
    pub t: f64,
    /// Transform order.
    pub op_order: OpOrder,
    /// Decoration applied after the primary geometry.
    pub fill: Option<Arc<dyn Fill>>,
    /// Clip applied before the primary geometry.
    pub mask: Option<Arc<dyn Mask>>,
}

impl ActionBase {
    /// Defaults for a `width` x `height` frame: opaque, untransformed.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            alpha: 1.0,
            translate: (0.0, 0.0),
            rotate: 0.0,
            t: 0.0,
            op_order: OpOrder::default(),
            fill: None,
            mask: None,
        }
    }

    /// Set the opacity.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Set the fractional translation.
    #[must_use]
    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate = (x, y);
        self
    }

    /// Set the rotation in turns.
    #[must_use]
    pub fn with_rotate(mut self, turns: f64) -> Self {
        self.rotate = turns;
        self
    }

    /// Set the pass index.
    #[must_use]
    pub fn with_t(mut self, t: f64) -> Self {
        self.t = t;
        self
    }

    /// Set the transform order.
    #[must_use]
    pub fn with_op_order(mut self, order: OpOrder) -> Self {
        self.op_order = order;
        self
    }

    /// Set the transform order from `"TR"` or `"RT"`.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidOpOrder`] for anything else.
    pub fn with_op_order_str(self, order: &str) -> SketchResult<Self> {
        Ok(self.with_op_order(order.parse()?))
    }

    /// Attach a fill.
    #[must_use]
    pub fn with_fill(mut self, fill: impl Fill + 'static) -> Self {
        self.fill = Some(Arc::new(fill));
        self
    }

    /// Attach a mask.
    #[must_use]
    pub fn with_mask(mut self, mask: impl Mask + 'static) -> Self {
        self.mask = Some(Arc::new(mask));
        self
    }

    /// Apply the transform in `op_order`, then the opacity.
    pub fn apply(&self, ctx: &mut dyn DrawContext) {
        match self.op_order {
            OpOrder::TranslateRotate => {
                self.apply_translate(ctx);
                self.apply_rotate(ctx);
            }
            OpOrder::RotateTranslate => {
                self.apply_rotate(ctx);
                self.apply_translate(ctx);
            }
        }
        ctx.set_global_alpha(self.alpha);
    }

    fn apply_translate(&self, ctx: &mut dyn DrawContext) {
        ctx.translate(self.translate.0 * self.width, self.translate.1 * self.height);
    }

    fn apply_rotate(&self, ctx: &mut dyn DrawContext) {
        ctx.rotate(self.rotate * std::f64::consts::TAU);
    }

    /// Run the attached fill, if any.
    pub fn fill(&self, ctx: &mut dyn DrawContext, colour: Hsv) {
        if let Some(fill) = &self.fill {
            fill.apply(ctx, colour, self.width, self.height);
        }
    }

    /// Run the shared draw sequence around `body`.
    ///
    /// `body` runs inside a saved state with the transform, opacity and mask
    /// applied. The fill runs after the state is restored.
    ///
    /// # Errors
    ///
    /// Propagates any error from `body`; the state is restored regardless.
    pub fn paint<F>(&self, ctx: &mut dyn DrawContext, colour: Hsv, body: F) -> Result<(), ActionError>
    where
        F: FnOnce(&mut dyn DrawContext) -> Result<(), ActionError>,
    {
        {
            let mut guard = ContextGuard::new(ctx);
            self.apply(&mut *guard);
            if let Some(mask) = &self.mask {
                mask.clip(&mut *guard, self.width, self.height);
            }
            body(&mut *guard)?;
        }
        self.fill(ctx, colour);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::SolidFill;
    use crate::{DrawCall, RecordingCanvas};

    fn transform_calls(canvas: &RecordingCanvas) -> Vec<&'static str> {
        canvas
            .calls()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Translate(..) => Some("T"),
                DrawCall::Rotate(..) => Some("R"),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_translate_then_rotate() {
        let mut canvas = RecordingCanvas::new(200, 100);
        ActionBase::new(200.0, 100.0)
            .with_translate(0.5, 0.25)
            .with_rotate(0.25)
            .apply(&mut canvas);
        assert_eq!(transform_calls(&canvas), vec!["T", "R"]);
        assert_eq!(canvas.calls()[0], DrawCall::Translate(100.0, 25.0));
        assert_eq!(canvas.calls()[1], DrawCall::Rotate(std::f64::consts::FRAC_PI_2));
        assert_eq!(canvas.calls()[2], DrawCall::GlobalAlpha(1.0));
    }

    #[test]
    fn test_rotate_then_translate() {
        let mut canvas = RecordingCanvas::new(10, 10);
        ActionBase::new(10.0, 10.0)
            .with_op_order_str("RT")
            .expect("valid order")
            .apply(&mut canvas);
        assert_eq!(transform_calls(&canvas), vec!["R", "T"]);
    }

    #[test]
    fn test_malformed_op_order_fails() {
        for bad in ["", "T", "R", "TT", "TRR", "tr", "TX"] {
            let result = ActionBase::new(1.0, 1.0).with_op_order_str(bad);
            assert!(
                matches!(result, Err(SketchError::InvalidOpOrder(_))),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_paint_restores_before_fill() {
        let mut canvas = RecordingCanvas::new(10, 10);
        let base = ActionBase::new(10.0, 10.0).with_fill(SolidFill::default());
        base.paint(&mut canvas, Hsv::WHITE, |ctx| {
            ctx.begin_path();
            ctx.rect(1.0, 1.0, 2.0, 2.0);
            Ok(())
        })
        .expect("paint");

        let calls = canvas.calls();
        let restore = calls.iter().position(|c| *c == DrawCall::Restore).expect("restore");
        let fill = calls.iter().position(|c| *c == DrawCall::Fill).expect("fill");
        assert!(restore < fill);
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn test_paint_restores_on_error() {
        let mut canvas = RecordingCanvas::new(10, 10);
        let base = ActionBase::new(10.0, 10.0).with_fill(SolidFill::default());
        let result = base.paint(&mut canvas, Hsv::WHITE, |_| {
            Err(ActionError::MissingOption("radius"))
        });
        assert!(result.is_err());
        assert_eq!(canvas.save_depth(), 0);
        assert_eq!(canvas.count(|c| *c == DrawCall::Fill), 0);
    }
}
