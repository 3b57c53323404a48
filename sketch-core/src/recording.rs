//! A canvas that records calls instead of painting.
//!
//! Used for dry runs and for asserting call order, save balance and clip
//! geometry in tests.

use crate::context::{Canvas, CompositeMode, DrawContext, ImageData};
use crate::{Rgba, SketchResult};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DrawCall {
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64, f64),
    ResetTransform,
    FillColour(Rgba),
    StrokeColour(Rgba),
    LineWidth(f64),
    GlobalAlpha(f64),
    Composite(CompositeMode),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    BezierCurveTo([f64; 6]),
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
    Rect([f64; 4]),
    ClosePath,
    Fill,
    Stroke,
    Clip,
    FillRect([f64; 4]),
    ClearRect([f64; 4]),
    FillText {
        text: String,
        x: f64,
        y: f64,
        size: f64,
    },
    PutImageData {
        width: u32,
        height: u32,
    },
    Resize(u32, u32),
}

/// Records every [`DrawContext`] call.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    calls: Vec<DrawCall>,
    depth: usize,
}

impl RecordingCanvas {
    /// Create a recorder reporting the given pixel size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
            depth: 0,
        }
    }

    /// Calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Take and clear the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Current depth of the save stack.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.depth
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    /// The rectangles that made up the path at each `clip` call.
    #[must_use]
    pub fn clip_rects(&self) -> Vec<Vec<[f64; 4]>> {
        let mut path = Vec::new();
        let mut clips = Vec::new();
        for call in &self.calls {
            match call {
                DrawCall::BeginPath => path.clear(),
                DrawCall::Rect(r) => path.push(*r),
                DrawCall::Clip => clips.push(path.clone()),
                _ => {}
            }
        }
        clips
    }

    fn record(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}

impl DrawContext for RecordingCanvas {
    fn save(&mut self) {
        self.depth += 1;
        self.record(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.record(DrawCall::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.record(DrawCall::Translate(x, y));
    }

    fn rotate(&mut self, radians: f64) {
        self.record(DrawCall::Rotate(radians));
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.record(DrawCall::Scale(x, y));
    }

    fn reset_transform(&mut self) {
        self.record(DrawCall::ResetTransform);
    }

    fn set_fill_colour(&mut self, colour: Rgba) {
        self.record(DrawCall::FillColour(colour));
    }

    fn set_stroke_colour(&mut self, colour: Rgba) {
        self.record(DrawCall::StrokeColour(colour));
    }

    fn set_line_width(&mut self, width: f64) {
        self.record(DrawCall::LineWidth(width));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.record(DrawCall::GlobalAlpha(alpha));
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.record(DrawCall::Composite(mode));
    }

    fn begin_path(&mut self) {
        self.record(DrawCall::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(DrawCall::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(DrawCall::LineTo(x, y));
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.record(DrawCall::BezierCurveTo([cp1x, cp1y, cp2x, cp2y, x, y]));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        self.record(DrawCall::Arc {
            x,
            y,
            radius,
            start,
            end,
            anticlockwise,
        });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(DrawCall::Rect([x, y, width, height]));
    }

    fn close_path(&mut self) {
        self.record(DrawCall::ClosePath);
    }

    fn fill(&mut self) {
        self.record(DrawCall::Fill);
    }

    fn stroke(&mut self) {
        self.record(DrawCall::Stroke);
    }

    fn clip(&mut self) {
        self.record(DrawCall::Clip);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(DrawCall::FillRect([x, y, width, height]));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(DrawCall::ClearRect([x, y, width, height]));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, size: f64) {
        self.record(DrawCall::FillText {
            text: text.to_string(),
            x,
            y,
            size,
        });
    }

    fn image_data(&self) -> ImageData {
        ImageData::transparent(self.width, self.height)
    }

    fn put_image_data(&mut self, image: &ImageData) {
        self.record(DrawCall::PutImageData {
            width: image.width,
            height: image.height,
        });
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) -> SketchResult<()> {
        self.width = width;
        self.height = height;
        self.depth = 0;
        self.record(DrawCall::Resize(width, height));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContextGuard;

    #[test]
    fn test_guard_balances_depth() {
        let mut canvas = RecordingCanvas::new(10, 10);
        {
            let mut ctx = ContextGuard::new(&mut canvas);
            ctx.translate(1.0, 2.0);
            let mut inner = ContextGuard::new(&mut *ctx);
            inner.rotate(0.5);
        }
        assert_eq!(canvas.save_depth(), 0);
        assert_eq!(canvas.count(|c| *c == DrawCall::Save), 2);
        assert_eq!(canvas.count(|c| *c == DrawCall::Restore), 2);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn failing(ctx: &mut dyn DrawContext) -> Result<(), String> {
            let mut ctx = ContextGuard::new(ctx);
            ctx.rect(0.0, 0.0, 1.0, 1.0);
            Err("boom".into())
        }
        let mut canvas = RecordingCanvas::new(10, 10);
        assert!(failing(&mut canvas).is_err());
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn test_clip_rects() {
        let mut canvas = RecordingCanvas::new(100, 100);
        canvas.begin_path();
        canvas.rect(10.0, 10.0, 80.0, 80.0);
        canvas.clip();
        assert_eq!(canvas.clip_rects(), vec![vec![[10.0, 10.0, 80.0, 80.0]]]);
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut canvas = RecordingCanvas::new(1, 1);
        canvas.restore();
        assert_eq!(canvas.save_depth(), 0);
    }
}
