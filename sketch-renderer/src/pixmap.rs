//! A [`Canvas`] that rasterizes into a tiny-skia [`Pixmap`].
//!
//! Paths are flattened into device space as they are built, so the current
//! path survives `restore` the way a browser canvas path does. Arcs become
//! cubic Bézier segments of at most a quarter turn.

use std::f64::consts::{FRAC_PI_2, TAU};

use sketch_core::{Canvas, CompositeMode, DrawContext, ImageData, Rgba, SketchError, SketchResult};
use tiny_skia::{
    BlendMode, Color, FillRule, FilterQuality, IntSize, Mask, Paint, Path, PathBuilder, Pixmap,
    PixmapPaint, Stroke, Transform,
};
use tracing::warn;

use crate::error::{RenderError, RenderResult};
use crate::glyphs::{self, GLYPH_ADVANCE, GLYPH_HEIGHT};

#[derive(Debug, Clone, Copy)]
enum Segment {
    Move(f32, f32),
    Line(f32, f32),
    Cubic([f32; 6]),
    Close,
}

#[derive(Clone)]
struct State {
    transform: Transform,
    fill: Rgba,
    stroke: Rgba,
    line_width: f64,
    alpha: f64,
    blend: BlendMode,
    clip: Option<Mask>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            fill: Rgba {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            stroke: Rgba {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            line_width: 1.0,
            alpha: 1.0,
            blend: BlendMode::SourceOver,
            clip: None,
        }
    }
}

/// Raster canvas backed by a [`Pixmap`].
pub struct PixmapCanvas {
    pixmap: Pixmap,
    state: State,
    stack: Vec<State>,
    path: Vec<Segment>,
    start: Option<(f32, f32)>,
    current: Option<(f32, f32)>,
}

impl PixmapCanvas {
    /// Allocate a transparent canvas.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] for a zero or oversized dimension.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| RenderError::Surface(format!("cannot allocate {width}x{height}")))?;
        Ok(Self {
            pixmap,
            state: State::default(),
            stack: Vec::new(),
            path: Vec::new(),
            start: None,
            current: None,
        })
    }

    /// The rendered pixels.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Consume the canvas and return its pixels.
    #[must_use]
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Current save-stack depth.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Straight-alpha RGBA of the pixel at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    #[allow(clippy::cast_possible_truncation)]
    fn map(&self, x: f64, y: f64) -> (f32, f32) {
        let t = self.state.transform;
        let (x, y) = (x as f32, y as f32);
        (t.sx * x + t.kx * y + t.tx, t.ky * x + t.sy * y + t.ty)
    }

    fn push(&mut self, segment: Segment) {
        match segment {
            Segment::Move(x, y) => {
                self.start = Some((x, y));
                self.current = Some((x, y));
            }
            Segment::Line(x, y) => self.current = Some((x, y)),
            Segment::Cubic(c) => self.current = Some((c[4], c[5])),
            Segment::Close => self.current = self.start,
        }
        self.path.push(segment);
    }

    fn build_path(segments: &[Segment]) -> Option<Path> {
        let mut pb = PathBuilder::new();
        for segment in segments {
            match *segment {
                Segment::Move(x, y) => pb.move_to(x, y),
                Segment::Line(x, y) => pb.line_to(x, y),
                Segment::Cubic([x1, y1, x2, y2, x, y]) => pb.cubic_to(x1, y1, x2, y2, x, y),
                Segment::Close => pb.close(),
            }
        }
        pb.finish()
    }

    fn rect_segments(&self, x: f64, y: f64, width: f64, height: f64) -> [Segment; 5] {
        let (x0, y0) = self.map(x, y);
        let (x1, y1) = self.map(x + width, y);
        let (x2, y2) = self.map(x + width, y + height);
        let (x3, y3) = self.map(x, y + height);
        [
            Segment::Move(x0, y0),
            Segment::Line(x1, y1),
            Segment::Line(x2, y2),
            Segment::Line(x3, y3),
            Segment::Close,
        ]
    }

    #[allow(clippy::cast_possible_truncation)]
    fn paint(&self, colour: Rgba, anti_alias: bool) -> Paint<'static> {
        let alpha = (f64::from(colour.a) * self.state.alpha).clamp(0.0, 1.0) as f32;
        let mut paint = Paint::default();
        paint.set_color(
            Color::from_rgba(colour.r, colour.g, colour.b, alpha).unwrap_or(Color::TRANSPARENT),
        );
        paint.anti_alias = anti_alias;
        paint.blend_mode = self.state.blend;
        paint
    }

    #[allow(clippy::cast_possible_truncation)]
    fn device_line_width(&self) -> f32 {
        let t = self.state.transform;
        let scale = f64::from((t.sx * t.sy - t.kx * t.ky).abs()).sqrt();
        (self.state.line_width * scale).max(0.0) as f32
    }

    fn fill_segments(&mut self, segments: &[Segment], paint: &Paint<'_>) {
        if let Some(path) = Self::build_path(segments) {
            self.pixmap.fill_path(
                &path,
                paint,
                FillRule::Winding,
                Transform::identity(),
                self.state.clip.as_ref(),
            );
        }
    }
}

fn blend_mode(mode: CompositeMode) -> BlendMode {
    match mode {
        CompositeMode::SourceOver => BlendMode::SourceOver,
        CompositeMode::SourceIn => BlendMode::SourceIn,
        CompositeMode::SourceAtop => BlendMode::SourceAtop,
        CompositeMode::DestinationIn => BlendMode::DestinationIn,
        CompositeMode::DestinationOut => BlendMode::DestinationOut,
        CompositeMode::Multiply => BlendMode::Multiply,
        CompositeMode::Screen => BlendMode::Screen,
    }
}

/// Signed sweep of a canvas-style arc.
fn arc_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    if anticlockwise {
        if start - end >= TAU {
            -TAU
        } else {
            -(start - end).rem_euclid(TAU)
        }
    } else if end - start >= TAU {
        TAU
    } else {
        (end - start).rem_euclid(TAU)
    }
}

impl DrawContext for PixmapCanvas {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn translate(&mut self, x: f64, y: f64) {
        self.state.transform = self.state.transform.pre_translate(x as f32, y as f32);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn rotate(&mut self, radians: f64) {
        let (sin, cos) = (radians.sin() as f32, radians.cos() as f32);
        self.state.transform = self
            .state
            .transform
            .pre_concat(Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0));
    }

    #[allow(clippy::cast_possible_truncation)]
    fn scale(&mut self, x: f64, y: f64) {
        self.state.transform = self.state.transform.pre_scale(x as f32, y as f32);
    }

    fn reset_transform(&mut self) {
        self.state.transform = Transform::identity();
    }

    fn set_fill_colour(&mut self, colour: Rgba) {
        self.state.fill = colour;
    }

    fn set_stroke_colour(&mut self, colour: Rgba) {
        self.state.stroke = colour;
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() {
            self.state.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.state.blend = blend_mode(mode);
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.start = None;
        self.current = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.map(x, y);
        self.push(Segment::Move(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.map(x, y);
        if self.current.is_some() {
            self.push(Segment::Line(x, y));
        } else {
            self.push(Segment::Move(x, y));
        }
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        let (x1, y1) = self.map(cp1x, cp1y);
        let (x2, y2) = self.map(cp2x, cp2y);
        let (x3, y3) = self.map(x, y);
        if self.current.is_none() {
            self.push(Segment::Move(x1, y1));
        }
        self.push(Segment::Cubic([x1, y1, x2, y2, x3, y3]));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        if !radius.is_finite() || radius < 0.0 {
            return;
        }
        let sweep = arc_sweep(start, end, anticlockwise);
        let point = |a: f64| (x + radius * a.cos(), y + radius * a.sin());

        let (sx, sy) = point(start);
        let (dx, dy) = self.map(sx, sy);
        if self.current.is_some() {
            self.push(Segment::Line(dx, dy));
        } else {
            self.push(Segment::Move(dx, dy));
        }
        if sweep.abs() < f64::EPSILON {
            return;
        }

        let n = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as u32;
        let step = sweep / f64::from(n);
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        let mut a0 = start;
        for _ in 0..n {
            let a1 = a0 + step;
            let (p0x, p0y) = point(a0);
            let (p3x, p3y) = point(a1);
            let c1 = self.map(p0x - k * radius * a0.sin(), p0y + k * radius * a0.cos());
            let c2 = self.map(p3x + k * radius * a1.sin(), p3y - k * radius * a1.cos());
            let p3 = self.map(p3x, p3y);
            self.push(Segment::Cubic([c1.0, c1.1, c2.0, c2.1, p3.0, p3.1]));
            a0 = a1;
        }
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        for segment in self.rect_segments(x, y, width, height) {
            self.push(segment);
        }
    }

    fn close_path(&mut self) {
        if self.current.is_some() {
            self.push(Segment::Close);
        }
    }

    fn fill(&mut self) {
        let paint = self.paint(self.state.fill, true);
        let path = std::mem::take(&mut self.path);
        self.fill_segments(&path, &paint);
        self.path = path;
    }

    fn stroke(&mut self) {
        let Some(path) = Self::build_path(&self.path) else {
            return;
        };
        let paint = self.paint(self.state.stroke, true);
        let stroke = Stroke {
            width: self.device_line_width(),
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
    }

    fn clip(&mut self) {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let path = Self::build_path(&self.path);
        let mask = match (self.state.clip.take(), path) {
            (Some(mut mask), Some(path)) => {
                mask.intersect_path(&path, FillRule::Winding, true, Transform::identity());
                Some(mask)
            }
            (None, Some(path)) => Mask::new(w, h).map(|mut mask| {
                mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
                mask
            }),
            // an empty path clips everything away
            (_, None) => Mask::new(w, h),
        };
        if mask.is_none() {
            warn!(width = w, height = h, "Clip mask allocation failed");
        }
        self.state.clip = mask;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let paint = self.paint(self.state.fill, true);
        let segments = self.rect_segments(x, y, width, height);
        self.fill_segments(&segments, &paint);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        paint.anti_alias = false;
        let segments = self.rect_segments(x, y, width, height);
        self.fill_segments(&segments, &paint);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, size: f64) {
        let cell = size / f64::from(GLYPH_HEIGHT);
        let top = y - size;
        let paint = self.paint(self.state.fill, false);
        let mut pen = x;
        for c in text.chars() {
            if glyphs::glyph(c).is_none() {
                warn!(character = %c, "No glyph; skipping");
            }
            for (col, row) in glyphs::cells(c) {
                let segments = self.rect_segments(
                    pen + f64::from(col) * cell,
                    top + f64::from(row) * cell,
                    cell,
                    cell,
                );
                self.fill_segments(&segments, &paint);
            }
            pen += f64::from(GLYPH_ADVANCE) * cell;
        }
    }

    fn image_data(&self) -> ImageData {
        ImageData {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            data: self.pixmap.data().to_vec(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn put_image_data(&mut self, image: &ImageData) {
        let source = IntSize::from_wh(image.width, image.height)
            .and_then(|size| Pixmap::from_vec(image.data.clone(), size));
        let Some(source) = source else {
            warn!(width = image.width, height = image.height, "Invalid image data; skipping");
            return;
        };
        let paint = PixmapPaint {
            opacity: self.state.alpha as f32,
            blend_mode: self.state.blend,
            quality: FilterQuality::Nearest,
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &paint,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
    }
}

impl Canvas for PixmapCanvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn resize(&mut self, width: u32, height: u32) -> SketchResult<()> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            SketchError::Surface(format!("cannot allocate a {width}x{height} pixmap"))
        })?;
        self.pixmap = pixmap;
        self.state = State::default();
        self.stack.clear();
        self.begin_path();
        Ok(())
    }
}

impl std::fmt::Debug for PixmapCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapCanvas")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("depth", &self.stack.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::{ContextGuard, Hsv};

    fn red() -> Rgba {
        Hsv::new(0.0, 100.0, 100.0).to_rgba(1.0)
    }

    #[test]
    fn test_fill_rect_paints_pixels() {
        let mut canvas = PixmapCanvas::new(10, 10).expect("canvas");
        canvas.set_fill_colour(red());
        canvas.fill_rect(0.0, 0.0, 5.0, 10.0);
        assert_eq!(canvas.pixel(2, 5), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(8, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_translate_moves_geometry() {
        let mut canvas = PixmapCanvas::new(10, 10).expect("canvas");
        canvas.set_fill_colour(red());
        canvas.translate(5.0, 0.0);
        canvas.fill_rect(0.0, 0.0, 5.0, 10.0);
        assert_eq!(canvas.pixel(2, 5), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(7, 5), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_clip_restored_by_guard() {
        let mut canvas = PixmapCanvas::new(10, 10).expect("canvas");
        canvas.set_fill_colour(red());
        {
            let mut ctx = ContextGuard::new(&mut canvas);
            ctx.begin_path();
            ctx.rect(0.0, 0.0, 5.0, 10.0);
            ctx.clip();
            ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
        }
        assert_eq!(canvas.save_depth(), 0);
        assert_eq!(canvas.pixel(8, 5), Some([0, 0, 0, 0]));
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(canvas.pixel(8, 5), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_full_circle_arc_fills_centre() {
        let mut canvas = PixmapCanvas::new(20, 20).expect("canvas");
        canvas.set_fill_colour(red());
        canvas.begin_path();
        canvas.arc(10.0, 10.0, 6.0, 0.0, TAU, false);
        canvas.fill();
        assert_eq!(canvas.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_destination_out_cuts_hole() {
        let mut canvas = PixmapCanvas::new(10, 10).expect("canvas");
        canvas.set_fill_colour(red());
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0);

        let mut cutter = PixmapCanvas::new(10, 10).expect("canvas");
        cutter.set_fill_colour(red());
        cutter.fill_rect(0.0, 0.0, 5.0, 10.0);

        canvas.set_composite(CompositeMode::DestinationOut);
        canvas.put_image_data(&cutter.image_data());
        assert_eq!(canvas.pixel(2, 5), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(7, 5), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_clear_rect() {
        let mut canvas = PixmapCanvas::new(4, 4).expect("canvas");
        canvas.set_fill_colour(red());
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0);
        canvas.clear_rect(0.0, 0.0, 4.0, 4.0);
        assert!(canvas.pixmap().data().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_arc_sweep() {
        assert!((arc_sweep(0.0, TAU, false) - TAU).abs() < 1e-12);
        assert!((arc_sweep(0.0, FRAC_PI_2, true) + 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((arc_sweep(FRAC_PI_2, 0.0, false) - 3.0 * FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(PixmapCanvas::new(0, 10), Err(RenderError::Surface(_))));
    }
}
