//! The 2D drawing capability the engine and actions draw through.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  Canvas (pixel size, resize) │
//! ├──────────────────────────────┤
//! │  DrawContext                 │
//! │  - transform stack           │
//! │  - path construction         │
//! │  - paint state               │
//! │  - clip / pixel exchange     │
//! └──────────────────────────────┘
//! ```
//!
//! Any rasterizing backend that implements [`Canvas`] can host a run.
//! [`RecordingCanvas`](crate::RecordingCanvas) records calls instead of
//! painting.

use std::ops::{Deref, DerefMut};

use crate::{ActionError, Rgba, SketchResult};

/// How newly painted pixels combine with existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Paint over existing content.
    #[default]
    SourceOver,
    /// Keep the source only where the destination is opaque.
    SourceIn,
    /// Paint only where the destination is opaque, keeping destination alpha.
    SourceAtop,
    /// Keep the destination only where the source is opaque.
    DestinationIn,
    /// Keep the destination only where the source is transparent.
    DestinationOut,
    /// Multiply channels.
    Multiply,
    /// Screen channels.
    Screen,
}

/// A snapshot of a surface's pixels: premultiplied RGBA8, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl ImageData {
    /// A fully transparent image.
    #[must_use]
    pub fn transparent(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 4;
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// The RGBA bytes of the pixel at `(x, y)`, if in bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Canvas-style immediate-mode drawing.
///
/// Angles are radians. Coordinates are in the current user space, which
/// `translate`/`rotate`/`scale` modify. `save`/`restore` checkpoint the
/// transform, paint state and clip.
pub trait DrawContext {
    /// Push the current state.
    fn save(&mut self);
    /// Pop the most recently saved state. Unbalanced calls are ignored.
    fn restore(&mut self);

    /// Translate user space.
    fn translate(&mut self, x: f64, y: f64);
    /// Rotate user space clockwise by `radians`.
    fn rotate(&mut self, radians: f64);
    /// Scale user space.
    fn scale(&mut self, x: f64, y: f64);
    /// Reset user space to device pixels.
    fn reset_transform(&mut self);

    /// Set the colour used by `fill`, `fill_rect` and `fill_text`.
    fn set_fill_colour(&mut self, colour: Rgba);
    /// Set the colour used by `stroke`.
    fn set_stroke_colour(&mut self, colour: Rgba);
    /// Set the stroke width in user units.
    fn set_line_width(&mut self, width: f64);
    /// Set the opacity multiplier applied to all painting.
    fn set_global_alpha(&mut self, alpha: f64);
    /// Set the compositing mode.
    fn set_composite(&mut self, mode: CompositeMode);

    /// Discard the current path.
    fn begin_path(&mut self);
    /// Start a new subpath.
    fn move_to(&mut self, x: f64, y: f64);
    /// Add a straight segment.
    fn line_to(&mut self, x: f64, y: f64);
    /// Add a cubic Bézier segment.
    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64);
    /// Add a circular arc.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool);
    /// Add a closed rectangle subpath.
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Close the current subpath.
    fn close_path(&mut self);

    /// Fill the current path.
    fn fill(&mut self);
    /// Stroke the current path.
    fn stroke(&mut self);
    /// Intersect the clip region with the current path.
    fn clip(&mut self);

    /// Fill a rectangle without touching the current path.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Clear a rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Draw a line of text with its baseline at `y`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, size: f64);

    /// Snapshot the surface pixels.
    fn image_data(&self) -> ImageData;
    /// Paint an image at the device origin.
    ///
    /// The transform is ignored; composite mode, global alpha and clip apply.
    fn put_image_data(&mut self, image: &ImageData);
}

/// A drawing surface with pixel dimensions.
pub trait Canvas: DrawContext {
    /// Width in pixels.
    fn width(&self) -> u32;
    /// Height in pixels.
    fn height(&self) -> u32;
    /// Resize the surface, discarding its content and state.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Surface`](crate::SketchError::Surface) if the
    /// backend cannot allocate `width` x `height`; the old surface is kept.
    fn resize(&mut self, width: u32, height: u32) -> SketchResult<()>;
}

/// Saves context state on creation and restores it when dropped.
///
/// Restoring in `Drop` covers early returns through `?` as well as the
/// normal path.
pub struct ContextGuard<'a> {
    ctx: &'a mut dyn DrawContext,
}

impl<'a> ContextGuard<'a> {
    /// Save `ctx` and wrap it.
    pub fn new(ctx: &'a mut dyn DrawContext) -> Self {
        ctx.save();
        Self { ctx }
    }
}

impl<'a> Deref for ContextGuard<'a> {
    type Target = dyn DrawContext + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl<'a> DerefMut for ContextGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.ctx.restore();
    }
}

impl std::fmt::Debug for ContextGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextGuard").finish_non_exhaustive()
    }
}

/// The scratch surfaces handed to every action.
///
/// An action that uses either surface owns it for the duration of its own
/// tick and must clear it before use; the engine clears nothing between
/// ticks.
pub struct Compositing<'a> {
    texture: Option<&'a mut dyn DrawContext>,
    predraw: Option<&'a mut dyn DrawContext>,
    width: u32,
    height: u32,
}

impl<'a> Compositing<'a> {
    /// Wrap the provisioned scratch surfaces of a `width` x `height` run.
    pub fn new(
        texture: Option<&'a mut dyn DrawContext>,
        predraw: Option<&'a mut dyn DrawContext>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            texture,
            predraw,
            width,
            height,
        }
    }

    /// No scratch surfaces.
    #[must_use]
    pub fn none(width: u32, height: u32) -> Self {
        Self::new(None, None, width, height)
    }

    /// Whether both scratch surfaces are present.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.texture.is_some() && self.predraw.is_some()
    }

    /// The texture surface.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MissingSurface`] if no texture was provisioned.
    pub fn texture(&mut self) -> Result<&mut dyn DrawContext, ActionError> {
        match self.texture.as_deref_mut() {
            Some(ctx) => Ok(ctx),
            None => Err(ActionError::MissingSurface("texture")),
        }
    }

    /// The predraw surface.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MissingSurface`] if no predraw was provisioned.
    pub fn predraw(&mut self) -> Result<&mut dyn DrawContext, ActionError> {
        match self.predraw.as_deref_mut() {
            Some(ctx) => Ok(ctx),
            None => Err(ActionError::MissingSurface("predraw")),
        }
    }

    /// Both surfaces at once, `(texture, predraw)`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MissingSurface`] if either is missing.
    pub fn both(&mut self) -> Result<(&mut dyn DrawContext, &mut dyn DrawContext), ActionError> {
        match (self.texture.as_deref_mut(), self.predraw.as_deref_mut()) {
            (Some(t), Some(p)) => Ok((t, p)),
            (None, _) => Err(ActionError::MissingSurface("texture")),
            (_, None) => Err(ActionError::MissingSurface("predraw")),
        }
    }

    /// Clear the texture surface.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MissingSurface`] if no texture was provisioned.
    pub fn clear_texture(&mut self) -> Result<(), ActionError> {
        let (w, h) = self.size();
        clear_all(self.texture()?, w, h);
        Ok(())
    }

    /// Clear the predraw surface.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MissingSurface`] if no predraw was provisioned.
    pub fn clear_predraw(&mut self) -> Result<(), ActionError> {
        let (w, h) = self.size();
        clear_all(self.predraw()?, w, h);
        Ok(())
    }

    /// Pixel size of the run, `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (f64::from(self.width), f64::from(self.height))
    }
}

fn clear_all(ctx: &mut dyn DrawContext, width: f64, height: f64) {
    let mut ctx = ContextGuard::new(ctx);
    ctx.reset_transform();
    ctx.set_composite(CompositeMode::SourceOver);
    ctx.clear_rect(0.0, 0.0, width, height);
}

impl std::fmt::Debug for Compositing<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositing")
            .field("texture", &self.texture.is_some())
            .field("predraw", &self.predraw.is_some())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
