//! The per-image orchestrator.
//!
//! A [`Drawable`] owns the canvas, the scratch surfaces, the palette set and
//! the draw queue. Its lifecycle follows [`RunState`]:
//!
//! ```text
//! builder ─build→ init(options) ─→ draw(sketch) / enqueue ─→ execute(options)
//!                                                               │
//!                        ┌──────────── process() ◄──────────────┘
//!                        │   save → border clip → action.draw → restore
//!                        └─→ Tick::Pending | Tick::Complete (caption, on_complete)
//! ```
//!
//! Hosts decide how ticks are spaced; see [`crate::scheduler`].

use tracing::{debug, error, info, trace, warn};

use crate::action::Action;
use crate::border::{BorderClip, RectBorder};
use crate::context::{Canvas, CompositeMode, Compositing, ContextGuard, DrawContext};
use crate::scheduler::Tick;
use crate::sketch::Sketch;
use crate::stage::{Colours, Stage};
use crate::state::RunState;
use crate::{
    generate_seed, Hsv, Palette, PaletteSet, RunOptions, SketchError, SketchResult, SketchRng,
};

/// Glyph advance of the caption font as a fraction of its size.
pub const CAPTION_ADVANCE: f64 = 6.0 / 7.0;

/// Callback fired once when the queue drains.
pub type CompletionHook = Box<dyn FnOnce()>;

/// Builder for [`Drawable`] that checks required collaborators.
pub struct DrawableBuilder<C: Canvas> {
    name: Option<String>,
    canvas: Option<C>,
    texture: Option<C>,
    predraw: Option<C>,
    palettes: Option<PaletteSet>,
    border_clip: Box<dyn BorderClip>,
    seed: Option<u32>,
    on_complete: Option<CompletionHook>,
}

impl<C: Canvas> Default for DrawableBuilder<C> {
    fn default() -> Self {
        Self {
            name: None,
            canvas: None,
            texture: None,
            predraw: None,
            palettes: None,
            border_clip: Box::new(RectBorder),
            seed: None,
            on_complete: None,
        }
    }
}

impl<C: Canvas> DrawableBuilder<C> {
    /// Start an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the drawable's name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the main canvas.
    #[must_use]
    pub fn canvas(mut self, canvas: C) -> Self {
        self.canvas = Some(canvas);
        self
    }

    /// Provision the texture and predraw scratch surfaces.
    #[must_use]
    pub fn compositing(mut self, texture: C, predraw: C) -> Self {
        self.texture = Some(texture);
        self.predraw = Some(predraw);
        self
    }

    /// Set the candidate palettes.
    #[must_use]
    pub fn palettes(mut self, palettes: PaletteSet) -> Self {
        self.palettes = Some(palettes);
        self
    }

    /// Replace the default rectangular border clip.
    #[must_use]
    pub fn border_clip(mut self, clip: impl BorderClip + 'static) -> Self {
        self.border_clip = Box::new(clip);
        self
    }

    /// Pre-assign a seed; it wins over `RunOptions::seed`.
    #[must_use]
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Register the completion callback.
    #[must_use]
    pub fn on_complete(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    /// Build the drawable.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MissingCanvas`], [`SketchError::MissingPalettes`]
    /// or [`SketchError::MissingName`] (checked in that order), or
    /// [`SketchError::EmptyPalette`] for an empty palette set.
    pub fn build(self) -> SketchResult<Drawable<C>> {
        let canvas = self.canvas.ok_or(SketchError::MissingCanvas)?;
        let palettes = self.palettes.ok_or(SketchError::MissingPalettes)?;
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(SketchError::MissingName)?;
        if palettes.is_empty() {
            return Err(SketchError::EmptyPalette("palette set has no palettes".into()));
        }

        debug!(name = %name, palettes = palettes.len(), "Drawable constructed");
        Ok(Drawable {
            name,
            canvas,
            texture: self.texture,
            predraw: self.predraw,
            palettes,
            border_clip: self.border_clip,
            preset_seed: self.seed,
            stage: None,
            state: RunState::Idle,
            caption: false,
            ticks: 0,
            on_complete: self.on_complete,
        })
    }
}

impl<C: Canvas> std::fmt::Debug for DrawableBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawableBuilder")
            .field("name", &self.name)
            .field("canvas", &self.canvas.is_some())
            .field("palettes", &self.palettes.as_ref().map(PaletteSet::len))
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// One generative image run.
pub struct Drawable<C: Canvas> {
    name: String,
    canvas: C,
    texture: Option<C>,
    predraw: Option<C>,
    palettes: PaletteSet,
    border_clip: Box<dyn BorderClip>,
    preset_seed: Option<u32>,
    stage: Option<Stage>,
    state: RunState,
    caption: bool,
    ticks: u64,
    on_complete: Option<CompletionHook>,
}

impl<C: Canvas> Drawable<C> {
    /// Start building a drawable.
    #[must_use]
    pub fn builder() -> DrawableBuilder<C> {
        DrawableBuilder::new()
    }

    /// Fix the seed, size the surfaces, compute the border and pick a palette.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidState`] unless the drawable is idle,
    /// [`SketchError::Surface`] if a surface cannot be resized, or an
    /// options/palette error. The drawable stays idle on failure.
    pub fn init(&mut self, options: &RunOptions) -> SketchResult<()> {
        self.transition("init", RunState::Initialized)?;
        options.validate()?;

        let seed = self
            .preset_seed
            .or(options.seed)
            .unwrap_or_else(generate_seed);
        let mut rng = SketchRng::new(seed);

        let (width, height) = options.pixel_size();
        self.canvas.resize(width, height)?;
        for surface in [self.texture.as_mut(), self.predraw.as_mut()].into_iter().flatten() {
            surface.resize(width, height)?;
        }
        let border = options.border_pixels(width, height);

        let palette = if options.neutral {
            Palette::neutral()
        } else {
            self.palettes
                .choose(&mut rng)
                .ok_or_else(|| SketchError::EmptyPalette("palette set has no palettes".into()))?
        };
        let colours = Colours::resolve(&palette, options)?;
        debug!(
            name = %self.name,
            seed,
            width,
            height,
            border,
            palette = ?palette.colours(),
            "Drawable initialised"
        );

        self.caption = options.caption;
        self.stage = Some(Stage {
            seed,
            rng,
            palette,
            colours,
            width,
            height,
            border,
            compositing: self.texture.is_some() && self.predraw.is_some(),
            queue: crate::queue::DrawQueue::new(),
        });
        self.state = RunState::Initialized;
        Ok(())
    }

    /// Let `sketch` fill the queue.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidState`] if actions can no longer be
    /// enqueued, or whatever the sketch returns.
    pub fn draw(&mut self, sketch: &dyn Sketch, options: &RunOptions) -> SketchResult<()> {
        let state = self.state;
        if !state.accepts_actions() {
            return Err(SketchError::InvalidState {
                operation: "draw",
                state,
            });
        }
        let stage = self.stage_mut("draw")?;
        sketch.draw(stage, options)?;
        let queued = stage.queued();
        info!(name = %self.name, sketch = sketch.name(), queued, "Sketch queued");
        if queued > 0 {
            self.state = RunState::Queued;
        }
        Ok(())
    }

    /// Append an action to the queue.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidState`] outside `Initialized`/`Queued`.
    pub fn enqueue(&mut self, action: impl Action + 'static, colour: Hsv) -> SketchResult<()> {
        self.try_enqueue(Some(Box::new(action)), Some(colour))
    }

    /// Append an action that may be missing; the colour defaults to white.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MissingAction`] for `None` (the queue is left
    /// unchanged) or [`SketchError::InvalidState`] outside
    /// `Initialized`/`Queued`.
    pub fn try_enqueue(
        &mut self,
        action: Option<Box<dyn Action>>,
        colour: Option<Hsv>,
    ) -> SketchResult<()> {
        let state = self.state;
        if !state.accepts_actions() {
            return Err(SketchError::InvalidState {
                operation: "enqueue",
                state,
            });
        }
        self.stage_mut("enqueue")?.try_enqueue(action, colour)?;
        self.state = RunState::Queued;
        Ok(())
    }

    /// Resolve colours, paint the background and start running.
    ///
    /// An empty queue completes immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidState`] before `init` or after `execute`.
    pub fn execute(&mut self, options: &RunOptions) -> SketchResult<Tick> {
        self.transition("execute", RunState::Running)?;
        let stage = self.stage_mut("execute")?;
        stage.colours = Colours::resolve(&stage.palette, options)?;
        let bg = stage.colours.bg;
        let (width, height) = (f64::from(stage.width), f64::from(stage.height));
        let remaining = stage.queued();
        let seed = stage.seed;

        {
            let mut ctx = ContextGuard::new(&mut self.canvas);
            ctx.reset_transform();
            ctx.set_composite(CompositeMode::SourceOver);
            ctx.set_global_alpha(1.0);
            ctx.set_fill_colour(bg.to_rgba(1.0));
            ctx.fill_rect(0.0, 0.0, width, height);
        }

        self.state = RunState::Running;
        info!(name = %self.name, seed, remaining, "Drawable running");

        if remaining == 0 {
            self.finish();
            return Ok(Tick::Complete);
        }
        Ok(Tick::Pending { remaining })
    }

    /// Run one tick: draw the head of the queue.
    ///
    /// The canvas state is saved before the border clip and restored after
    /// the action returns, on success or failure.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Action`] if the action fails, or
    /// [`SketchError::InvalidState`] if the drawable was never executed.
    pub fn process(&mut self) -> SketchResult<Tick> {
        let state = self.state;
        if state == RunState::Done {
            warn!(name = %self.name, "process() called after completion");
            return Ok(Tick::Idle);
        }
        if !state.is_active() {
            return Err(SketchError::InvalidState {
                operation: "process",
                state,
            });
        }
        let Some(stage) = self.stage.as_mut() else {
            return Err(SketchError::InvalidState {
                operation: "process",
                state,
            });
        };
        let Some(entry) = stage.queue.pop() else {
            warn!(name = %self.name, "process() called on an empty queue");
            return Ok(Tick::Idle);
        };

        let (width, height) = (stage.width, stage.height);
        let border = stage.border;
        let tick = self.ticks;
        trace!(tick, action = entry.action.name(), "Tick");

        let result = {
            let mut ctx = ContextGuard::new(&mut self.canvas);
            if border > 0.0 {
                self.border_clip
                    .clip(&mut *ctx, f64::from(width), f64::from(height), border);
            }
            let mut surfaces = Compositing::new(
                self.texture.as_mut().map(|t| t as &mut dyn DrawContext),
                self.predraw.as_mut().map(|p| p as &mut dyn DrawContext),
                width,
                height,
            );
            entry.action.draw(&mut *ctx, entry.colour, &mut surfaces)
        };
        self.ticks += 1;

        if let Err(source) = result {
            error!(tick, action = entry.action.name(), error = %source, "Action failed");
            return Err(SketchError::Action {
                name: entry.action.name().to_string(),
                source,
            });
        }

        let remaining = stage.queued();
        if remaining > 0 {
            self.state = RunState::Draining;
            return Ok(Tick::Pending { remaining });
        }
        self.finish();
        Ok(Tick::Complete)
    }

    fn finish(&mut self) {
        if self.caption {
            self.draw_caption();
        }
        self.state = RunState::Done;
        info!(name = %self.name, seed = ?self.seed(), ticks = self.ticks, "Drawable complete");
        if let Some(hook) = self.on_complete.take() {
            hook();
        }
    }

    fn draw_caption(&mut self) {
        let Some(stage) = self.stage.as_ref() else {
            return;
        };
        let text = format!("#{}", stage.seed);
        let (width, height) = (f64::from(stage.width), f64::from(stage.height));
        let size = (width.min(height) * 0.02).max(10.0);
        let pad = size * 0.5;
        #[allow(clippy::cast_precision_loss)]
        let text_width = text.len() as f64 * size * CAPTION_ADVANCE;
        let x = stage.border + pad;
        let baseline = height - stage.border - pad;
        let Colours { bg, fg, .. } = stage.colours;

        let mut ctx = ContextGuard::new(&mut self.canvas);
        ctx.reset_transform();
        ctx.set_composite(CompositeMode::SourceOver);
        ctx.set_global_alpha(1.0);
        ctx.set_fill_colour(bg.to_rgba(1.0));
        ctx.fill_rect(x - pad / 2.0, baseline - size - pad / 2.0, text_width + pad, size + pad);
        ctx.set_fill_colour(fg.to_rgba(1.0));
        ctx.fill_text(&text, x, baseline, size);
        debug!(caption = %text, "Caption drawn");
    }

    fn transition(&self, operation: &'static str, next: RunState) -> SketchResult<()> {
        if self.state.can_transition_to(next) {
            debug!(name = %self.name, from = %self.state, to = %next, "State transition");
            Ok(())
        } else {
            Err(SketchError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn stage_mut(&mut self, operation: &'static str) -> SketchResult<&mut Stage> {
        let state = self.state;
        self.stage
            .as_mut()
            .ok_or(SketchError::InvalidState { operation, state })
    }

    /// The drawable's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The run seed, once initialised.
    #[must_use]
    pub fn seed(&self) -> Option<u32> {
        self.stage.as_ref().map(|s| s.seed)
    }

    /// The selected palette, once initialised.
    #[must_use]
    pub fn palette(&self) -> Option<&Palette> {
        self.stage.as_ref().map(|s| &s.palette)
    }

    /// The resolved colours, once initialised.
    #[must_use]
    pub fn colours(&self) -> Option<&Colours> {
        self.stage.as_ref().map(|s| &s.colours)
    }

    /// Border width in pixels, once initialised.
    #[must_use]
    pub fn border(&self) -> Option<f64> {
        self.stage.as_ref().map(|s| s.border)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Ticks run so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Entries still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.stage.as_ref().map_or(0, Stage::queued)
    }

    /// The main canvas.
    #[must_use]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// The main canvas, mutably.
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Consume the drawable and return its canvas.
    pub fn into_canvas(self) -> C {
        self.canvas
    }
}

impl<C: Canvas> std::fmt::Debug for Drawable<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drawable")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("seed", &self.seed())
            .field("ticks", &self.ticks)
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::actions::Circle;
    use crate::{ActionBase, ActionError, DrawCall, RecordingCanvas};

    #[derive(Debug)]
    struct Failing;

    impl Action for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn draw(
            &self,
            ctx: &mut dyn DrawContext,
            _colour: Hsv,
            _surfaces: &mut Compositing<'_>,
        ) -> Result<(), ActionError> {
            ctx.save();
            Err(ActionError::MissingOption("radius"))
        }
    }

    fn drawable() -> Drawable<RecordingCanvas> {
        Drawable::builder()
            .name("test")
            .canvas(RecordingCanvas::new(1, 1))
            .palettes(PaletteSet::default())
            .build()
            .expect("build")
    }

    #[test]
    fn test_init_sizes_canvas() {
        let mut d = drawable();
        d.init(&RunOptions::pixels(40, 30).with_seed(9)).expect("init");
        assert_eq!(d.canvas().width(), 40);
        assert_eq!(d.canvas().height(), 30);
        assert_eq!(d.seed(), Some(9));
        assert_eq!(d.state(), RunState::Initialized);
    }

    #[test]
    fn test_preset_seed_wins() {
        let mut d = Drawable::builder()
            .name("seeded")
            .canvas(RecordingCanvas::new(1, 1))
            .palettes(PaletteSet::default())
            .seed(5)
            .build()
            .expect("build");
        d.init(&RunOptions::pixels(10, 10).with_seed(6)).expect("init");
        assert_eq!(d.seed(), Some(5));
    }

    #[test]
    fn test_generated_seed_in_range() {
        let mut d = drawable();
        d.init(&RunOptions::pixels(10, 10)).expect("init");
        let seed = d.seed().expect("seed");
        assert!((1..=crate::MAX_SEED).contains(&seed));
    }

    #[test]
    fn test_neutral_palette() {
        let mut d = drawable();
        let options = RunOptions {
            neutral: true,
            ..RunOptions::pixels(10, 10)
        };
        d.init(&options).expect("init");
        assert_eq!(d.palette(), Some(&Palette::neutral()));
    }

    #[test]
    fn test_execute_before_init_fails() {
        let mut d = drawable();
        let result = d.execute(&RunOptions::default());
        assert!(matches!(
            result,
            Err(SketchError::InvalidState {
                operation: "execute",
                state: RunState::Idle
            })
        ));
    }

    #[test]
    fn test_background_painted_first() {
        let mut d = drawable();
        let options = RunOptions {
            background: Some(Hsv::BLACK),
            ..RunOptions::pixels(20, 20).with_seed(1)
        };
        d.init(&options).expect("init");
        d.enqueue(Circle::new(ActionBase::new(20.0, 20.0), 10.0, 10.0, 4.0), Hsv::WHITE)
            .expect("enqueue");
        d.execute(&options).expect("execute");
        let calls = d.canvas().calls();
        assert!(calls.contains(&DrawCall::FillColour(Hsv::BLACK.to_rgba(1.0))));
        assert!(calls.contains(&DrawCall::FillRect([0.0, 0.0, 20.0, 20.0])));
        assert_eq!(d.canvas().save_depth(), 0);
    }

    #[test]
    fn test_action_failure_aborts_and_restores() {
        let mut d = drawable();
        let options = RunOptions::pixels(10, 10).with_seed(3);
        d.init(&options).expect("init");
        d.enqueue(Failing, Hsv::WHITE).expect("enqueue");
        d.execute(&options).expect("execute");
        let err = d.process().expect_err("should fail");
        assert!(matches!(err, SketchError::Action { ref name, .. } if name == "failing"));
        // the action's own unmatched save leaks, the tick's does not
        assert_eq!(d.canvas().save_depth(), 1);
    }

    #[test]
    fn test_enqueue_after_done_fails() {
        let mut d = drawable();
        let options = RunOptions::pixels(10, 10).with_seed(3);
        d.init(&options).expect("init");
        assert_eq!(d.execute(&options).expect("execute"), Tick::Complete);
        let result = d.enqueue(Circle::new(ActionBase::new(1.0, 1.0), 0.0, 0.0, 1.0), Hsv::WHITE);
        assert!(matches!(result, Err(SketchError::InvalidState { .. })));
        assert_eq!(d.process().expect("idle"), Tick::Idle);
    }

    #[test]
    fn test_caption_drawn_on_completion() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut d = Drawable::builder()
            .name("captioned")
            .canvas(RecordingCanvas::new(1, 1))
            .palettes(PaletteSet::default())
            .on_complete(move || counter.set(counter.get() + 1))
            .build()
            .expect("build");
        let options = RunOptions {
            caption: true,
            ..RunOptions::pixels(200, 100).with_seed(77)
        };
        d.init(&options).expect("init");
        d.execute(&options).expect("execute");
        let text = d.canvas().calls().iter().find_map(|c| match c {
            DrawCall::FillText { text, y, .. } => Some((text.clone(), *y)),
            _ => None,
        });
        let (text, y) = text.expect("caption");
        assert_eq!(text, "#77");
        assert!(y > 50.0, "caption should sit in the lower half");
        assert_eq!(fired.get(), 1);
    }
}
