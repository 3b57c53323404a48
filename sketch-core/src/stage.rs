//! What a sketch sees while it fills the queue.

use std::sync::Arc;

use crate::action::{Action, ActionBase};
use crate::noise::SimplexNoise;
use crate::queue::DrawQueue;
use crate::{Hsv, Palette, RunOptions, SketchError, SketchResult, SketchRng};

/// The resolved colour roles of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Colours {
    /// Background, painted before the first tick.
    pub bg: Hsv,
    /// Foreground, used for the caption.
    pub fg: Hsv,
    /// Every palette colour except the background, highest contrast first.
    pub fgs: Vec<Hsv>,
}

impl Colours {
    /// Resolve colour roles from `palette`, honouring overrides in `options`.
    ///
    /// The background defaults to the first palette entry; the foreground to
    /// the entry with the best contrast against the background.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::EmptyPalette`] if the palette has no colours.
    pub fn resolve(palette: &Palette, options: &RunOptions) -> SketchResult<Self> {
        let first = palette
            .get(0)
            .ok_or_else(|| SketchError::EmptyPalette("selected palette has no colours".into()))?;
        let bg = options.background.unwrap_or(first);
        let fg = match options.foreground {
            Some(fg) => fg,
            None => palette
                .best_contrast(bg)
                .and_then(|i| palette.get(i))
                .unwrap_or(first),
        };
        let mut fgs: Vec<Hsv> = palette.colours().iter().copied().filter(|c| *c != bg).collect();
        fgs.sort_by(|a, b| b.contrast(bg).total_cmp(&a.contrast(bg)));
        Ok(Self { bg, fg, fgs })
    }
}

/// The run's fixed parameters and its queue, lent to [`Sketch::draw`].
///
/// [`Sketch::draw`]: crate::Sketch::draw
#[derive(Debug)]
pub struct Stage {
    pub(crate) seed: u32,
    pub(crate) rng: SketchRng,
    pub(crate) palette: Palette,
    pub(crate) colours: Colours,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) border: f64,
    pub(crate) compositing: bool,
    pub(crate) queue: DrawQueue,
}

impl Stage {
    /// The run seed.
    #[must_use]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The run's generator. All randomness must come from here.
    pub fn rng(&mut self) -> &mut SketchRng {
        &mut self.rng
    }

    /// The selected palette.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The resolved colour roles.
    #[must_use]
    pub fn colours(&self) -> &Colours {
        &self.colours
    }

    /// Pixel width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Border width in pixels.
    #[must_use]
    pub fn border(&self) -> f64 {
        self.border
    }

    /// Whether texture and predraw surfaces were provisioned.
    #[must_use]
    pub fn has_compositing(&self) -> bool {
        self.compositing
    }

    /// A fresh [`ActionBase`] sized to the canvas.
    #[must_use]
    pub fn base(&self) -> ActionBase {
        ActionBase::new(f64::from(self.width), f64::from(self.height))
    }

    /// A noise field drawn from the run's generator.
    pub fn noise(&mut self) -> Arc<SimplexNoise> {
        Arc::new(SimplexNoise::new(&mut self.rng))
    }

    /// Append an action.
    pub fn enqueue(&mut self, action: impl Action + 'static, colour: Hsv) {
        self.queue.enqueue(Box::new(action), colour);
    }

    /// Append an action that may be missing; see [`DrawQueue::try_enqueue`].
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MissingAction`] if `action` is `None`.
    pub fn try_enqueue(
        &mut self,
        action: Option<Box<dyn Action>>,
        colour: Option<Hsv>,
    ) -> SketchResult<()> {
        self.queue.try_enqueue(action, colour)
    }

    /// Number of pending entries.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}
