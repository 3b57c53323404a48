//! Tick results and the hosts that space ticks out.
//!
//! Ticks never overlap: a host only asks for tick N+1 after tick N has
//! returned. What differs is what happens in between.
//!
//! | Host | Between ticks |
//! |------|---------------|
//! | [`BatchHost`] | the injected [`YieldStrategy`] (nothing by default) |
//! | [`FramePaced`] | control returns to the host until its next frame |

use tracing::debug;

use crate::context::Canvas;
use crate::drawable::Drawable;
use crate::sketch::Sketch;
use crate::{RunOptions, SketchResult};

/// Outcome of starting a run or running one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// More entries remain; schedule another tick.
    Pending {
        /// Entries still queued.
        remaining: usize,
    },
    /// The queue drained on this call and completion was signalled.
    Complete,
    /// Nothing to do: the run had already completed.
    Idle,
}

impl Tick {
    /// Whether another tick should be scheduled.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// What a batch host does between two ticks.
pub trait YieldStrategy {
    /// Called after tick `completed` ticks, before the next one.
    fn yield_now(&mut self, completed: u64);
}

impl<F: FnMut(u64)> YieldStrategy for F {
    fn yield_now(&mut self, completed: u64) {
        self(completed);
    }
}

/// Runs ticks back to back.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoYield;

impl YieldStrategy for NoYield {
    fn yield_now(&mut self, _completed: u64) {}
}

/// A synchronous host that drains the queue in a loop.
#[derive(Debug, Default)]
pub struct BatchHost<Y = NoYield> {
    yielder: Y,
}

impl BatchHost<NoYield> {
    /// A host that never yields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Y: YieldStrategy> BatchHost<Y> {
    /// A host that calls `yielder` between ticks.
    pub fn with_yield(yielder: Y) -> Self {
        Self { yielder }
    }

    /// Initialise `drawable`, let `sketch` fill its queue, then drain it.
    ///
    /// # Errors
    ///
    /// Returns the first error from any lifecycle step or action.
    pub fn run<C: Canvas>(
        &mut self,
        drawable: &mut Drawable<C>,
        sketch: &dyn Sketch,
        options: &RunOptions,
    ) -> SketchResult<()> {
        drawable.init(options)?;
        drawable.draw(sketch, options)?;
        self.execute(drawable, options)
    }

    /// Execute an initialised drawable and drain its queue.
    ///
    /// # Errors
    ///
    /// Returns the first error from `execute` or any tick.
    pub fn execute<C: Canvas>(
        &mut self,
        drawable: &mut Drawable<C>,
        options: &RunOptions,
    ) -> SketchResult<()> {
        let mut tick = drawable.execute(options)?;
        while tick.is_pending() {
            self.yielder.yield_now(drawable.ticks());
            tick = drawable.process()?;
        }
        Ok(())
    }
}

/// Whether a frame-paced host should keep requesting frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Request another frame.
    Continue,
    /// The run is done; stop requesting frames.
    Finished,
}

/// Drives a drawable one tick per host frame.
///
/// The host calls [`FramePaced::on_frame`] from its animation-frame
/// callback. The first frame paints the background; every later frame runs
/// exactly one action.
#[derive(Debug)]
pub struct FramePaced<C: Canvas> {
    drawable: Drawable<C>,
    options: RunOptions,
    started: bool,
}

impl<C: Canvas> FramePaced<C> {
    /// Wrap an initialised, queued drawable.
    pub fn new(drawable: Drawable<C>, options: RunOptions) -> Self {
        Self {
            drawable,
            options,
            started: false,
        }
    }

    /// Advance by one frame.
    ///
    /// # Errors
    ///
    /// Returns the error of a failing tick; the host should stop requesting
    /// frames and leave the partial canvas on screen.
    pub fn on_frame(&mut self) -> SketchResult<FrameStatus> {
        let tick = if self.started {
            if self.drawable.state() == crate::RunState::Done {
                return Ok(FrameStatus::Finished);
            }
            self.drawable.process()?
        } else {
            self.started = true;
            self.drawable.execute(&self.options)?
        };
        if tick.is_pending() {
            Ok(FrameStatus::Continue)
        } else {
            debug!(name = self.drawable.name(), ticks = self.drawable.ticks(), "Frame loop finished");
            Ok(FrameStatus::Finished)
        }
    }

    /// The wrapped drawable.
    #[must_use]
    pub fn drawable(&self) -> &Drawable<C> {
        &self.drawable
    }

    /// Unwrap the drawable.
    pub fn into_inner(self) -> Drawable<C> {
        self.drawable
    }
}
