//! The sketch contract: what fills a drawable's queue.

use std::fmt;

use crate::stage::Stage;
use crate::{RunOptions, SketchResult};

/// A generative design.
///
/// `draw` only enqueues work; nothing is painted until the drawable is
/// executed. All randomness must come from [`Stage::rng`] so a seed fully
/// determines the queue.
pub trait Sketch: fmt::Debug {
    /// Registry name, also used as the drawable name.
    fn name(&self) -> &'static str;

    /// Enqueue this sketch's actions.
    ///
    /// # Errors
    ///
    /// Returns an error if an action cannot be configured.
    fn draw(&self, stage: &mut Stage, options: &RunOptions) -> SketchResult<()>;
}
