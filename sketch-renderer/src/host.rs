//! Async headless host.
//!
//! Drains a drawable on the tokio runtime, yielding to the scheduler
//! between ticks so long queues never monopolise a worker. Completion is a
//! one-shot event.

use sketch_core::{Drawable, PaletteSet, RunOptions, Sketch, Tick};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::error::{RenderError, RenderResult};
use crate::pixmap::PixmapCanvas;

/// A finished render.
#[derive(Debug)]
pub struct Rendered {
    /// Seed the run used.
    pub seed: u32,
    /// Ticks executed.
    pub ticks: u64,
    /// The painted canvas.
    pub canvas: PixmapCanvas,
}

/// Renders sketches onto tiny-skia pixmaps.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    palettes: PaletteSet,
    compositing: bool,
}

impl HeadlessHost {
    /// A host choosing from `palettes`, with scratch surfaces provisioned.
    #[must_use]
    pub fn new(palettes: PaletteSet) -> Self {
        Self {
            palettes,
            compositing: true,
        }
    }

    /// Whether to provision texture and predraw surfaces.
    #[must_use]
    pub fn with_compositing(mut self, enabled: bool) -> Self {
        self.compositing = enabled;
        self
    }

    /// Build, initialise and queue a drawable for `sketch`.
    ///
    /// The returned receiver resolves once the queue has drained.
    ///
    /// # Errors
    ///
    /// Returns an error if a surface cannot be allocated or the sketch fails.
    pub fn prepare(
        &self,
        sketch: &dyn Sketch,
        options: &RunOptions,
    ) -> RenderResult<(Drawable<PixmapCanvas>, oneshot::Receiver<()>)> {
        let (tx, rx) = oneshot::channel();
        let mut builder = Drawable::builder()
            .name(sketch.name())
            .canvas(PixmapCanvas::new(1, 1)?)
            .palettes(self.palettes.clone())
            .on_complete(move || {
                // the receiver may already be gone; completion is advisory then
                let _ = tx.send(());
            });
        if self.compositing {
            builder = builder.compositing(PixmapCanvas::new(1, 1)?, PixmapCanvas::new(1, 1)?);
        }
        let mut drawable = builder.build()?;
        drawable.init(options)?;
        drawable.draw(sketch, options)?;
        Ok((drawable, rx))
    }

    /// Execute `drawable` and drain its queue, yielding between ticks.
    ///
    /// # Errors
    ///
    /// Returns the first engine or action error.
    pub async fn drain(drawable: &mut Drawable<PixmapCanvas>, options: &RunOptions) -> RenderResult<()> {
        let mut tick = drawable.execute(options)?;
        while let Tick::Pending { remaining } = tick {
            debug!(remaining, "Yielding between ticks");
            tokio::task::yield_now().await;
            tick = drawable.process()?;
        }
        Ok(())
    }

    /// Render `sketch` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if any lifecycle step fails or completion is never
    /// signalled.
    pub async fn render(&self, sketch: &dyn Sketch, options: &RunOptions) -> RenderResult<Rendered> {
        let (mut drawable, done) = self.prepare(sketch, options)?;
        Self::drain(&mut drawable, options).await?;
        done.await.map_err(|_| RenderError::Incomplete)?;

        let seed = drawable.seed().ok_or(RenderError::Incomplete)?;
        let ticks = drawable.ticks();
        info!(sketch = sketch.name(), seed, ticks, "Render complete");
        Ok(Rendered {
            seed,
            ticks,
            canvas: drawable.into_canvas(),
        })
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(PaletteSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::sketches::Scatter;

    #[tokio::test]
    async fn test_render_reports_seed() {
        let options = RunOptions::pixels(32, 32).with_seed(21);
        let rendered = HeadlessHost::default()
            .render(&Scatter { count: 5, hatch_chance: 0.0 }, &options)
            .await
            .expect("render");
        assert_eq!(rendered.seed, 21);
        assert_eq!(rendered.ticks, 6);
        assert_eq!(rendered.canvas.save_depth(), 0);
    }

    #[tokio::test]
    async fn test_completion_event_fires() {
        let host = HeadlessHost::default().with_compositing(false);
        let options = RunOptions::pixels(16, 16).with_seed(3);
        let (mut drawable, done) = host
            .prepare(&Scatter { count: 2, hatch_chance: 0.0 }, &options)
            .expect("prepare");
        HeadlessHost::drain(&mut drawable, &options).await.expect("drain");
        done.await.expect("completion");
    }
}
