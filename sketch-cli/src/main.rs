//! # Saorsa Sketch CLI
//!
//! Renders a named sketch to PNG on the tokio runtime.

use anyhow::Context;
use clap::Parser;
use sketch_cli::{CliArgs, RenderConfig};
use sketch_core::{sketches, BatchHost, Drawable, RecordingCanvas, Sketch};
use sketch_renderer::{save_png, HeadlessHost};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sketch_core=debug,sketch_renderer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    // Use JSON format when RUST_LOG_FORMAT=json
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = RenderConfig::from(CliArgs::parse());

    if config.list {
        for name in sketches::NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    let sketch = sketches::by_name(&config.sketch).with_context(|| {
        format!(
            "unknown sketch '{}' (available: {})",
            config.sketch,
            sketches::NAMES.join(", ")
        )
    })?;
    let options = config.run_options()?;
    let palettes = config.palettes()?;

    tracing::info!(
        sketch = sketch.name(),
        seed = ?options.seed,
        size = ?options.pixel_size(),
        "Starting render"
    );

    if config.dry_run {
        return dry_run(sketch.as_ref(), &config, &options, palettes);
    }

    let host = HeadlessHost::new(palettes).with_compositing(config.compositing);
    let rendered = host.render(sketch.as_ref(), &options).await?;
    save_png(rendered.canvas.pixmap(), &config.out)?;

    println!("{} #{}", config.out.display(), rendered.seed);
    Ok(())
}

fn dry_run(
    sketch: &dyn Sketch,
    config: &RenderConfig,
    options: &sketch_core::RunOptions,
    palettes: sketch_core::PaletteSet,
) -> anyhow::Result<()> {
    let mut builder = Drawable::builder()
        .name(sketch.name())
        .canvas(RecordingCanvas::new(1, 1))
        .palettes(palettes);
    if config.compositing {
        builder = builder.compositing(RecordingCanvas::new(1, 1), RecordingCanvas::new(1, 1));
    }
    let mut drawable = builder.build()?;
    BatchHost::new().run(&mut drawable, sketch, options)?;

    let seed = drawable.seed().unwrap_or_default();
    let ticks = drawable.ticks();
    let calls = drawable.canvas().calls().len();
    tracing::info!(seed, ticks, calls, "Dry run complete");
    println!("dry run #{seed}: {ticks} actions, {calls} draw calls");
    Ok(())
}
