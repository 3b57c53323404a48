//! # Saorsa Sketch CLI
//!
//! Renders a bundled sketch to a PNG file.
//!
//! ## Usage
//!
//! ```bash
//! sketch rings --seed 4242 --caption -o rings.png
//! sketch scatter --width 20 --height 10 --dpi 50 --border 0.05
//! sketch --list
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `RenderConfig` - What to render and where, with file inputs resolved lazily
//! - `sketch_renderer::HeadlessHost` does the drawing

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sketch_core::{Border, PaletteSet, RunOptions};

/// Command-line arguments for the sketch renderer.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Parser)]
#[command(name = "sketch")]
#[command(about = "Render seed-reproducible generative sketches to PNG")]
#[command(version)]
pub struct CliArgs {
    /// Sketch to render
    #[arg(default_value = "scatter")]
    pub sketch: String,

    /// Output PNG path
    #[arg(short, long, env = "SKETCH_OUT", default_value = "sketch.png")]
    pub out: PathBuf,

    /// Seed; generated when omitted
    #[arg(long, env = "SKETCH_SEED")]
    pub seed: Option<u32>,

    /// Width in logical units
    #[arg(long)]
    pub width: Option<f64>,

    /// Height in logical units
    #[arg(long)]
    pub height: Option<f64>,

    /// Pixels per logical unit
    #[arg(long, env = "SKETCH_DPI")]
    pub dpi: Option<f64>,

    /// Border as a fraction of the shorter side
    #[arg(long, conflicts_with = "border_cm")]
    pub border: Option<f64>,

    /// Border in logical units
    #[arg(long)]
    pub border_cm: Option<f64>,

    /// Use the neutral reference palette
    #[arg(long)]
    pub neutral: bool,

    /// Draw the seed caption
    #[arg(long)]
    pub caption: bool,

    /// Palette set JSON file
    #[arg(long, env = "SKETCH_PALETTES")]
    pub palettes: Option<PathBuf>,

    /// Run options JSON file; flags override its values
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Skip the texture and predraw surfaces
    #[arg(long)]
    pub no_compositing: bool,

    /// Record draw calls instead of rasterizing; nothing is written
    #[arg(long)]
    pub dry_run: bool,

    /// List bundled sketches and exit
    #[arg(long)]
    pub list: bool,
}

/// A resolved render request.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Sketch name.
    pub sketch: String,
    /// Output path.
    pub out: PathBuf,
    /// Palette set file, if any.
    pub palettes_path: Option<PathBuf>,
    /// Options file, if any.
    pub options_path: Option<PathBuf>,
    /// Provision compositing surfaces.
    pub compositing: bool,
    /// Record instead of rasterize.
    pub dry_run: bool,
    /// List sketches and exit.
    pub list: bool,
    overrides: Overrides,
}

#[derive(Debug, Clone, Default)]
struct Overrides {
    seed: Option<u32>,
    width: Option<f64>,
    height: Option<f64>,
    dpi: Option<f64>,
    border: Option<Border>,
    neutral: bool,
    caption: bool,
}

impl From<CliArgs> for RenderConfig {
    fn from(args: CliArgs) -> Self {
        let border = match (args.border, args.border_cm) {
            (Some(fraction), _) => Some(Border::Fraction(fraction)),
            (None, Some(cm)) => Some(Border::Absolute { cm }),
            (None, None) => None,
        };
        Self {
            sketch: args.sketch,
            out: args.out,
            palettes_path: args.palettes,
            options_path: args.options,
            compositing: !args.no_compositing,
            dry_run: args.dry_run,
            list: args.list,
            overrides: Overrides {
                seed: args.seed,
                width: args.width,
                height: args.height,
                dpi: args.dpi,
                border,
                neutral: args.neutral,
                caption: args.caption,
            },
        }
    }
}

impl RenderConfig {
    /// Run options: the options file (or defaults) with flags applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the options file cannot be read or parsed, or the
    /// merged options are invalid.
    pub fn run_options(&self) -> anyhow::Result<RunOptions> {
        let mut options = match &self.options_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading options {}", path.display()))?;
                RunOptions::from_json(&json)
                    .with_context(|| format!("parsing options {}", path.display()))?
            }
            None => RunOptions::default(),
        };
        let o = &self.overrides;
        options.seed = o.seed.or(options.seed);
        options.width = o.width.unwrap_or(options.width);
        options.height = o.height.unwrap_or(options.height);
        options.dpi = o.dpi.unwrap_or(options.dpi);
        options.border = o.border.unwrap_or(options.border);
        options.neutral |= o.neutral;
        options.caption |= o.caption;
        options.validate()?;
        Ok(options)
    }

    /// The palette set file, or the built-in set.
    ///
    /// # Errors
    ///
    /// Returns an error if the palette file cannot be read or parsed.
    pub fn palettes(&self) -> anyhow::Result<PaletteSet> {
        match &self.palettes_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading palettes {}", path.display()))?;
                PaletteSet::from_json(&json)
                    .with_context(|| format!("parsing palettes {}", path.display()))
            }
            None => Ok(PaletteSet::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> RenderConfig {
        let mut argv = vec!["sketch"];
        argv.extend_from_slice(args);
        RenderConfig::from(CliArgs::try_parse_from(argv).expect("parse"))
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.sketch, "scatter");
        assert_eq!(config.out, PathBuf::from("sketch.png"));
        assert!(config.compositing);
        let options = config.run_options().expect("options");
        assert_eq!(options, RunOptions::default());
    }

    #[test]
    fn test_flags_map_to_options() {
        let config = config(&[
            "rings", "--seed", "12", "--width", "4", "--height", "2", "--dpi", "50",
            "--border-cm", "0.2", "--caption", "--no-compositing",
        ]);
        assert_eq!(config.sketch, "rings");
        assert!(!config.compositing);
        let options = config.run_options().expect("options");
        assert_eq!(options.seed, Some(12));
        assert_eq!(options.pixel_size(), (200, 100));
        assert_eq!(options.border, Border::Absolute { cm: 0.2 });
        assert!(options.caption);
    }

    #[test]
    fn test_border_flags_conflict() {
        let result = CliArgs::try_parse_from(["sketch", "--border", "0.1", "--border-cm", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_border_rejected() {
        let config = config(&["--border", "0.7"]);
        assert!(config.run_options().is_err());
    }

    #[test]
    fn test_options_file_with_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"width": 3, "height": 3, "dpi": 10, "seed": 5}"#)
            .expect("write");
        let config = config(&["--options", path.to_str().expect("utf8"), "--seed", "6"]);
        let options = config.run_options().expect("options");
        assert_eq!(options.pixel_size(), (30, 30));
        assert_eq!(options.seed, Some(6));
    }

    #[test]
    fn test_palette_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("palettes.json");
        std::fs::write(&path, "[[[0,0,0],[0,0,100]]]").expect("write");
        let config = config(&["--palettes", path.to_str().expect("utf8")]);
        assert_eq!(config.palettes().expect("palettes").len(), 1);

        std::fs::write(&path, "[]").expect("write");
        assert!(config.palettes().is_err());
    }
}
