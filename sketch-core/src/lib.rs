//! # Saorsa Sketch Core
//!
//! Deferred-drawing engine for seed-reproducible generative images.
//! A sketch fills a queue of actions; a host drains it one tick at a time.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 sketch-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Drawable          │  Scheduling            │
//! │  - init / execute  │  - Tick results        │
//! │  - border clip     │  - BatchHost           │
//! │  - caption         │  - FramePaced          │
//! ├─────────────────────────────────────────────┤
//! │  Draw Queue        │  Actions               │
//! │  - FIFO entries    │  - ActionBase          │
//! │  - Stage (sketch)  │  - fills / masks       │
//! ├─────────────────────────────────────────────┤
//! │  Colour & Palette  │  Randomness            │
//! │  - HSV / WCAG      │  - SketchRng (PCG)     │
//! │  - contrast rank   │  - simplex noise       │
//! ├─────────────────────────────────────────────┤
//! │  DrawContext / Canvas (any 2D backend)      │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod actions;
pub mod border;
pub mod colour;
pub mod context;
pub mod drawable;
pub mod error;
pub mod fill;
pub mod mask;
pub mod noise;
pub mod options;
pub mod palette;
pub mod queue;
pub mod random;
pub mod recording;
pub mod scheduler;
pub mod sketch;
pub mod sketches;
pub mod stage;
pub mod state;

pub use action::{Action, ActionBase, OpOrder};
pub use border::{BorderClip, CircleBorder, RectBorder};
pub use colour::{Hsv, Rgba};
pub use context::{Canvas, CompositeMode, Compositing, ContextGuard, DrawContext, ImageData};
pub use drawable::{CompletionHook, Drawable, DrawableBuilder, CAPTION_ADVANCE};
pub use error::{ActionError, SketchError, SketchResult};
pub use fill::{Fill, HatchFill, SolidFill};
pub use mask::{CircleMask, Mask, RectMask};
pub use noise::SimplexNoise;
pub use options::{Border, RunOptions, MAX_PIXEL_SIDE};
pub use palette::{ContrastRanking, Palette, PaletteSet};
pub use queue::{DrawQueue, QueueEntry, DEFAULT_COLOUR};
pub use random::{generate_seed, SketchRng, MAX_SEED};
pub use recording::{DrawCall, RecordingCanvas};
pub use scheduler::{BatchHost, FramePaced, FrameStatus, NoYield, Tick, YieldStrategy};
pub use sketch::Sketch;
pub use stage::{Colours, Stage};
pub use state::RunState;

/// Sketch core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
