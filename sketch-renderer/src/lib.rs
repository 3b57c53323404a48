//! # Saorsa Sketch Renderer
//!
//! Raster backend and headless host for sketch-core.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  HeadlessHost (tokio)                       │
//! │  prepare → drain (yield_now) → oneshot done │
//! ├─────────────────────────────────────────────┤
//! │  PixmapCanvas: sketch_core::Canvas          │
//! │  tiny-skia paths, masks, blend modes        │
//! ├─────────────────────────────────────────────┤
//! │  export: PNG bytes / file                   │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod glyphs;
pub mod host;
pub mod pixmap;

pub use error::{RenderError, RenderResult};
pub use export::{encode_png, save_png};
pub use host::{HeadlessHost, Rendered};
pub use pixmap::PixmapCanvas;
