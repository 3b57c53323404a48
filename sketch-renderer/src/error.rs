//! Renderer error types.

use sketch_core::SketchError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering a sketch.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The engine or a sketch failed.
    #[error(transparent)]
    Sketch(#[from] SketchError),

    /// A pixmap could not be allocated.
    #[error("Surface error: {0}")]
    Surface(String),

    /// PNG encoding failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The run stopped without signalling completion.
    #[error("Run ended without a completion event")]
    Incomplete,
}
