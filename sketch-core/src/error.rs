//! Error types for sketch operations.

use thiserror::Error;

use crate::state::RunState;

/// Result type for sketch operations.
pub type SketchResult<T> = Result<T, SketchError>;

/// Errors raised by the drawable engine and its collaborators.
#[derive(Debug, Error)]
pub enum SketchError {
    /// A drawable was built without its main canvas.
    #[error("Drawable requires a canvas")]
    MissingCanvas,

    /// A drawable was built without a palette set.
    #[error("Drawable requires a palette set")]
    MissingPalettes,

    /// A drawable was built without a name.
    #[error("Drawable requires a name")]
    MissingName,

    /// The palette set has no palettes, or a palette has no colours.
    #[error("Empty palette: {0}")]
    EmptyPalette(String),

    /// An enqueue was attempted without an action.
    #[error("Cannot enqueue a missing action")]
    MissingAction,

    /// An operation order string was not a permutation of `T` and `R`.
    #[error("Invalid op order '{0}': expected \"TR\" or \"RT\"")]
    InvalidOpOrder(String),

    /// Run options failed validation.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// A lifecycle method was called out of order.
    #[error("Invalid state transition: cannot {operation} while {state}")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The state the drawable was in.
        state: RunState,
    },

    /// A surface could not be allocated at the requested size.
    #[error("Surface error: {0}")]
    Surface(String),

    /// An action failed while drawing.
    #[error("Action '{name}' failed: {source}")]
    Action {
        /// Name of the failing action.
        name: String,
        /// The underlying action error.
        #[source]
        source: ActionError,
    },

    /// Options or palette serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors an action may raise from its own `draw`.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A required option was not supplied.
    #[error("Missing option: {0}")]
    MissingOption(&'static str),

    /// The action needs a compositing surface that was not provisioned.
    #[error("Missing surface: {0}")]
    MissingSurface(&'static str),

    /// The action's internal state is unusable.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
