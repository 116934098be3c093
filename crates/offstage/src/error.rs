//! Error types for view rendering.
//!
//! [`ViewError`] covers both the render path (a view that cannot be located,
//! a render that fails after the view was found) and the setup path (bad
//! locator configuration, unreadable view files). Rendering surfaces exactly
//! two kinds to callers: [`ViewError::NotFound`] and
//! [`ViewError::RenderFailure`].

use thiserror::Error;

/// Errors that can occur when locating or rendering views.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Neither direct lookup nor contextual search located the view.
    ///
    /// `searched` lists every location that was probed: direct-lookup
    /// locations first, then contextual-lookup locations, in probe order.
    #[error("unable to find view '{name}'. The following locations were searched:\n{}", .searched.join("\n"))]
    NotFound {
        /// The view name or path that was requested.
        name: String,
        /// Every location probed by both lookup strategies.
        searched: Vec<String>,
    },

    /// The view was located but rendering it failed.
    ///
    /// The message carries the model's string representation and the
    /// triggering error's message; the triggering error itself is attached
    /// as the source, so deeper causes stay reachable through
    /// [`std::error::Error::source`].
    #[error("rendering view '{view}' failed for model '{model}': {message}")]
    RenderFailure {
        /// Path of the resolved view that was being rendered.
        view: String,
        /// String representation of the model (compact JSON).
        model: String,
        /// Message of the error that interrupted the render.
        message: String,
        /// The error that interrupted the render.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Template engine failure (syntax error, unknown filter, undefined
    /// variable under strict options, ...).
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Invalid locator or renderer configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Failed to read a view source from disk.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
