//! The view abstraction and its rendering context.
//!
//! A [`View`] is a resolved, invocable template: it knows where it came from
//! and how to render itself into an in-memory sink. The renderer never talks
//! to a template engine directly — it resolves a `View` through a
//! [`ViewLocator`](crate::locator::ViewLocator) and invokes it with a
//! [`ViewContext`]. This keeps the engine swappable behind the trait seam.

use std::sync::Arc;

use crate::context::ActionContext;
use crate::error::Result;
use crate::temp_data::TempData;

/// Options applied to a single render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Fail the render when a template references an undefined variable.
    /// When off, undefined variables render as empty output.
    pub strict_vars: bool,
    /// HTML-escape interpolated values.
    pub autoescape: bool,
}

impl RenderOptions {
    /// Default options: lenient variables, no escaping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables strict variable resolution.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict_vars = true;
        self
    }

    /// Enables HTML auto-escaping.
    #[must_use]
    pub fn escaped(mut self) -> Self {
        self.autoescape = true;
        self
    }
}

/// Everything a [`View`] needs to render once.
///
/// Bundles the execution context, the serialized model, the temp data loaded
/// for this render, the in-memory output sink, and the effective options.
/// The sink is the only thing a render writes to.
pub struct ViewContext<'a> {
    /// The execution context the render runs under.
    pub action: &'a ActionContext,
    /// The model, serialized to JSON.
    pub model: &'a serde_json::Value,
    /// Temp data loaded for this render.
    pub temp_data: &'a TempData,
    /// The in-memory sink the view writes into.
    pub output: &'a mut String,
    /// Effective rendering options.
    pub options: RenderOptions,
}

/// A resolved, invocable view.
pub trait View: Send + Sync {
    /// The path the view was resolved from, for diagnostics.
    fn path(&self) -> &str;

    /// Renders the view into the context's output sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying template fails to compile or
    /// render. The renderer wraps such errors into
    /// [`ViewError::RenderFailure`](crate::ViewError::RenderFailure).
    fn render(&self, ctx: &mut ViewContext<'_>) -> Result<()>;
}

/// Outcome of a single lookup strategy.
///
/// A miss carries every location the strategy probed so a final "not found"
/// error can enumerate the full search.
pub enum ViewLookup {
    /// The strategy located a view.
    Found(Arc<dyn View>),
    /// The strategy missed; `searched` lists the probed locations in order.
    NotFound {
        /// Locations probed by this strategy.
        searched: Vec<String>,
    },
}

impl ViewLookup {
    /// Returns `true` if a view was located.
    pub fn is_found(&self) -> bool {
        matches!(self, ViewLookup::Found(_))
    }

    /// Returns the searched locations of a miss, or an empty slice for a hit.
    pub fn searched_locations(&self) -> &[String] {
        match self {
            ViewLookup::Found(_) => &[],
            ViewLookup::NotFound { searched } => searched,
        }
    }
}
