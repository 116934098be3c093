//! Rendering views to strings.
//!
//! [`ViewRenderer`] is the public surface of the crate: give it a view name
//! and a model, get back the rendered markup as a `String`. It owns no
//! rendering logic of its own — it builds the execution context, resolves
//! the view through the locator (direct lookup first, contextual search
//! second), hands a [`ViewContext`] to the view, and collects the sink.
//!
//! Per-call ambient state (a simulated request, route values, a descriptor)
//! travels in a [`RenderOverrides`] bundle — either passed to
//! [`render_with`](ViewRenderer::render_with) or installed once as instance
//! defaults with [`with_defaults`](ViewRenderer::with_defaults). Nothing
//! about a render mutates the renderer, so concurrent calls cannot observe
//! each other's context.

use std::sync::Arc;

use serde::Serialize;

use crate::context::{ActionContext, ActionDescriptor, RequestContext, RouteData};
use crate::error::{Result, ViewError};
use crate::locator::ViewLocator;
use crate::services::Services;
use crate::temp_data::TempDataProvider;
use crate::view::{RenderOptions, View, ViewContext, ViewLookup};

/// Ambient state for one render call.
///
/// Every field is optional; an unset field falls back to the renderer's
/// instance defaults and then to a synthesized minimal value.
#[derive(Debug, Clone, Default)]
pub struct RenderOverrides {
    /// Simulated HTTP request for this render.
    pub request: Option<RequestContext>,
    /// Route values for this render.
    pub route: Option<RouteData>,
    /// Action descriptor for this render.
    pub action: Option<ActionDescriptor>,
    /// Rendering options for this render.
    pub options: Option<RenderOptions>,
}

impl RenderOverrides {
    /// Creates an empty bundle (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated request.
    #[must_use]
    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = Some(request);
        self
    }

    /// Sets the route values.
    #[must_use]
    pub fn with_route(mut self, route: RouteData) -> Self {
        self.route = Some(route);
        self
    }

    /// Sets the action descriptor.
    #[must_use]
    pub fn with_action(mut self, action: ActionDescriptor) -> Self {
        self.action = Some(action);
        self
    }

    /// Sets the rendering options.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Renders named views with typed models into in-memory strings.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use serde::Serialize;
/// use offstage::{JinjaViewLocator, NullTempDataProvider, Services, ViewRenderer};
///
/// #[derive(Serialize)]
/// struct Welcome { name: String }
///
/// let mut locator = JinjaViewLocator::new();
/// locator.add_embedded("welcome.jinja", "Hello, {{ name }}!");
///
/// let renderer = ViewRenderer::new(
///     Arc::new(locator),
///     Arc::new(NullTempDataProvider),
///     Services::new(),
/// );
///
/// let markup = renderer.render("welcome", &Welcome { name: "Ada".into() }).unwrap();
/// assert_eq!(markup, "Hello, Ada!");
/// ```
pub struct ViewRenderer {
    locator: Arc<dyn ViewLocator>,
    temp_data: Arc<dyn TempDataProvider>,
    services: Services,
    defaults: RenderOverrides,
}

impl ViewRenderer {
    /// Creates a renderer from its three collaborators: the view locator,
    /// the temp-data provider, and the service registry bound into
    /// synthesized requests.
    pub fn new(
        locator: Arc<dyn ViewLocator>,
        temp_data: Arc<dyn TempDataProvider>,
        services: Services,
    ) -> Self {
        Self {
            locator,
            temp_data,
            services,
            defaults: RenderOverrides::default(),
        }
    }

    /// Installs instance-wide default overrides, used by every render that
    /// doesn't supply its own. Useful when a whole job batch should appear
    /// to run under one simulated request.
    #[must_use]
    pub fn with_defaults(mut self, defaults: RenderOverrides) -> Self {
        self.defaults = defaults;
        self
    }

    /// Renders a main-page view to a string.
    ///
    /// # Errors
    ///
    /// [`ViewError::NotFound`] when neither lookup strategy locates the
    /// view; [`ViewError::RenderFailure`] when anything fails after the
    /// view was resolved.
    pub fn render<M: Serialize>(&self, view: &str, model: &M) -> Result<String> {
        self.render_inner(view, model, &RenderOverrides::default(), true)
    }

    /// Renders a partial view to a string.
    ///
    /// Partials search the partial location formats during contextual
    /// lookup (underscore conventions by default).
    pub fn render_partial<M: Serialize>(&self, view: &str, model: &M) -> Result<String> {
        self.render_inner(view, model, &RenderOverrides::default(), false)
    }

    /// Renders a main-page view under an explicit per-call context.
    pub fn render_with<M: Serialize>(
        &self,
        view: &str,
        model: &M,
        overrides: &RenderOverrides,
    ) -> Result<String> {
        self.render_inner(view, model, overrides, true)
    }

    /// Renders a partial view under an explicit per-call context.
    pub fn render_partial_with<M: Serialize>(
        &self,
        view: &str,
        model: &M,
        overrides: &RenderOverrides,
    ) -> Result<String> {
        self.render_inner(view, model, overrides, false)
    }

    fn render_inner<M: Serialize>(
        &self,
        view: &str,
        model: &M,
        overrides: &RenderOverrides,
        main_page: bool,
    ) -> Result<String> {
        let context = self.action_context(overrides);
        let resolved = self.resolve(&context, view, main_page)?;

        let model_value = match serde_json::to_value(model) {
            Ok(value) => value,
            Err(e) => {
                return Err(ViewError::RenderFailure {
                    view: resolved.path().to_string(),
                    model: "<unserializable model>".to_string(),
                    message: e.to_string(),
                    source: Some(Box::new(e)),
                })
            }
        };

        let options = overrides
            .options
            .or(self.defaults.options)
            .unwrap_or_default();
        let temp_data = self.temp_data.load(&context.request);

        let mut output = String::new();
        let result = resolved.render(&mut ViewContext {
            action: &context,
            model: &model_value,
            temp_data: &temp_data,
            output: &mut output,
            options,
        });

        if let Err(e) = result {
            return Err(ViewError::RenderFailure {
                view: resolved.path().to_string(),
                model: model_value.to_string(),
                message: e.to_string(),
                source: Some(Box::new(e)),
            });
        }

        self.temp_data.save(&context.request, &temp_data);
        Ok(output)
    }

    /// Builds the execution context for one call: per-call overrides first,
    /// instance defaults second, synthesized minimal values last.
    fn action_context(&self, overrides: &RenderOverrides) -> ActionContext {
        let request = overrides
            .request
            .clone()
            .or_else(|| self.defaults.request.clone())
            .unwrap_or_else(|| RequestContext::new(self.services.clone()));
        let route = overrides
            .route
            .clone()
            .or_else(|| self.defaults.route.clone())
            .unwrap_or_default();
        let action = overrides
            .action
            .clone()
            .or_else(|| self.defaults.action.clone())
            .unwrap_or_default();

        ActionContext {
            request,
            route,
            action,
        }
    }

    /// Resolves a view: direct lookup first, contextual search second. The
    /// first hit wins and stops the search. A double miss produces
    /// [`ViewError::NotFound`] listing direct locations, then contextual
    /// locations.
    fn resolve(
        &self,
        context: &ActionContext,
        view: &str,
        main_page: bool,
    ) -> Result<Arc<dyn View>> {
        let direct = match self.locator.get_view(None, view, main_page) {
            ViewLookup::Found(found) => return Ok(found),
            ViewLookup::NotFound { searched } => searched,
        };

        match self.locator.find_view(context, view, main_page) {
            ViewLookup::Found(found) => Ok(found),
            ViewLookup::NotFound { searched } => {
                let mut all = direct;
                all.extend(searched);
                Err(ViewError::NotFound {
                    name: view.to_string(),
                    searched: all,
                })
            }
        }
    }
}
