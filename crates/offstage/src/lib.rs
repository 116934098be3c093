//! # Offstage - Render Web Views to Strings
//!
//! `offstage` renders a web application's views to in-memory strings instead
//! of an HTTP response, so the markup can be reused: emailed, cached, stuffed
//! into a JSON payload, produced from a background job. It is a thin adapter
//! over [MiniJinja] — view location, context synthesis and error shaping live
//! here; the templating language does not.
//!
//! [MiniJinja]: https://docs.rs/minijinja
//!
//! ## Core Concepts
//!
//! - [`ViewRenderer`]: the render surface — view name + model in, `String` out
//! - [`ViewLocator`]: turns a name into an invocable view, by exact path
//!   first and by contextual convention second
//! - [`JinjaViewLocator`]: the built-in locator over view directories and
//!   embedded sources
//! - [`RenderOverrides`]: a simulated request/route/descriptor bundle for
//!   rendering outside a live request
//! - [`TempDataProvider`]: the short-lived key/value store views read as
//!   `temp_data`
//! - [`Services`]: type-keyed registry standing in for request services
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use serde::Serialize;
//! use offstage::{JinjaViewLocator, NullTempDataProvider, Services, ViewRenderer};
//!
//! #[derive(Serialize)]
//! struct Welcome {
//!     name: String,
//! }
//!
//! let mut locator = JinjaViewLocator::new();
//! locator.add_embedded("welcome.jinja", "Hello, {{ name }}!");
//!
//! let renderer = ViewRenderer::new(
//!     Arc::new(locator),
//!     Arc::new(NullTempDataProvider),
//!     Services::new(),
//! );
//!
//! let markup = renderer.render("welcome", &Welcome { name: "Ada".into() }).unwrap();
//! assert_eq!(markup, "Hello, Ada!");
//! ```
//!
//! ## View Resolution
//!
//! A render first tries the name as an exact path (`"mail/welcome"`,
//! extension optional), then falls back to a contextual search that expands
//! configured location formats with route values:
//!
//! ```rust
//! use std::sync::Arc;
//! use offstage::{
//!     JinjaViewLocator, NullTempDataProvider, RenderOverrides, RouteData, Services,
//!     ViewRenderer,
//! };
//!
//! let mut locator = JinjaViewLocator::new();
//! locator.add_embedded("mail/welcome.jinja", "welcome mail");
//!
//! let renderer = ViewRenderer::new(
//!     Arc::new(locator),
//!     Arc::new(NullTempDataProvider),
//!     Services::new(),
//! );
//!
//! // "welcome" alone misses directly, but the {controller}/{name} format
//! // finds mail/welcome.jinja under the simulated route.
//! let markup = renderer.render_with(
//!     "welcome",
//!     &serde_json::Value::Null,
//!     &RenderOverrides::new().with_route(RouteData::new().with("controller", "mail")),
//! ).unwrap();
//! assert_eq!(markup, "welcome mail");
//! ```
//!
//! When both lookups miss, the error enumerates every searched location —
//! direct candidates first, contextual candidates after.
//!
//! ## Simulating a Request
//!
//! Views often read request state. A [`RequestContext`] override is used
//! verbatim, so background renders can impersonate any request shape:
//!
//! ```rust
//! use std::sync::Arc;
//! use offstage::{
//!     JinjaViewLocator, NullTempDataProvider, RenderOverrides, RequestContext, Services,
//!     ViewRenderer,
//! };
//!
//! let mut locator = JinjaViewLocator::new();
//! locator.add_embedded("echo.jinja", "{{ request.method }} {{ request.path }}");
//!
//! let services = Services::new();
//! let renderer = ViewRenderer::new(
//!     Arc::new(locator),
//!     Arc::new(NullTempDataProvider),
//!     services.clone(),
//! );
//!
//! let markup = renderer.render_with(
//!     "echo",
//!     &serde_json::Value::Null,
//!     &RenderOverrides::new()
//!         .with_request(RequestContext::new(services).with_method("POST").with_path("/jobs")),
//! ).unwrap();
//! assert_eq!(markup, "POST /jobs");
//! ```

pub mod context;
mod error;
pub mod locator;
pub mod prelude;
mod renderer;
mod services;
mod temp_data;
pub mod view;

pub use context::{ActionContext, ActionDescriptor, RequestContext, RouteData};
pub use error::{Result, ViewError};
pub use locator::{JinjaViewLocator, LocatorConfig, ViewLocator};
pub use renderer::{RenderOverrides, ViewRenderer};
pub use services::Services;
pub use temp_data::{InMemoryTempDataProvider, NullTempDataProvider, TempData, TempDataProvider};
pub use view::{RenderOptions, View, ViewContext, ViewLookup};
