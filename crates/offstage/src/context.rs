//! Synthetic execution context for out-of-request rendering.
//!
//! Views conventionally expect the surroundings of a live web request: the
//! request itself, the matched route values, and a descriptor of the action
//! being executed. When rendering happens outside a request — from a job
//! queue, a cache warmer, an email pipeline — none of that exists, so this
//! module fabricates it. An [`ActionContext`] is either synthesized with
//! minimal defaults or supplied by the caller to simulate a specific
//! in-flight request.
//!
//! The request is exposed to templates as a `request` object and the merged
//! route values as `route`, so a view written for the web keeps working when
//! rendered offstage.

use std::collections::BTreeMap;
use std::sync::Arc;

use minijinja::value::Object;
use minijinja::Value;
use serde::{Deserialize, Serialize};

use crate::services::Services;

/// A synthetic HTTP request.
///
/// Carries just enough request shape for views to render: method, path,
/// headers, and the [`Services`] handle standing in for request services.
///
/// # Example
///
/// ```rust
/// use offstage::{RequestContext, Services};
///
/// let request = RequestContext::new(Services::new())
///     .with_method("POST")
///     .with_path("/jobs/digest")
///     .with_header("x-campaign", "spring");
///
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.header("x-campaign"), Some("spring"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: String,
    path: String,
    headers: BTreeMap<String, String>,
    services: Services,
}

impl RequestContext {
    /// Creates a minimal default request (`GET /`) bound to the given
    /// services.
    pub fn new(services: Services) -> Self {
        Self {
            method: "GET".to_string(),
            path: "/".to_string(),
            headers: BTreeMap::new(),
            services,
        }
    }

    /// Sets the request method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Adds a request header. Header names are stored lowercase.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Returns the request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a header value, if present. Lookup is by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Returns the services bound to this request.
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Converts the request into a template-visible value.
    ///
    /// Templates see `request.method`, `request.path` and `request.headers`.
    pub fn to_value(&self) -> Value {
        Value::from_object(RequestSnapshot {
            method: self.method.clone(),
            path: self.path.clone(),
            headers: self.headers.clone(),
        })
    }
}

/// Template-visible projection of a [`RequestContext`].
///
/// Services are deliberately absent: they are host-side collaborators, not
/// template data.
#[derive(Debug)]
struct RequestSnapshot {
    method: String,
    path: String,
    headers: BTreeMap<String, String>,
}

impl Object for RequestSnapshot {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "method" => Some(Value::from(self.method.clone())),
            "path" => Some(Value::from(self.path.clone())),
            "headers" => Some(Value::from_serialize(&self.headers)),
            _ => None,
        }
    }
}

/// Route values matched (or simulated) for the current render.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteData {
    values: BTreeMap<String, String>,
}

impl RouteData {
    /// Creates an empty route value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns a route value, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the underlying value map.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Returns `true` if no route values are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Describes the action a render is notionally executing under.
///
/// Outside a real request this is usually empty; callers simulating a
/// specific endpoint can name it and supply route value defaults that
/// [`RouteData`] entries override.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Machine name of the action, if any.
    pub name: Option<String>,
    /// Human-readable name of the action, if any.
    pub display_name: Option<String>,
    route_defaults: BTreeMap<String, String>,
}

impl ActionDescriptor {
    /// Creates an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the action name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a route value default. [`RouteData`] entries with the same key
    /// take precedence during resolution.
    #[must_use]
    pub fn with_route_default(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.route_defaults.insert(key.into(), value.into());
        self
    }

    /// Returns the descriptor-level route value defaults.
    pub fn route_defaults(&self) -> &BTreeMap<String, String> {
        &self.route_defaults
    }
}

/// The full execution context a render runs under.
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// The (synthetic) HTTP request.
    pub request: RequestContext,
    /// Route values for the render.
    pub route: RouteData,
    /// Descriptor of the notional action.
    pub action: ActionDescriptor,
}

impl ActionContext {
    /// Synthesizes a minimal default context bound to the given services:
    /// a `GET /` request, empty route data, empty descriptor.
    pub fn synthesize(services: Services) -> Self {
        Self {
            request: RequestContext::new(services),
            route: RouteData::new(),
            action: ActionDescriptor::new(),
        }
    }

    /// Returns the effective route values: descriptor defaults overlaid with
    /// [`RouteData`] entries.
    pub fn route_values(&self) -> BTreeMap<String, String> {
        let mut merged = self.action.route_defaults().clone();
        for (key, value) in self.route.values() {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}
