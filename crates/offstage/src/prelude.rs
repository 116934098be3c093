//! Convenience re-exports of the common surface.
//!
//! ```rust
//! use offstage::prelude::*;
//! ```

pub use crate::context::{ActionContext, ActionDescriptor, RequestContext, RouteData};
pub use crate::error::{Result, ViewError};
pub use crate::locator::{JinjaViewLocator, LocatorConfig, ViewLocator};
pub use crate::renderer::{RenderOverrides, ViewRenderer};
pub use crate::services::Services;
pub use crate::temp_data::{
    InMemoryTempDataProvider, NullTempDataProvider, TempData, TempDataProvider,
};
pub use crate::view::{RenderOptions, View, ViewContext, ViewLookup};
