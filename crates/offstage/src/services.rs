//! A type-safe service locator for out-of-request rendering.
//!
//! When a view renders inside a live web request, the host framework hands it
//! whatever services it needs. Rendering outside a request (background jobs,
//! email pipelines) has no such ambient supply, so the synthetic request
//! carries a [`Services`] map instead: a type-keyed registry the hosting
//! application fills once and every synthesized context shares.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A service registry keyed by [`TypeId`].
///
/// Services are stored as `Arc<dyn Any + Send + Sync>` and retrieved by their
/// concrete type via [`get`](Services::get). Cloning is cheap: the stored
/// `Arc`s are shared, not the services themselves.
///
/// # Example
///
/// ```rust
/// use offstage::Services;
///
/// struct Mailer { from: String }
///
/// let mut services = Services::new();
/// services.insert(Mailer { from: "digest@example.com".into() });
///
/// let mailer = services.get::<Mailer>().unwrap();
/// assert_eq!(mailer.from, "digest@example.com");
/// ```
#[derive(Clone, Default)]
pub struct Services {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Services {
    /// Creates an empty service registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts a service, keyed by `T`'s [`TypeId`].
    ///
    /// A previously registered service of the same type is replaced.
    pub fn insert<T: Send + Sync + 'static>(&mut self, service: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(service));
    }

    /// Retrieves a shared handle to a previously registered service.
    ///
    /// Returns `None` if no service of type `T` has been registered.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|entry| entry.downcast::<T>().ok())
    }

    /// Returns `true` if a service of type `T` is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("len", &self.entries.len())
            .finish()
    }
}
