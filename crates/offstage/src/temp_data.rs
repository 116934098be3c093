//! Short-lived key/value data conventionally available to views.
//!
//! Web frameworks keep a "temp data" store alive across one redirect so a
//! handler can leave a note (a flash message, a one-shot flag) for the next
//! view. Rendering offstage still wants the same channel: a job can stash
//! values before a render and the view reads them as `temp_data.<key>`.
//!
//! Storage is pluggable through [`TempDataProvider`]. The default
//! [`NullTempDataProvider`] keeps nothing, which is right for one-shot
//! renders; [`InMemoryTempDataProvider`] persists buckets between sequential
//! renders that share a session header.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::context::RequestContext;

/// Header used by [`InMemoryTempDataProvider`] to pick a bucket.
const SESSION_HEADER: &str = "x-session-id";

/// An ordered key/value store of JSON values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempData {
    values: BTreeMap<String, serde_json::Value>,
}

impl TempData {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous entry under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns a value, if present.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Removes and returns a value.
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.remove(key)
    }

    /// Returns the underlying map, as exposed to templates.
    pub fn values(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.values
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Loads and persists [`TempData`] around a render.
///
/// `load` runs before the view renders; `save` runs after a successful
/// render with whatever the store then contains.
pub trait TempDataProvider: Send + Sync {
    /// Loads the temp data for the given request.
    fn load(&self, request: &RequestContext) -> TempData;

    /// Persists the temp data for the given request.
    fn save(&self, request: &RequestContext, data: &TempData);
}

/// A provider that keeps nothing: loads empty, discards saves.
#[derive(Debug, Default)]
pub struct NullTempDataProvider;

impl TempDataProvider for NullTempDataProvider {
    fn load(&self, _request: &RequestContext) -> TempData {
        TempData::new()
    }

    fn save(&self, _request: &RequestContext, _data: &TempData) {}
}

/// A provider backed by process memory.
///
/// Buckets are keyed by the `x-session-id` request header; requests without
/// the header share a single anonymous bucket. Suitable for background jobs
/// that render several views in sequence and pass values along.
#[derive(Debug, Default)]
pub struct InMemoryTempDataProvider {
    buckets: Mutex<HashMap<String, BTreeMap<String, serde_json::Value>>>,
}

impl InMemoryTempDataProvider {
    /// Creates a provider with no stored buckets.
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket_key(request: &RequestContext) -> String {
        request.header(SESSION_HEADER).unwrap_or_default().to_string()
    }
}

impl TempDataProvider for InMemoryTempDataProvider {
    fn load(&self, request: &RequestContext) -> TempData {
        let buckets = self.buckets.lock().expect("temp data store poisoned");
        let mut data = TempData::new();
        if let Some(bucket) = buckets.get(&Self::bucket_key(request)) {
            for (key, value) in bucket {
                data.insert(key.clone(), value.clone());
            }
        }
        data
    }

    fn save(&self, request: &RequestContext, data: &TempData) {
        let mut buckets = self.buckets.lock().expect("temp data store poisoned");
        buckets.insert(Self::bucket_key(request), data.values().clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Services;
    use serde_json::json;

    fn request() -> RequestContext {
        RequestContext::new(Services::new())
    }

    #[test]
    fn test_temp_data_insert_get_remove() {
        let mut data = TempData::new();
        data.insert("notice", "saved");

        assert_eq!(data.get("notice"), Some(&json!("saved")));
        assert_eq!(data.remove("notice"), Some(json!("saved")));
        assert!(data.is_empty());
    }

    #[test]
    fn test_null_provider_discards() {
        let provider = NullTempDataProvider;
        let request = request();

        let mut data = TempData::new();
        data.insert("notice", "saved");
        provider.save(&request, &data);

        assert!(provider.load(&request).is_empty());
    }

    #[test]
    fn test_in_memory_provider_round_trips() {
        let provider = InMemoryTempDataProvider::new();
        let request = request();

        let mut data = TempData::new();
        data.insert("count", 3);
        provider.save(&request, &data);

        let loaded = provider.load(&request);
        assert_eq!(loaded.get("count"), Some(&json!(3)));
    }

    #[test]
    fn test_in_memory_provider_buckets_by_session() {
        let provider = InMemoryTempDataProvider::new();
        let alice = request().with_header("x-session-id", "alice");
        let bob = request().with_header("x-session-id", "bob");

        let mut data = TempData::new();
        data.insert("who", "alice");
        provider.save(&alice, &data);

        assert_eq!(provider.load(&alice).get("who"), Some(&json!("alice")));
        assert!(provider.load(&bob).is_empty());
    }
}
