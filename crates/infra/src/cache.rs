//! Host object cache boundary.
//!
//! The host caches some lookups (notably an entry's association list) in a
//! process-wide object cache. The bridge only ever needs to read through it
//! and to evict a single key.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value as JsonValue;

/// Default prefix of the host's association-list cache key.
pub const DEFAULT_ASSOCIATION_CACHE_PREFIX: &str = "EP:ECF:Ass:";

/// Key under which the host caches the association list of `content_id`.
pub fn association_cache_key(prefix: &str, content_id: u64) -> String {
    format!("{prefix}{content_id}")
}

pub trait ObjectCache: Send + Sync {
    fn get(&self, key: &str) -> Option<JsonValue>;
    fn insert(&self, key: String, value: JsonValue);
    fn remove(&self, key: &str);
}

impl<C> ObjectCache for Arc<C>
where
    C: ObjectCache + ?Sized,
{
    fn get(&self, key: &str) -> Option<JsonValue> {
        (**self).get(key)
    }

    fn insert(&self, key: String, value: JsonValue) {
        (**self).insert(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// In-memory object cache for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryObjectCache {
    inner: RwLock<HashMap<String, JsonValue>>,
}

impl InMemoryObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().map(|m| m.contains_key(key)).unwrap_or(false)
    }
}

impl ObjectCache for InMemoryObjectCache {
    fn get(&self, key: &str) -> Option<JsonValue> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn insert(&self, key: String, value: JsonValue) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(key);
        }
    }
}
