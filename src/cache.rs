use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

/// Argument-keyed memoization. The report functions stay pure; callers that
/// want caching wrap them in a `Memo` keyed by their inputs. Results are
/// shared via `Arc`, so repeated lookups hand out the same computed value.
#[derive(Debug, Default)]
pub struct Memo<K, V> {
    inner: Mutex<HashMap<K, Arc<V>>>,
}

impl<K: Eq + Hash, V> Memo<K, V> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&self, key: K, build: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        let mut map = self.inner.lock().unwrap();
        if let Some(hit) = map.get(&key) {
            return Arc::clone(hit);
        }
        let value = Arc::new(build());
        map.insert(key, Arc::clone(&value));
        value
    }

    /// Drop every cached value. Called when the underlying input changes
    /// (e.g. the dataset file is reloaded).
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }
}
