//! Keyed in-memory record storage.
//!
//! Backs the catalog (authors, students, products, lessons) and the access
//! grant log. These are flat records without allocation logic; the group
//! sets themselves live behind [`crate::group_store::GroupStore`].

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Key/value store abstraction for flat records.
pub trait RecordStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn upsert(&self, key: K, value: V);
    fn list(&self) -> Vec<V>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V, S> RecordStore<K, V> for Arc<S>
where
    S: RecordStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) {
        (**self).upsert(key, value)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// In-memory record store for tests/dev.
#[derive(Debug)]
pub struct InMemoryRecordStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryRecordStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryRecordStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecordStore<K, V> for InMemoryRecordStore<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        self.read().get(key).cloned()
    }

    fn upsert(&self, key: K, value: V) {
        self.write().insert(key, value);
    }

    fn list(&self) -> Vec<V> {
        self.read().values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}

// A panic elsewhere cannot leave a half-inserted entry, so a poisoned map is
// still consistent: recover it instead of dropping reads and writes.
impl<K, V> InMemoryRecordStore<K, V> {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, V>> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("record store lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, V>> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("record store lock poisoned; recovering");
            poisoned.into_inner()
        })
    }
}
