//! In-memory cache backend

use crate::error::Result;
use crate::store::CacheStore;
use std::collections::BTreeMap;

/// Cache that lives only as long as the process.
///
/// Counts writes so callers can assert how often a store was touched.
#[derive(Debug, Clone)]
pub struct MemoryCache<K, V> {
    entries: BTreeMap<K, V>,
    writes: usize,
}

impl<K: Ord, V> MemoryCache<K, V> {
    pub fn new() -> Self {
        Self { entries: BTreeMap::new(), writes: 0 }
    }

    /// Number of `put` calls since creation
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl<K: Ord, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheStore<K, V> for MemoryCache<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn put(&mut self, key: K, value: V) -> Result<()> {
        self.entries.insert(key, value);
        self.writes += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
