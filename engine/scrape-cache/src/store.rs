//! The cache store trait

use crate::error::Result;

/// A single persistent key namespace.
///
/// Entries are never invalidated: once a key is written, later lookups return
/// the stored value for as long as the backing store exists. Implementations
/// must make `put` durable before returning so an interrupted run loses at
/// most the value that was being computed.
pub trait CacheStore<K, V> {
    /// Look up a key
    fn get(&self, key: &K) -> Option<V>;

    /// Whether a key has been written
    fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a value and persist it immediately
    fn put(&mut self, key: K, value: V) -> Result<()>;

    /// Force the current contents to durable storage
    fn flush(&mut self) -> Result<()>;

    /// All entries in key order
    fn entries(&self) -> Vec<(K, V)>;

    /// Number of entries
    fn len(&self) -> usize;

    /// Whether the store holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
