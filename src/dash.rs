//! Provides a concurrent map built upon [`dashmap::DashMap`][dashmap], the
//! ecosystem's ready-made concurrent hash map.
//!
//! To use this module, enable a crate feature called "dash".
//!
//! [dashmap]: https://docs.rs/dashmap/*/dashmap/struct.DashMap.html

use crate::ConcurrentMap;

use dashmap::DashMap;
use fnv::FnvBuildHasher;
use std::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, Hash},
    sync::Arc,
};

/// A thread-safe concurrent hash map backed by a `DashMap`.
///
/// `DashMap` shards its entries internally with read-write locks, so unlike
/// [`PartitionedMap`][part-map-struct] concurrent `get`s on the same shard do
/// not exclude each other. The number of shards is chosen by `DashMap` from
/// the number of CPUs.
///
/// # Examples
///
/// ```rust
/// use partmap::dash::DashedMap;
///
/// let map = DashedMap::new();
/// map.insert("key0".to_string(), 0);
/// assert_eq!(map.get("key0"), Some(0));
/// ```
///
/// [part-map-struct]: ../sync/struct.PartitionedMap.html
pub struct DashedMap<K, V, S = FnvBuildHasher> {
    map: Arc<DashMap<K, V, S>>,
}

impl<K, V, S> Clone for DashedMap<K, V, S> {
    /// Makes a clone of this shared map.
    ///
    /// This operation is cheap as it only creates a thread-safe reference
    /// counted pointer to the shared `DashMap`.
    fn clone(&self) -> Self {
        Self {
            map: Arc::clone(&self.map),
        }
    }
}

impl<K, V, S> fmt::Debug for DashedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashedMap").finish_non_exhaustive()
    }
}

impl<K, V> DashedMap<K, V, FnvBuildHasher>
where
    K: Hash + Eq,
{
    /// Constructs a new, empty `DashedMap<K, V>`.
    pub fn new() -> Self {
        Self::with_capacity_and_hasher(0, FnvBuildHasher::default())
    }
}

impl<K, V> Default for DashedMap<K, V, FnvBuildHasher>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> DashedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Constructs a new, empty `DashedMap<K, V, S>` with room for `capacity`
    /// entries, using `build_hasher` to hash the keys.
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Self {
        Self {
            map: Arc::new(DashMap::with_capacity_and_hasher(capacity, build_hasher)),
        }
    }

    /// Returns the number of entries in this map.
    pub fn entry_count(&self) -> u64 {
        self.map.len() as u64
    }

    /// Returns `true` if the map contains a value for the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Returns a _clone_ of the value corresponding to the key, or `None` if
    /// the key is not present.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already has this key present, the value is replaced.
    pub fn insert(&self, key: K, value: V) {
        let _replaced = self.map.insert(key, value);
    }
}

impl<K, V, S> ConcurrentMap<K, V> for DashedMap<K, V, S>
where
    K: Hash + Eq,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn insert(&self, key: K, value: V) {
        DashedMap::insert(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        DashedMap::get(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::DashedMap;

    #[test]
    fn basic_single_thread() {
        let map = DashedMap::new();

        map.insert("a", "alice");
        map.insert("b", "bob");
        assert_eq!(map.get(&"a"), Some("alice"));
        assert!(map.contains_key(&"b"));
        assert_eq!(map.get(&"c"), None);

        map.insert("a", "alex");
        assert_eq!(map.get(&"a"), Some("alex"));
        assert_eq!(map.entry_count(), 2);
    }
}
