use super::MapBuilder;
use crate::{ConcurrentMap, Policy};

use fnv::FnvBuildHasher;
use parking_lot::Mutex;
use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt,
    hash::{BuildHasher, Hash},
    sync::Arc,
};

/// A thread-safe hash map guarded by a single lock.
///
/// Every `insert` and `get` takes the same mutex, so all operations on the map
/// are serialized no matter which keys they touch. Use
/// [`PartitionedMap`][part-map-struct] to let operations on unrelated keys run
/// in parallel.
///
/// # Examples
///
/// ```rust
/// use partmap::sync::LockedMap;
///
/// let map = LockedMap::new();
/// map.insert("key0".to_string(), 0);
/// assert_eq!(map.get("key0"), Some(0));
/// assert_eq!(map.get("key1"), None);
/// ```
///
/// [part-map-struct]: ./struct.PartitionedMap.html
pub struct LockedMap<K, V, S = FnvBuildHasher> {
    inner: Arc<Inner<K, V, S>>,
}

impl<K, V, S> Clone for LockedMap<K, V, S> {
    /// Makes a clone of this shared map.
    ///
    /// This operation is cheap as it only creates a thread-safe reference
    /// counted pointer to the shared `HashMap`.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, S> fmt::Debug for LockedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedMap")
            .field("name", &self.inner.name)
            .finish()
    }
}

impl<K, V> LockedMap<K, V, FnvBuildHasher>
where
    K: Hash + Eq,
{
    /// Constructs a new, empty `LockedMap<K, V>`.
    pub fn new() -> Self {
        Self::with_everything(None, None, FnvBuildHasher::default())
    }

    /// Returns a [`MapBuilder`][builder-struct], which can build a `LockedMap`
    /// with various configuration knobs.
    ///
    /// [builder-struct]: ./struct.MapBuilder.html
    pub fn builder() -> MapBuilder<K, V, LockedMap<K, V, FnvBuildHasher>> {
        MapBuilder::new()
    }
}

impl<K, V> Default for LockedMap<K, V, FnvBuildHasher>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> LockedMap<K, V, S> {
    /// Returns the map's name.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Returns a read-only policy of this map. A `LockedMap` always reports
    /// one partition.
    pub fn policy(&self) -> Policy {
        Policy::new(self.inner.name.clone(), 1, self.inner.initial_capacity)
    }

    /// Returns the number of entries in this map.
    pub fn entry_count(&self) -> u64 {
        self.inner.map.lock().len() as u64
    }
}

impl<K, V, S> LockedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub(crate) fn with_everything(
        name: Option<String>,
        initial_capacity: Option<usize>,
        build_hasher: S,
    ) -> Self {
        #[cfg(feature = "logging")]
        log::debug!(
            "{}Created a map guarded by a single lock",
            crate::common::name_prefix(name.as_deref())
        );

        let map =
            HashMap::with_capacity_and_hasher(initial_capacity.unwrap_or_default(), build_hasher);
        Self {
            inner: Arc::new(Inner {
                name,
                initial_capacity,
                map: Mutex::new(map),
            }),
        }
    }

    /// Returns `true` if the map contains a value for the key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash` and
    /// `Eq` on the borrowed form _must_ match those for the key type.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.map.lock().contains_key(key)
    }

    /// Returns a _clone_ of the value corresponding to the key, or `None` if
    /// the key is not present.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash` and
    /// `Eq` on the borrowed form _must_ match those for the key type.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.map.lock().get(key).cloned()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already has this key present, the value is replaced.
    pub fn insert(&self, key: K, value: V) {
        let _replaced = self.inner.map.lock().insert(key, value);
    }
}

impl<K, V, S> ConcurrentMap<K, V> for LockedMap<K, V, S>
where
    K: Hash + Eq,
    V: Clone,
    S: BuildHasher,
{
    fn insert(&self, key: K, value: V) {
        LockedMap::insert(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        LockedMap::get(self, key)
    }
}

struct Inner<K, V, S> {
    name: Option<String>,
    initial_capacity: Option<usize>,
    map: Mutex<HashMap<K, V, S>>,
}
