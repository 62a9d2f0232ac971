use super::{LockedMap, PartitionedMap};
use crate::ConfigError;

use fnv::FnvBuildHasher;
use std::{
    hash::{BuildHasher, Hash},
    marker::PhantomData,
};

/// Builds a [`LockedMap`][locked-map-struct] or
/// [`PartitionedMap`][part-map-struct] with various configuration knobs.
///
/// [locked-map-struct]: ./struct.LockedMap.html
/// [part-map-struct]: ./struct.PartitionedMap.html
///
/// # Examples
///
/// ```rust
/// use partmap::sync::MapBuilder;
///
/// let map = MapBuilder::new()
///     .name("sessions")
///     // Reserve room for 10,000 entries across all partitions.
///     .initial_capacity(10_000)
///     // Split the keys across 64 independently locked partitions.
///     .partitions(64)
///     .build()
///     .expect("64 is a valid partition count");
///
/// map.insert("alice".to_string(), 1);
/// assert_eq!(map.get("alice"), Some(1));
/// assert_eq!(map.num_partitions(), 64);
/// ```
///
#[must_use]
pub struct MapBuilder<K, V, M> {
    name: Option<String>,
    initial_capacity: Option<usize>,
    num_partitions: Option<usize>,
    map_type: PhantomData<fn() -> (K, V, M)>,
}

impl<K, V> Default for MapBuilder<K, V, LockedMap<K, V, FnvBuildHasher>>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            name: None,
            initial_capacity: None,
            num_partitions: None,
            map_type: PhantomData,
        }
    }
}

impl<K, V> MapBuilder<K, V, LockedMap<K, V, FnvBuildHasher>>
where
    K: Eq + Hash,
{
    /// Constructs a new `MapBuilder` with no settings. It builds a `LockedMap`
    /// unless `partitions` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of partitions of the map.
    ///
    /// The count is validated when the map is built, so `build` returns an
    /// error for zero.
    pub fn partitions(
        self,
        num_partitions: usize,
    ) -> MapBuilder<K, V, PartitionedMap<K, V, FnvBuildHasher>> {
        MapBuilder {
            name: self.name,
            initial_capacity: self.initial_capacity,
            num_partitions: Some(num_partitions),
            map_type: PhantomData,
        }
    }

    /// Builds a `LockedMap<K, V>`.
    ///
    /// If you want to build a `PartitionedMap<K, V>`, call `partitions` method
    /// before calling this method.
    pub fn build(self) -> LockedMap<K, V, FnvBuildHasher> {
        self.build_with_hasher(FnvBuildHasher::default())
    }

    /// Builds a `LockedMap<K, V, S>`, with the given `hasher`.
    ///
    /// If you want to build a `PartitionedMap<K, V>`, call `partitions` method
    /// before calling this method.
    pub fn build_with_hasher<S>(self, hasher: S) -> LockedMap<K, V, S>
    where
        S: BuildHasher,
    {
        LockedMap::with_everything(self.name, self.initial_capacity, hasher)
    }
}

impl<K, V> MapBuilder<K, V, PartitionedMap<K, V, FnvBuildHasher>>
where
    K: Eq + Hash,
{
    /// Builds a `PartitionedMap<K, V>`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPartitions`] if the number of partitions is 0.
    pub fn build(self) -> Result<PartitionedMap<K, V, FnvBuildHasher>, ConfigError> {
        self.build_with_hasher(FnvBuildHasher::default())
    }

    /// Builds a `PartitionedMap<K, V, S>`, with the given `hasher`.
    ///
    /// The hasher picks the partition of a key and is also cloned into every
    /// partition's `HashMap`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPartitions`] if the number of partitions is 0.
    pub fn build_with_hasher<S>(
        self,
        hasher: S,
    ) -> Result<PartitionedMap<K, V, S>, ConfigError>
    where
        S: BuildHasher + Clone,
    {
        PartitionedMap::with_everything(
            self.name,
            self.initial_capacity,
            self.num_partitions.unwrap_or_default(),
            hasher,
        )
    }
}

impl<K, V, M> MapBuilder<K, V, M> {
    /// Sets the name of the map. The name is shown in log messages and in the
    /// `Debug` output.
    pub fn name(self, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..self
        }
    }

    /// Sets the initial capacity of the whole map.
    ///
    /// A partitioned map splits it evenly, rounding up, across its partitions.
    pub fn initial_capacity(self, capacity: usize) -> Self {
        Self {
            initial_capacity: Some(capacity),
            ..self
        }
    }
}
