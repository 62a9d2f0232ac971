use super::{MapBuilder, DEFAULT_NUM_PARTITIONS};
use crate::{
    common::error::{ConfigError, TryLockError},
    partitioner::Partitioner,
    ConcurrentMap, Policy,
};

use crossbeam_utils::CachePadded;
use fnv::FnvBuildHasher;
use parking_lot::Mutex;
use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt,
    hash::{BuildHasher, Hash},
    num::NonZeroUsize,
    sync::Arc,
    time::Duration,
};

/// A thread-safe concurrent hash map, partitioned into independently locked
/// segments.
///
/// Every key belongs to exactly one segment, chosen by hashing the key. Each
/// segment is a `HashMap` guarded by its own mutex, so operations on keys in
/// different segments never wait for each other. There is no lock over the
/// whole map. An operation locks only the one segment its key belongs to and
/// never holds two segment locks at the same time.
///
/// Both `insert` and `get` take the segment lock exclusively. Operations on the
/// same segment are serialized in whatever order they acquire the lock; there
/// is no fairness or FIFO guarantee.
///
/// The number of segments is fixed at creation time. The map never resizes or
/// rehashes its segment array.
///
/// # Examples
///
/// ```rust
/// use partmap::sync::PartitionedMap;
///
/// use std::thread;
///
/// let map = PartitionedMap::new(32).expect("32 is a valid partition count");
///
/// let writers: Vec<_> = (0..10)
///     .map(|i| {
///         // Cloning the map is cheap. All clones share the same segments.
///         let map = map.clone();
///         thread::spawn(move || map.insert(format!("key{i}"), i))
///     })
///     .collect();
///
/// writers.into_iter().for_each(|t| t.join().expect("writer panicked"));
///
/// for i in 0..10 {
///     assert_eq!(map.get(format!("key{i}").as_str()), Some(i));
/// }
/// assert_eq!(map.get("key10"), None);
/// ```
///
/// # Hashing Algorithm
///
/// By default, `PartitionedMap` uses FNV-1a, a fast non-cryptographic hash,
/// both to pick a segment and inside every segment. It has no protection
/// against HashDoS attacks. If keys may come from an untrusted source, build
/// the map with a keyed hasher such as `std::collections::hash_map::RandomState`
/// using [`MapBuilder::build_with_hasher`][build-with-hasher].
///
/// [build-with-hasher]: ./struct.MapBuilder.html#method.build_with_hasher
pub struct PartitionedMap<K, V, S = FnvBuildHasher> {
    inner: Arc<Inner<K, V, S>>,
}

impl<K, V, S> Clone for PartitionedMap<K, V, S> {
    /// Makes a clone of this shared map.
    ///
    /// This operation is cheap as it only creates a thread-safe reference
    /// counted pointer to the shared segments.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, S> fmt::Debug for PartitionedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionedMap")
            .field("name", &self.inner.name)
            .field("num_partitions", &self.inner.segments.len())
            .finish()
    }
}

impl<K, V> PartitionedMap<K, V, FnvBuildHasher>
where
    K: Hash + Eq,
{
    /// Constructs a new, empty `PartitionedMap<K, V>` with `num_partitions`
    /// segments.
    ///
    /// All segments are allocated up front. To give the map a name or an
    /// initial capacity, or to use another hasher, use the
    /// [`MapBuilder`][builder-struct].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPartitions`] if `num_partitions` is 0.
    ///
    /// [builder-struct]: ./struct.MapBuilder.html
    pub fn new(num_partitions: usize) -> Result<Self, ConfigError> {
        Self::with_everything(None, None, num_partitions, FnvBuildHasher::default())
    }

    /// Returns a [`MapBuilder`][builder-struct], which can build a
    /// `PartitionedMap` with various configuration knobs.
    ///
    /// [builder-struct]: ./struct.MapBuilder.html
    pub fn builder(
        num_partitions: usize,
    ) -> MapBuilder<K, V, PartitionedMap<K, V, FnvBuildHasher>> {
        MapBuilder::new().partitions(num_partitions)
    }
}

impl<K, V> Default for PartitionedMap<K, V, FnvBuildHasher>
where
    K: Hash + Eq,
{
    /// Constructs a new, empty map with
    /// [`DEFAULT_NUM_PARTITIONS`][crate::sync::DEFAULT_NUM_PARTITIONS] segments.
    fn default() -> Self {
        Self::with_num_partitions(
            None,
            None,
            DEFAULT_NUM_PARTITIONS,
            FnvBuildHasher::default(),
        )
    }
}

impl<K, V, S> PartitionedMap<K, V, S> {
    /// Returns the map's name.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Returns a read-only policy of this map.
    pub fn policy(&self) -> Policy {
        Policy::new(
            self.inner.name.clone(),
            self.num_partitions(),
            self.inner.initial_capacity,
        )
    }

    /// Returns the number of segments. It never changes after construction.
    pub fn num_partitions(&self) -> usize {
        self.inner.segments.len()
    }

    /// Returns the number of entries in this map.
    ///
    /// The segments are locked and counted one after another, never two at
    /// once. Under concurrent insertions the value returned is _an estimate_:
    /// entries inserted into a segment after it was counted are not included.
    pub fn entry_count(&self) -> u64 {
        self.inner
            .segments
            .iter()
            .map(|seg| seg.lock().len() as u64)
            .sum()
    }
}

impl<K, V, S> PartitionedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    pub(crate) fn with_everything(
        name: Option<String>,
        initial_capacity: Option<usize>,
        num_partitions: usize,
        build_hasher: S,
    ) -> Result<Self, ConfigError> {
        match NonZeroUsize::new(num_partitions) {
            Some(n) => Ok(Self::with_num_partitions(
                name,
                initial_capacity,
                n,
                build_hasher,
            )),
            None => {
                #[cfg(feature = "logging")]
                log::warn!(
                    "{}Rejected a partitioned map with zero partitions",
                    crate::common::name_prefix(name.as_deref())
                );
                Err(ConfigError::ZeroPartitions)
            }
        }
    }

    fn with_num_partitions(
        name: Option<String>,
        initial_capacity: Option<usize>,
        num_partitions: NonZeroUsize,
        build_hasher: S,
    ) -> Self {
        Self {
            inner: Arc::new(Inner::new(
                name,
                initial_capacity,
                num_partitions,
                build_hasher,
            )),
        }
    }

    /// Returns the index of the segment `key` belongs to, whether or not the
    /// key is present in the map.
    ///
    /// The index is in `0..self.num_partitions()` and is the same every time
    /// it is computed for the same key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash` and
    /// `Eq` on the borrowed form _must_ match those for the key type.
    pub fn partition_of<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.partitioner.partition(key)
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
        self.inner.select(key).1.lock().contains_key(key)
    }

    /// Returns a _clone_ of the value corresponding to the key, or `None` if
    /// the key is not present.
    ///
    /// Blocks until the lock of the key's segment is acquired.
    ///
    /// If you want to store values that will be expensive to clone, wrap them
    /// by `std::sync::Arc` before storing in a map. [`Arc`][rustdoc-std-arc] is
    /// a thread-safe reference-counted pointer and its `clone()` method is
    /// cheap.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash` and
    /// `Eq` on the borrowed form _must_ match those for the key type.
    ///
    /// [rustdoc-std-arc]: https://doc.rust-lang.org/stable/std/sync/struct.Arc.html
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.select(key).1.lock().get(key).cloned()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already has this key present, the value is replaced. Once
    /// `insert` returns, the new value is visible to every later `get` of the
    /// key from any thread.
    ///
    /// Blocks until the lock of the key's segment is acquired. The lock is
    /// released before the replaced value, if any, is dropped.
    pub fn insert(&self, key: K, value: V) {
        let (_, segment) = self.inner.select(&key);
        // Drop the replaced value after the lock is released.
        let _replaced = segment.lock().insert(key, value);
    }

    /// Like [`get`](#method.get), but gives up if the lock of the key's
    /// segment cannot be acquired within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TryLockError::Timeout`] if the lock was not acquired in time.
    pub fn try_get_for<Q>(
        &self,
        key: &Q,
        timeout: Duration,
    ) -> Result<Option<V>, TryLockError<()>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let (partition, segment) = self.inner.select(key);
        match segment.try_lock_for(timeout) {
            Some(map) => Ok(map.get(key).cloned()),
            None => Err(self.inner.timed_out(partition, ())),
        }
    }

    /// Like [`insert`](#method.insert), but gives up if the lock of the key's
    /// segment cannot be acquired within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TryLockError::Timeout`] if the lock was not acquired in time.
    /// The error hands the key and the value back to the caller; nothing was
    /// inserted.
    pub fn try_insert_for(
        &self,
        key: K,
        value: V,
        timeout: Duration,
    ) -> Result<(), TryLockError<(K, V)>> {
        let (partition, segment) = self.inner.select(&key);
        // The guard is dropped at the end of the match, before the replaced
        // value.
        let _replaced = match segment.try_lock_for(timeout) {
            Some(mut map) => map.insert(key, value),
            None => return Err(self.inner.timed_out(partition, (key, value))),
        };
        Ok(())
    }
}

impl<K, V, S> ConcurrentMap<K, V> for PartitionedMap<K, V, S>
where
    K: Hash + Eq,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn insert(&self, key: K, value: V) {
        PartitionedMap::insert(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        PartitionedMap::get(self, key)
    }
}

// For unit tests.
#[cfg(test)]
impl<K, V, S> PartitionedMap<K, V, S> {
    fn segment_len(&self, index: usize) -> usize {
        self.inner.segments[index].lock().len()
    }

    fn segment_capacity(&self, index: usize) -> usize {
        self.inner.segments[index].lock().capacity()
    }
}

// Each segment sits on its own cache line so that taking one segment's lock
// does not invalidate the line holding its neighbour's lock.
type Segment<K, V, S> = CachePadded<Mutex<HashMap<K, V, S>>>;

struct Inner<K, V, S> {
    name: Option<String>,
    initial_capacity: Option<usize>,
    partitioner: Partitioner<K, S>,
    segments: Box<[Segment<K, V, S>]>,
}

impl<K, V, S> Inner<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    fn new(
        name: Option<String>,
        initial_capacity: Option<usize>,
        num_partitions: NonZeroUsize,
        build_hasher: S,
    ) -> Self {
        let num_partitions = num_partitions.get();
        let seg_init_capacity = initial_capacity
            .map(|cap| (cap as f64 / num_partitions as f64).ceil() as usize)
            .unwrap_or_default();

        let segments = (0..num_partitions)
            .map(|_| {
                CachePadded::new(Mutex::new(HashMap::with_capacity_and_hasher(
                    seg_init_capacity,
                    build_hasher.clone(),
                )))
            })
            .collect::<Vec<_>>();

        #[cfg(feature = "logging")]
        log::debug!(
            "{}Created a partitioned map with {num_partitions} partitions",
            crate::common::name_prefix(name.as_deref())
        );

        Self {
            name,
            initial_capacity,
            partitioner: Partitioner::new(num_partitions, build_hasher),
            segments: segments.into_boxed_slice(),
        }
    }

    #[inline]
    fn select<Q>(&self, key: &Q) -> (usize, &Segment<K, V, S>)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.partitioner.partition(key);
        (index, &self.segments[index])
    }
}

impl<K, V, S> Inner<K, V, S> {
    fn timed_out<T>(&self, partition: usize, payload: T) -> TryLockError<T> {
        #[cfg(feature = "logging")]
        log::trace!(
            "{}Timed out while waiting for the lock of partition {partition}",
            crate::common::name_prefix(self.name.as_deref())
        );
        TryLockError::Timeout { partition, payload }
    }
}
