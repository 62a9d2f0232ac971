//! Maps keys to partition indices.

use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash, Hasher},
    marker::PhantomData,
};

// 2^64 divided by the golden ratio, rounded to odd.
const FIBONACCI_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// Assigns every key to one of `num_partitions` partitions.
///
/// The key's 64-bit hash is first scrambled with a Fibonacci multiplier, then
/// reduced to the range of partitions by taking the high bits of
/// `hash * num_partitions`. For a power of two number of partitions this is
/// just the most significant bits of the scrambled hash. FNV-1a leaves the
/// last bytes of a key in the low bits only, so without the scrambling step
/// keys such as `key0`..`key9` would all share a partition.
///
/// Given the same hasher state, the same key always lands in the
/// same partition. With the default [`FnvBuildHasher`][fnv-bh] (FNV-1a) the
/// state is fixed, so indices are also stable across processes.
///
/// [fnv-bh]: https://docs.rs/fnv/*/fnv/type.FnvBuildHasher.html
#[derive(Clone)]
pub(crate) struct Partitioner<K, S> {
    build_hasher: S,
    num_partitions: usize,
    _marker: PhantomData<fn(&K)>,
}

impl<K, S> Partitioner<K, S> {
    /// `num_partitions` must be positive. The caller validates it.
    pub(crate) fn new(num_partitions: usize, build_hasher: S) -> Self {
        debug_assert!(num_partitions > 0);
        Self {
            build_hasher,
            num_partitions,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn num_partitions(&self) -> usize {
        self.num_partitions
    }
}

impl<K, S> Partitioner<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns the index in `[0, num_partitions)` of the partition `key`
    /// belongs to.
    #[inline]
    pub(crate) fn partition<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_from_hash(self.hash(key))
    }

    #[inline]
    fn hash<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut hasher = self.build_hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[inline]
    fn index_from_hash(&self, hash: u64) -> usize {
        let hash = hash.wrapping_mul(FIBONACCI_MULTIPLIER);
        ((hash as u128 * self.num_partitions as u128) >> 64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::Partitioner;
    use fnv::FnvBuildHasher;

    fn partitioner(n: usize) -> Partitioner<String, FnvBuildHasher> {
        Partitioner::new(n, FnvBuildHasher::default())
    }

    #[test]
    fn same_key_same_partition() {
        let p = partitioner(32);
        for i in 0..1_000 {
            let key = format!("key{i}");
            assert_eq!(p.partition(key.as_str()), p.partition(key.as_str()));
        }

        // A second partitioner with the same (fixed) hasher state agrees.
        let other = partitioner(32);
        assert_eq!(p.partition("key42"), other.partition("key42"));
    }

    #[test]
    fn index_is_within_range() {
        for n in [1, 2, 3, 7, 16, 32, 100] {
            let p = partitioner(n);
            assert_eq!(p.num_partitions(), n);
            for i in 0..500 {
                assert!(p.partition(format!("key{i}").as_str()) < n);
            }
        }
    }

    #[test]
    fn empty_key() {
        let p = partitioner(32);
        assert!(p.partition("") < 32);
        assert_eq!(p.partition(""), p.partition(""));
    }

    #[test]
    fn short_keys_do_not_collapse() {
        let p = partitioner(32);
        let mut indices = (0..10)
            .map(|i| p.partition(format!("key{i}").as_str()))
            .collect::<Vec<_>>();
        indices.sort_unstable();
        indices.dedup();
        assert!(indices.len() > 5, "got {indices:?}");
    }

    #[test]
    fn single_partition() {
        let p = partitioner(1);
        assert_eq!(p.partition("a"), 0);
        assert_eq!(p.partition("zzzz"), 0);
    }

    #[test]
    fn keys_spread_across_partitions() {
        const KEYS: usize = 16_000;

        for n in [7, 16, 32] {
            let p = partitioner(n);
            let mut counts = vec![0usize; n];
            for i in 0..KEYS {
                counts[p.partition(format!("key{i}").as_str())] += 1;
            }

            // Each partition should get roughly KEYS / n keys.
            let expected = KEYS / n;
            for (i, count) in counts.iter().enumerate() {
                assert!(
                    (expected * 3 / 4..expected * 5 / 4).contains(count),
                    "partition {i} of {n} got {count} keys"
                );
            }
        }
    }
}
