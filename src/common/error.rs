/// The error type returned when a map is built with an invalid configuration.
///
/// This is the only way constructing a [`PartitionedMap`][partitioned-map] can
/// fail. There is no recovery path inside the map; the caller has to fix the
/// configuration and build again.
///
/// [partitioned-map]: ./sync/struct.PartitionedMap.html
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested number of partitions was zero. A partitioned map needs at
    /// least one partition to hold its entries.
    #[error("The number of partitions must be a positive integer, but zero was given")]
    ZeroPartitions,
}

/// The error type for the bounded-wait methods such as
/// [`PartitionedMap::try_insert_for`][try-insert-for].
///
/// `T` carries whatever the operation hands back to the caller on failure. For
/// `try_insert_for` it is the `(key, value)` pair that was not inserted, so the
/// caller can retry without cloning them up front.
///
/// [try-insert-for]: ./sync/struct.PartitionedMap.html#method.try_insert_for
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TryLockError<T> {
    /// The lock of the partition holding the key was not acquired before the
    /// timeout elapsed.
    #[error("Timed out while waiting for the lock of partition {partition}")]
    Timeout {
        /// The index of the contended partition.
        partition: usize,
        /// The payload given back to the caller.
        payload: T,
    },
}

impl<T> TryLockError<T> {
    /// Returns the index of the partition whose lock could not be acquired.
    pub fn partition(&self) -> usize {
        match self {
            Self::Timeout { partition, .. } => *partition,
        }
    }

    /// Consumes the error and returns the payload handed back to the caller.
    pub fn into_payload(self) -> T {
        match self {
            Self::Timeout { payload, .. } => payload,
        }
    }
}
