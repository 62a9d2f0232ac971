//! Provides thread-safe, concurrent map implementations.
//!
//! - [`PartitionedMap`] splits its keys across independently locked segments.
//! - [`LockedMap`] guards a single `HashMap` with one lock. It is the baseline
//!   the partitioned map is measured against.

mod builder;
mod locked;
mod segment;

pub use {builder::MapBuilder, locked::LockedMap, segment::PartitionedMap};

use std::num::NonZeroUsize;

/// The number of partitions used by [`PartitionedMap::default`].
pub const DEFAULT_NUM_PARTITIONS: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(n) => n,
    None => unreachable!(),
};
