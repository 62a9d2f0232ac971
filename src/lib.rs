#![warn(clippy::all)]
#![warn(rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Partmap is a concurrent hash map for Rust whose keyspace is split across a
//! fixed number of independently locked partitions.
//!
//! A key is assigned to a partition by hashing it. Each partition is a plain
//! `HashMap` behind its own mutex, so threads working on keys in different
//! partitions never contend for the same lock. Compared with one lock over the
//! whole map, this raises concurrent write throughput for disjoint keys while
//! keeping every single-key operation linearizable.
//!
//! # Maps
//!
//! - [`sync::PartitionedMap`]: the partitioned map.
//! - [`sync::LockedMap`]: one `HashMap` behind one lock, as a baseline.
//! - `dash::DashedMap`: a wrapper around `dashmap::DashMap`. Enable the
//!   "dash" crate feature to use it.
//!
//! All of them implement the [`ConcurrentMap`] trait.
//!
//! # Example
//!
//! ```rust
//! use partmap::sync::PartitionedMap;
//!
//! use std::thread;
//!
//! # fn main() -> Result<(), partmap::ConfigError> {
//! let map = PartitionedMap::new(32)?;
//!
//! let writers: Vec<_> = (0..10)
//!     .map(|i| {
//!         let map = map.clone();
//!         thread::spawn(move || map.insert(format!("key{i}"), i))
//!     })
//!     .collect();
//! writers.into_iter().for_each(|t| t.join().expect("writer panicked"));
//!
//! for i in 0..10 {
//!     assert_eq!(map.get(format!("key{i}").as_str()), Some(i));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! Enable the "logging" crate feature to have maps emit messages through the
//! [`log`](https://docs.rs/log) facade when they are created, when a
//! configuration is rejected, and when a bounded-wait operation times out.

#[cfg(feature = "dash")]
#[cfg_attr(docsrs, doc(cfg(feature = "dash")))]
pub mod dash;

#[cfg(feature = "sync")]
#[cfg_attr(docsrs, doc(cfg(feature = "sync")))]
pub mod sync;

pub(crate) mod common;
#[cfg(feature = "sync")]
pub(crate) mod partitioner;
#[cfg(feature = "sync")]
pub(crate) mod policy;

pub use common::error::{ConfigError, TryLockError};
#[cfg(feature = "sync")]
pub use policy::Policy;

/// The operations shared by every map in this crate.
///
/// All methods take `&self`. The maps use interior mutability, so a map can be
/// shared between threads by cloning it (or putting it in an `Arc`) and calling
/// `insert` and `get` from each thread.
pub trait ConcurrentMap<K, V> {
    /// Inserts a key-value pair, replacing the value if the key is present.
    fn insert(&self, key: K, value: V);

    /// Returns a clone of the value for the key, or `None` if the key is not
    /// present. A missing key is not an error.
    fn get(&self, key: &K) -> Option<V>;
}
