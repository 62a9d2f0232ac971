#![cfg(all(test, feature = "sync"))]

use std::{
    collections::HashSet,
    sync::{Arc, Barrier},
    thread,
};

use partmap::{sync::PartitionedMap, ConfigError};

#[test]
fn zero_partitions_is_rejected() {
    let result = PartitionedMap::<String, u32>::new(0);
    assert!(matches!(result, Err(ConfigError::ZeroPartitions)));
}

// Ten writers each insert one key, then ten gets read them back.
#[test]
fn ten_writers_then_ten_reads() -> Result<(), ConfigError> {
    let map = PartitionedMap::new(32)?;

    let writers: Vec<_> = (0..10)
        .map(|i| {
            let map = map.clone();
            thread::spawn(move || map.insert(format!("key{i}"), i))
        })
        .collect();
    writers
        .into_iter()
        .for_each(|t| t.join().expect("Writer failed"));

    for i in 0..10 {
        assert_eq!(map.get(format!("key{i}").as_str()), Some(i));
    }
    assert_eq!(map.entry_count(), 10);
    Ok(())
}

#[test]
fn partition_of_is_deterministic_across_clones_and_maps() -> Result<(), ConfigError> {
    let map1: PartitionedMap<String, ()> = PartitionedMap::new(32)?;
    let map2: PartitionedMap<String, ()> = PartitionedMap::new(32)?;
    let clone = map1.clone();

    for i in 0..1_000 {
        let key = format!("key{i}");
        let index = map1.partition_of(key.as_str());
        assert!(index < 32);
        assert_eq!(index, clone.partition_of(key.as_str()));
        assert_eq!(index, map2.partition_of(key.as_str()));
    }
    Ok(())
}

// Writers hammer keys that all live in the same segment. Every key must end up
// with the last value its own writer stored.
#[test]
fn no_lost_updates_within_one_segment() -> Result<(), ConfigError> {
    const NUM_THREADS: usize = 8;
    const ROUNDS: u32 = 500;

    let map: PartitionedMap<String, u32> = PartitionedMap::new(16)?;

    let target = map.partition_of("key0");
    let keys: Vec<String> = (0..)
        .map(|i| format!("key{i}"))
        .filter(|k| map.partition_of(k.as_str()) == target)
        .take(NUM_THREADS)
        .collect();
    let distinct: HashSet<_> = keys.iter().collect();
    assert_eq!(distinct.len(), NUM_THREADS);

    let start = Arc::new(Barrier::new(NUM_THREADS));
    let writers: Vec<_> = keys
        .iter()
        .cloned()
        .map(|key| {
            let map = map.clone();
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                for round in 0..ROUNDS {
                    map.insert(key.clone(), round);
                }
            })
        })
        .collect();
    writers
        .into_iter()
        .for_each(|t| t.join().expect("Writer failed"));

    for key in &keys {
        assert_eq!(map.get(key.as_str()), Some(ROUNDS - 1));
    }
    assert_eq!(map.entry_count(), NUM_THREADS as u64);
    Ok(())
}

// Keys in other segments are not touched by writes to a key.
#[test]
fn disjoint_keys_do_not_interfere() -> Result<(), ConfigError> {
    let map: PartitionedMap<String, u32> = PartitionedMap::new(8)?;

    let a = "key0".to_string();
    let b = (1..)
        .map(|i| format!("key{i}"))
        .find(|k| map.partition_of(k.as_str()) != map.partition_of(a.as_str()))
        .expect("some key maps to another partition");

    map.insert(b.clone(), 7);
    for n in 0..100 {
        map.insert(a.clone(), n);
        assert_eq!(map.get(b.as_str()), Some(7));
    }
    assert_eq!(map.get(a.as_str()), Some(99));
    Ok(())
}

#[test]
fn works_with_another_hasher() -> Result<(), ConfigError> {
    let map: PartitionedMap<String, u32, _> =
        PartitionedMap::builder(16).build_with_hasher(ahash::RandomState::new())?;

    for i in 0..1_000 {
        map.insert(format!("key{i}"), i);
    }
    for i in 0..1_000 {
        assert!(map.partition_of(format!("key{i}").as_str()) < 16);
        assert_eq!(map.get(format!("key{i}").as_str()), Some(i));
    }
    Ok(())
}

#[test]
fn non_clone_values_through_arc() -> Result<(), ConfigError> {
    // Not Clone.
    struct Payload(String);

    let map = PartitionedMap::new(4)?;
    map.insert("a", Arc::new(Payload("alice".to_string())));

    let value = map.get(&"a").expect("key is missing");
    assert_eq!(value.0, "alice");
    Ok(())
}
