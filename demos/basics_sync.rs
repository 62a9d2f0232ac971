// Use the partitioned map.
use partmap::{sync::PartitionedMap, ConfigError};

use std::thread;

fn main() -> Result<(), ConfigError> {
    const NUM_WRITERS: usize = 10;

    // Create a map split into 32 independently locked partitions.
    let map = PartitionedMap::new(32)?;

    // Spawn writers. Each one inserts a single entry.
    let writers: Vec<_> = (0..NUM_WRITERS)
        .map(|i| {
            // To share the same map across the threads, clone it.
            // This is a cheap operation.
            let my_map = map.clone();
            thread::spawn(move || my_map.insert(format!("key{i}"), i))
        })
        .collect();

    // Wait for all writers to complete.
    writers.into_iter().for_each(|t| t.join().expect("Failed"));

    // Read the entries back.
    for i in 0..NUM_WRITERS {
        if let Some(value) = map.get(format!("key{i}").as_str()) {
            println!("key{i}: {value}");
        }
    }

    Ok(())
}
