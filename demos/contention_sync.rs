// Compares a map behind one lock with a partitioned map under many writers.
use partmap::{
    sync::{LockedMap, PartitionedMap},
    ConcurrentMap, ConfigError,
};

use std::{
    thread,
    time::{Duration, Instant},
};

const NUM_THREADS: usize = 16;
const NUM_KEYS_PER_THREAD: usize = 50_000;

fn run<M>(map: M) -> Duration
where
    M: ConcurrentMap<usize, usize> + Clone + Send + 'static,
{
    let started = Instant::now();

    let threads: Vec<_> = (0..NUM_THREADS)
        .map(|i| {
            let my_map = map.clone();
            let start = i * NUM_KEYS_PER_THREAD;
            let end = (i + 1) * NUM_KEYS_PER_THREAD;

            thread::spawn(move || {
                for key in start..end {
                    my_map.insert(key, key * 2);
                    assert_eq!(my_map.get(&key), Some(key * 2));
                }
            })
        })
        .collect();

    threads.into_iter().for_each(|t| t.join().expect("Failed"));
    started.elapsed()
}

fn main() -> Result<(), ConfigError> {
    let locked = run(LockedMap::new());
    println!("single lock:    {locked:?}");

    for num_partitions in [4, 16, 64] {
        let elapsed = run(PartitionedMap::new(num_partitions)?);
        println!("{num_partitions:>2} partitions:  {elapsed:?}");
    }

    Ok(())
}
