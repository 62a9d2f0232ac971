#![cfg(all(test, feature = "sync", feature = "logging"))]

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use partmap::{
    sync::{LockedMap, PartitionedMap},
    ConfigError,
};

static RECORDS: Mutex<Vec<(Level, String)>> = parking_lot::const_mutex(Vec::new());

struct RecordingLogger;

impl Log for RecordingLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if record.target().starts_with("partmap") {
            RECORDS
                .lock()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: RecordingLogger = RecordingLogger;

fn recorded(level: Level, message: &str) -> bool {
    RECORDS
        .lock()
        .iter()
        .any(|(l, m)| *l == level && m == message)
}

// The only test in this file, so no other test can install a logger or clear
// the records while it runs.
#[test]
fn construction_and_rejection_are_logged() -> Result<(), ConfigError> {
    log::set_logger(&LOGGER).expect("no other logger is installed");
    log::set_max_level(LevelFilter::Trace);

    let rejected = PartitionedMap::<String, u32>::builder(0)
        .name("broken")
        .build();
    assert!(matches!(rejected, Err(ConfigError::ZeroPartitions)));
    assert!(recorded(
        Level::Warn,
        "[broken] Rejected a partitioned map with zero partitions"
    ));

    let map: PartitionedMap<String, u32> = PartitionedMap::builder(4).name("users").build()?;
    assert!(recorded(
        Level::Debug,
        "[users] Created a partitioned map with 4 partitions"
    ));

    // An unnamed map logs without a prefix.
    let _unnamed: LockedMap<String, u32> = LockedMap::new();
    assert!(recorded(Level::Debug, "Created a map guarded by a single lock"));

    // `insert` and `get` do not log.
    let count = RECORDS.lock().len();
    map.insert("a".to_string(), 1);
    assert_eq!(map.get("a"), Some(1));
    assert_eq!(RECORDS.lock().len(), count);

    Ok(())
}
