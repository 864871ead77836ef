//! In-memory observation store.
//!
//! A single reader/writer lock over a map of append-only series. The refresh
//! loop is the only writer; HTTP handlers are unbounded concurrent readers.
//! All synchronization stays inside this crate — callers only see
//! `append`/`read`.

use common::Reading;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Initial key capacity of the series map.
const INITIAL_KEY_CAPACITY: usize = 1000;

/// Map from location key to its append-ordered series of readings.
///
/// Appends are atomic at the element boundary: a reader observes the series
/// either before or after a given append, never mid-push. Once `append`
/// returns, every subsequent `read` sees the new reading. Series grow
/// without bound — there is no eviction in this service.
#[derive(Debug)]
pub struct ObservationStore {
    series: RwLock<HashMap<String, Vec<Reading>>>,
}

impl ObservationStore {
    pub fn new() -> Self {
        Self {
            series: RwLock::new(HashMap::with_capacity(INITIAL_KEY_CAPACITY)),
        }
    }

    /// Append `reading` to the series for `key`, creating the series on
    /// first use. The write lock is held only for the push itself.
    pub async fn append(&self, key: &str, reading: Reading) {
        let mut map = self.series.write().await;
        map.entry(key.to_owned()).or_default().push(reading);
        debug!("Appended reading for {}", key);
    }

    /// Snapshot of the current series for `key`, or `None` if nothing has
    /// ever been appended under it. An empty series is not observable:
    /// series only come into existence by appending.
    pub async fn read(&self, key: &str) -> Option<Vec<Reading>> {
        let map = self.series.read().await;
        map.get(key).cloned()
    }

    /// Number of readings stored for `key` (0 for untracked keys).
    pub async fn len(&self, key: &str) -> usize {
        let map = self.series.read().await;
        map.get(key).map_or(0, Vec::len)
    }

    /// Keys that have at least one reading.
    pub async fn tracked_keys(&self) -> Vec<String> {
        let map = self.series.read().await;
        map.keys().cloned().collect()
    }
}

impl Default for ObservationStore {
    fn default() -> Self {
        Self::new()
    }
}
