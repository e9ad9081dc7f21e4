//! The bounded signal window store.
//!
//! The engine reads and writes signals through [`SignalStore`]; real
//! deployments may back this with durable storage, the in-memory
//! implementation here covers scheduled in-process passes. Signals are
//! partitioned by HSN code — the scoring pass parallelizes across
//! partitions, never within one — with unclassified signals held under the
//! `None` partition.

use chrono::{DateTime, Utc};

use std::collections::BTreeMap;

use crate::types::Signal;

/// Read/write access to the rolling signal window.
pub trait SignalStore: Send {
    fn insert(&mut self, signal: Signal);

    /// Drop signals older than the horizon. Returns how many were evicted.
    fn evict_older_than(&mut self, horizon: DateTime<Utc>) -> usize;

    /// All partition keys currently holding signals. `None` is the
    /// unclassified partition.
    fn partitions(&self) -> Vec<Option<String>>;

    /// Signals for one partition, ordered by timestamp ascending.
    fn signals_for(&self, hsn_code: Option<&str>) -> Vec<Signal>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of retained signals without an HSN code.
    fn unclassified_len(&self) -> usize;
}

/// In-memory window store. Partition vectors stay sorted by timestamp so
/// window math downstream never re-sorts.
#[derive(Debug, Default, Clone)]
pub struct MemorySignalStore {
    partitions: BTreeMap<Option<String>, Vec<Signal>>,
}

impl MemorySignalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignalStore for MemorySignalStore {
    fn insert(&mut self, signal: Signal) {
        let bucket = self.partitions.entry(signal.hsn_code.clone()).or_default();
        let at = bucket.partition_point(|s| s.timestamp <= signal.timestamp);
        bucket.insert(at, signal);
    }

    fn evict_older_than(&mut self, horizon: DateTime<Utc>) -> usize {
        let mut evicted = 0;
        for bucket in self.partitions.values_mut() {
            let keep_from = bucket.partition_point(|s| s.timestamp < horizon);
            evicted += keep_from;
            bucket.drain(..keep_from);
        }
        self.partitions.retain(|_, bucket| !bucket.is_empty());
        evicted
    }

    fn partitions(&self) -> Vec<Option<String>> {
        self.partitions.keys().cloned().collect()
    }

    fn signals_for(&self, hsn_code: Option<&str>) -> Vec<Signal> {
        self.partitions
            .get(&hsn_code.map(ToString::to_string))
            .cloned()
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    fn unclassified_len(&self) -> usize {
        self.partitions.get(&None).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::SignalKind;

    fn signal(code: Option<&str>, day: u32, value: f64) -> Signal {
        Signal {
            source_id: "mock-trends".to_string(),
            hsn_code: code.map(ToString::to_string),
            timestamp: Utc.with_ymd_and_hms(2025, 11, day, 0, 0, 0).unwrap(),
            value,
            raw_text: None,
            kind: SignalKind::Demand,
        }
    }

    #[test]
    fn insert_keeps_partitions_sorted() {
        let mut store = MemorySignalStore::new();
        store.insert(signal(Some("1006"), 20, 2.0));
        store.insert(signal(Some("1006"), 10, 1.0));
        store.insert(signal(Some("1006"), 15, 3.0));
        let signals = store.signals_for(Some("1006"));
        let days: Vec<u32> = signals
            .iter()
            .map(|s| {
                use chrono::Datelike;
                s.timestamp.day()
            })
            .collect();
        assert_eq!(days, vec![10, 15, 20]);
    }

    #[test]
    fn unclassified_signals_live_in_none_partition() {
        let mut store = MemorySignalStore::new();
        store.insert(signal(None, 10, 1.0));
        store.insert(signal(Some("1006"), 10, 1.0));
        assert_eq!(store.unclassified_len(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.partitions(), vec![None, Some("1006".to_string())]);
    }

    #[test]
    fn evict_drops_only_stale_signals() {
        let mut store = MemorySignalStore::new();
        store.insert(signal(Some("1006"), 1, 1.0));
        store.insert(signal(Some("1006"), 20, 2.0));
        store.insert(signal(Some("6101"), 2, 3.0));
        let horizon = Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap();
        let evicted = store.evict_older_than(horizon);
        assert_eq!(evicted, 2);
        assert_eq!(store.len(), 1);
        // Emptied partitions disappear entirely.
        assert_eq!(store.partitions(), vec![Some("1006".to_string())]);
    }

    #[test]
    fn signals_for_missing_partition_is_empty() {
        let store = MemorySignalStore::new();
        assert!(store.signals_for(Some("9999")).is_empty());
        assert!(store.is_empty());
    }
}
