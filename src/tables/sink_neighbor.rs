use crate::proto::{Addr, HopCount, SeqNum};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// `(Sender, Source)` as observed in an incoming SINK packet.
pub type SinkNeighborKey = (Addr, Addr);

#[derive(Debug, Clone, PartialEq)]
pub struct SinkNeighborEntry {
    pub last_seq: SeqNum,
    pub min_hops_to_sink: HopCount,
    pub last_heard: Instant,
    pub estimated_interval: Duration,
}

#[derive(Default)]
pub struct SinkNeighborTable {
    entries: HashMap<SinkNeighborKey, SinkNeighborEntry>,
}

impl SinkNeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SinkNeighborKey) -> Option<&SinkNeighborEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: SinkNeighborKey, entry: SinkNeighborEntry) {
        self.entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Minimum sender address across all known sink-neighbors, used by
    /// the broadcast-interval arbitration in `spec.md` §4.3 step 2.
    pub fn min_sender_addr(&self) -> Option<Addr> {
        self.entries.keys().map(|(sender, _)| *sender).min()
    }

    /// Purges entries not heard from within `slt`, per `spec.md` §3.4
    /// invariant 1. Returns the purged keys for diagnostic logging.
    pub fn age(&mut self, now: Instant, slt: Duration) -> Vec<SinkNeighborKey> {
        let stale: Vec<SinkNeighborKey> = self
            .entries
            .iter()
            .filter(|(_, v)| now.duration_since(v.last_heard) > slt)
            .map(|(k, _)| *k)
            .collect();
        for k in &stale {
            self.entries.remove(k);
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_sender_addr_picks_lowest() {
        let mut t = SinkNeighborTable::new();
        let now = Instant::now();
        t.insert(
            (Addr(7), Addr(0)),
            SinkNeighborEntry {
                last_seq: SeqNum(0),
                min_hops_to_sink: HopCount(0),
                last_heard: now,
                estimated_interval: Duration::from_secs(30),
            },
        );
        t.insert(
            (Addr(2), Addr(0)),
            SinkNeighborEntry {
                last_seq: SeqNum(0),
                min_hops_to_sink: HopCount(0),
                last_heard: now,
                estimated_interval: Duration::from_secs(30),
            },
        );
        assert_eq!(t.min_sender_addr(), Some(Addr(2)));
    }

    #[test]
    fn age_purges_stale_entries() {
        let mut t = SinkNeighborTable::new();
        let now = Instant::now();
        t.insert(
            (Addr(1), Addr(0)),
            SinkNeighborEntry {
                last_seq: SeqNum(0),
                min_hops_to_sink: HopCount(0),
                last_heard: now,
                estimated_interval: Duration::from_secs(30),
            },
        );
        let later = now + Duration::from_secs(100);
        let purged = t.age(later, Duration::from_secs(50));
        assert_eq!(purged, vec![(Addr(1), Addr(0))]);
        assert!(t.is_empty());
    }
}
