use crate::proto::{Addr, HopCount, SeqNum};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct SinkEntry {
    pub highest_seq: SeqNum,
    pub min_hops: HopCount,
    pub last_heard: Instant,
    pub forwarding_time: Instant,
    pub scheduled: bool,
    pub tentative_min_hops: HopCount,
}

#[derive(Default)]
pub struct SinkTable {
    entries: HashMap<Addr, SinkEntry>,
}

impl SinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sink: &Addr) -> Option<&SinkEntry> {
        self.entries.get(sink)
    }

    pub fn contains(&self, sink: &Addr) -> bool {
        self.entries.contains_key(sink)
    }

    pub fn insert(&mut self, sink: Addr, entry: SinkEntry) {
        self.entries.insert(sink, entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Addr, &SinkEntry)> {
        self.entries.iter()
    }

    /// Keys with `scheduled && now >= forwarding_time`, in stable order
    /// for deterministic tests (the original iterates a Python dict
    /// snapshot, which has no ordering guarantee either).
    pub fn due_for_forwarding(&self, now: Instant) -> Vec<Addr> {
        let mut due: Vec<Addr> = self
            .entries
            .iter()
            .filter(|(_, v)| v.scheduled && now >= v.forwarding_time)
            .map(|(k, _)| *k)
            .collect();
        due.sort_by_key(|a| a.0);
        due
    }

    /// Promotes `min_hops` to `tentative_min_hops + 1` and unschedules the
    /// entry, per `spec.md` §3.4 invariant 2 / §4.7 step 2.
    pub fn mark_forwarded_at(&mut self, sink: &Addr, now: Instant) {
        if let Some(e) = self.entries.get_mut(sink) {
            e.min_hops = e.tentative_min_hops.plus_one();
            e.forwarding_time = now;
            e.scheduled = false;
        }
    }

    pub fn age(&mut self, now: Instant, slt: Duration) -> Vec<Addr> {
        let stale: Vec<Addr> = self
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
