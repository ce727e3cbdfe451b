use crate::proto::{Addr, SeqNum};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// `(Source, DestSink, SeqNum)`.
pub type DataKey = (Addr, Addr, SeqNum);

#[derive(Debug, Clone, PartialEq)]
pub struct DataEntry {
    pub pending_bytes: Option<Vec<u8>>,
    pub last_heard: Instant,
    pub forwarding_time: Instant,
    pub scheduled: bool,
    pub duplicates: u32,
}

#[derive(Default)]
pub struct DataTable {
    entries: HashMap<DataKey, DataEntry>,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DataKey) -> Option<&DataEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &DataKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: DataKey, entry: DataEntry) {
        self.entries.insert(key, entry);
    }

    /// Keys with `scheduled && duplicates <= n_dupl && now >= forwarding_time`.
    /// The `<=` (not `<`) mirrors the original block's tick guard literally
    /// (`spec.md` §4.7 step 3). By the time an entry reaches `duplicates
    /// == n_dupl` it has already been unscheduled on the ingress path
    /// (`spec.md` §4.4.2), so the guard is redundant in practice but kept
    /// for fidelity.
    pub fn due_for_forwarding(&self, now: Instant, n_dupl: u32) -> Vec<DataKey> {
        let mut due: Vec<DataKey> = self
            .entries
            .iter()
            .filter(|(_, v)| v.scheduled && v.duplicates <= n_dupl && now >= v.forwarding_time)
            .map(|(k, _)| *k)
            .collect();
        due.sort_by_key(|(s, d, n)| (s.0, d.0, n.0));
        due
    }

    pub fn mark_forwarded_at(&mut self, key: &DataKey, now: Instant) {
        if let Some(e) = self.entries.get_mut(key) {
            e.pending_bytes = None;
            e.forwarding_time = now;
            e.scheduled = false;
        }
    }

    /// Cancels a pending forward on receipt of a matching NOTI
    /// (`spec.md` §3.4 invariant 4 / §4.5).
    pub fn cancel(&mut self, key: &DataKey) -> bool {
        if let Some(e) = self.entries.get_mut(key) {
            e.pending_bytes = None;
            e.forwarding_time = now_epoch_placeholder(e.last_heard);
            e.scheduled = false;
            true
        } else {
            false
        }
    }

    pub fn age(&mut self, now: Instant, plt: Duration) -> Vec<DataKey> {
        let stale: Vec<DataKey> = self
            .entries
            .iter()
            .filter(|(_, v)| now.duration_since(v.last_heard) > plt)
            .map(|(k, _)| *k)
            .collect();
        for k in &stale {
            self.entries.remove(k);
        }
        stale
    }
}

/// `forwarding_time` has no meaning once `scheduled` is false; we still
/// need *some* `Instant` to store. Reusing `last_heard` avoids pulling in
/// a real clock read for a value nothing reads back while unscheduled.
fn now_epoch_placeholder(last_heard: Instant) -> Instant {
    last_heard
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(now: Instant, scheduled: bool, duplicates: u32) -> DataEntry {
        DataEntry {
            pending_bytes: Some(vec![1, 2, 3]),
            last_heard: now,
            forwarding_time: now,
            scheduled,
            duplicates,
        }
    }

    #[test]
    fn cancel_clears_pending_and_unschedules() {
        let mut t = DataTable::new();
        let now = Instant::now();
        let key = (Addr(2), Addr(0), SeqNum(7));
        t.insert(key, entry(now, true, 0));
        assert!(t.cancel(&key));
        let e = t.get(&key).unwrap();
        assert!(e.pending_bytes.is_none());
        assert!(!e.scheduled);
    }

    #[test]
    fn cancel_on_missing_key_is_noop() {
        let mut t = DataTable::new();
        assert!(!t.cancel(&(Addr(2), Addr(0), SeqNum(7))));
    }

    #[test]
    fn due_for_forwarding_excludes_suppressed_entries() {
        let mut t = DataTable::new();
        let now = Instant::now();
        let key = (Addr(2), Addr(0), SeqNum(7));
        t.insert(key, entry(now, false, 2));
        assert!(t.due_for_forwarding(now, 2).is_empty());
    }
}
