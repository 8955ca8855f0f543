//! Concurrent frequency tracking over validated request parameters.
//!
//! The store is a single `RwLock<HashMap>`:
//! - `record` takes the write lock for one lookup + increment, so no update is lost.
//! - `most_frequent` takes the read lock for a full scan, so concurrent queries
//!   run in parallel and always see a state between two whole records.
//!
//! The key set only grows and counts only increase; there is no reset.
//!
//! Ties on the maximum count resolve to the entry observed first. Every new
//! key gets a sequence number under the write lock, which makes "first" the
//! order in which records were linearized.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::params::RequestParams;

/// One parameter tuple with its hit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub params: RequestParams,
    pub hits: u64,
}

#[derive(Debug)]
struct Slot {
    hits: u64,
    first_seen: u64,
}

#[derive(Debug, Default)]
struct Table {
    slots: HashMap<RequestParams, Slot>,
    next_seq: u64,
    total: u64,
}

/// Thread-safe counter keyed by [`RequestParams`].
///
/// Owned by the service and shared by handle (`Arc`); there is no global instance.
#[derive(Debug, Default)]
pub struct FrequencyStore {
    table: RwLock<Table>,
}

impl FrequencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observation of `params`.
    pub fn record(&self, params: RequestParams) {
        let mut guard = self.write();
        let t = &mut *guard;
        let seq = t.next_seq;
        let slot = t.slots.entry(params).or_insert(Slot { hits: 0, first_seen: seq });
        slot.hits = slot.hits.saturating_add(1);
        if slot.first_seen == seq {
            t.next_seq += 1;
        }
        t.total = t.total.saturating_add(1);
    }

    /// The entry with the highest count, or `None` when nothing was recorded.
    pub fn most_frequent(&self) -> Option<FrequencyEntry> {
        let t = self.read();
        t.slots
            .iter()
            .max_by(|(_, a), (_, b)| a.hits.cmp(&b.hits).then(b.first_seen.cmp(&a.first_seen)))
            .map(|(params, slot)| FrequencyEntry {
                params: params.clone(),
                hits: slot.hits,
            })
    }

    /// Number of distinct parameter tuples seen.
    pub fn len(&self) -> usize {
        self.read().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all recorded hits.
    pub fn total_hits(&self) -> u64 {
        self.read().total
    }

    // A panic while holding the lock cannot leave a half-applied increment,
    // so a poisoned table is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(label: &str) -> RequestParams {
        RequestParams {
            divisor_a: 3,
            divisor_b: 5,
            limit: 15,
            label_a: label.to_string(),
            label_b: "buzz".to_string(),
        }
    }

    #[test]
    fn empty_store_has_no_winner() {
        let s = FrequencyStore::new();
        assert!(s.most_frequent().is_none());
        assert!(s.is_empty());
        assert_eq!(s.total_hits(), 0);
    }

    #[test]
    fn single_record() {
        let s = FrequencyStore::new();
        s.record(p("fizz"));
        assert_eq!(s.most_frequent(), Some(FrequencyEntry { params: p("fizz"), hits: 1 }));
    }

    #[test]
    fn highest_count_wins() {
        let s = FrequencyStore::new();
        for _ in 0..3 {
            s.record(p("c"));
        }
        for _ in 0..10 {
            s.record(p("a"));
        }
        for _ in 0..5 {
            s.record(p("b"));
        }
        let top = s.most_frequent().unwrap();
        assert_eq!(top.params, p("a"));
        assert_eq!(top.hits, 10);
        assert_eq!(s.len(), 3);
        assert_eq!(s.total_hits(), 18);
    }

    #[test]
    fn tie_goes_to_first_observed() {
        let s = FrequencyStore::new();
        s.record(p("b"));
        s.record(p("a"));
        s.record(p("a"));
        s.record(p("b"));
        let top = s.most_frequent().unwrap();
        assert_eq!(top.params, p("b"));
        assert_eq!(top.hits, 2);

        s.record(p("a"));
        assert_eq!(s.most_frequent().unwrap().params, p("a"));
    }

    #[test]
    fn structurally_equal_keys_share_a_slot() {
        let s = FrequencyStore::new();
        let a = p("fizz");
        let b = RequestParams { label_a: String::from("fi") + "zz", ..p("x") };
        s.record(a);
        s.record(b);
        assert_eq!(s.len(), 1);
        assert_eq!(s.most_frequent().unwrap().hits, 2);
    }
}
