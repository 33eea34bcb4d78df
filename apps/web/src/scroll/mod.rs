//! Per-session scroll positions, saved when a reader leaves a collection
//! page and restored when they come back.
//!
//! `ScrollStore` is a cheap cloneable handle carried in `AppState`. Entries
//! are keyed by `(session, path)`; a later save overwrites an earlier one.
//! The store holds at most `capacity` entries and evicts the oldest save
//! when a new key would exceed it.

pub mod handlers;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

type Key = (Uuid, String);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollEntry {
    pub y: f64,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<Key, (u64, ScrollEntry)>,
    /// Save sequence number → key, oldest first.
    age: BTreeMap<u64, Key>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
pub struct ScrollStore {
    inner: Arc<Mutex<Inner>>,
    capacity: usize,
}

impl ScrollStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            capacity: capacity.max(1),
        }
    }

    pub fn save(&self, session: Uuid, path: &str, y: f64) -> ScrollEntry {
        let entry = ScrollEntry {
            y,
            saved_at: Utc::now(),
        };
        let key = (session, path.to_string());

        let mut inner = self.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;

        if let Some((old_seq, _)) = inner.entries.insert(key.clone(), (seq, entry)) {
            inner.age.remove(&old_seq);
        }
        inner.age.insert(seq, key);

        while inner.entries.len() > self.capacity {
            let Some((_, oldest)) = inner.age.pop_first() else {
                break;
            };
            inner.entries.remove(&oldest);
            debug!(session = %oldest.0, path = %oldest.1, "Evicted scroll position");
        }

        entry
    }

    pub fn get(&self, session: Uuid, path: &str) -> Option<ScrollEntry> {
        self.lock()
            .entries
            .get(&(session, path.to_string()))
            .map(|(_, entry)| *entry)
    }

    /// Removes one path for the session, or every path when `path` is `None`.
    /// Returns how many entries were removed.
    pub fn clear(&self, session: Uuid, path: Option<&str>) -> usize {
        let mut inner = self.lock();
        let Inner { entries, age, .. } = &mut *inner;

        let doomed: Vec<u64> = match path {
            Some(path) => entries
                .remove(&(session, path.to_string()))
                .map(|(seq, _)| seq)
                .into_iter()
                .collect(),
            None => {
                let mut seqs = Vec::new();
                entries.retain(|(owner, _), (seq, _)| {
                    if *owner == session {
                        seqs.push(*seq);
                        false
                    } else {
                        true
                    }
                });
                seqs
            }
        };

        for seq in &doomed {
            age.remove(seq);
        }
        doomed.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    // Every critical section leaves both maps consistent, so poisoning is recovered.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
