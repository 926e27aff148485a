use crate::config::AppConfig;
use crate::selection::Selection;
use chrono::{DateTime, Utc};
use portable_atomic::{AtomicU64, Ordering};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use uuid::Uuid;

// ── Stored selections ──

/// A selection as held by a session: the immutable value plus the
/// bookkeeping the collaborator layer owns (id for targeted removal,
/// submission timestamp).
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredSelection {
    pub id: Uuid,
    pub added_at: DateTime<Utc>,
    #[serde(flatten)]
    pub selection: Selection,
}

// ── Session store ──

/// In-memory per-user selection pools. Nothing is persisted; a session
/// lives until it is reset or the process exits.
///
/// One mutex over the whole map: handlers never await while holding it,
/// and it serializes add/evaluate per user, which is the concurrency
/// contract the pure pipeline needs (an immutable snapshot per call).
#[derive(Debug, Default)]
pub struct SessionStore {
    pools: Mutex<HashMap<String, Vec<StoredSelection>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, user: &str, selection: Selection) -> StoredSelection {
        let stored = StoredSelection {
            id: Uuid::new_v4(),
            added_at: Utc::now(),
            selection,
        };
        let mut pools = self.pools.lock().unwrap_or_else(|e| e.into_inner());
        pools
            .entry(user.to_string())
            .or_default()
            .push(stored.clone());
        stored
    }

    /// Cloned snapshot of a user's stored selections, in insertion order.
    pub fn stored(&self, user: &str) -> Vec<StoredSelection> {
        let pools = self.pools.lock().unwrap_or_else(|e| e.into_inner());
        pools.get(user).cloned().unwrap_or_default()
    }

    /// Cloned snapshot of the bare selections, ready for the pipeline.
    pub fn selections(&self, user: &str) -> Vec<Selection> {
        self.stored(user)
            .into_iter()
            .map(|s| s.selection)
            .collect()
    }

    pub fn len(&self, user: &str) -> usize {
        let pools = self.pools.lock().unwrap_or_else(|e| e.into_inner());
        pools.get(user).map(Vec::len).unwrap_or(0)
    }

    /// Remove one selection by id. Returns the removed entry, if any.
    pub fn remove(&self, user: &str, id: Uuid) -> Option<StoredSelection> {
        let mut pools = self.pools.lock().unwrap_or_else(|e| e.into_inner());
        let pool = pools.get_mut(user)?;
        let pos = pool.iter().position(|s| s.id == id)?;
        Some(pool.remove(pos))
    }

    /// Drop a user's entire pool. Returns how many selections were held.
    pub fn clear(&self, user: &str) -> usize {
        let mut pools = self.pools.lock().unwrap_or_else(|e| e.into_inner());
        pools.remove(user).map(|p| p.len()).unwrap_or(0)
    }
}

// ── Events pushed to WS clients ──

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type")]
pub enum WsMessage {
    #[serde(rename = "selection_added")]
    SelectionAdded {
        user: String,
        id: Uuid,
        name: String,
        price_market: f64,
        price_reference: f64,
        pool_size: usize,
    },

    #[serde(rename = "selection_removed")]
    SelectionRemoved {
        user: String,
        id: Uuid,
        pool_size: usize,
    },

    #[serde(rename = "session_reset")]
    SessionReset { user: String, dropped: usize },

    #[serde(rename = "evaluation_complete")]
    EvaluationComplete {
        user: String,
        pool_size: usize,
        qualifying: usize,
        top_ev_percent: Option<f64>,
    },
}

// ── Performance counters (lock-free) ──

pub struct PerfCounters {
    pub selections_added: AtomicU64,
    pub selections_rejected: AtomicU64,
    pub evaluations_run: AtomicU64,
    pub combinations_ranked: AtomicU64,
    pub ws_messages_sent: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            selections_added: AtomicU64::new(0),
            selections_rejected: AtomicU64::new(0),
            evaluations_run: AtomicU64::new(0),
            combinations_ranked: AtomicU64::new(0),
            ws_messages_sent: AtomicU64::new(0),
        }
    }
}

// ── Application shared state ──

pub struct AppState {
    pub config: AppConfig,
    pub store: SessionStore,

    // Session layer -> WS clients: event stream
    pub ws_tx: broadcast::Sender<WsMessage>,

    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        let (ws_tx, _) = broadcast::channel(1024);
        Arc::new(Self {
            config,
            store: SessionStore::new(),
            ws_tx,
            counters: PerfCounters::new(),
        })
    }

    #[inline]
    pub fn broadcast(&self, msg: WsMessage) {
        self.counters.ws_messages_sent.fetch_add(1, Ordering::Relaxed);
        let _ = self.ws_tx.send(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(name: &str) -> Selection {
        Selection::new(name, 1.90, 1.71).unwrap()
    }

    #[test]
    fn test_add_and_snapshot_order() {
        let store = SessionStore::new();
        store.add("u1", sel("a"));
        store.add("u1", sel("b"));
        store.add("u2", sel("c"));

        let names: Vec<String> = store
            .selections("u1")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(store.len("u2"), 1);
        assert_eq!(store.len("missing"), 0);
    }

    #[test]
    fn test_remove_by_id() {
        let store = SessionStore::new();
        let kept = store.add("u1", sel("keep"));
        let gone = store.add("u1", sel("drop"));

        let removed = store.remove("u1", gone.id).expect("should remove");
        assert_eq!(removed.selection.name, "drop");
        assert_eq!(store.len("u1"), 1);
        assert_eq!(store.stored("u1")[0].id, kept.id);
        assert!(store.remove("u1", gone.id).is_none(), "already removed");
    }

    #[test]
    fn test_clear_reports_dropped_count() {
        let store = SessionStore::new();
        store.add("u1", sel("a"));
        store.add("u1", sel("b"));
        assert_eq!(store.clear("u1"), 2);
        assert_eq!(store.clear("u1"), 0);
        assert!(store.selections("u1").is_empty());
    }
}
