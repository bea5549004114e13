// region:    --- Imports
use super::{KeyValue, Ledger, LedgerTransaction, StateRangeIterator, StateStore};
use crate::error::StateResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

// endregion: --- Imports

type WorldState = BTreeMap<String, Vec<u8>>;

// region:    --- Memory Ledger
/// In-memory world state for tests and local runs.
///
/// A transaction holds the state lock from `begin` until commit or rollback,
/// so transactions run one at a time. Writes go to a working copy that
/// replaces the shared state on commit.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<WorldState>>,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of range-scan cursors not yet released.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Committed value at `key`, bypassing transactions.
    pub async fn raw_get(&self, key: &str) -> Option<Vec<u8>> {
        self.state.lock().await.get(key).cloned()
    }

    /// Writes `value` at `key` outside any transaction.
    pub async fn raw_put(&self, key: &str, value: Vec<u8>) {
        self.state.lock().await.insert(key.to_string(), value);
    }

    /// Committed keys in order.
    pub async fn keys(&self) -> Vec<String> {
        self.state.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    type Transaction = MemoryTransaction;

    async fn begin(&self) -> StateResult<MemoryTransaction> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTransaction {
            guard,
            working,
            open_cursors: Arc::clone(&self.open_cursors),
        })
    }
}

impl std::fmt::Debug for MemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLedger")
            .field("open_cursors", &self.open_cursors())
            .finish()
    }
}
// endregion: --- Memory Ledger

// region:    --- Memory Transaction
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<WorldState>,
    working: WorldState,
    open_cursors: Arc<AtomicUsize>,
}

#[async_trait]
impl StateStore for MemoryTransaction {
    async fn get_state(&mut self, key: &str) -> StateResult<Option<Vec<u8>>> {
        Ok(self.working.get(key).cloned())
    }

    async fn put_state(&mut self, key: &str, value: Vec<u8>) -> StateResult<()> {
        self.working.insert(key.to_string(), value);
        Ok(())
    }

    async fn del_state(&mut self, key: &str) -> StateResult<()> {
        self.working.remove(key);
        Ok(())
    }

    async fn get_state_by_range(
        &mut self,
        start: &str,
        end: &str,
    ) -> StateResult<StateRangeIterator> {
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };

        // BTreeMap::range panics on an inverted range; treat it as empty.
        let inverted = !start.is_empty() && !end.is_empty() && start >= end;
        let entries: Vec<KeyValue> = if inverted {
            Vec::new()
        } else {
            self.working
                .range::<String, _>((lower, upper))
                .map(|(key, value)| KeyValue {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect()
        };

        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        let open_cursors = Arc::clone(&self.open_cursors);
        Ok(StateRangeIterator::new(entries).with_close_hook(move || {
            open_cursors.fetch_sub(1, Ordering::SeqCst);
        }))
    }
}

#[async_trait]
impl LedgerTransaction for MemoryTransaction {
    async fn commit(self) -> StateResult<()> {
        let MemoryTransaction {
            mut guard, working, ..
        } = self;
        debug!("{:<12} --> commit: {} keys", "MemoryLedger", working.len());
        *guard = working;
        Ok(())
    }

    async fn rollback(self) -> StateResult<()> {
        debug!("{:<12} --> rollback", "MemoryLedger");
        Ok(())
    }
}
// endregion: --- Memory Transaction
