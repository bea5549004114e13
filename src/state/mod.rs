//! World state access.
//!
//! Contract operations only ever see a [`StateStore`]: a transaction-scoped
//! view with get/put/delete by key and ordered range scans. A [`Ledger`] hands
//! out those views as [`LedgerTransaction`]s, which the service commits or
//! rolls back as a whole.
// region:    --- Imports
use crate::error::StateResult;
use async_trait::async_trait;

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;

pub use memory::{MemoryLedger, MemoryTransaction};
pub use postgres::{PostgresLedger, PostgresTransaction};
// endregion: --- Modules

// region:    --- State Store Trait
/// Transaction-scoped key-value view of the world state.
#[async_trait]
pub trait StateStore: Send {
    /// Returns `Ok(None)` when nothing is stored at `key`.
    async fn get_state(&mut self, key: &str) -> StateResult<Option<Vec<u8>>>;

    async fn put_state(&mut self, key: &str, value: Vec<u8>) -> StateResult<()>;

    async fn del_state(&mut self, key: &str) -> StateResult<()>;

    /// Ordered scan over `[start, end)`. An empty `start` begins at the first
    /// key and an empty `end` runs through the last one.
    async fn get_state_by_range(&mut self, start: &str, end: &str)
        -> StateResult<StateRangeIterator>;
}

/// A [`StateStore`] that belongs to one ledger transaction.
#[async_trait]
pub trait LedgerTransaction: StateStore + Sized {
    async fn commit(self) -> StateResult<()>;

    async fn rollback(self) -> StateResult<()>;
}

/// World state backend.
#[async_trait]
pub trait Ledger: Send + Sync + 'static {
    type Transaction: LedgerTransaction + 'static;

    async fn begin(&self) -> StateResult<Self::Transaction>;
}
// endregion: --- State Store Trait

// region:    --- Range Iterator
/// One entry yielded by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Result of [`StateStore::get_state_by_range`].
///
/// Holds a backend cursor until [`close`](Self::close) is called or the
/// iterator is dropped, whichever comes first.
pub struct StateRangeIterator {
    entries: std::vec::IntoIter<KeyValue>,
    on_close: Option<Box<dyn FnOnce() + Send>>,
}

impl StateRangeIterator {
    pub fn new(entries: Vec<KeyValue>) -> Self {
        Self {
            entries: entries.into_iter(),
            on_close: None,
        }
    }

    /// Registers the callback that releases the backend cursor.
    pub fn with_close_hook(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(hook) = self.on_close.take() {
            hook();
        }
    }
}

impl Iterator for StateRangeIterator {
    type Item = KeyValue;

    fn next(&mut self) -> Option<KeyValue> {
        self.entries.next()
    }
}

impl Drop for StateRangeIterator {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StateRangeIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateRangeIterator")
            .field("remaining", &self.entries.len())
            .field("open", &self.on_close.is_some())
            .finish()
    }
}
// endregion: --- Range Iterator
