//! Per-name lock table
//!
//! Serializes mutations that target the same file name while letting
//! operations on different names run in parallel. Entries are created on
//! first use and dropped again once nobody holds or awaits them.

use std::collections::HashMap;
use std::pin::pin;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = HashMap<String, Arc<AsyncMutex<()>>>;

#[derive(Debug, Default, Clone)]
pub struct NameLocks {
    table: Arc<Mutex<LockTable>>,
}

/// Exclusive hold on one file name. Released on drop.
#[derive(Debug)]
pub struct NameGuard {
    // Field order matters: the mutex is released before the entry is checked.
    _guard: OwnedMutexGuard<()>,
    _cleanup: EntryCleanup,
}

/// Drops the table entry for `name` once nothing else references it.
/// Runs both when a holder releases and when a waiter gives up.
#[derive(Debug)]
struct EntryCleanup {
    name: String,
    table: Arc<Mutex<LockTable>>,
}

impl NameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until `name` is free and take it
    pub async fn lock(&self, name: &str) -> NameGuard {
        let entry = {
            let mut table = lock_table(&self.table);
            Arc::clone(table.entry(name.to_string()).or_default())
        };

        let cleanup = EntryCleanup {
            name: name.to_string(),
            table: Arc::clone(&self.table),
        };
        // Declared after `cleanup` so a cancelled wait releases its entry first.
        let acquire = pin!(entry.lock_owned());
        let guard = acquire.await;

        NameGuard {
            _guard: guard,
            _cleanup: cleanup,
        }
    }

    /// Number of names currently held or awaited
    pub fn active(&self) -> usize {
        lock_table(&self.table).len()
    }
}

impl Drop for EntryCleanup {
    fn drop(&mut self) {
        let mut table = lock_table(&self.table);
        let unused = table
            .get(&self.name)
            .is_some_and(|entry| Arc::strong_count(entry) == 1);
        if unused {
            table.remove(&self.name);
        }
    }
}

// The table only ever holds plain data, so a poisoned lock is still usable.
fn lock_table(table: &Mutex<LockTable>) -> MutexGuard<'_, LockTable> {
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
