//! Operation counters.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut db = Rediso::open(InMemoryStore::new(), Config::default())?;
//! db.insert("mytable", record, &["key2"])?;
//!
//! let stats = db.stats();
//! println!("Store commands: {}", stats.commands());
//! println!("Inserts: {}", stats.inserts());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for store traffic and operations.
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct StoreStats {
    /// Backing-store commands issued.
    commands: AtomicU64,
    /// Successful inserts.
    inserts: AtomicU64,
    /// Successful updates.
    updates: AtomicU64,
    /// Successful deletes.
    deletes: AtomicU64,
    /// Searches run.
    searches: AtomicU64,
    /// Searches served from the query cache.
    cache_hits: AtomicU64,
    /// Failed operations.
    errors: AtomicU64,
}

impl StoreStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_command(&self) {
        self.commands.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of backing-store commands issued.
    pub fn commands(&self) -> u64 {
        self.commands.load(Ordering::Relaxed)
    }

    /// Returns the number of successful inserts.
    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Returns the number of successful updates.
    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    /// Returns the number of successful deletes.
    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }

    /// Returns the number of searches run.
    pub fn searches(&self) -> u64 {
        self.searches.load(Ordering::Relaxed)
    }

    /// Returns the number of searches served from the cache.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Returns the number of failed operations.
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Returns a point-in-time copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            commands: self.commands(),
            inserts: self.inserts(),
            updates: self.updates(),
            deletes: self.deletes(),
            searches: self.searches(),
            cache_hits: self.cache_hits(),
            errors: self.errors(),
        }
    }
}

/// A copy of [`StoreStats`] at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct StatsSnapshot {
    /// Backing-store commands issued.
    pub commands: u64,
    /// Successful inserts.
    pub inserts: u64,
    /// Successful updates.
    pub updates: u64,
    /// Successful deletes.
    pub deletes: u64,
    /// Searches run.
    pub searches: u64,
    /// Searches served from the query cache.
    pub cache_hits: u64,
    /// Failed operations.
    pub errors: u64,
}
