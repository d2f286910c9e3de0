//! Per-collection id allocation.

use crate::command::run;
use crate::error::CoreResult;
use crate::keys::KeyBuilder;
use crate::stats::StoreStats;
use crate::types::RecordId;
use rediso_storage::HashStore;

/// Hands out increasing ids per collection.
///
/// The counter hash stores the **last assigned** id of each collection.
/// Reading never advances it: [`IdAllocator::next_id`] returns stored + 1
/// and the insert path persists the id it actually used with
/// [`IdAllocator::commit`].
#[derive(Debug, Clone, Copy)]
pub struct IdAllocator<'a> {
    keys: &'a KeyBuilder,
    stats: &'a StoreStats,
}

impl<'a> IdAllocator<'a> {
    /// Creates an allocator over the given key layout.
    pub fn new(keys: &'a KeyBuilder, stats: &'a StoreStats) -> Self {
        Self { keys, stats }
    }

    /// Returns the last id assigned in `collection`, if any.
    ///
    /// Empty, zero or non-numeric counters count as absent.
    pub fn last_id<S: HashStore + ?Sized>(
        &self,
        store: &S,
        collection: &str,
    ) -> CoreResult<Option<RecordId>> {
        let stored = run(
            self.stats,
            "next_id",
            store.hget(&self.keys.counter_key(), collection),
        )?;
        Ok(stored
            .and_then(|text| text.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(RecordId::new))
    }

    /// Returns the id the next insert into `collection` will use.
    pub fn next_id<S: HashStore + ?Sized>(&self, store: &S, collection: &str) -> CoreResult<RecordId> {
        Ok(self
            .last_id(store, collection)?
            .map_or(RecordId::FIRST, RecordId::next))
    }

    /// Persists `id` as the last assigned id of `collection`.
    pub fn commit<S: HashStore + ?Sized>(
        &self,
        store: &mut S,
        collection: &str,
        id: RecordId,
    ) -> CoreResult<()> {
        run(
            self.stats,
            "insert",
            store.hset(&self.keys.counter_key(), collection, &id.field()),
        )?;
        Ok(())
    }
}
