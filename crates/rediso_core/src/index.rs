//! Secondary index tables.
//!
//! An index table holds, for one value of one field, id → serialized record
//! for every record carrying that value. Records are duplicated into index
//! tables, not referenced, so every write to a record has to be fanned out.
//!
//! # Fan-out invariant
//!
//! For every indexed field of a record, the table named after the field's
//! current value holds the record's current serialized form, and no table
//! named after an older value still holds it.
//!
//! The invariant is best effort: writes are not transactional, and a failure
//! part way through leaves the tables divergent until the record is written
//! again.
//!
//! Index tables are discovered with a key-pattern scan over
//! `<ns>:<collection>:primary:*`, one scan per update or delete.

use crate::command::run;
use crate::error::{CoreError, CoreResult};
use crate::keys::KeyBuilder;
use crate::stats::StoreStats;
use crate::types::RecordId;
use rediso_codec::{Record, ID_FIELD};
use rediso_storage::HashStore;

/// An index table found by a key scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
    /// Full storage key.
    pub key: String,
    /// Indexed field.
    pub field: String,
    /// Rendered field value the table stands for.
    pub value: String,
}

/// What an update did to one index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexChange {
    /// Value unchanged; entry rewritten in place.
    Rewritten,
    /// Value changed; the whole table was renamed to the new value's key.
    Renamed,
    /// Value changed; the entry moved to the new value's table.
    Moved,
}

/// Keeps index tables in step with the list table.
#[derive(Debug, Clone, Copy)]
pub struct IndexMaintainer<'a> {
    keys: &'a KeyBuilder,
    stats: &'a StoreStats,
}

impl<'a> IndexMaintainer<'a> {
    /// Creates a maintainer over the given key layout.
    pub fn new(keys: &'a KeyBuilder, stats: &'a StoreStats) -> Self {
        Self { keys, stats }
    }

    /// Writes `json` into the table of each field in `fields`.
    ///
    /// Stops at the first failing write; earlier writes stay.
    pub fn write_entries<S: HashStore + ?Sized>(
        &self,
        store: &mut S,
        collection: &str,
        id: RecordId,
        record: &Record,
        json: &str,
        fields: &[&str],
    ) -> CoreResult<()> {
        for &field in fields {
            let value = record
                .get(field)
                .ok_or_else(|| CoreError::field_not_found("insert", field))?;
            let key = self.keys.index_path(collection, field, &value.render());
            run(self.stats, "insert", store.hset(&key, &id.field(), json))?;
            tracing::debug!(collection, %id, key = %key, "index entry written");
        }
        Ok(())
    }

    /// Lists the index tables of `collection`.
    ///
    /// Keys that match the scan pattern but cannot be split into field and
    /// value are skipped.
    pub fn discover<S: HashStore + ?Sized>(
        &self,
        store: &S,
        collection: &str,
        operation: &'static str,
    ) -> CoreResult<Vec<IndexTable>> {
        let found = run(
            self.stats,
            operation,
            store.keys(&self.keys.index_pattern(collection)),
        )?;
        Ok(found
            .into_iter()
            .filter_map(|key| {
                let (field, value) = self.keys.parse_index_path(collection, &key)?;
                Some(IndexTable {
                    field: field.to_string(),
                    value: value.to_string(),
                    key: key.clone(),
                })
            })
            .collect())
    }

    /// Brings every index table holding `id` up to date with `record`.
    ///
    /// For each table that references the id:
    /// - indexed value unchanged (or field not in the record): the entry is
    ///   rewritten in place
    /// - value changed, the table holds only this id and the new value's
    ///   table does not exist yet: the table is renamed, then rewritten
    /// - value changed otherwise: the entry is written to the new value's
    ///   table and removed from the old one
    ///
    /// Tables not holding the id are left alone. Stops at the first failure.
    pub fn update_entries<S: HashStore + ?Sized>(
        &self,
        store: &mut S,
        collection: &str,
        id: RecordId,
        record: &Record,
        json: &str,
    ) -> CoreResult<Vec<IndexChange>> {
        const OP: &str = "update";
        let field_name = id.field();
        let mut changes = Vec::new();

        for table in self.discover(store, collection, OP)? {
            if run(self.stats, OP, store.hget(&table.key, &field_name))?.is_none() {
                continue;
            }

            let new_value = record.get(&table.field).map(|v| v.render().into_owned());
            let new_value = match new_value {
                Some(value) if value != table.value => value,
                _ => {
                    run(self.stats, OP, store.hset(&table.key, &field_name, json))?;
                    changes.push(IndexChange::Rewritten);
                    continue;
                }
            };

            let new_key = self.keys.index_path(collection, &table.field, &new_value);
            let sole_entry = run(self.stats, OP, store.hlen(&table.key))? == 1;
            if sole_entry && !run(self.stats, OP, store.exists(&new_key))? {
                run(self.stats, OP, store.rename(&table.key, &new_key))?;
                run(self.stats, OP, store.hset(&new_key, &field_name, json))?;
                changes.push(IndexChange::Renamed);
            } else {
                run(self.stats, OP, store.hset(&new_key, &field_name, json))?;
                run(self.stats, OP, store.hdel(&table.key, &field_name))?;
                changes.push(IndexChange::Moved);
            }
            tracing::debug!(collection, %id, from = %table.key, to = %new_key, "index entry relocated");
        }

        Ok(changes)
    }

    /// Removes `id` from every index table of `collection`.
    ///
    /// Returns the number of entries removed. Stops at the first failure.
    pub fn remove_entries<S: HashStore + ?Sized>(
        &self,
        store: &mut S,
        collection: &str,
        id: RecordId,
    ) -> CoreResult<u64> {
        let field_name = id.field();
        let mut removed = 0;
        for table in self.discover(store, collection, "delete")? {
            removed += run(self.stats, "delete", store.hdel(&table.key, &field_name))?;
        }
        Ok(removed)
    }

    /// Returns whether `field` can be indexed on `record` at insert time.
    ///
    /// The `id` field is appended by the insert itself and always qualifies.
    pub fn indexable(record: &Record, field: &str) -> bool {
        field == ID_FIELD || record.contains(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rediso_codec::to_json;
    use rediso_storage::InMemoryStore;

    fn record(id: u64, key2: &str) -> Record {
        let mut record: Record = [("key1", "value1"), ("key2", key2)].into_iter().collect();
        record.insert(ID_FIELD, id as i64);
        record
    }

    fn seed(store: &mut InMemoryStore, keys: &KeyBuilder, stats: &StoreStats, id: u64, key2: &str) {
        let index = IndexMaintainer::new(keys, stats);
        let record = record(id, key2);
        let json = to_json(&record).unwrap();
        index
            .write_entries(store, "t", RecordId::new(id), &record, &json, &["key2"])
            .unwrap();
    }

    #[test]
    fn write_entries_fans_out() {
        let keys = KeyBuilder::default();
        let stats = StoreStats::new();
        let mut store = InMemoryStore::new();
        let index = IndexMaintainer::new(&keys, &stats);
        let record = record(1, "value2");
        let json = to_json(&record).unwrap();

        index
            .write_entries(&mut store, "t", RecordId::new(1), &record, &json, &["key1", "key2"])
            .unwrap();

        for (field, value) in [("key1", "value1"), ("key2", "value2")] {
            let key = keys.index_path("t", field, value);
            assert_eq!(store.hget(&key, "1").unwrap().as_deref(), Some(json.as_str()));
        }
    }

    #[test]
    fn write_entries_rejects_missing_field() {
        let keys = KeyBuilder::default();
        let stats = StoreStats::new();
        let mut store = InMemoryStore::new();
        let index = IndexMaintainer::new(&keys, &stats);
        let record = record(1, "value2");

        let err = index
            .write_entries(&mut store, "t", RecordId::new(1), &record, "{}", &["nope"])
            .unwrap_err();
        assert!(matches!(err, CoreError::FieldNotFound { field, .. } if field == "nope"));
    }

    #[test]
    fn discover_lists_tables_of_one_collection() {
        let keys = KeyBuilder::default();
        let stats = StoreStats::new();
        let mut store = InMemoryStore::new();
        seed(&mut store, &keys, &stats, 1, "a");
        seed(&mut store, &keys, &stats, 2, "b");
        store.hset(&keys.index_path("other", "key2", "a"), "1", "{}").unwrap();

        let index = IndexMaintainer::new(&keys, &stats);
        let tables = index.discover(&store, "t", "update").unwrap();
        let values: Vec<&str> = tables.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b"]);
        assert!(tables.iter().all(|t| t.field == "key2"));
    }

    #[test]
    fn update_renames_sole_table() {
        let keys = KeyBuilder::default();
        let stats = StoreStats::new();
        let mut store = InMemoryStore::new();
        seed(&mut store, &keys, &stats, 1, "old");

        let index = IndexMaintainer::new(&keys, &stats);
        let updated = record(1, "new");
        let json = to_json(&updated).unwrap();
        let changes = index
            .update_entries(&mut store, "t", RecordId::new(1), &updated, &json)
            .unwrap();

        assert_eq!(changes, vec![IndexChange::Renamed]);
        assert!(!store.exists(&keys.index_path("t", "key2", "old")).unwrap());
        assert_eq!(
            store.hget(&keys.index_path("t", "key2", "new"), "1").unwrap(),
            Some(json)
        );
    }

    #[test]
    fn update_moves_entry_out_of_shared_table() {
        let keys = KeyBuilder::default();
        let stats = StoreStats::new();
        let mut store = InMemoryStore::new();
        seed(&mut store, &keys, &stats, 1, "shared");
        seed(&mut store, &keys, &stats, 2, "shared");

        let index = IndexMaintainer::new(&keys, &stats);
        let updated = record(1, "mine");
        let json = to_json(&updated).unwrap();
        let changes = index
            .update_entries(&mut store, "t", RecordId::new(1), &updated, &json)
            .unwrap();

        assert_eq!(changes, vec![IndexChange::Moved]);
        let shared = keys.index_path("t", "key2", "shared");
        assert_eq!(store.hget(&shared, "1").unwrap(), None);
        assert!(store.hget(&shared, "2").unwrap().is_some());
        assert_eq!(
            store.hget(&keys.index_path("t", "key2", "mine"), "1").unwrap(),
            Some(json)
        );
    }

    #[test]
    fn update_into_existing_table_keeps_its_entries() {
        let keys = KeyBuilder::default();
        let stats = StoreStats::new();
        let mut store = InMemoryStore::new();
        seed(&mut store, &keys, &stats, 1, "a");
        seed(&mut store, &keys, &stats, 2, "b");

        let index = IndexMaintainer::new(&keys, &stats);
        let updated = record(1, "b");
        let json = to_json(&updated).unwrap();
        let changes = index
            .update_entries(&mut store, "t", RecordId::new(1), &updated, &json)
            .unwrap();

        assert_eq!(changes, vec![IndexChange::Moved]);
        let b = keys.index_path("t", "key2", "b");
        assert_eq!(store.hlen(&b).unwrap(), 2);
        assert!(!store.exists(&keys.index_path("t", "key2", "a")).unwrap());
    }

    #[test]
    fn update_rewrites_unchanged_values_in_place() {
        let keys = KeyBuilder::default();
        let stats = StoreStats::new();
        let mut store = InMemoryStore::new();
        seed(&mut store, &keys, &stats, 1, "same");

        let index = IndexMaintainer::new(&keys, &stats);
        let mut updated = record(1, "same");
        updated.insert("key1", "changed");
        let json = to_json(&updated).unwrap();
        let changes = index
            .update_entries(&mut store, "t", RecordId::new(1), &updated, &json)
            .unwrap();

        assert_eq!(changes, vec![IndexChange::Rewritten]);
        assert_eq!(
            store.hget(&keys.index_path("t", "key2", "same"), "1").unwrap(),
            Some(json)
        );
    }

    #[test]
    fn update_skips_tables_without_the_id() {
        let keys = KeyBuilder::default();
        let stats = StoreStats::new();
        let mut store = InMemoryStore::new();
        seed(&mut store, &keys, &stats, 2, "other");

        let index = IndexMaintainer::new(&keys, &stats);
        let updated = record(1, "new");
        let json = to_json(&updated).unwrap();
        let changes = index
            .update_entries(&mut store, "t", RecordId::new(1), &updated, &json)
            .unwrap();

        assert!(changes.is_empty());
        assert!(store.exists(&keys.index_path("t", "key2", "other")).unwrap());
        assert!(!store.exists(&keys.index_path("t", "key2", "new")).unwrap());
    }

    #[test]
    fn remove_entries_clears_every_table() {
        let keys = KeyBuilder::default();
        let stats = StoreStats::new();
        let mut store = InMemoryStore::new();
        seed(&mut store, &keys, &stats, 1, "a");
        seed(&mut store, &keys, &stats, 2, "a");

        let index = IndexMaintainer::new(&keys, &stats);
        assert_eq!(index.remove_entries(&mut store, "t", RecordId::new(1)).unwrap(), 1);
        assert_eq!(index.remove_entries(&mut store, "t", RecordId::new(1)).unwrap(), 0);
        assert_eq!(store.hlen(&keys.index_path("t", "key2", "a")).unwrap(), 1);
    }

    #[test]
    fn indexable_accepts_id() {
        let record = record(1, "x");
        assert!(IndexMaintainer::indexable(&record, "key1"));
        assert!(IndexMaintainer::indexable(&Record::new(), ID_FIELD));
        assert!(!IndexMaintainer::indexable(&record, "missing"));
    }
}
