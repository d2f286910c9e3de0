//! Record CRUD over the list table.

use crate::command::run;
use crate::error::{CoreError, CoreResult};
use crate::increment::IdAllocator;
use crate::index::IndexMaintainer;
use crate::keys::{KeyBuilder, KEY_SEPARATOR};
use crate::stats::StoreStats;
use crate::types::RecordId;
use rediso_codec::{from_json, to_json, Record, ID_FIELD};
use rediso_storage::HashStore;

/// Reads and writes records of any collection.
///
/// The list table `<ns>:<collection>:list` maps id → serialized record and
/// is the source of truth; index tables are maintained alongside it through
/// [`IndexMaintainer`]. Nothing here is transactional: an operation that
/// fails part way leaves its completed writes in place.
#[derive(Debug, Clone, Copy)]
pub struct RecordStore<'a> {
    keys: &'a KeyBuilder,
    stats: &'a StoreStats,
}

impl<'a> RecordStore<'a> {
    /// Creates a record store over the given key layout.
    pub fn new(keys: &'a KeyBuilder, stats: &'a StoreStats) -> Self {
        Self { keys, stats }
    }

    fn ids(&self) -> IdAllocator<'a> {
        IdAllocator::new(self.keys, self.stats)
    }

    fn index(&self) -> IndexMaintainer<'a> {
        IndexMaintainer::new(self.keys, self.stats)
    }

    /// Inserts a record and returns its new id.
    ///
    /// Writes, in order: the collection counter, the list entry, then one
    /// entry per index field. Index fields must exist on the record (`id`
    /// always does once assigned).
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty collection or record, a caller-supplied `id`,
    ///   a collection or field name containing `:`, or an id past `i64::MAX`
    /// - `FieldNotFound` for an index field missing from the record (nothing written)
    /// - `BackingStore` if a write fails; earlier writes are not rolled back
    pub fn insert<S: HashStore + ?Sized>(
        &self,
        store: &mut S,
        collection: &str,
        mut record: Record,
        index_fields: &[&str],
    ) -> CoreResult<RecordId> {
        const OP: &str = "insert";
        check_collection(OP, collection)?;
        if record.is_empty() {
            return Err(CoreError::validation(OP, "record is empty"));
        }
        check_fields(OP, &record)?;
        for field in index_fields {
            check_field_name(OP, field)?;
        }
        if let Some(field) = index_fields
            .iter()
            .find(|field| !IndexMaintainer::indexable(&record, field))
        {
            return Err(CoreError::field_not_found(OP, *field));
        }

        let ids = self.ids();
        let id = ids.next_id(store, collection)?;
        let stored_id = i64::try_from(id.as_u64())
            .map_err(|_| CoreError::validation(OP, format!("record id {id} exceeds i64")))?;
        ids.commit(store, collection, id)?;

        record.insert(ID_FIELD, stored_id);
        let json = to_json(&record)?;
        run(
            self.stats,
            OP,
            store.hset(&self.keys.list_path(collection), &id.field(), &json),
        )?;

        self.index()
            .write_entries(store, collection, id, &record, &json, index_fields)?;

        tracing::debug!(collection, %id, indexes = index_fields.len(), "record inserted");
        Ok(id)
    }

    /// Merges `partial` into the stored record `id`.
    ///
    /// Only fields the stored record already has are taken from `partial`;
    /// unknown fields and `Null` values are ignored. Index tables are updated
    /// first, the list entry last.
    ///
    /// Returns whether the merged record differs from the stored one.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty collection or partial, id 0, a supplied `id`,
    ///   or a field name containing `:`
    /// - `RecordNotFound` if no record has this id
    /// - `BackingStore` if a write fails; earlier writes are not rolled back
    pub fn update<S: HashStore + ?Sized>(
        &self,
        store: &mut S,
        collection: &str,
        id: RecordId,
        partial: &Record,
    ) -> CoreResult<bool> {
        const OP: &str = "update";
        check_collection(OP, collection)?;
        check_id(OP, id)?;
        if partial.is_empty() {
            return Err(CoreError::validation(OP, "update data is empty"));
        }
        check_fields(OP, partial)?;

        let stored = self
            .fetch(store, collection, id, OP)?
            .ok_or_else(|| CoreError::record_not_found(collection, id))?;

        let mut merged = stored.clone();
        for (field, value) in partial.iter() {
            if merged.contains(field) && !value.is_null() {
                merged.insert(field, value.clone());
            }
        }
        let json = to_json(&merged)?;

        let changes = self
            .index()
            .update_entries(store, collection, id, &merged, &json)?;

        run(
            self.stats,
            OP,
            store.hset(&self.keys.list_path(collection), &id.field(), &json),
        )?;

        tracing::debug!(collection, %id, indexes = changes.len(), "record updated");
        Ok(merged != stored)
    }

    /// Deletes record `id` from the list table and every index table.
    ///
    /// Returns whether the record existed in the list table.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty collection or id 0
    /// - `BackingStore` if a removal fails; earlier removals are not undone
    pub fn delete<S: HashStore + ?Sized>(
        &self,
        store: &mut S,
        collection: &str,
        id: RecordId,
    ) -> CoreResult<bool> {
        const OP: &str = "delete";
        check_collection(OP, collection)?;
        check_id(OP, id)?;

        let list = self.keys.list_path(collection);
        let field = id.field();
        let existed = run(self.stats, OP, store.hdel(&list, &field))? > 0;

        let removed = self.index().remove_entries(store, collection, id)?;

        // a writer racing between the two removals may have re-added the entry
        run(self.stats, OP, store.hdel(&list, &field))?;

        tracing::debug!(collection, %id, existed, indexes = removed, "record deleted");
        Ok(existed)
    }

    /// Reads record `id`, if it exists.
    pub fn get<S: HashStore + ?Sized>(
        &self,
        store: &S,
        collection: &str,
        id: RecordId,
    ) -> CoreResult<Option<Record>> {
        check_collection("get", collection)?;
        self.fetch(store, collection, id, "get")
    }

    /// Reads every record whose `field` renders as `value`, through the
    /// field's index table, ordered by id.
    ///
    /// Fields that were never indexed yield nothing.
    pub fn lookup<S: HashStore + ?Sized>(
        &self,
        store: &S,
        collection: &str,
        field: &str,
        value: &rediso_codec::Value,
    ) -> CoreResult<Vec<Record>> {
        const OP: &str = "lookup";
        check_collection(OP, collection)?;
        let key = self.keys.index_path(collection, field, &value.render());
        let mut entries = run(self.stats, OP, store.hgetall(&key))?
            .into_iter()
            .map(|(id, json)| -> CoreResult<(u64, Record)> {
                Ok((id.parse().unwrap_or(u64::MAX), from_json(&json)?))
            })
            .collect::<CoreResult<Vec<_>>>()?;
        entries.sort_by_key(|(id, _)| *id);
        Ok(entries.into_iter().map(|(_, record)| record).collect())
    }

    /// Returns the id the next insert into `collection` will receive.
    pub fn last_increment<S: HashStore + ?Sized>(
        &self,
        store: &S,
        collection: &str,
    ) -> CoreResult<RecordId> {
        self.ids().next_id(store, collection)
    }

    fn fetch<S: HashStore + ?Sized>(
        &self,
        store: &S,
        collection: &str,
        id: RecordId,
        operation: &'static str,
    ) -> CoreResult<Option<Record>> {
        let raw = run(
            self.stats,
            operation,
            store.hget(&self.keys.list_path(collection), &id.field()),
        )?;
        Ok(raw.map(|json| from_json(&json)).transpose()?)
    }
}

/// Rejects empty collection names and names containing the key separator.
pub(crate) fn check_collection(operation: &'static str, collection: &str) -> CoreResult<()> {
    if collection.is_empty() {
        return Err(CoreError::validation(operation, "collection name is empty"));
    }
    if collection.contains(KEY_SEPARATOR) {
        return Err(CoreError::validation(
            operation,
            format!("collection name `{collection}` contains `{KEY_SEPARATOR}`"),
        ));
    }
    Ok(())
}

fn check_id(operation: &'static str, id: RecordId) -> CoreResult<()> {
    if id.is_zero() {
        return Err(CoreError::validation(operation, "record id is not set"));
    }
    Ok(())
}

fn check_fields(operation: &'static str, record: &Record) -> CoreResult<()> {
    if record.contains(ID_FIELD) {
        return Err(CoreError::validation(
            operation,
            format!("field `{ID_FIELD}` is reserved"),
        ));
    }
    record.keys().try_for_each(|field| check_field_name(operation, field))
}

/// Index keys are split at the first separator, so field names cannot hold one.
fn check_field_name(operation: &'static str, field: &str) -> CoreResult<()> {
    if field.contains(KEY_SEPARATOR) {
        return Err(CoreError::validation(
            operation,
            format!("field name `{field}` contains `{KEY_SEPARATOR}`"),
        ));
    }
    Ok(())
}
