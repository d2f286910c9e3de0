//! The `Rediso` facade.

use crate::config::Config;
use crate::error::CoreResult;
use crate::keys::KeyBuilder;
use crate::query::{QueryEngine, SearchOptions, SearchResult};
use crate::session::Session;
use crate::stats::StoreStats;
use crate::store::RecordStore;
use crate::types::RecordId;
use rediso_codec::{Record, Value};
use rediso_storage::HashStore;
use std::sync::Arc;

/// A document store over one backing-store session.
///
/// # Example
///
/// ```rust,ignore
/// use rediso_core::{Config, Rediso, SearchOptions, Operator};
/// use rediso_storage::InMemoryStore;
///
/// let mut db = Rediso::open(InMemoryStore::new(), Config::default())?;
///
/// let record = [("key1", "value1"), ("key2", "value2")].into_iter().collect();
/// let id = db.insert("mytable", record, &["key2"])?;
///
/// let found = db.search_all("mytable", &SearchOptions::new().filter("id", Operator::Eq, 1))?;
/// assert_eq!(found.count, 1);
/// ```
#[derive(Debug)]
pub struct Rediso<S: HashStore> {
    config: Config,
    keys: KeyBuilder,
    session: Session<S>,
    stats: Arc<StoreStats>,
    engine: QueryEngine,
}

impl<S: HashStore> Rediso<S> {
    /// Opens a session on `store` and builds the store around it.
    ///
    /// # Errors
    ///
    /// `Connection` if authentication, database selection or the ping fails.
    pub fn open(store: S, config: Config) -> CoreResult<Self> {
        let session = Session::open(store, &config.connection)?;
        let keys = KeyBuilder::from_config(&config);
        let stats = Arc::new(StoreStats::new());
        let engine = QueryEngine::new(keys.clone(), Arc::clone(&stats));
        Ok(Self {
            config,
            keys,
            session,
            stats,
            engine,
        })
    }

    fn records(&self) -> RecordStore<'_> {
        RecordStore::new(&self.keys, &self.stats)
    }

    /// Inserts a record, indexing it by each of `index_fields`.
    ///
    /// See [`RecordStore::insert`].
    pub fn insert(
        &mut self,
        collection: &str,
        record: Record,
        index_fields: &[&str],
    ) -> CoreResult<RecordId> {
        let id = RecordStore::new(&self.keys, &self.stats)
            .insert(self.session.store_mut(), collection, record, index_fields)
            .inspect_err(|_| self.stats.record_error())?;
        self.stats.record_insert();
        Ok(id)
    }

    /// Merges `partial` into record `id`; returns whether it changed.
    ///
    /// See [`RecordStore::update`].
    pub fn update(&mut self, collection: &str, id: RecordId, partial: &Record) -> CoreResult<bool> {
        let changed = RecordStore::new(&self.keys, &self.stats)
            .update(self.session.store_mut(), collection, id, partial)
            .inspect_err(|_| self.stats.record_error())?;
        self.stats.record_update();
        Ok(changed)
    }

    /// Deletes record `id`; returns whether it existed.
    ///
    /// See [`RecordStore::delete`].
    pub fn delete(&mut self, collection: &str, id: RecordId) -> CoreResult<bool> {
        let existed = RecordStore::new(&self.keys, &self.stats)
            .delete(self.session.store_mut(), collection, id)
            .inspect_err(|_| self.stats.record_error())?;
        self.stats.record_delete();
        Ok(existed)
    }

    /// Reads record `id`.
    pub fn get(&self, collection: &str, id: RecordId) -> CoreResult<Option<Record>> {
        self.records()
            .get(self.session.store(), collection, id)
            .inspect_err(|_| self.stats.record_error())
    }

    /// Reads the records whose `field` equals `value` through its index table.
    pub fn lookup(&self, collection: &str, field: &str, value: &Value) -> CoreResult<Vec<Record>> {
        self.records()
            .lookup(self.session.store(), collection, field, value)
            .inspect_err(|_| self.stats.record_error())
    }

    /// Returns the id the next insert into `collection` will receive.
    pub fn last_increment(&self, collection: &str) -> CoreResult<RecordId> {
        self.records()
            .last_increment(self.session.store(), collection)
            .inspect_err(|_| self.stats.record_error())
    }

    /// Searches `collection`. See [`QueryEngine::search_all`] for the cache
    /// semantics.
    pub fn search_all(&mut self, collection: &str, options: &SearchOptions) -> CoreResult<SearchResult> {
        self.engine
            .search_all(self.session.store(), collection, options)
            .inspect_err(|_| self.stats.record_error())
    }

    /// Drops every cached search.
    pub fn clear_cache(&mut self) {
        self.engine.clear_cache();
    }

    /// Drops the cached search of one collection.
    pub fn invalidate(&mut self, collection: &str) -> bool {
        self.engine.invalidate(collection)
    }

    /// Returns the operation counters.
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the key layout.
    pub fn keys(&self) -> &KeyBuilder {
        &self.keys
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        self.session.store()
    }

    /// Returns the backing store mutably.
    pub fn store_mut(&mut self) -> &mut S {
        self.session.store_mut()
    }

    /// Closes the facade and gives the store back.
    pub fn into_inner(self) -> S {
        self.session.into_inner()
    }
}
