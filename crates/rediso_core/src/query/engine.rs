//! `search_all` over a collection's list table.

use crate::command::run;
use crate::error::{CoreError, CoreResult};
use crate::keys::KeyBuilder;
use crate::query::cache::{QueryCache, Row};
use crate::query::options::{SearchOptions, SearchResult, SearchSpec, SortOrder};
use crate::stats::StoreStats;
use crate::store::check_collection;
use rediso_codec::Record;
use rediso_storage::HashStore;
use std::sync::Arc;

const OP: &str = "search_all";

/// Runs searches and owns their cache.
///
/// # Compounding cache
///
/// The first search on a collection fetches its whole list table and caches
/// it under the SHA-256 of the list path. Every search then starts from the
/// cached rows and **replaces them with its own page**, so a second search on
/// the same engine only sees what the first one returned. Writes made after
/// the fetch are not visible until [`QueryEngine::invalidate`] or
/// [`QueryEngine::clear_cache`] drops the entry.
#[derive(Debug)]
pub struct QueryEngine {
    keys: KeyBuilder,
    stats: Arc<StoreStats>,
    cache: QueryCache,
}

impl QueryEngine {
    /// Creates an engine with an empty cache.
    pub fn new(keys: KeyBuilder, stats: Arc<StoreStats>) -> Self {
        Self {
            keys,
            stats,
            cache: QueryCache::new(),
        }
    }

    /// Searches `collection`.
    ///
    /// Rows are selected when any predicate holds or the search matches
    /// (all rows when neither is given), then sorted and paginated.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty collection name or one containing `:`
    /// - `FieldNotFound` when a predicate or search field is missing from a
    ///   row, or `order_by` is missing from a selected row
    /// - `BackingStore` if the initial fetch fails
    /// - `Codec` if a stored document is not a JSON object
    pub fn search_all<S: HashStore + ?Sized>(
        &mut self,
        store: &S,
        collection: &str,
        options: &SearchOptions,
    ) -> CoreResult<SearchResult> {
        check_collection(OP, collection)?;
        self.stats.record_search();
        let path = self.keys.list_path(collection);

        if self.cache.get(&path).is_some() {
            self.stats.record_cache_hit();
        } else {
            let rows: Vec<Row> = run(&self.stats, OP, store.hgetall(&path))?
                .into_iter()
                .map(|(_, json)| Row::Raw(json))
                .collect();
            if rows.is_empty() {
                return Ok(SearchResult::default());
            }
            self.cache.insert(&path, rows);
        }
        let Some(entry) = self.cache.get_mut(&path) else {
            return Ok(SearchResult::default());
        };
        entry.options = Some(options.clone());

        let count_all = entry.rows.len();
        for row in &mut entry.rows {
            row.decode()?;
        }
        let records: Vec<&Record> = entry.rows.iter().filter_map(Row::as_record).collect();

        let mut selected = Vec::with_capacity(records.len());
        for record in records {
            if select(record, options)? {
                selected.push(record.clone());
            }
        }

        if let Some(field) = options.order_by.as_deref() {
            selected = sort(selected, field, options.order)?;
        }

        let page = options.limit.apply(selected);
        entry.rows = page.iter().cloned().map(Row::Decoded).collect();

        tracing::debug!(
            collection,
            count = page.len(),
            count_all,
            "search finished"
        );
        Ok(SearchResult {
            count: page.len(),
            count_all,
            records: page,
        })
    }

    /// Drops every cached path.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Drops the cached rows of one collection; returns whether any existed.
    pub fn invalidate(&mut self, collection: &str) -> bool {
        self.cache.remove(&self.keys.list_path(collection))
    }

    /// Returns the options of the last search on `collection`, if cached.
    pub fn cached_options(&self, collection: &str) -> Option<&SearchOptions> {
        self.cache
            .get(&self.keys.list_path(collection))?
            .options
            .as_ref()
    }

    /// Returns the cache.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}

/// Decides whether a row passes the predicates and search.
///
/// Every predicate is evaluated, so a missing field is reported even when an
/// earlier predicate already selected the row.
fn select(record: &Record, options: &SearchOptions) -> CoreResult<bool> {
    if !options.has_filters() {
        return Ok(true);
    }
    let mut hit = false;
    for predicate in &options.predicates {
        hit |= predicate.matches(record)?;
    }
    if let Some(search) = options.search.as_ref().filter(|s| s.is_active()) {
        hit |= search_matches(record, search)?;
    }
    Ok(hit)
}

fn search_matches(record: &Record, search: &SearchSpec) -> CoreResult<bool> {
    match search {
        SearchSpec::Global(term) => Ok(contains_ci(&record.joined("|"), term)),
        SearchSpec::Fields(terms) => {
            let mut hit = false;
            for (field, term) in terms {
                let value = record
                    .get(field)
                    .ok_or_else(|| CoreError::field_not_found(OP, field.as_str()))?;
                hit |= contains_ci(&value.render(), term);
            }
            Ok(hit)
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Stable sort by the total order of [`rediso_codec::SortKey`].
fn sort(records: Vec<Record>, field: &str, order: SortOrder) -> CoreResult<Vec<Record>> {
    let mut keys = Vec::with_capacity(records.len());
    for record in &records {
        let value = record
            .get(field)
            .ok_or_else(|| CoreError::field_not_found(OP, field))?;
        keys.push(value.sort_key());
    }
    let mut positions: Vec<usize> = (0..records.len()).collect();
    positions.sort_by(|&a, &b| match order {
        SortOrder::Asc => keys[a].cmp(&keys[b]),
        SortOrder::Desc => keys[b].cmp(&keys[a]),
    });

    let mut slots: Vec<Option<Record>> = records.into_iter().map(Some).collect();
    Ok(positions
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect())
}
