//! Per-engine query cache.

use crate::query::options::SearchOptions;
use rediso_codec::{from_json, CodecResult, Record};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// A cached row: as fetched, or already decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Serialized record straight from the list table.
    Raw(String),
    /// Decoded record.
    Decoded(Record),
}

impl Row {
    /// Decodes the row in place; already decoded rows are left alone.
    pub fn decode(&mut self) -> CodecResult<()> {
        if let Row::Raw(json) = self {
            let record = from_json(json)?;
            *self = Row::Decoded(record);
        }
        Ok(())
    }

    /// Returns the record of a decoded row.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Row::Decoded(record) => Some(record),
            Row::Raw(_) => None,
        }
    }
}

/// One cached path.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    /// Rows the next search on this path starts from.
    pub rows: Vec<Row>,
    /// Options of the last search on this path.
    pub options: Option<SearchOptions>,
}

/// Map from hashed storage path to the rows last produced for it.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: HashMap<String, CacheEntry>,
}

impl QueryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cache key of a storage path: its SHA-256, hex encoded.
    pub fn key(path: &str) -> String {
        format!("{:x}", Sha256::digest(path.as_bytes()))
    }

    /// Returns the entry for `path`.
    pub fn get(&self, path: &str) -> Option<&CacheEntry> {
        self.entries.get(&Self::key(path))
    }

    /// Returns the entry for `path` mutably.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut CacheEntry> {
        self.entries.get_mut(&Self::key(path))
    }

    /// Stores `rows` for `path`, replacing any earlier entry.
    pub fn insert(&mut self, path: &str, rows: Vec<Row>) {
        self.entries
            .insert(Self::key(path), CacheEntry { rows, options: None });
    }

    /// Drops the entry for `path`; returns whether one existed.
    pub fn remove(&mut self, path: &str) -> bool {
        self.entries.remove(&Self::key(path)).is_some()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
