//! In-memory hash store.

use crate::backend::HashStore;
use crate::error::{StorageError, StorageResult};
use crate::pattern::glob_match;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Number of logical databases a new [`InMemoryStore`] provides.
pub const DEFAULT_DATABASES: u32 = 16;

/// An in-memory hash store.
///
/// Mirrors the parts of a Redis server rediso relies on:
/// - several logical databases addressed by `select`
/// - an optional password checked by `auth`
/// - hashes that keep their field insertion order, like small Redis hashes
///
/// Keys are listed in lexicographic order by `keys`.
///
/// # Thread Safety
///
/// The store is internally synchronized and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use rediso_storage::{HashStore, InMemoryStore};
///
/// let mut store = InMemoryStore::with_password("secret");
/// assert!(store.ping().is_err());
/// store.auth("secret").unwrap();
/// store.ping().unwrap();
/// ```
#[derive(Debug)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    databases: Vec<BTreeMap<String, Hash>>,
    selected: usize,
    password: Option<String>,
    authenticated: bool,
    closed: bool,
}

/// A hash value: field/value pairs in insertion order.
#[derive(Debug, Clone, Default)]
struct Hash {
    entries: Vec<(String, String)>,
}

impl Hash {
    fn position(&self, field: &str) -> Option<usize> {
        self.entries.iter().position(|(f, _)| f == field)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::with_databases(DEFAULT_DATABASES)
    }
}

impl InMemoryStore {
    /// Creates an empty store without a password.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with `count` logical databases.
    #[must_use]
    pub fn with_databases(count: u32) -> Self {
        Self {
            inner: RwLock::new(Inner {
                databases: vec![BTreeMap::new(); count.max(1) as usize],
                selected: 0,
                password: None,
                authenticated: true,
                closed: false,
            }),
        }
    }

    /// Creates an empty store that requires `auth(password)` before use.
    #[must_use]
    pub fn with_password(password: impl Into<String>) -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.write();
            inner.password = Some(password.into());
            inner.authenticated = false;
        }
        store
    }

    /// Closes the store; every later command fails with [`StorageError::Closed`].
    pub fn close(&self) {
        self.inner.write().closed = true;
    }

    /// Returns the number of keys in the selected database.
    #[must_use]
    pub fn key_count(&self) -> usize {
        let inner = self.inner.read();
        inner.databases[inner.selected].len()
    }

    /// Returns the index of the selected database.
    #[must_use]
    pub fn selected_database(&self) -> u32 {
        self.inner.read().selected as u32
    }
}

impl Inner {
    fn check(&self) -> StorageResult<()> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        if !self.authenticated {
            return Err(StorageError::NoAuth);
        }
        Ok(())
    }

    fn db(&self) -> &BTreeMap<String, Hash> {
        &self.databases[self.selected]
    }

    fn db_mut(&mut self) -> &mut BTreeMap<String, Hash> {
        &mut self.databases[self.selected]
    }
}

impl HashStore for InMemoryStore {
    fn hget(&self, key: &str, field: &str) -> StorageResult<Option<String>> {
        let inner = self.inner.read();
        inner.check()?;
        Ok(inner.db().get(key).and_then(|hash| {
            hash.position(field)
                .map(|index| hash.entries[index].1.clone())
        }))
    }

    fn hset(&mut self, key: &str, field: &str, value: &str) -> StorageResult<bool> {
        let mut inner = self.inner.write();
        inner.check()?;
        let hash = inner.db_mut().entry(key.to_string()).or_default();
        match hash.position(field) {
            Some(index) => {
                hash.entries[index].1 = value.to_string();
                Ok(false)
            }
            None => {
                hash.entries.push((field.to_string(), value.to_string()));
                Ok(true)
            }
        }
    }

    fn hdel(&mut self, key: &str, field: &str) -> StorageResult<u64> {
        let mut inner = self.inner.write();
        inner.check()?;
        let db = inner.db_mut();
        let Some(hash) = db.get_mut(key) else {
            return Ok(0);
        };
        let Some(index) = hash.position(field) else {
            return Ok(0);
        };
        hash.entries.remove(index);
        if hash.entries.is_empty() {
            db.remove(key);
        }
        Ok(1)
    }

    fn hgetall(&self, key: &str) -> StorageResult<Vec<(String, String)>> {
        let inner = self.inner.read();
        inner.check()?;
        Ok(inner
            .db()
            .get(key)
            .map(|hash| hash.entries.clone())
            .unwrap_or_default())
    }

    fn hlen(&self, key: &str) -> StorageResult<u64> {
        let inner = self.inner.read();
        inner.check()?;
        Ok(inner
            .db()
            .get(key)
            .map_or(0, |hash| hash.entries.len() as u64))
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let inner = self.inner.read();
        inner.check()?;
        Ok(inner.db().contains_key(key))
    }

    fn rename(&mut self, from: &str, to: &str) -> StorageResult<()> {
        let mut inner = self.inner.write();
        inner.check()?;
        let db = inner.db_mut();
        let hash = db
            .remove(from)
            .ok_or_else(|| StorageError::no_such_key(from))?;
        db.insert(to.to_string(), hash);
        Ok(())
    }

    fn keys(&self, pattern: &str) -> StorageResult<Vec<String>> {
        let inner = self.inner.read();
        inner.check()?;
        Ok(inner
            .db()
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect())
    }

    fn auth(&mut self, password: &str) -> StorageResult<()> {
        let mut inner = self.inner.write();
        if inner.closed {
            return Err(StorageError::Closed);
        }
        match inner.password.as_deref() {
            Some(expected) if expected == password => {
                inner.authenticated = true;
                Ok(())
            }
            Some(_) => {
                tracing::warn!("rejected authentication attempt");
                Err(StorageError::AuthFailed)
            }
            None => Err(StorageError::command_failed(
                "AUTH",
                "no password is configured",
            )),
        }
    }

    fn select(&mut self, database: u32) -> StorageResult<()> {
        let mut inner = self.inner.write();
        inner.check()?;
        let count = inner.databases.len() as u32;
        if database >= count {
            return Err(StorageError::InvalidDatabase {
                index: database,
                count,
            });
        }
        inner.selected = database as usize;
        Ok(())
    }

    fn ping(&self) -> StorageResult<()> {
        self.inner.read().check()
    }
}
