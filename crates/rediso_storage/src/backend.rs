//! Backing-store trait definition.

use crate::error::StorageResult;

/// A key-value server holding hashes, as seen by rediso.
///
/// Every key maps to a hash of string fields to string values. rediso only
/// depends on these primitives and on their success/failure convention: a
/// failing primitive returns a [`crate::StorageError`].
///
/// # Invariants
///
/// - `hset` followed by `hget` on the same key/field returns the written value
/// - removing the last field of a hash removes the key itself
/// - `rename` of a missing key fails; an existing destination is overwritten
/// - `keys` matches Redis glob patterns (see [`crate::glob_match`])
///
/// # Implementors
///
/// - [`crate::InMemoryStore`] - For tests and demos
pub trait HashStore: Send + Sync {
    /// Reads one field of a hash.
    ///
    /// Returns `None` if the key or the field does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the command.
    fn hget(&self, key: &str, field: &str) -> StorageResult<Option<String>>;

    /// Writes one field of a hash, creating the key if needed.
    ///
    /// Returns `true` if the field was newly created, `false` if an existing
    /// value was replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the command.
    fn hset(&mut self, key: &str, field: &str, value: &str) -> StorageResult<bool>;

    /// Removes one field of a hash.
    ///
    /// Returns the number of fields removed (0 or 1). A missing key or field
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the command.
    fn hdel(&mut self, key: &str, field: &str) -> StorageResult<u64>;

    /// Fetches every field/value pair of a hash.
    ///
    /// A missing key yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the command.
    fn hgetall(&self, key: &str) -> StorageResult<Vec<(String, String)>>;

    /// Returns the number of fields in a hash (0 for a missing key).
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the command.
    fn hlen(&self, key: &str) -> StorageResult<u64>;

    /// Returns whether a key exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the command.
    fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Renames a key, overwriting `to` if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::NoSuchKey`] if `from` does not exist.
    fn rename(&mut self, from: &str, to: &str) -> StorageResult<()>;

    /// Lists all keys matching a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the command.
    fn keys(&self, pattern: &str) -> StorageResult<Vec<String>>;

    /// Authenticates the connection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::AuthFailed`] for a wrong password.
    fn auth(&mut self, password: &str) -> StorageResult<()>;

    /// Selects the logical database subsequent commands address.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::InvalidDatabase`] for an out-of-range index.
    fn select(&mut self, database: u32) -> StorageResult<()>;

    /// Checks that the store is reachable and usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    fn ping(&self) -> StorageResult<()>;
}

impl<S: HashStore + ?Sized> HashStore for Box<S> {
    fn hget(&self, key: &str, field: &str) -> StorageResult<Option<String>> {
        (**self).hget(key, field)
    }

    fn hset(&mut self, key: &str, field: &str, value: &str) -> StorageResult<bool> {
        (**self).hset(key, field, value)
    }

    fn hdel(&mut self, key: &str, field: &str) -> StorageResult<u64> {
        (**self).hdel(key, field)
    }

    fn hgetall(&self, key: &str) -> StorageResult<Vec<(String, String)>> {
        (**self).hgetall(key)
    }

    fn hlen(&self, key: &str) -> StorageResult<u64> {
        (**self).hlen(key)
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        (**self).exists(key)
    }

    fn rename(&mut self, from: &str, to: &str) -> StorageResult<()> {
        (**self).rename(from, to)
    }

    fn keys(&self, pattern: &str) -> StorageResult<Vec<String>> {
        (**self).keys(pattern)
    }

    fn auth(&mut self, password: &str) -> StorageResult<()> {
        (**self).auth(password)
    }

    fn select(&mut self, database: u32) -> StorageResult<()> {
        (**self).select(database)
    }

    fn ping(&self) -> StorageResult<()> {
        (**self).ping()
    }
}
