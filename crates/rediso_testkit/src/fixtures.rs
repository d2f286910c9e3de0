//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up stores and common test
//! scenarios.

use rediso_codec::{Record, Value};
use rediso_core::{Config, Rediso, RecordId};
use rediso_storage::{HashStore, InMemoryStore};

use crate::faulty::FaultyStore;

/// A `Rediso` over a fresh in-memory store.
pub struct TestStore {
    /// The store facade.
    pub db: Rediso<InMemoryStore>,
}

impl TestStore {
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty store with `config`.
    pub fn with_config(config: Config) -> Self {
        Self {
            db: Rediso::open(InMemoryStore::new(), config).expect("Failed to open in-memory store"),
        }
    }

    /// Returns the raw JSON stored in `key` under `id`.
    pub fn raw(&self, key: &str, id: RecordId) -> Option<String> {
        self.db
            .store()
            .hget(key, &id.to_string())
            .expect("in-memory hget")
    }

    /// Returns the keys matching `pattern`, sorted.
    pub fn keys_matching(&self, pattern: &str) -> Vec<String> {
        let mut keys = self.db.store().keys(pattern).expect("in-memory keys");
        keys.sort();
        keys
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestStore {
    type Target = Rediso<InMemoryStore>;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

impl std::ops::DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.db
    }
}

/// Runs a test with a temporary in-memory store.
///
/// # Example
///
/// ```rust,ignore
/// use rediso_testkit::with_temp_db;
///
/// #[test]
/// fn my_test() {
///     with_temp_db(|db| {
///         db.insert("test", sample_record(), &[]).unwrap();
///     });
/// }
/// ```
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&mut Rediso<InMemoryStore>) -> R,
{
    let mut test_store = TestStore::new();
    f(&mut test_store.db)
}

/// Opens a `Rediso` over a [`FaultyStore`] with no faults armed.
pub fn faulty_db() -> Rediso<FaultyStore<InMemoryStore>> {
    Rediso::open(FaultyStore::new(InMemoryStore::new()), Config::default())
        .expect("Failed to open faulty store")
}

/// The three-field record used throughout the examples:
/// `{key1: "value1", key2: "value2", key3: "value3"}`.
pub fn sample_record() -> Record {
    [("key1", "value1"), ("key2", "value2"), ("key3", "value3")]
        .into_iter()
        .collect()
}

/// Builds a record from `(field, value)` pairs.
pub fn record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fields.into_iter().collect()
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Names of the people in [`people`], in insertion order.
    pub const PEOPLE: [&str; 10] = [
        "alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi", "ivan", "judy",
    ];

    /// A `people` collection of ten records with ids 1..=10.
    ///
    /// Record `i` (1-based) is `{name, age: 20 + i, team: i % 3}`, indexed by
    /// `team`.
    pub fn people() -> TestStore {
        let mut store = TestStore::new();
        for (i, name) in PEOPLE.iter().enumerate() {
            let n = i as i64 + 1;
            let person = record([
                ("name", Value::from(*name)),
                ("age", Value::from(20 + n)),
                ("team", Value::from(n % 3)),
            ]);
            store
                .db
                .insert("people", person, &["team"])
                .expect("Failed to insert person");
        }
        store
    }

    /// A collection with `count` copies of [`sample_record`], indexed by
    /// `key2` and `key3`.
    pub fn populated(collection: &str, count: usize) -> TestStore {
        let mut store = TestStore::new();
        for _ in 0..count {
            store
                .db
                .insert(collection, sample_record(), &["key2", "key3"])
                .expect("Failed to insert record");
        }
        store
    }
}
