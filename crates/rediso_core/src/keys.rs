//! Storage key layout.
//!
//! | purpose | key |
//! |---|---|
//! | list table | `<ns>:<collection>:list` |
//! | index table | `<ns>:<collection>:primary:<field>:<value>` |
//! | counters | `<ns><suffix>:increment`, hash field `<collection>` |

use crate::config::Config;
use rediso_storage::escape_pattern;

const LIST_KEY: &str = "list";
const PRIMARY_KEY: &str = "primary";
const INCREMENT_KEY: &str = "increment";

/// Separates the segments of a key. Collection and field names cannot contain it.
pub(crate) const KEY_SEPARATOR: char = ':';

/// Builds storage keys for collections, index tables and counters.
///
/// Pure: never touches the store. Unusual names simply produce keys that do
/// not exist yet, which reads treat as empty.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    namespace: String,
    system_table: String,
}

impl KeyBuilder {
    /// Creates a key builder for `namespace`, with the system table at
    /// `<namespace><system_suffix>`.
    pub fn new(namespace: impl Into<String>, system_suffix: &str) -> Self {
        let namespace = namespace.into();
        let system_table = format!("{namespace}{system_suffix}");
        Self {
            namespace,
            system_table,
        }
    }

    /// Creates a key builder from a [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.namespace.clone(), &config.system_suffix)
    }

    /// Returns the namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the list table when `index` is `None`, otherwise the index
    /// table for the `(field, value)` pair.
    pub fn path(&self, collection: &str, index: Option<(&str, &str)>) -> String {
        match index {
            Some((field, value)) => self.index_path(collection, field, value),
            None => self.list_path(collection),
        }
    }

    /// Returns the list table of a collection.
    pub fn list_path(&self, collection: &str) -> String {
        format!("{}:{collection}:{LIST_KEY}", self.namespace)
    }

    /// Returns the index table for one value of an indexed field.
    pub fn index_path(&self, collection: &str, field: &str, value: &str) -> String {
        format!("{}{field}:{value}", self.index_prefix(collection))
    }

    /// Returns the glob pattern matching every index table of a collection.
    pub fn index_pattern(&self, collection: &str) -> String {
        format!("{}*", escape_pattern(&self.index_prefix(collection)))
    }

    /// Returns the hash holding every collection's last assigned id.
    pub fn counter_key(&self) -> String {
        format!("{}:{INCREMENT_KEY}", self.system_table)
    }

    /// Splits an index table key of `collection` into `(field, value)`.
    ///
    /// The field ends at the first `:` after the prefix; the value may itself
    /// contain `:`. Returns `None` for keys of other collections.
    pub fn parse_index_path<'k>(&self, collection: &str, key: &'k str) -> Option<(&'k str, &'k str)> {
        key.strip_prefix(&self.index_prefix(collection))?
            .split_once(KEY_SEPARATOR)
    }

    fn index_prefix(&self, collection: &str) -> String {
        format!("{}:{collection}:{PRIMARY_KEY}:", self.namespace)
    }
}

impl Default for KeyBuilder {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
