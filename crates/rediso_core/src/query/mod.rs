//! Filtering, search, sorting and pagination over a collection.
//!
//! Queries always run against the list table; index tables are not
//! consulted. See [`QueryEngine`] for the caching behavior.

mod cache;
mod engine;
mod options;
mod predicate;

pub use cache::{CacheEntry, QueryCache, Row};
pub use engine::QueryEngine;
pub use options::{Limit, SearchOptions, SearchResult, SearchSpec, SortOrder};
pub use predicate::{Operator, Predicate};
