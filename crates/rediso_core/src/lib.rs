//! # rediso Core
//!
//! Document collections on a Redis-style hash store.
//!
//! This crate provides:
//! - Key layout for list tables, index tables and counters
//! - Per-collection id allocation
//! - Record insert, update and delete with secondary index fan-out
//! - `search_all`: predicates, free-text search, sorting, pagination and a
//!   per-engine result cache
//! - Session setup (auth, database selection, ping) and operation counters
//!
//! ## Storage layout
//!
//! ```text
//! rediso:<collection>:list                       id -> record JSON
//! rediso:<collection>:primary:<field>:<value>    id -> record JSON
//! rediso_sys:increment                           collection -> last id
//! ```
//!
//! Writes span several keys and are not transactional. A failure part way
//! through an insert, update or delete leaves the steps already taken in
//! place and is reported as [`CoreError::BackingStore`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod database;
mod error;
mod increment;
mod index;
mod keys;
pub mod query;
mod session;
mod stats;
mod store;
mod types;

pub use config::{Config, ConnectionConfig};
pub use database::Rediso;
pub use error::{ConnectionStage, CoreError, CoreResult, ErrorKind};
pub use increment::IdAllocator;
pub use index::{IndexChange, IndexMaintainer, IndexTable};
pub use keys::KeyBuilder;
pub use query::{Limit, Operator, Predicate, QueryEngine, SearchOptions, SearchResult, SearchSpec, SortOrder};
pub use session::Session;
pub use stats::{StatsSnapshot, StoreStats};
pub use store::RecordStore;
pub use types::RecordId;

pub use rediso_codec::{Record, Value, ID_FIELD};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
