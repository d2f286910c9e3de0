//! # rediso Storage
//!
//! Backing-store trait and implementations for rediso.
//!
//! This crate provides the lowest-level abstraction rediso builds on: a
//! key-value server that holds **hashes** (key → field → string). The store
//! does not interpret the strings it holds; record encoding and key layout
//! belong to `rediso_core`.
//!
//! ## Design Principles
//!
//! - Backends expose Redis-style hash primitives only (get, set, delete,
//!   full fetch, rename, key scan, auth/select/ping)
//! - Failure of a primitive is a [`StorageError`], never a panic
//! - Must be `Send + Sync` so a handle can move between threads
//!
//! ## Available Backends
//!
//! - [`InMemoryStore`] - For tests, demos and ephemeral use
//!
//! ## Example
//!
//! ```rust
//! use rediso_storage::{HashStore, InMemoryStore};
//!
//! let mut store = InMemoryStore::new();
//! store.hset("rediso:users:list", "1", "{\"id\":1}").unwrap();
//! let value = store.hget("rediso:users:list", "1").unwrap();
//! assert_eq!(value.as_deref(), Some("{\"id\":1}"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod memory;
mod pattern;

pub use backend::HashStore;
pub use error::{StorageError, StorageResult};
pub use memory::{InMemoryStore, DEFAULT_DATABASES};
pub use pattern::{escape_pattern, glob_match};
