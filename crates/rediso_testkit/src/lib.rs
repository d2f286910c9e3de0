//! # rediso Testkit
//!
//! Test utilities for rediso.
//!
//! This crate provides:
//! - Test fixtures and pre-populated stores
//! - A fault-injecting store wrapper for partial-failure tests
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rediso_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_temp_db(|db| {
//!         let id = db.insert("test", sample_record(), &["key2"]).unwrap();
//!         assert_eq!(id.as_u64(), 1);
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faulty;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faulty::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use faulty::*;
pub use fixtures::*;
pub use generators::*;
