//! On-disk integer indexes.
//!
//! Columns of fixed-width integers are loaded as raw bytes and queried by
//! binary search. Pairs of columns form sorted key-value stores, and a
//! catalog groups named stores behind a JSON manifest.

pub mod catalog;
pub mod column;
pub mod kv;

// Re-export commonly used types
pub use catalog::*;
pub use column::*;
pub use kv::*;
