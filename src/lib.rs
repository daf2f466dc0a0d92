//! # fuzzdex
//!
//! Fuzzy dictionary lookup building blocks.
//!
//! ## Features
//!
//! - Sorted integer indexes loaded straight from little-endian files
//! - Key-value lookups by binary search, with duplicate keys
//! - Optional memory-mapped loading
//! - Levenshtein distance with two interchangeable table layouts
//! - Bounded distance and parallel candidate ranking

pub mod error;
pub mod spelling;
pub mod storage;

pub mod prelude {
    pub use crate::error::{FuzzdexError, Result};
    pub use crate::spelling::{FuzzyMatch, FuzzyMatcher, MatcherConfig, Strategy};
    pub use crate::storage::{Catalog, IndexColumn, LoadOptions, SortedKeyValueStore};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
