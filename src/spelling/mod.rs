//! Edit distance scoring and fuzzy candidate matching.
//!
//! This module computes Levenshtein distances between words and ranks
//! dictionary candidates by closeness to a query.

pub mod levenshtein;
pub mod matcher;
pub mod scratch;

// Re-export commonly used types
pub use levenshtein::*;
pub use matcher::*;
