//! Error types for fuzzdex.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`FuzzdexError`] enum. A key that is absent from a store is not an error:
//! lookups report it through `Option` instead.
//!
//! # Examples
//!
//! ```
//! use fuzzdex::error::{FuzzdexError, Result};
//!
//! fn check_len(len: usize) -> Result<()> {
//!     if len % 4 != 0 {
//!         return Err(FuzzdexError::format(format!("{len} bytes is not a multiple of 4")));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_len(7).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for fuzzdex operations.
#[derive(Error, Debug)]
pub enum FuzzdexError {
    /// I/O errors (missing file, permissions, short reads)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed on-disk data or mismatched paired columns
    #[error("Format error: {0}")]
    Format(String),

    /// Input violates a documented precondition (e.g. unsorted keys)
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Working buffer could not be allocated
    #[error("Capacity error: {0}")]
    Capacity(String),

    /// A named entry does not exist in a catalog
    #[error("Not found: {0}")]
    NotFound(String),

    /// Manifest (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with FuzzdexError.
pub type Result<T> = std::result::Result<T, FuzzdexError>;

impl FuzzdexError {
    /// Create a new format error.
    pub fn format<S: Into<String>>(msg: S) -> Self {
        FuzzdexError::Format(msg.into())
    }

    /// Create a new precondition error.
    pub fn precondition<S: Into<String>>(msg: S) -> Self {
        FuzzdexError::Precondition(msg.into())
    }

    /// Create a new capacity error.
    pub fn capacity<S: Into<String>>(msg: S) -> Self {
        FuzzdexError::Capacity(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        FuzzdexError::NotFound(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = FuzzdexError::format("odd length");
        assert_eq!(error.to_string(), "Format error: odd length");

        let error = FuzzdexError::precondition("keys not sorted");
        assert_eq!(error.to_string(), "Precondition failed: keys not sorted");

        let error = FuzzdexError::capacity("too large");
        assert_eq!(error.to_string(), "Capacity error: too large");

        let error = FuzzdexError::not_found("words");
        assert_eq!(error.to_string(), "Not found: words");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = FuzzdexError::from(io_error);

        match error {
            FuzzdexError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
