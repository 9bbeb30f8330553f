// Copyright (c) 2025 LshDB Contributors
// Licensed under the LshDB License. See LICENSE file for details.

//! Error types for lshdb operations.
//!
//! This module provides:
//! - [`LshError`] - The error enum shared by the index and the store
//! - [`Result<T>`] - A type alias for `std::result::Result<T, LshError>`
//!
//! The index itself only ever fails with [`LshError::DimensionMismatch`]. It is
//! raised by the hyperplane hasher and passed up through tables and layers
//! unchanged, so callers see exactly which length was expected.

/// Result type alias for lshdb operations.
pub type Result<T> = std::result::Result<T, LshError>;

/// Errors produced by the LSH index and the vector store around it.
///
/// # Examples
///
/// ```rust
/// use lshdb::{LshConfig, LshError, VectorStore};
///
/// let mut store = VectorStore::new(LshConfig::new(1, 2, 3)).unwrap();
/// match store.insert("too-short", &[1.0, 2.0]) {
///     Err(LshError::DimensionMismatch { expected, got }) => {
///         assert_eq!((expected, got), (3, 2));
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum LshError {
    /// Vector length differs from the configured dimensionality.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Configured number of dimensions
        expected: usize,
        /// Length of the vector that was provided
        got: usize,
    },

    /// Configuration rejected at construction time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Arguments rejected by a store operation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error while saving or loading a store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Persisted store has an unknown header or an inconsistent shape.
    #[error("Corrupted store: {0}")]
    CorruptedStore(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = LshError::DimensionMismatch {
            expected: 128,
            got: 64,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 128, got 64");
    }

    #[test]
    fn test_io_error_converts() {
        fn open_missing() -> Result<()> {
            std::fs::File::open("/definitely/not/here.lshs")?;
            Ok(())
        }

        assert!(matches!(open_missing(), Err(LshError::Io(_))));
    }
}
