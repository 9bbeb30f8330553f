// Copyright (c) 2025 LshDB Contributors
// Licensed under the LshDB License. See LICENSE file for details.

//! # LshDB
//!
//! An embedded approximate nearest-neighbor index for fixed-dimension vectors,
//! built on random hyperplane locality-sensitive hashing.
//!
//! Vectors are inserted with caller-chosen identifiers and retrieved as
//! candidate sets: the indices of stored vectors that share a hash bucket with
//! the query in at least one table of at least one layer. Nothing is ranked
//! by distance.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`lsh::HyperplaneHasher`] | One random direction, one bucket bit |
//! | [`lsh::HashTable`] | Bucket code to inserted indices |
//! | [`lsh::LshIndex`] | One layer: union over `num_tables` tables |
//! | [`lsh::MultiLayerLshIndex`] | Union over `num_layers` independently seeded layers |
//! | [`lsh::SharedIndex`] | Read/write-locked handle for multi-threaded use |
//! | [`VectorStore`] | Vectors, identifiers and index, with save/load |
//! | [`MetadataFilter`] | Lookup by identifier, description and time range |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lshdb::{LshConfig, VectorStore};
//!
//! fn main() -> lshdb::Result<()> {
//!     let config = LshConfig::new(2, 3, 4).with_seed(42);
//!     let mut store = VectorStore::new(config)?;
//!
//!     store.insert("doc1", &[0.1, 0.2, 0.3, 0.4])?;
//!     store.insert("doc2", &[-0.4, 0.1, 0.0, 0.2])?;
//!
//!     for hit in store.search(&[0.1, 0.2, 0.3, 0.5], 5)? {
//!         println!("{} -> {}", hit.index, hit.id);
//!     }
//!
//!     store.save("vectors.lshs")?;
//!     let restored = VectorStore::load("vectors.lshs")?;
//!     assert_eq!(restored.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Index operations fail only when a vector's length differs from the
//! configured dimensions ([`LshError::DimensionMismatch`]). A failed insert
//! leaves every bucket untouched.

pub mod error;
pub mod lsh;
pub mod metadata;
pub mod store;

pub use error::{LshError, Result};
pub use lsh::{CandidateIndex, LshConfig, LshIndex, MultiLayerLshIndex, SharedIndex};
pub use metadata::{MetadataFilter, VectorMetadata};
pub use store::{QueryHit, VectorStore};
