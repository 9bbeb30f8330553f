// Copyright (c) 2025 LshDB Contributors
// Licensed under the LshDB License. See LICENSE file for details.

//! Multi-layer random hyperplane LSH index
//!
//! The index is a two-level tree of unions:
//!
//! - A [`HashTable`] owns one random hyperplane and two buckets (the positive
//!   and non-positive side).
//! - An [`LshIndex`] (one layer) owns `num_tables` tables.
//! - A [`MultiLayerLshIndex`] owns `num_layers` independently seeded layers.
//!
//! Inserting writes the index into one bucket of every table of every layer.
//! Querying returns the union of the matching buckets: more tables or layers
//! means higher recall and larger candidate sets. Candidates are unordered
//! and never ranked by distance.
//!
//! ```rust
//! use lshdb::lsh::{CandidateIndex, LshConfig, MultiLayerLshIndex};
//!
//! let config = LshConfig::new(2, 3, 4).with_seed(42);
//! let mut index = MultiLayerLshIndex::new(&config)?;
//!
//! index.insert(&[0.1, 0.2, 0.3, 0.4], 0)?;
//! let candidates = index.query(&[0.1, 0.2, 0.3, 0.4])?;
//! assert!(candidates.contains(&0));
//! # Ok::<(), lshdb::LshError>(())
//! ```

mod config;
mod hyperplane;
mod index;
mod shared;
mod table;

pub use config::LshConfig;
pub use hyperplane::HyperplaneHasher;
pub use index::{CandidateIndex, LshIndex, MultiLayerLshIndex, UnionIndex};
pub use shared::SharedIndex;
pub use table::HashTable;
