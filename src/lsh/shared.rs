// Copyright (c) 2025 LshDB Contributors
// Licensed under the LshDB License. See LICENSE file for details.

//! Thread-safe handle around a [`MultiLayerLshIndex`].
//!
//! Queries take a shared read lock and run in parallel. Inserts take the
//! single write lock for the whole index, which serializes every bucket
//! append.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use super::index::{CandidateIndex, MultiLayerLshIndex};
use crate::error::Result;

/// Cloneable, lock-protected index handle
#[derive(Clone, Debug)]
pub struct SharedIndex {
    inner: Arc<RwLock<MultiLayerLshIndex>>,
}

impl SharedIndex {
    pub fn new(index: MultiLayerLshIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    pub fn insert(&self, vector: &[f32], index: usize) -> Result<()> {
        self.inner.write().insert(vector, index)
    }

    pub fn query(&self, vector: &[f32]) -> Result<HashSet<usize>> {
        self.inner.read().query(vector)
    }

    pub fn dimensions(&self) -> usize {
        self.inner.read().dimensions()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unwrap the index if this is the last handle; otherwise hand it back.
    pub fn into_inner(self) -> std::result::Result<MultiLayerLshIndex, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<MultiLayerLshIndex> for SharedIndex {
    fn from(index: MultiLayerLshIndex) -> Self {
        Self::new(index)
    }
}
