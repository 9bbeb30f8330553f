// Copyright (c) 2025 LshDB Contributors
// Licensed under the LshDB License. See LICENSE file for details.

//! Configuration for the multi-layer LSH index

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{LshError, Result};

/// Configuration for a [`MultiLayerLshIndex`](super::MultiLayerLshIndex)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LshConfig {
    /// Number of independently seeded layers (unioned at query time)
    pub num_layers: usize,

    /// Number of hash tables per layer (unioned at query time)
    pub num_tables: usize,

    /// Vector dimensions
    pub dimensions: usize,

    /// Seed for hyperplane generation. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for LshConfig {
    fn default() -> Self {
        Self {
            num_layers: 2,
            num_tables: 3,
            dimensions: 2,
            seed: None,
        }
    }
}

impl LshConfig {
    /// Create an unseeded config with the given shape
    pub fn new(num_layers: usize, num_tables: usize, dimensions: usize) -> Self {
        Self {
            num_layers,
            num_tables,
            dimensions,
            seed: None,
        }
    }

    /// Fix the hyperplane seed for reproducible indexes
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Many layers and tables: large candidate sets, few misses
    pub fn high_recall(dimensions: usize) -> Self {
        Self {
            num_layers: 4,
            num_tables: 8,
            dimensions,
            ..Default::default()
        }
    }

    /// Single layer with few tables: small candidate sets, low memory
    pub fn compact(dimensions: usize) -> Self {
        Self {
            num_layers: 1,
            num_tables: 2,
            dimensions,
            ..Default::default()
        }
    }

    /// Reject zero-sized shapes
    pub fn validate(&self) -> Result<()> {
        if self.num_layers == 0 {
            return Err(LshError::InvalidConfig(
                "num_layers must be at least 1".to_string(),
            ));
        }
        if self.num_tables == 0 {
            return Err(LshError::InvalidConfig(
                "num_tables must be at least 1".to_string(),
            ));
        }
        if self.dimensions == 0 {
            return Err(LshError::InvalidConfig(
                "dimensions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Master generator for hyperplane draws
    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
