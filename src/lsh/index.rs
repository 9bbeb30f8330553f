// Copyright (c) 2025 LshDB Contributors
// Licensed under the LshDB License. See LICENSE file for details.

//! Union levels: tables within a layer, layers within a multi-layer index.
//!
//! Both levels behave the same way. An insert is validated once, then written
//! into every member. A query is the union (OR) of every member's candidates,
//! so adding members can only grow a result set. No votes are counted: a
//! candidate found by one member is indistinguishable from one found by all.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::config::LshConfig;
use super::table::HashTable;
use crate::error::{LshError, Result};

/// Anything that can index vectors by a dense integer and return candidates
pub trait CandidateIndex {
    /// Required vector length
    fn dimensions(&self) -> usize;

    /// Fails with [`LshError::DimensionMismatch`] without touching any state
    fn check_dimensions(&self, vector: &[f32]) -> Result<()>;

    /// Record `index` under the bucket(s) `vector` hashes to
    fn insert(&mut self, vector: &[f32], index: usize) -> Result<()>;

    /// Add every candidate for `vector` to `out`
    fn collect_candidates(&self, vector: &[f32], out: &mut HashSet<usize>) -> Result<()>;

    /// Number of insert calls that succeeded
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unordered candidate set for `vector`
    fn query(&self, vector: &[f32]) -> Result<HashSet<usize>> {
        let mut out = HashSet::new();
        self.collect_candidates(vector, &mut out)?;
        Ok(out)
    }
}

/// OR-combination of same-dimension sub-indexes
///
/// Deserialization goes through [`UnionIndex::from_members`], so a decoded
/// index is never empty and never mixes dimensions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    try_from = "UnionIndexRepr<T>",
    bound(deserialize = "T: CandidateIndex + Deserialize<'de>")
)]
pub struct UnionIndex<T> {
    members: Vec<T>,
}

/// Wire shape of [`UnionIndex`]
#[derive(Deserialize)]
struct UnionIndexRepr<T> {
    members: Vec<T>,
}

impl<T: CandidateIndex> TryFrom<UnionIndexRepr<T>> for UnionIndex<T> {
    type Error = LshError;

    fn try_from(repr: UnionIndexRepr<T>) -> Result<Self> {
        Self::from_members(repr.members)
    }
}

/// One layer: `num_tables` independent hash tables
pub type LshIndex = UnionIndex<HashTable>;

/// `num_layers` independently seeded layers
pub type MultiLayerLshIndex = UnionIndex<LshIndex>;

impl<T: CandidateIndex> UnionIndex<T> {
    /// Combine existing sub-indexes. They must agree on dimensionality.
    pub fn from_members(members: Vec<T>) -> Result<Self> {
        let Some(first) = members.first() else {
            return Err(LshError::InvalidConfig(
                "a union index needs at least one member".to_string(),
            ));
        };
        let expected = first.dimensions();
        if let Some(other) = members.iter().find(|m| m.dimensions() != expected) {
            return Err(LshError::DimensionMismatch {
                expected,
                got: other.dimensions(),
            });
        }
        Ok(Self { members })
    }

    pub fn members(&self) -> &[T] {
        &self.members
    }
}

impl<T: CandidateIndex> CandidateIndex for UnionIndex<T> {
    fn dimensions(&self) -> usize {
        self.members.first().map_or(0, |m| m.dimensions())
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        match self.members.first() {
            Some(member) => member.check_dimensions(vector),
            None => Ok(()),
        }
    }

    fn insert(&mut self, vector: &[f32], index: usize) -> Result<()> {
        // Every member shares one dimensionality, so once this passes no
        // member insert can fail halfway through.
        self.check_dimensions(vector)?;
        for member in &mut self.members {
            member.insert(vector, index)?;
        }
        Ok(())
    }

    fn collect_candidates(&self, vector: &[f32], out: &mut HashSet<usize>) -> Result<()> {
        self.check_dimensions(vector)?;
        for member in &self.members {
            member.collect_candidates(vector, out)?;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.members.first().map_or(0, |m| m.len())
    }
}

impl LshIndex {
    /// Draw `num_tables` hyperplanes in sequence from `rng`
    ///
    /// Table `i` depends only on the first `i + 1` draws, so the same
    /// generator state with more tables keeps the existing ones.
    pub fn new<R: Rng + ?Sized>(num_tables: usize, dimensions: usize, rng: &mut R) -> Self {
        let members = (0..num_tables)
            .map(|_| HashTable::random(dimensions, rng))
            .collect();
        Self { members }
    }

    pub fn from_tables(tables: Vec<HashTable>) -> Result<Self> {
        Self::from_members(tables)
    }

    pub fn tables(&self) -> &[HashTable] {
        &self.members
    }
}

impl MultiLayerLshIndex {
    /// Build `num_layers` layers of `num_tables` tables each
    ///
    /// Every layer gets its own generator seeded from the config's master
    /// generator, so layers are statistically independent.
    pub fn new(config: &LshConfig) -> Result<Self> {
        config.validate()?;
        let mut master = config.rng();
        let members = (0..config.num_layers)
            .map(|_| {
                let mut layer_rng = StdRng::seed_from_u64(master.gen());
                LshIndex::new(config.num_tables, config.dimensions, &mut layer_rng)
            })
            .collect();

        tracing::debug!(
            num_layers = config.num_layers,
            num_tables = config.num_tables,
            dimensions = config.dimensions,
            seeded = config.seed.is_some(),
            "built multi-layer LSH index"
        );

        Ok(Self { members })
    }

    pub fn from_layers(layers: Vec<LshIndex>) -> Result<Self> {
        Self::from_members(layers)
    }

    pub fn layers(&self) -> &[LshIndex] {
        &self.members
    }

    pub fn num_layers(&self) -> usize {
        self.members.len()
    }

    /// Tables per layer
    pub fn num_tables(&self) -> usize {
        self.members.first().map_or(0, |layer| layer.tables().len())
    }
}
