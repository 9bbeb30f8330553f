// Copyright (c) 2025 LshDB Contributors
// Licensed under the LshDB License. See LICENSE file for details.

//! Single hash table: one hyperplane, two append-only buckets.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::hyperplane::HyperplaneHasher;
use super::index::CandidateIndex;
use crate::error::{LshError, Result};

/// Maps a hyperplane bucket code to the indices inserted under it
///
/// Buckets are append-only: insertion order is kept and inserting the same
/// index twice stores it twice.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "HashTableRepr")]
pub struct HashTable {
    hasher: HyperplaneHasher,
    buckets: HashMap<bool, Vec<usize>>,
    len: usize,
}

/// Wire shape of [`HashTable`], checked before it becomes one
#[derive(Deserialize)]
struct HashTableRepr {
    hasher: HyperplaneHasher,
    buckets: HashMap<bool, Vec<usize>>,
    len: usize,
}

impl TryFrom<HashTableRepr> for HashTable {
    type Error = LshError;

    fn try_from(repr: HashTableRepr) -> Result<Self> {
        let stored: usize = repr.buckets.values().map(Vec::len).sum();
        if stored != repr.len {
            return Err(LshError::CorruptedStore(format!(
                "hash table records {} inserts but its buckets hold {}",
                repr.len, stored
            )));
        }
        Ok(Self {
            hasher: repr.hasher,
            buckets: repr.buckets,
            len: repr.len,
        })
    }
}

impl HashTable {
    /// Table with a freshly drawn random hyperplane
    pub fn random<R: Rng + ?Sized>(dimensions: usize, rng: &mut R) -> Self {
        Self::with_hasher(HyperplaneHasher::random(dimensions, rng))
    }

    pub fn with_hasher(hasher: HyperplaneHasher) -> Self {
        Self {
            hasher,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    pub fn hasher(&self) -> &HyperplaneHasher {
        &self.hasher
    }

    /// Contents of one bucket in insertion order (empty if never populated)
    pub fn bucket(&self, code: bool) -> &[usize] {
        self.buckets
            .get(&code)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of populated buckets (0, 1 or 2)
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl CandidateIndex for HashTable {
    fn dimensions(&self) -> usize {
        self.hasher.dimensions()
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        self.hasher.check_dimensions(vector)
    }

    fn insert(&mut self, vector: &[f32], index: usize) -> Result<()> {
        let code = self.hasher.hash(vector)?;
        self.buckets.entry(code).or_default().push(index);
        self.len += 1;
        Ok(())
    }

    fn collect_candidates(&self, vector: &[f32], out: &mut HashSet<usize>) -> Result<()> {
        let code = self.hasher.hash(vector)?;
        out.extend(self.bucket(code).iter().copied());
        Ok(())
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LshError;

    fn first_axis_table() -> HashTable {
        HashTable::with_hasher(HyperplaneHasher::from_coefficients(vec![1.0, 0.0]))
    }

    #[test]
    fn test_insert_query_by_side() {
        let mut table = first_axis_table();
        table.insert(&[5.0, 0.0], 0).unwrap();
        table.insert(&[-3.0, 1.0], 1).unwrap();

        assert_eq!(table.query(&[2.0, 9.0]).unwrap(), HashSet::from([0]));
        assert_eq!(table.query(&[-1.0, -1.0]).unwrap(), HashSet::from([1]));
        assert_eq!(table.bucket_count(), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_bucket_returns_empty_set() {
        let mut table = first_axis_table();
        assert!(table.query(&[1.0, 1.0]).unwrap().is_empty());

        table.insert(&[1.0, 0.0], 0).unwrap();
        assert!(table.query(&[-1.0, 0.0]).unwrap().is_empty());
        assert!(table.bucket(false).is_empty());
    }

    #[test]
    fn test_bucket_keeps_order_and_duplicates() {
        let mut table = first_axis_table();
        table.insert(&[1.0, 0.0], 4).unwrap();
        table.insert(&[2.0, 0.0], 2).unwrap();
        table.insert(&[3.0, 0.0], 4).unwrap();

        assert_eq!(table.bucket(true), &[4, 2, 4]);
        assert_eq!(table.query(&[1.0, 1.0]).unwrap(), HashSet::from([2, 4]));
    }

    #[test]
    fn test_same_index_in_two_buckets() {
        let mut table = first_axis_table();
        table.insert(&[1.0, 0.0], 7).unwrap();
        table.insert(&[-1.0, 0.0], 7).unwrap();

        assert!(table.query(&[1.0, 0.0]).unwrap().contains(&7));
        assert!(table.query(&[-1.0, 0.0]).unwrap().contains(&7));
    }

    #[test]
    fn test_deserialize_rejects_miscounted_buckets() {
        let mut table = first_axis_table();
        table.insert(&[1.0, 0.0], 0).unwrap();
        table.insert(&[-1.0, 0.0], 1).unwrap();

        let restored: HashTable =
            bincode::deserialize(&bincode::serialize(&table).unwrap()).unwrap();
        assert_eq!(restored.bucket(true), &[0]);
        assert_eq!(restored.len(), 2);

        // Same wire layout as HashTable, with an inflated insert count.
        let forged = bincode::serialize(&(
            table.hasher(),
            HashMap::from([(true, vec![0usize])]),
            5usize,
        ))
        .unwrap();
        assert!(bincode::deserialize::<HashTable>(&forged).is_err());
    }

    #[test]
    fn test_mismatch_leaves_buckets_untouched() {
        let mut table = first_axis_table();
        table.insert(&[1.0, 0.0], 0).unwrap();

        let err = table.insert(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(
            err,
            LshError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        ));
        assert_eq!(table.bucket(true), &[0]);
        assert!(table.bucket(false).is_empty());
        assert_eq!(table.len(), 1);
        assert!(table.query(&[1.0]).is_err());
    }
}
