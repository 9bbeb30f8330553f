// Copyright (c) 2025 LshDB Contributors
// Licensed under the LshDB License. See LICENSE file for details.

//! Random hyperplane hashing.
//!
//! A hyperplane through the origin splits the space in two. A vector hashes to
//! `true` when it lies strictly on the positive side (positive dot product
//! with the plane's normal) and to `false` otherwise, including when it lies
//! exactly on the plane.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::error::{LshError, Result};

/// One random projection direction producing a 1-bit bucket code
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HyperplaneHasher {
    coefficients: Vec<f32>,
}

impl HyperplaneHasher {
    /// Draw every coefficient independently from the standard normal distribution
    pub fn random<R: Rng + ?Sized>(dimensions: usize, rng: &mut R) -> Self {
        let coefficients = (0..dimensions).map(|_| rng.sample(StandardNormal)).collect();
        Self { coefficients }
    }

    /// Use fixed coefficients instead of a random draw
    pub fn from_coefficients(coefficients: Vec<f32>) -> Self {
        Self { coefficients }
    }

    /// Fails with [`LshError::DimensionMismatch`] unless `vector` has exactly
    /// [`dimensions`](Self::dimensions) components.
    #[inline]
    pub fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.coefficients.len() {
            return Err(LshError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: vector.len(),
            });
        }
        Ok(())
    }

    /// Bucket code of `vector`: `true` iff its dot product with the plane is positive
    #[inline]
    pub fn hash(&self, vector: &[f32]) -> Result<bool> {
        self.check_dimensions(vector)?;
        let dot: f32 = vector
            .iter()
            .zip(self.coefficients.iter())
            .map(|(v, p)| v * p)
            .sum();
        Ok(dot > 0.0)
    }

    pub fn coefficients(&self) -> &[f32] {
        &self.coefficients
    }

    pub fn dimensions(&self) -> usize {
        self.coefficients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sign_of_dot_product() {
        let hasher = HyperplaneHasher::from_coefficients(vec![1.0, 0.0]);
        assert!(hasher.hash(&[5.0, 0.0]).unwrap());
        assert!(!hasher.hash(&[-3.0, 1.0]).unwrap());
        assert!(hasher.hash(&[2.0, 9.0]).unwrap());
        assert!(!hasher.hash(&[-1.0, -1.0]).unwrap());
    }

    #[test]
    fn test_zero_dot_product_is_false() {
        let hasher = HyperplaneHasher::from_coefficients(vec![1.0, -1.0]);
        assert!(!hasher.hash(&[2.0, 2.0]).unwrap());
        assert!(!hasher.hash(&[0.0, 0.0]).unwrap());
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let hasher = HyperplaneHasher::from_coefficients(vec![1.0, 0.0]);
        match hasher.hash(&[1.0, 0.0, 0.0]) {
            Err(LshError::DimensionMismatch { expected, got }) => {
                assert_eq!(expected, 2);
                assert_eq!(got, 3);
            }
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
        assert!(hasher.hash(&[1.0]).is_err());
    }

    #[test]
    fn test_deterministic_with_seed() {
        let a = HyperplaneHasher::random(64, &mut StdRng::seed_from_u64(42));
        let b = HyperplaneHasher::random(64, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(a.dimensions(), 64);

        let vector: Vec<f32> = (0..64).map(|i| (i as f32 * 0.37).sin()).collect();
        assert_eq!(a.hash(&vector).unwrap(), a.hash(&vector).unwrap());
        assert_eq!(a.hash(&vector).unwrap(), b.hash(&vector).unwrap());
    }

    #[test]
    fn test_opposite_vectors_split() {
        let hasher = HyperplaneHasher::random(16, &mut StdRng::seed_from_u64(3));
        let v: Vec<f32> = (0..16).map(|i| i as f32 - 7.5).collect();
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        // Only a plane containing `v` would send both to `false`.
        let dot: f32 = v.iter().zip(hasher.coefficients()).map(|(a, b)| a * b).sum();
        if dot != 0.0 {
            assert_ne!(hasher.hash(&v).unwrap(), hasher.hash(&neg).unwrap());
        }
    }
}
