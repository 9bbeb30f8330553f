// Copyright (c) 2025 LshDB Contributors
// Licensed under the LshDB License. See LICENSE file for details.

//! Vector store: raw vectors, caller identifiers, and the LSH index over them.
//!
//! The store assigns every inserted vector a dense zero-based index (the
//! number of vectors inserted before it), keeps the vector, its caller
//! identifier and its [`VectorMetadata`] at that position, and hands the index
//! to a [`MultiLayerLshIndex`]. Queries return LSH candidates as-is: there is
//! no distance computation and no ranking, so asking for `k` results returns
//! an arbitrary subset of at most `k` candidates.
//!
//! Identifiers need not be unique. Lookup by identifier resolves to the most
//! recent vector inserted under it; [`VectorStore::filter`] finds all of them.
//!
//! # Example
//!
//! ```rust
//! use lshdb::{LshConfig, VectorStore};
//!
//! let mut store = VectorStore::new(LshConfig::new(2, 3, 3).with_seed(7))?;
//!
//! let idx = store.insert("doc1", &[0.3, -0.2, 0.9])?;
//! store.insert("doc2", &[-0.5, 0.1, 0.4])?;
//!
//! let hits = store.search(&[0.3, -0.2, 0.9], 10)?;
//! assert!(hits.iter().any(|hit| hit.index == idx && hit.id == "doc1"));
//! assert_eq!(store.index_of("doc2"), Some(1));
//! # Ok::<(), lshdb::LshError>(())
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LshError, Result};
use crate::lsh::{CandidateIndex, LshConfig, MultiLayerLshIndex};
use crate::metadata::{MetadataFilter, VectorMetadata};

/// Magic bytes for persisted store files
const STORE_MAGIC: &[u8; 4] = b"LSHS";

/// Persisted store format version
const STORE_VERSION: u16 = 2;

/// A candidate returned by [`VectorStore::search`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHit {
    /// Position of the vector in the store
    pub index: usize,
    /// Identifier supplied at insert time
    pub id: String,
}

/// Vectors, their identifiers and metadata, and the LSH index that covers them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStore {
    config: LshConfig,
    vectors: Vec<Vec<f32>>,
    ids: Vec<String>,
    metadata: Vec<VectorMetadata>,
    index: MultiLayerLshIndex,
    /// Latest index per identifier; rebuilt from `ids` on load
    #[serde(skip)]
    by_id: HashMap<String, usize>,
}

impl VectorStore {
    /// Create an empty store and build its index from `config`.
    pub fn new(config: LshConfig) -> Result<Self> {
        let index = MultiLayerLshIndex::new(&config)?;
        Ok(Self {
            config,
            vectors: Vec::new(),
            ids: Vec::new(),
            metadata: Vec::new(),
            index,
            by_id: HashMap::new(),
        })
    }

    /// Insert a vector under `id`, stamped with the current time, and return
    /// its assigned index.
    pub fn insert(&mut self, id: &str, vector: &[f32]) -> Result<usize> {
        self.insert_with_metadata(id, vector, VectorMetadata::default())
    }

    /// Insert a vector with explicit metadata and return its assigned index.
    ///
    /// The vector is indexed before anything is stored, so a dimension
    /// mismatch leaves the store exactly as it was.
    pub fn insert_with_metadata(
        &mut self,
        id: &str,
        vector: &[f32],
        metadata: VectorMetadata,
    ) -> Result<usize> {
        let index = self.vectors.len();
        self.index.insert(vector, index)?;
        self.vectors.push(vector.to_vec());
        self.ids.push(id.to_string());
        self.metadata.push(metadata);
        self.by_id.insert(id.to_string(), index);

        tracing::debug!(index, id, "inserted vector");
        Ok(index)
    }

    /// Insert many vectors; stops at the first failure.
    ///
    /// Returns the number of vectors inserted. On error, the vectors before
    /// the failing one stay inserted.
    pub fn insert_batch(&mut self, ids: &[&str], vectors: &[&[f32]]) -> Result<usize> {
        if ids.len() != vectors.len() {
            return Err(LshError::InvalidInput(format!(
                "ids and vectors must have the same length ({} vs {})",
                ids.len(),
                vectors.len()
            )));
        }
        for (id, vector) in ids.iter().zip(vectors) {
            self.insert(id, vector)?;
        }
        Ok(ids.len())
    }

    /// Up to `num_results` candidate indices, in no particular order.
    pub fn query(&self, vector: &[f32], num_results: usize) -> Result<Vec<usize>> {
        let candidates = self.index.query(vector)?;
        Ok(candidates.into_iter().take(num_results).collect())
    }

    /// Like [`query`](Self::query), with each index paired with its identifier.
    pub fn search(&self, vector: &[f32], num_results: usize) -> Result<Vec<QueryHit>> {
        let hits = self
            .query(vector, num_results)?
            .into_iter()
            .filter_map(|index| {
                self.ids.get(index).map(|id| QueryHit {
                    index,
                    id: id.clone(),
                })
            })
            .collect();
        Ok(hits)
    }

    /// Stored vector at `index`
    pub fn get(&self, index: usize) -> Option<&[f32]> {
        self.vectors.get(index).map(|v| v.as_slice())
    }

    /// Identifier of the vector at `index`
    pub fn id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(|s| s.as_str())
    }

    pub fn metadata(&self, index: usize) -> Option<&VectorMetadata> {
        self.metadata.get(index)
    }

    /// Index of the most recent vector inserted under `id`
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Most recent vector inserted under `id`
    pub fn get_by_id(&self, id: &str) -> Option<&[f32]> {
        self.index_of(id).and_then(|index| self.get(index))
    }

    /// Indices whose id, description and timestamp all match, in insertion order
    pub fn filter(&self, filter: &MetadataFilter) -> Vec<usize> {
        self.ids
            .iter()
            .zip(&self.metadata)
            .enumerate()
            .filter(|(_, (id, meta))| filter.matches(id, meta))
            .map(|(index, _)| index)
            .collect()
    }

    /// Indices with a timestamp in `start..=end`, in insertion order
    pub fn in_time_range(&self, start: u64, end: u64) -> Vec<usize> {
        self.filter(&MetadataFilter::default().between(start, end))
    }

    /// Drop every vector and start over with a fresh index.
    ///
    /// A seeded config reproduces the same hyperplanes; an unseeded one
    /// draws new ones.
    pub fn clear(&mut self) -> Result<()> {
        self.index = MultiLayerLshIndex::new(&self.config)?;
        self.vectors.clear();
        self.ids.clear();
        self.metadata.clear();
        self.by_id.clear();

        tracing::debug!("cleared vector store");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    pub fn config(&self) -> &LshConfig {
        &self.config
    }

    pub fn index(&self) -> &MultiLayerLshIndex {
        &self.index
    }

    /// Save the whole store, index included, to `path`.
    ///
    /// The store is written to a sibling `.tmp` file, synced, then renamed
    /// over `path`, so an interrupted save leaves the previous file intact.
    ///
    /// # File Format
    ///
    /// - Magic bytes `LSHS`
    /// - Format version (`u16`, little-endian)
    /// - bincode-encoded store
    ///
    /// The encoding of the index inside the file is not a stable format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let temp_path = temp_path_for(path);

        if let Err(e) = self.write_file(&temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(LshError::Io(e));
        }

        tracing::debug!(path = %path.display(), vectors = self.len(), "saved vector store");
        Ok(())
    }

    /// Load a store previously written by [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let store = Self::read_from(&mut reader)?;

        tracing::debug!(path = %path.display(), vectors = store.len(), "loaded vector store");
        Ok(store)
    }

    /// Serialize into an in-memory blob with the same layout as [`save`](Self::save).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Restore a store from [`to_bytes`](Self::to_bytes) output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        Self::read_from(&mut reader)
    }

    fn write_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(STORE_MAGIC)?;
        writer.write_all(&STORE_VERSION.to_le_bytes())?;
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != STORE_MAGIC {
            return Err(LshError::CorruptedStore(
                "Invalid magic bytes - not a vector store file".to_string(),
            ));
        }

        let mut version_bytes = [0u8; 2];
        reader.read_exact(&mut version_bytes)?;
        let version = u16::from_le_bytes(version_bytes);
        if version != STORE_VERSION {
            return Err(LshError::CorruptedStore(format!(
                "Unsupported version: {} (expected {})",
                version, STORE_VERSION
            )));
        }

        let mut store: Self = bincode::deserialize_from(reader)?;
        store.check_consistency()?;
        store.by_id = store
            .ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();
        Ok(store)
    }

    /// Every layer and table must agree with the config and the vector count,
    /// otherwise a later insert could fail halfway through the index.
    fn check_consistency(&self) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| LshError::CorruptedStore(e.to_string()))?;

        let count = self.vectors.len();
        if self.ids.len() != count || self.metadata.len() != count {
            return Err(LshError::CorruptedStore(format!(
                "{} vectors, {} ids, {} metadata entries",
                count,
                self.ids.len(),
                self.metadata.len()
            )));
        }
        if let Some(v) = self.vectors.iter().find(|v| v.len() != self.config.dimensions) {
            return Err(LshError::CorruptedStore(format!(
                "stored vector has {} dimensions, config has {}",
                v.len(),
                self.config.dimensions
            )));
        }

        let layers = self.index.layers();
        if layers.len() != self.config.num_layers {
            return Err(LshError::CorruptedStore(format!(
                "index has {} layers, config has {}",
                layers.len(),
                self.config.num_layers
            )));
        }
        for layer in layers {
            if layer.tables().len() != self.config.num_tables {
                return Err(LshError::CorruptedStore(format!(
                    "layer has {} tables, config has {}",
                    layer.tables().len(),
                    self.config.num_tables
                )));
            }
            for table in layer.tables() {
                if table.dimensions() != self.config.dimensions {
                    return Err(LshError::CorruptedStore(format!(
                        "table has {} dimensions, config has {}",
                        table.dimensions(),
                        self.config.dimensions
                    )));
                }
                if table.len() != count {
                    return Err(LshError::CorruptedStore(format!(
                        "{} vectors, {} indexed",
                        count,
                        table.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// `<path>.tmp` next to `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
