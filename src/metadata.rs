// Copyright (c) 2025 LshDB Contributors
// Licensed under the LshDB License. See LICENSE file for details.

//! Per-vector metadata and attribute filters.
//!
//! Every stored vector carries a free-form description and a timestamp
//! (seconds since the Unix epoch). [`MetadataFilter`] combines an identifier,
//! a description and an inclusive time range; unset parts match everything.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch, or 0 if the clock is before it
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Description and timestamp attached to a stored vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorMetadata {
    /// Free-form description
    pub description: String,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

impl VectorMetadata {
    /// Metadata stamped with the current time
    pub fn new(description: impl Into<String>) -> Self {
        Self::at(description, unix_now())
    }

    /// Metadata with an explicit timestamp
    pub fn at(description: impl Into<String>, timestamp: u64) -> Self {
        Self {
            description: description.into(),
            timestamp,
        }
    }
}

impl Default for VectorMetadata {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Attribute query over stored vectors
///
/// # Example
///
/// ```rust
/// use lshdb::MetadataFilter;
///
/// let filter = MetadataFilter::default()
///     .with_id("doc1")
///     .between(1_700_000_000, 1_800_000_000);
/// assert!(filter.description.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFilter {
    /// Exact identifier, or any
    pub id: Option<String>,
    /// Exact description, or any
    pub description: Option<String>,
    /// Earliest timestamp (inclusive)
    pub start: u64,
    /// Latest timestamp (inclusive)
    pub end: u64,
}

impl Default for MetadataFilter {
    fn default() -> Self {
        Self {
            id: None,
            description: None,
            start: 0,
            end: u64::MAX,
        }
    }
}

impl MetadataFilter {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restrict to timestamps in `start..=end`
    pub fn between(mut self, start: u64, end: u64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn matches(&self, id: &str, metadata: &VectorMetadata) -> bool {
        self.id.as_deref().map_or(true, |want| want == id)
            && self
                .description
                .as_deref()
                .map_or(true, |want| want == metadata.description)
            && (self.start..=self.end).contains(&metadata.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = MetadataFilter::default();
        assert!(filter.matches("a", &VectorMetadata::at("", 0)));
        assert!(filter.matches("b", &VectorMetadata::at("x", u64::MAX)));
    }

    #[test]
    fn test_filter_combines_all_parts() {
        let meta = VectorMetadata::at("third vector", 100);
        let filter = MetadataFilter::default()
            .with_id("Vector 1")
            .with_description("third vector")
            .between(90, 100);

        assert!(filter.matches("Vector 1", &meta));
        assert!(!filter.matches("Vector 2", &meta));
        assert!(!filter.matches("Vector 1", &VectorMetadata::at("first vector", 100)));
        assert!(!filter.matches("Vector 1", &VectorMetadata::at("third vector", 101)));
        assert!(!filter.matches("Vector 1", &VectorMetadata::at("third vector", 89)));
    }

    #[test]
    fn test_new_metadata_is_stamped_now() {
        let before = unix_now();
        let meta = VectorMetadata::new("fresh");
        assert!(meta.timestamp >= before);
        assert!(meta.timestamp <= unix_now());
        assert_eq!(meta.description, "fresh");
    }
}
