use crate::error::IngestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration surface for one collection: display name plus source file.
/// Parsed once at startup and immutable for process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    pub path: String,
}

impl CollectionSpec {
    /// Parses a `NAME=path.pdf` argument.
    pub fn parse(raw: &str) -> Result<Self, IngestError> {
        let (name, path) = raw.split_once('=').ok_or_else(|| {
            IngestError::InvalidArgument(format!(
                "collection must be NAME=path, got: {raw}"
            ))
        })?;

        let name = name.trim();
        let path = path.trim();
        if name.is_empty() || path.is_empty() {
            return Err(IngestError::InvalidArgument(format!(
                "collection name and path must be non-empty: {raw}"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            path: path.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFingerprint {
    pub name: String,
    pub source_path: String,
    pub checksum: String,
    pub chunk_count: usize,
    pub built_at: DateTime<Utc>,
}

/// Bounded-length text segment with a defined overlap to its neighbor; the
/// unit of embedding and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct QaOptions {
    pub chunk_max_chars: usize,
    pub chunk_overlap_chars: usize,
    pub top_k: usize,
}

impl Default for QaOptions {
    fn default() -> Self {
        Self {
            chunk_max_chars: 500,
            chunk_overlap_chars: 50,
            top_k: 4,
        }
    }
}

/// Externally visible outcome of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalAnswer {
    Answered { source: String, answer: String },
    NotFound,
    Unavailable { reason: String },
}
