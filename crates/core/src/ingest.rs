use crate::chunking::{normalize_whitespace, split_overlapping, ChunkingConfig};
use crate::error::IngestError;
use crate::extractor::extract_page_texts;
use crate::index::SimilarityIndex;
use crate::models::{CollectionFingerprint, CollectionSpec, QaOptions};
use crate::traits::Embedder;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// One source document plus its derived index, identified by a display name.
pub struct DocumentCollection {
    pub fingerprint: CollectionFingerprint,
    pub index: SimilarityIndex,
}

impl DocumentCollection {
    pub fn name(&self) -> &str {
        &self.fingerprint.name
    }
}

pub fn digest_file(path: &Path) -> Result<String, IngestError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Builds one collection end to end: extract page texts, normalize, chunk,
/// embed, index. Any failure is fatal for this collection only; no partial
/// index is ever returned.
pub async fn build_collection(
    spec: &CollectionSpec,
    options: &QaOptions,
    embedder: Arc<dyn Embedder + Send + Sync>,
) -> Result<DocumentCollection, IngestError> {
    let path = Path::new(&spec.path);
    let checksum = digest_file(path)?;
    let pages = extract_page_texts(path)?;

    let full_text = pages
        .iter()
        .map(|page| page.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let normalized = normalize_whitespace(&full_text);

    let chunks = split_overlapping(&normalized, ChunkingConfig::from(options))?;
    let chunk_count = chunks.len();
    let index = SimilarityIndex::build(chunks, embedder).await?;

    Ok(DocumentCollection {
        fingerprint: CollectionFingerprint {
            name: spec.name.clone(),
            source_path: spec.path.clone(),
            checksum,
            chunk_count,
            built_at: Utc::now(),
        },
        index,
    })
}

pub struct SkippedCollection {
    pub name: String,
    pub path: String,
    pub reason: String,
}

pub struct StartupReport {
    pub collections: Vec<DocumentCollection>,
    pub skipped: Vec<SkippedCollection>,
}

/// Builds every configured collection, excluding the ones that fail and
/// recording why, so the process can serve the survivors. Configured order
/// is preserved for the collections that build.
pub async fn build_collections_best_effort(
    specs: &[CollectionSpec],
    options: &QaOptions,
    embedder: Arc<dyn Embedder + Send + Sync>,
) -> Result<StartupReport, IngestError> {
    if specs.is_empty() {
        return Err(IngestError::InvalidArgument(
            "at least one collection must be configured".to_string(),
        ));
    }

    let mut collections = Vec::new();
    let mut skipped = Vec::new();

    for spec in specs {
        match build_collection(spec, options, Arc::clone(&embedder)).await {
            Ok(collection) => collections.push(collection),
            Err(error) => skipped.push(SkippedCollection {
                name: spec.name.clone(),
                path: spec.path.clone(),
                reason: error.to_string(),
            }),
        }
    }

    Ok(StartupReport {
        collections,
        skipped,
    })
}
