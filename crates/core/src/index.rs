use crate::error::{IngestError, ServiceError};
use crate::models::Chunk;
use crate::traits::Embedder;
use std::sync::Arc;

/// Exact-scan nearest-neighbor index over the embedded chunks of one
/// collection. Built once at startup, read-only afterward. Exact scan keeps
/// results deterministic and is cheap at the corpus sizes this serves
/// (hundreds to low thousands of chunks).
pub struct SimilarityIndex {
    embedder: Arc<dyn Embedder + Send + Sync>,
    entries: Vec<(Chunk, Vec<f32>)>,
    dimensions: usize,
}

impl SimilarityIndex {
    /// Embeds every chunk and stores the pairs. Any embedder failure or
    /// malformed vector aborts the build; no partial index is returned.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: Arc<dyn Embedder + Send + Sync>,
    ) -> Result<Self, IngestError> {
        let dimensions = embedder.dimensions();
        let mut entries = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let vector = embedder
                .embed(&chunk.text)
                .await
                .map_err(|error| IngestError::IndexBuild(error.to_string()))?;

            if vector.len() != dimensions {
                return Err(IngestError::IndexBuild(format!(
                    "embedding dimension {} does not match expected {} for chunk {}",
                    vector.len(),
                    dimensions,
                    chunk.index
                )));
            }

            entries.push((chunk, vector));
        }

        Ok(Self {
            embedder,
            entries,
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Returns up to `min(k, len)` chunks ordered nearest-first by squared
    /// Euclidean distance to the embedded query. Ties keep original chunk
    /// order (the sort is stable). An empty index yields an empty vec.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<Chunk>, ServiceError> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(text).await?;
        if query_vector.len() != self.dimensions {
            return Err(ServiceError::Embedding(format!(
                "query embedding dimension {} does not match index dimension {}",
                query_vector.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(f32, &Chunk)> = self
            .entries
            .iter()
            .map(|(chunk, vector)| (squared_distance(&query_vector, vector), chunk))
            .collect();

        scored.sort_by(|left, right| left.0.total_cmp(&right.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, chunk)| chunk.clone())
            .collect())
    }
}

fn squared_distance(left: &[f32], right: &[f32]) -> f32 {
    left.iter()
        .zip(right.iter())
        .map(|(a, b)| {
            let delta = a - b;
            delta * delta
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::SimilarityIndex;
    use crate::embeddings::CharacterNgramEmbedder;
    use crate::error::{IngestError, ServiceError};
    use crate::models::Chunk;
    use crate::traits::Embedder;
    use async_trait::async_trait;
    use std::sync::Arc;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Chunk {
                index,
                text: (*text).to_string(),
            })
            .collect()
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        fn dimensions(&self) -> usize {
            8
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ServiceError> {
            Err(ServiceError::Embedding("service unreachable".to_string()))
        }
    }

    struct WrongDimensionEmbedder;

    #[async_trait]
    impl Embedder for WrongDimensionEmbedder {
        fn dimensions(&self) -> usize {
            8
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ServiceError> {
            Ok(vec![0.0; 4])
        }
    }

    #[tokio::test]
    async fn query_returns_at_most_min_k_n_without_duplicates() {
        let embedder = Arc::new(CharacterNgramEmbedder { dimensions: 32 });
        let index = SimilarityIndex::build(
            chunks(&["civil appeal process", "corporate filings", "court fees"]),
            embedder,
        )
        .await
        .unwrap();

        let hits = index.query("appeal", 10).await.unwrap();
        assert_eq!(hits.len(), 3);

        let mut indices: Vec<usize> = hits.iter().map(|chunk| chunk.index).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), 3);

        let hits = index.query("appeal", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn empty_index_returns_empty_sequence() {
        let embedder = Arc::new(CharacterNgramEmbedder { dimensions: 32 });
        let index = SimilarityIndex::build(Vec::new(), embedder).await.unwrap();
        assert!(index.is_empty());
        assert!(index.query("anything", 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn nearest_chunk_comes_first() {
        let embedder = Arc::new(CharacterNgramEmbedder { dimensions: 64 });
        let index = SimilarityIndex::build(
            chunks(&["completely unrelated text about gardening", "limitation period appeal"]),
            embedder,
        )
        .await
        .unwrap();

        let hits = index.query("limitation period appeal", 1).await.unwrap();
        assert_eq!(hits[0].index, 1);
    }

    #[tokio::test]
    async fn identical_chunks_keep_original_order() {
        let embedder = Arc::new(CharacterNgramEmbedder { dimensions: 32 });
        let index = SimilarityIndex::build(
            chunks(&["same text", "same text", "same text"]),
            embedder,
        )
        .await
        .unwrap();

        let hits = index.query("same text", 3).await.unwrap();
        let indices: Vec<usize> = hits.iter().map(|chunk| chunk.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn unreachable_embedder_aborts_the_build() {
        let result = SimilarityIndex::build(chunks(&["text"]), Arc::new(FailingEmbedder)).await;
        assert!(matches!(result, Err(IngestError::IndexBuild(_))));
    }

    #[tokio::test]
    async fn malformed_vectors_abort_the_build() {
        let result =
            SimilarityIndex::build(chunks(&["text"]), Arc::new(WrongDimensionEmbedder)).await;
        assert!(matches!(result, Err(IngestError::IndexBuild(_))));
    }
}
