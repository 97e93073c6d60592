use crate::error::ServiceError;
use crate::index::SimilarityIndex;
use crate::traits::Retriever;
use async_trait::async_trait;

/// Separator between retrieved chunk texts in a retrieval result.
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// One agent per collection: turns a query into the concatenated text of the
/// top-k nearest chunks from that collection's index.
pub struct RetrievalAgent {
    name: String,
    index: SimilarityIndex,
    top_k: usize,
}

impl RetrievalAgent {
    pub fn new(name: impl Into<String>, index: SimilarityIndex, top_k: usize) -> Self {
        Self {
            name: name.into(),
            index,
            top_k,
        }
    }
}

#[async_trait]
impl Retriever for RetrievalAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn relevant_text(&self, query: &str) -> Result<Option<String>, ServiceError> {
        let hits = self.index.query(query, self.top_k).await?;
        if hits.is_empty() {
            return Ok(None);
        }

        let joined = hits
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR);

        Ok(Some(joined))
    }
}

#[cfg(test)]
mod tests {
    use super::RetrievalAgent;
    use crate::embeddings::CharacterNgramEmbedder;
    use crate::index::SimilarityIndex;
    use crate::models::Chunk;
    use crate::traits::Retriever;
    use std::sync::Arc;

    #[tokio::test]
    async fn empty_index_yields_no_result_not_an_error() {
        let embedder = Arc::new(CharacterNgramEmbedder { dimensions: 32 });
        let index = SimilarityIndex::build(Vec::new(), embedder).await.unwrap();
        let agent = RetrievalAgent::new("Empty", index, 4);

        let result = agent.relevant_text("anything").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn chunk_texts_are_joined_with_a_visible_separator() {
        let embedder = Arc::new(CharacterNgramEmbedder { dimensions: 32 });
        let chunks = vec![
            Chunk {
                index: 0,
                text: "first passage".to_string(),
            },
            Chunk {
                index: 1,
                text: "second passage".to_string(),
            },
        ];
        let index = SimilarityIndex::build(chunks, embedder).await.unwrap();
        let agent = RetrievalAgent::new("Guide", index, 4);

        let joined = agent.relevant_text("passage").await.unwrap().unwrap();
        assert!(joined.contains("first passage"));
        assert!(joined.contains("second passage"));
        assert!(joined.contains("\n\n"));
    }

    #[tokio::test]
    async fn top_k_caps_the_retrieved_chunks() {
        let embedder = Arc::new(CharacterNgramEmbedder { dimensions: 32 });
        let chunks = (0..6)
            .map(|index| Chunk {
                index,
                text: format!("passage number {index}"),
            })
            .collect();
        let index = SimilarityIndex::build(chunks, embedder).await.unwrap();
        let agent = RetrievalAgent::new("Guide", index, 2);

        let joined = agent.relevant_text("passage number").await.unwrap().unwrap();
        assert_eq!(joined.matches("passage number").count(), 2);
    }

    #[tokio::test]
    async fn configured_top_k_bounds_the_agent() {
        use crate::models::QaOptions;

        let options = QaOptions::default();
        let embedder = Arc::new(CharacterNgramEmbedder { dimensions: 32 });
        let chunks = (0..10)
            .map(|index| Chunk {
                index,
                text: format!("clause {index}"),
            })
            .collect();
        let index = SimilarityIndex::build(chunks, embedder).await.unwrap();
        let agent = RetrievalAgent::new("Guide", index, options.top_k);

        let joined = agent.relevant_text("clause").await.unwrap().unwrap();
        assert_eq!(joined.matches("clause").count(), options.top_k);
    }
}
