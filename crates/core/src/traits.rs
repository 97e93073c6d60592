use crate::answer::ModelReply;
use crate::error::ServiceError;
use async_trait::async_trait;

/// Maps text to a fixed-dimension vector. Implementations talk to a remote
/// service or compute locally; either way failures are typed so callers can
/// degrade a single collection instead of aborting the query.
#[async_trait]
pub trait Embedder {
    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError>;
}

/// Language-model boundary. The reply shape is not statically guaranteed by
/// the service contract, so implementations resolve it into [`ModelReply`]
/// once, at ingestion.
#[async_trait]
pub trait ChatModel {
    async fn complete(&self, prompt: &str) -> Result<ModelReply, ServiceError>;
}

/// Per-collection retrieval seam consumed by the orchestrator.
#[async_trait]
pub trait Retriever {
    fn name(&self) -> &str;

    /// `Ok(None)` means the collection's index held no chunks; errors mean
    /// the collection is unavailable for this query.
    async fn relevant_text(&self, query: &str) -> Result<Option<String>, ServiceError>;
}

/// Strategy for ranking per-collection retrieval results against each other.
pub trait RelevanceScorer {
    fn score(&self, retrieved_text: &str) -> usize;
}
