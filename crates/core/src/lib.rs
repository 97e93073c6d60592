pub mod answer;
pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod index;
pub mod ingest;
pub mod models;
pub mod orchestrator;
pub mod retrieval;
pub mod services;
pub mod traits;

pub use answer::{AnsweringService, ModelReply, NOT_FOUND_MESSAGE};
pub use chunking::{normalize_whitespace, split_overlapping, ChunkingConfig};
pub use embeddings::{CharacterNgramEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{IngestError, ServiceError};
pub use extractor::{extract_page_texts, LopdfExtractor, PageText, PdfExtractor};
pub use index::SimilarityIndex;
pub use ingest::{
    build_collection, build_collections_best_effort, digest_file, DocumentCollection,
    SkippedCollection, StartupReport,
};
pub use models::{Chunk, CollectionFingerprint, CollectionSpec, FinalAnswer, QaOptions};
pub use orchestrator::{AnswerCoordinator, TextLengthScorer};
pub use retrieval::{RetrievalAgent, CHUNK_SEPARATOR};
pub use services::{OpenAiChatModel, OpenAiConfig, OpenAiEmbedder, DEFAULT_API_BASE};
pub use traits::{ChatModel, Embedder, RelevanceScorer, Retriever};
