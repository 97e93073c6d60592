use thiserror::Error;

/// Failures that occur while loading documents and building indexes at
/// startup. Each one is fatal for the collection being built, never for the
/// whole process.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unreadable document: {0}")]
    UnreadableDocument(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index build failed: {0}")]
    IndexBuild(String),
}

/// Per-query failures from the embedding and language-model boundaries.
/// These degrade a single collection or answer and are never process-fatal.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("embedding service failure: {0}")]
    Embedding(String),

    #[error("model service failure: {0}")]
    Model(String),

    #[error("unrecognized model response shape: {shape}")]
    UnrecognizedResponse { shape: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
