use thiserror::Error;

/// Errors that can occur during embedding operations
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Failed to initialize the embedding model
    #[error("Failed to initialize embedding model: {0}")]
    ModelInitialization(String),

    /// Failed to generate embeddings
    #[error("Failed to generate embeddings: {0}")]
    EmbeddingGeneration(String),

    /// Invalid embedder configuration
    #[error("Invalid embedder configuration: {0}")]
    InvalidConfig(String),
}

