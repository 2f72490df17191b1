use thiserror::Error;

/// Errors raised by model-backed rerankers
#[derive(Error, Debug)]
pub enum RerankError {
    #[error("Failed to initialize reranker model: {0}")]
    ModelInitialization(String),

    #[error("Reranking failed: {0}")]
    Rerank(String),

    #[error("Reranker returned unknown candidate index {0}")]
    IndexOutOfRange(usize),
}
