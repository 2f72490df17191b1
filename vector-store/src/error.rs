use thiserror::Error;

/// Errors that can occur during vector store operations
#[derive(Debug, Error)]
pub enum VectorStoreError {
    /// A document reached the store without an embedding
    #[error("Document `{0}` has no embedding")]
    MissingEmbedding(String),

    /// A vector does not match the store's configured dimension
    #[error("Dimension mismatch for `{id}`: expected {expected}, got {actual}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },
}
