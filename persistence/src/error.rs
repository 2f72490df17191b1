use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentStoreError {
    #[error("Document store not initialized; call `initialize` first")]
    NotInitialized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store file version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Invalid embedding for document `{id}`: {reason}")]
    InvalidEmbedding { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DocumentStoreError>;
