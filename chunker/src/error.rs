use thiserror::Error;

/// Errors that can occur while setting up a chunker
#[derive(Debug, Error)]
pub enum ChunkerError {
    /// Invalid configuration
    #[error("Invalid chunker configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ChunkerError>;
