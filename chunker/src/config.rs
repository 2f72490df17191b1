use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for fixed-size text chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Chunk length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks. Values at or above
    /// `chunk_size` are clamped to `chunk_size - 1`.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_overlap() -> usize {
    200
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

impl ChunkerConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkerError::InvalidConfig(
                "chunk_size must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Overlap after clamping to `chunk_size - 1`.
    pub fn effective_overlap(&self) -> usize {
        self.overlap.min(self.chunk_size.saturating_sub(1))
    }

    /// Distance between the starts of consecutive chunks. Always at least 1
    /// for a valid config.
    pub fn step(&self) -> usize {
        self.chunk_size - self.effective_overlap()
    }
}
