use crate::error::{RagError, Result};
use serde::{Deserialize, Serialize};

/// Tuning knobs for the hybrid pipeline.
///
/// Fields are private: every value is checked when the config is built or
/// deserialized, so an out-of-range config cannot be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RagConfigBuilder")]
pub struct RagConfig {
    dense_weight: f32,
    sparse_weight: f32,
    dense_top_k: usize,
    sparse_top_k: usize,
    rerank_top_k: usize,
    enable_reranker: bool,
}

impl RagConfig {
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Fusion weight of the dense list, in [0.0, 1.0]
    pub fn dense_weight(&self) -> f32 {
        self.dense_weight
    }

    /// Fusion weight of the sparse list, in [0.0, 1.0]
    pub fn sparse_weight(&self) -> f32 {
        self.sparse_weight
    }

    /// Candidates requested from the vector store
    pub fn dense_top_k(&self) -> usize {
        self.dense_top_k
    }

    /// Candidates requested from the sparse retriever
    pub fn sparse_top_k(&self) -> usize {
        self.sparse_top_k
    }

    /// Result cap when the caller does not pass one
    pub fn rerank_top_k(&self) -> usize {
        self.rerank_top_k
    }

    pub fn enable_reranker(&self) -> bool {
        self.enable_reranker
    }

    /// Same config with the reranker switched on or off.
    pub fn with_reranker_enabled(mut self, enabled: bool) -> Self {
        self.enable_reranker = enabled;
        self
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            dense_weight: default_dense_weight(),
            sparse_weight: default_sparse_weight(),
            dense_top_k: default_top_k(),
            sparse_top_k: default_top_k(),
            rerank_top_k: default_rerank_top_k(),
            enable_reranker: true,
        }
    }
}

/// Unvalidated form of [`RagConfig`]. Also the on-disk shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagConfigBuilder {
    #[serde(default = "default_dense_weight")]
    dense_weight: f32,

    #[serde(default = "default_sparse_weight")]
    sparse_weight: f32,

    #[serde(default = "default_top_k")]
    dense_top_k: usize,

    #[serde(default = "default_top_k")]
    sparse_top_k: usize,

    #[serde(default = "default_rerank_top_k")]
    rerank_top_k: usize,

    #[serde(default = "default_true")]
    enable_reranker: bool,
}

fn default_dense_weight() -> f32 {
    0.7
}

fn default_sparse_weight() -> f32 {
    0.3
}

fn default_top_k() -> usize {
    20
}

fn default_rerank_top_k() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Default for RagConfigBuilder {
    fn default() -> Self {
        let config = RagConfig::default();
        Self {
            dense_weight: config.dense_weight,
            sparse_weight: config.sparse_weight,
            dense_top_k: config.dense_top_k,
            sparse_top_k: config.sparse_top_k,
            rerank_top_k: config.rerank_top_k,
            enable_reranker: config.enable_reranker,
        }
    }
}

impl RagConfigBuilder {
    pub fn dense_weight(mut self, weight: f32) -> Self {
        self.dense_weight = weight;
        self
    }

    pub fn sparse_weight(mut self, weight: f32) -> Self {
        self.sparse_weight = weight;
        self
    }

    pub fn dense_top_k(mut self, top_k: usize) -> Self {
        self.dense_top_k = top_k;
        self
    }

    pub fn sparse_top_k(mut self, top_k: usize) -> Self {
        self.sparse_top_k = top_k;
        self
    }

    pub fn rerank_top_k(mut self, top_k: usize) -> Self {
        self.rerank_top_k = top_k;
        self
    }

    pub fn enable_reranker(mut self, enabled: bool) -> Self {
        self.enable_reranker = enabled;
        self
    }

    pub fn build(self) -> Result<RagConfig> {
        validate_weight("dense_weight", self.dense_weight)?;
        validate_weight("sparse_weight", self.sparse_weight)?;
        validate_top_k("dense_top_k", self.dense_top_k)?;
        validate_top_k("sparse_top_k", self.sparse_top_k)?;
        validate_top_k("rerank_top_k", self.rerank_top_k)?;

        Ok(RagConfig {
            dense_weight: self.dense_weight,
            sparse_weight: self.sparse_weight,
            dense_top_k: self.dense_top_k,
            sparse_top_k: self.sparse_top_k,
            rerank_top_k: self.rerank_top_k,
            enable_reranker: self.enable_reranker,
        })
    }
}

impl TryFrom<RagConfigBuilder> for RagConfig {
    type Error = RagError;

    fn try_from(builder: RagConfigBuilder) -> Result<Self> {
        builder.build()
    }
}

fn validate_weight(field: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(RagError::Validation(format!(
            "{field} must be in [0.0, 1.0], got {value}"
        )));
    }
    Ok(())
}

fn validate_top_k(field: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(RagError::Validation(format!("{field} must be > 0")));
    }
    Ok(())
}
