use crate::bm25::{Bm25Config, Bm25Retriever};
use crate::rerank::LexicalReranker;
use hybrid_rag_core::{RagError, Reranker, Result, SparseRetriever};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Sparse stage of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SparseConfig {
    /// Dense-only retrieval
    None,
    /// In-memory BM25
    Bm25(Bm25Config),
}

impl Default for SparseConfig {
    fn default() -> Self {
        SparseConfig::Bm25(Bm25Config::default())
    }
}

/// Reranking stage of the pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RerankerConfig {
    None,
    /// Term coverage boost, always available
    #[default]
    Lexical,
    /// Cross-encoder model; requires the `fastembed` cargo feature
    #[serde(rename = "fastembed")]
    FastEmbed(FastEmbedRerankerConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastEmbedRerankerConfig {
    #[serde(default)]
    pub model: RerankerModelType,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub show_download_progress: bool,
}

fn default_batch_size() -> usize {
    32
}

impl Default for FastEmbedRerankerConfig {
    fn default() -> Self {
        Self {
            model: RerankerModelType::default(),
            batch_size: default_batch_size(),
            show_download_progress: false,
        }
    }
}

/// Supported cross-encoder models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RerankerModelType {
    #[default]
    BgeRerankerBase,
    JinaRerankerV1TurboEn,
}

impl RerankerModelType {
    #[cfg(feature = "fastembed")]
    pub(crate) fn to_fastembed_model(self) -> fastembed::RerankerModel {
        match self {
            RerankerModelType::BgeRerankerBase => fastembed::RerankerModel::BGERerankerBase,
            RerankerModelType::JinaRerankerV1TurboEn => {
                fastembed::RerankerModel::JINARerankerV1TurboEn
            }
        }
    }
}

/// Construct the configured sparse retriever, or `None` for dense-only retrieval.
pub fn build_sparse_retriever(config: &SparseConfig) -> Result<Option<Arc<dyn SparseRetriever>>> {
    match config {
        SparseConfig::None => Ok(None),
        SparseConfig::Bm25(bm25) => {
            bm25.validate().map_err(RagError::Validation)?;
            Ok(Some(Arc::new(Bm25Retriever::new(*bm25))))
        }
    }
}

/// Construct the configured reranker, or `None` when reranking is off.
///
/// Backends compiled out of this build fail with [`RagError::UnsupportedBackend`].
pub async fn build_reranker(config: &RerankerConfig) -> Result<Option<Arc<dyn Reranker>>> {
    match config {
        RerankerConfig::None => Ok(None),
        RerankerConfig::Lexical => Ok(Some(Arc::new(LexicalReranker::new()))),
        RerankerConfig::FastEmbed(fastembed_config) => build_fastembed(fastembed_config).await,
    }
}

#[cfg(feature = "fastembed")]
async fn build_fastembed(config: &FastEmbedRerankerConfig) -> Result<Option<Arc<dyn Reranker>>> {
    use crate::cross_encoder::FastEmbedReranker;

    if config.batch_size == 0 {
        return Err(RagError::Validation(
            "reranker batch_size must be greater than 0".to_string(),
        ));
    }
    let reranker = FastEmbedReranker::new(config.clone())
        .await
        .map_err(|e| RagError::backend(FastEmbedReranker::NAME, e))?;
    Ok(Some(Arc::new(reranker)))
}

#[cfg(not(feature = "fastembed"))]
async fn build_fastembed(_config: &FastEmbedRerankerConfig) -> Result<Option<Arc<dyn Reranker>>> {
    Err(RagError::UnsupportedBackend {
        backend: "fastembed-reranker".to_string(),
        reason: "built without the `fastembed` feature".to_string(),
    })
}
