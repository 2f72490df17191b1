use crate::error::EmbeddingError;
use crate::hashing::HashingEmbedder;
use hybrid_rag_core::{Embedder, RagError};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default dimension of the hashing embedder
pub const DEFAULT_HASHING_DIM: usize = 384;

/// Default embedding dimension for Nomic-embed-text-v1.5
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Which embedder backend to construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmbedderConfig {
    /// Feature hashing; always available
    Hashing {
        #[serde(default = "default_hashing_dimension")]
        dimension: usize,
    },
    /// Local ONNX model; requires the `fastembed` cargo feature
    #[serde(rename = "fastembed")]
    FastEmbed(FastEmbedConfig),
}

fn default_hashing_dimension() -> usize {
    DEFAULT_HASHING_DIM
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        EmbedderConfig::Hashing {
            dimension: DEFAULT_HASHING_DIM,
        }
    }
}

/// Configuration for the fastembed backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastEmbedConfig {
    /// Model to use for embeddings
    #[serde(default)]
    pub model: EmbeddingModelType,

    /// Target embedding dimension (for Matryoshka truncation)
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Maximum batch size for embedding generation
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Show download progress when downloading models
    #[serde(default)]
    pub show_download_progress: bool,
}

fn default_embedding_dimension() -> usize {
    DEFAULT_EMBEDDING_DIM
}

fn default_batch_size() -> usize {
    32
}

impl Default for FastEmbedConfig {
    fn default() -> Self {
        Self {
            model: EmbeddingModelType::default(),
            dimension: DEFAULT_EMBEDDING_DIM,
            batch_size: default_batch_size(),
            show_download_progress: false,
        }
    }
}

impl FastEmbedConfig {
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.batch_size == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "batch_size must be greater than 0".into(),
            ));
        }
        let native = self.model.native_dimension();
        if self.dimension == 0 || self.dimension > native {
            return Err(EmbeddingError::InvalidConfig(format!(
                "dimension must be in 1..={native} for {:?}, got {}",
                self.model, self.dimension
            )));
        }
        Ok(())
    }
}

/// Supported embedding models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbeddingModelType {
    /// Nomic-embed-text-v1.5, supports Matryoshka truncation
    #[default]
    NomicEmbedTextV15,
    /// All-MiniLM-L6-v2 (lightweight, faster)
    AllMiniLmL6V2,
    /// BGE-small-en-v1.5
    BgeSmallEnV15,
}

impl EmbeddingModelType {
    /// Output dimension of the model before truncation.
    pub fn native_dimension(self) -> usize {
        match self {
            EmbeddingModelType::NomicEmbedTextV15 => 768,
            EmbeddingModelType::AllMiniLmL6V2 | EmbeddingModelType::BgeSmallEnV15 => 384,
        }
    }

    #[cfg(feature = "fastembed")]
    pub(crate) fn to_fastembed_model(self) -> fastembed::EmbeddingModel {
        match self {
            EmbeddingModelType::NomicEmbedTextV15 => fastembed::EmbeddingModel::NomicEmbedTextV15,
            EmbeddingModelType::AllMiniLmL6V2 => fastembed::EmbeddingModel::AllMiniLML6V2,
            EmbeddingModelType::BgeSmallEnV15 => fastembed::EmbeddingModel::BGESmallENV15,
        }
    }
}

/// Construct the configured embedder.
///
/// Backends compiled out of this build fail with
/// [`RagError::UnsupportedBackend`]; invalid settings fail with
/// [`RagError::Validation`].
pub async fn build_embedder(config: &EmbedderConfig) -> hybrid_rag_core::Result<Arc<dyn Embedder>> {
    match config {
        EmbedderConfig::Hashing { dimension } => {
            let embedder = HashingEmbedder::new(*dimension)
                .map_err(|e| RagError::Validation(e.to_string()))?;
            info!("Using hashing embedder ({dimension} dims)");
            Ok(Arc::new(embedder))
        }
        EmbedderConfig::FastEmbed(fastembed_config) => build_fastembed(fastembed_config).await,
    }
}

#[cfg(feature = "fastembed")]
async fn build_fastembed(config: &FastEmbedConfig) -> hybrid_rag_core::Result<Arc<dyn Embedder>> {
    use crate::fastembed_embedder::FastEmbedEmbedder;

    match FastEmbedEmbedder::new(config.clone()).await {
        Ok(embedder) => Ok(Arc::new(embedder)),
        Err(EmbeddingError::InvalidConfig(message)) => Err(RagError::Validation(message)),
        Err(err) => Err(RagError::backend(FastEmbedEmbedder::NAME, err)),
    }
}

#[cfg(not(feature = "fastembed"))]
async fn build_fastembed(config: &FastEmbedConfig) -> hybrid_rag_core::Result<Arc<dyn Embedder>> {
    config
        .validate()
        .map_err(|err| RagError::Validation(err.to_string()))?;
    Err(RagError::UnsupportedBackend {
        backend: "fastembed".to_string(),
        reason: "built without the `fastembed` feature".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_hashing_config() {
        let config: EmbedderConfig = toml::from_str("kind = \"hashing\"").unwrap();
        assert_eq!(
            config,
            EmbedderConfig::Hashing {
                dimension: DEFAULT_HASHING_DIM
            }
        );
    }

    #[test]
    fn test_parse_fastembed_config() {
        let config: EmbedderConfig = toml::from_str(
            "kind = \"fastembed\"\nmodel = \"all-mini-lm-l6-v2\"\ndimension = 256",
        )
        .unwrap();
        let EmbedderConfig::FastEmbed(fastembed) = config else {
            panic!("expected fastembed config");
        };
        assert_eq!(fastembed.model, EmbeddingModelType::AllMiniLmL6V2);
        assert_eq!(fastembed.dimension, 256);
        assert_eq!(fastembed.batch_size, 32);
    }

    #[test]
    fn test_fastembed_dimension_bounded_by_model() {
        let config = FastEmbedConfig {
            model: EmbeddingModelType::AllMiniLmL6V2,
            dimension: 768,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(FastEmbedConfig::default().validate().is_ok());
    }

    #[tokio::test]
    async fn test_build_hashing_embedder() {
        let embedder = build_embedder(&EmbedderConfig::Hashing { dimension: 16 })
            .await
            .unwrap();
        assert_eq!(embedder.name(), "hashing");
        assert_eq!(embedder.dimension(), 16);

        let err = build_embedder(&EmbedderConfig::Hashing { dimension: 0 })
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RagError::Validation(_)));
    }

    #[cfg(not(feature = "fastembed"))]
    #[tokio::test]
    async fn test_fastembed_unsupported_without_feature() {
        let err = build_embedder(&EmbedderConfig::FastEmbed(FastEmbedConfig::default()))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RagError::UnsupportedBackend { .. }));
        assert_eq!(err.backend_name(), Some("fastembed"));
    }
}
