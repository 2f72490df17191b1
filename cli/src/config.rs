use anyhow::{Context, Result};
use hybrid_rag_chunker::ChunkerConfig;
use hybrid_rag_core::RagConfig;
use hybrid_rag_embeddings::EmbedderConfig;
use hybrid_rag_retrieval::{RerankerConfig, SparseConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "hybrid-rag.toml";

/// Everything the CLI needs to assemble a persistent retriever.
///
/// Every table is optional:
///
/// ```toml
/// store_path = "data/documents.json"
///
/// [rag]
/// dense_weight = 0.6
/// sparse_weight = 0.4
///
/// [chunker]
/// chunk_size = 800
///
/// [embedder]
/// kind = "hashing"
/// dimension = 512
///
/// [reranker]
/// kind = "none"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub rag: RagConfig,

    #[serde(default)]
    pub chunker: ChunkerConfig,

    #[serde(default)]
    pub embedder: EmbedderConfig,

    #[serde(default)]
    pub sparse: SparseConfig,

    #[serde(default)]
    pub reranker: RerankerConfig,

    /// JSON document store location
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".hybrid-rag").join("documents.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rag: RagConfig::default(),
            chunker: ChunkerConfig::default(),
            embedder: EmbedderConfig::default(),
            sparse: SparseConfig::default(),
            reranker: RerankerConfig::default(),
            store_path: default_store_path(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    /// Load `path`, or [`DEFAULT_CONFIG_FILE`] if it exists, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    tracing::debug!("No {DEFAULT_CONFIG_FILE} found; using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("In {}", path.display()))
    }
}
