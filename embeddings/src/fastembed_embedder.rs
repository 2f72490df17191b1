use crate::config::FastEmbedConfig;
use crate::error::EmbeddingError;
use async_trait::async_trait;
use fastembed::{InitOptions, TextEmbedding};
use hybrid_rag_core::{BackendResult, Embedder};
use log::{debug, info};
use std::sync::Arc;

/// Local ONNX embedding model served by fastembed-rs.
pub struct FastEmbedEmbedder {
    model: Arc<TextEmbedding>,
    config: FastEmbedConfig,
}

impl FastEmbedEmbedder {
    pub const NAME: &'static str = "fastembed";

    /// Load (and on first use download) the configured model.
    pub async fn new(config: FastEmbedConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;
        info!(
            "Initializing fastembed model {:?}, dimension {}",
            config.model, config.dimension
        );

        let init_options = InitOptions::new(config.model.to_fastembed_model())
            .with_show_download_progress(config.show_download_progress);

        let model = tokio::task::spawn_blocking(move || TextEmbedding::try_new(init_options))
            .await
            .map_err(|e| EmbeddingError::ModelInitialization(e.to_string()))?
            .map_err(|e| {
                EmbeddingError::ModelInitialization(format!("Failed to initialize model: {e}"))
            })?;

        info!("Embedding model initialized successfully");

        Ok(Self {
            model: Arc::new(model),
            config,
        })
    }

    pub fn config(&self) -> &FastEmbedConfig {
        &self.config
    }

    fn embed_blocking(
        model: &TextEmbedding,
        texts: &[String],
        config: &FastEmbedConfig,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(config.batch_size) {
            let batch_embeddings = model
                .embed(batch.to_vec(), None)
                .map_err(|e| EmbeddingError::EmbeddingGeneration(e.to_string()))?;

            for mut embedding in batch_embeddings {
                if embedding.len() < config.dimension {
                    return Err(EmbeddingError::EmbeddingGeneration(format!(
                        "model returned {} dimensions, expected at least {}",
                        embedding.len(),
                        config.dimension
                    )));
                }
                // Matryoshka truncation
                embedding.truncate(config.dimension);
                all_embeddings.push(embedding);
            }
        }

        Ok(all_embeddings)
    }
}

#[async_trait]
impl Embedder for FastEmbedEmbedder {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, texts: &[String]) -> BackendResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let model = Arc::clone(&self.model);
        let config = self.config.clone();
        let texts = texts.to_vec();
        let embeddings =
            tokio::task::spawn_blocking(move || Self::embed_blocking(&model, &texts, &config))
                .await
                .map_err(|e| EmbeddingError::EmbeddingGeneration(e.to_string()))??;

        debug!("Generated {} embeddings", embeddings.len());
        Ok(embeddings)
    }
}
