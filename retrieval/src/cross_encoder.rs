use crate::config::FastEmbedRerankerConfig;
use crate::error::RerankError;
use async_trait::async_trait;
use fastembed::{RerankInitOptions, TextRerank};
use hybrid_rag_core::{BackendResult, Reranker, ResultSource, SearchResult, sort_by_score_desc};
use log::{debug, info};
use std::sync::Arc;

/// Cross-encoder reranker running a local fastembed model.
pub struct FastEmbedReranker {
    model: Arc<TextRerank>,
    config: FastEmbedRerankerConfig,
}

impl FastEmbedReranker {
    pub const NAME: &'static str = "fastembed-reranker";

    pub async fn new(config: FastEmbedRerankerConfig) -> Result<Self, RerankError> {
        info!("Initializing reranker model {:?}", config.model);

        let options = RerankInitOptions::new(config.model.to_fastembed_model())
            .with_show_download_progress(config.show_download_progress);
        let model = tokio::task::spawn_blocking(move || TextRerank::try_new(options))
            .await
            .map_err(|e| RerankError::ModelInitialization(e.to_string()))?
            .map_err(|e| RerankError::ModelInitialization(e.to_string()))?;

        Ok(Self {
            model: Arc::new(model),
            config,
        })
    }
}

#[async_trait]
impl Reranker for FastEmbedReranker {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn rerank(
        &self,
        query: &str,
        results: Vec<SearchResult>,
        top_k: usize,
    ) -> BackendResult<Vec<SearchResult>> {
        if results.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Cross-encoder reranking {} results", results.len());

        let model = Arc::clone(&self.model);
        let batch_size = self.config.batch_size;
        let query = query.to_string();
        let contents: Vec<String> = results.iter().map(|r| r.document.content.clone()).collect();
        let scored = tokio::task::spawn_blocking(move || {
            model.rerank(query, contents, false, Some(batch_size))
        })
        .await
        .map_err(|e| RerankError::Rerank(e.to_string()))?
        .map_err(|e| RerankError::Rerank(e.to_string()))?;

        let mut slots: Vec<Option<SearchResult>> = results.into_iter().map(Some).collect();
        let mut reranked = Vec::with_capacity(scored.len());
        for item in scored {
            let result = slots
                .get_mut(item.index)
                .and_then(Option::take)
                .ok_or(RerankError::IndexOutOfRange(item.index))?;
            reranked.push(SearchResult::new(
                result.document,
                item.score,
                ResultSource::Reranked,
            ));
        }

        sort_by_score_desc(&mut reranked);
        reranked.truncate(top_k);
        Ok(reranked)
    }
}
