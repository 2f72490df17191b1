use crate::fusion::reciprocal_rank_fusion;
use hybrid_rag_core::{
    Document, Embedder, Metadata, RagConfig, RagError, Reranker, ResultSource, Result,
    SearchResult, SparseRetriever, VectorStore, sort_by_score_desc,
};
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

/// Composite retriever: embed query -> dense + sparse -> RRF -> rerank.
///
/// Only the embedder and the vector store are required; a missing sparse
/// retriever or reranker skips that stage.
pub struct HybridRetriever {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    sparse_retriever: Option<Arc<dyn SparseRetriever>>,
    reranker: Option<Arc<dyn Reranker>>,
    config: RagConfig,
}

pub struct HybridRetrieverBuilder {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    sparse_retriever: Option<Arc<dyn SparseRetriever>>,
    reranker: Option<Arc<dyn Reranker>>,
    config: RagConfig,
}

impl HybridRetrieverBuilder {
    pub fn sparse_retriever(mut self, sparse_retriever: Arc<dyn SparseRetriever>) -> Self {
        self.sparse_retriever = Some(sparse_retriever);
        self
    }

    pub fn maybe_sparse_retriever(
        mut self,
        sparse_retriever: Option<Arc<dyn SparseRetriever>>,
    ) -> Self {
        self.sparse_retriever = sparse_retriever;
        self
    }

    pub fn reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    pub fn maybe_reranker(mut self, reranker: Option<Arc<dyn Reranker>>) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> HybridRetriever {
        info!(
            "Hybrid retriever: embedder={}, vector_store={}, sparse={}, reranker={}",
            self.embedder.name(),
            self.vector_store.name(),
            self.sparse_retriever.as_ref().map_or("none", |s| s.name()),
            self.reranker.as_ref().map_or("none", |r| r.name()),
        );
        HybridRetriever {
            embedder: self.embedder,
            vector_store: self.vector_store,
            sparse_retriever: self.sparse_retriever,
            reranker: self.reranker,
            config: self.config,
        }
    }
}

impl HybridRetriever {
    pub fn builder(
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> HybridRetrieverBuilder {
        HybridRetrieverBuilder {
            embedder,
            vector_store,
            sparse_retriever: None,
            reranker: None,
            config: RagConfig::default(),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    pub fn sparse_retriever(&self) -> Option<&Arc<dyn SparseRetriever>> {
        self.sparse_retriever.as_ref()
    }

    pub fn reranker(&self) -> Option<&Arc<dyn Reranker>> {
        self.reranker.as_ref()
    }

    /// Embed `documents` in one batch, upsert them into the vector store and
    /// index them in the sparse retriever.
    ///
    /// Returns the documents with their embeddings attached. Not
    /// transactional: if the sparse index fails, the vector store already
    /// holds the batch.
    pub async fn ingest(&self, documents: &[Document]) -> Result<Vec<Document>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let texts: Vec<String> = documents.iter().map(|doc| doc.content.clone()).collect();
        let vectors = self.embed(&texts).await?;

        let embedded: Vec<Document> = documents
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| doc.clone().with_embedding(vector))
            .collect();

        self.vector_store
            .upsert(&embedded)
            .await
            .map_err(|e| RagError::backend(self.vector_store.name(), e))?;

        if let Some(sparse) = &self.sparse_retriever {
            sparse
                .index(documents)
                .await
                .map_err(|e| RagError::backend(sparse.name(), e))?;
        }

        info!(
            "Ingested {} documents in {}ms",
            embedded.len(),
            start.elapsed().as_millis()
        );
        Ok(embedded)
    }

    /// Run the hybrid pipeline for `query`.
    ///
    /// Without `top_k` the result count is capped at `rerank_top_k`; with it,
    /// `top_k` is both the rerank cap (when positive) and the final cut.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: Option<usize>,
        filters: Option<&Metadata>,
    ) -> Result<Vec<SearchResult>> {
        let start = Instant::now();
        let config = &self.config;

        // Stage 1: embed query
        let query_vector = self
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                RagError::backend(self.embedder.name(), "no vector returned for the query")
            })?;

        // Stage 2: dense and sparse candidates
        let dense = async {
            self.vector_store
                .search(&query_vector, config.dense_top_k(), filters)
                .await
                .map_err(|e| RagError::backend(self.vector_store.name(), e))
        };
        let sparse = async {
            match &self.sparse_retriever {
                Some(sparse) => sparse
                    .search(query, config.sparse_top_k(), filters)
                    .await
                    .map(Some)
                    .map_err(|e| RagError::backend(sparse.name(), e)),
                None => Ok(None),
            }
        };
        let (dense_results, sparse_results) = tokio::try_join!(dense, sparse)?;
        debug!(
            "Candidates: {} dense, {} sparse",
            dense_results.len(),
            sparse_results.as_ref().map_or(0, Vec::len)
        );

        // Stage 3: fusion
        let merged = match sparse_results {
            Some(sparse_results) => reciprocal_rank_fusion(vec![
                (dense_results, config.dense_weight()),
                (sparse_results, config.sparse_weight()),
            ]),
            None => dense_results,
        };

        // Stage 4: rerank or plain cut
        let cap = top_k.filter(|k| *k > 0).unwrap_or(config.rerank_top_k());
        let mut results = match &self.reranker {
            Some(reranker) if config.enable_reranker() && !merged.is_empty() => {
                let reranked = reranker
                    .rerank(query, merged, cap)
                    .await
                    .map_err(|e| RagError::backend(reranker.name(), e))?;
                let mut reranked: Vec<SearchResult> = reranked
                    .into_iter()
                    .map(|result| SearchResult {
                        source: ResultSource::Reranked,
                        ..result
                    })
                    .collect();
                sort_by_score_desc(&mut reranked);
                reranked.truncate(cap);
                reranked
            }
            _ => {
                let mut merged = merged;
                sort_by_score_desc(&mut merged);
                merged.truncate(cap);
                merged
            }
        };

        if let Some(top_k) = top_k {
            results.truncate(top_k);
        }

        debug!(
            "Retrieved {} results in {}ms",
            results.len(),
            start.elapsed().as_millis()
        );
        Ok(results)
    }

    /// Remove `ids` from the vector store and the sparse index. Unknown ids
    /// are ignored.
    pub async fn delete(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        self.vector_store
            .delete(ids)
            .await
            .map_err(|e| RagError::backend(self.vector_store.name(), e))?;

        if let Some(sparse) = &self.sparse_retriever {
            sparse
                .delete(ids)
                .await
                .map_err(|e| RagError::backend(sparse.name(), e))?;
        }

        info!("Deleted {} documents", ids.len());
        Ok(())
    }

    /// One embedder call; checks the response shape.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let name = self.embedder.name();
        let vectors = self
            .embedder
            .embed(texts)
            .await
            .map_err(|e| RagError::backend(name, e))?;

        if vectors.len() != texts.len() {
            return Err(RagError::backend(
                name,
                format!("returned {} vectors for {} texts", vectors.len(), texts.len()),
            ));
        }
        let dimension = self.embedder.dimension();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(RagError::backend(
                name,
                format!("returned a {}-dimensional vector, expected {dimension}", bad.len()),
            ));
        }
        Ok(vectors)
    }
}
