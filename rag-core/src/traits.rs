use crate::document::{Document, Metadata};
use crate::error::BackendResult;
use crate::result::SearchResult;
use async_trait::async_trait;

/// Turns text into fixed-dimension vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    /// Length of every vector this embedder returns.
    fn dimension(&self) -> usize;

    /// One vector per input text, in input order. Empty input returns empty output.
    async fn embed(&self, texts: &[String]) -> BackendResult<Vec<Vec<f32>>>;
}

/// Stores document embeddings and answers nearest-neighbour queries.
#[async_trait]
pub trait VectorStore: Send + Sync {
    fn name(&self) -> &str;

    /// Insert or replace by id. Every document must carry an embedding.
    async fn upsert(&self, documents: &[Document]) -> BackendResult<()>;

    /// Up to `top_k` dense results sorted by similarity, highest first.
    async fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        filters: Option<&Metadata>,
    ) -> BackendResult<Vec<SearchResult>>;

    /// Unknown ids are ignored.
    async fn delete(&self, ids: &[String]) -> BackendResult<()>;

    /// Page through stored documents. Stores that cannot enumerate their
    /// contents keep this default.
    async fn list_documents(&self, _limit: usize, _offset: usize) -> BackendResult<Vec<Document>> {
        Err(format!("vector store `{}` does not support listing documents", self.name()).into())
    }
}

/// Keyword relevance index over raw document text.
#[async_trait]
pub trait SparseRetriever: Send + Sync {
    fn name(&self) -> &str;

    /// Add documents to the index. Implementations may rebuild from scratch.
    async fn index(&self, documents: &[Document]) -> BackendResult<()>;

    /// Up to `top_k` sparse results sorted by relevance, highest first.
    /// Documents with zero relevance are never returned.
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        filters: Option<&Metadata>,
    ) -> BackendResult<Vec<SearchResult>>;

    async fn delete(&self, ids: &[String]) -> BackendResult<()>;
}

/// Re-scores a candidate list against the query.
#[async_trait]
pub trait Reranker: Send + Sync {
    fn name(&self) -> &str;

    /// At most `top_k` results sorted by the new score, highest first.
    async fn rerank(
        &self,
        query: &str,
        results: Vec<SearchResult>,
        top_k: usize,
    ) -> BackendResult<Vec<SearchResult>>;
}
