use crate::config::AppConfig;
use hybrid_rag_embeddings::build_embedder;
use hybrid_rag_persistence::{JsonDocumentStore, PersistentRetriever};
use hybrid_rag_retrieval::{HybridRetriever, build_reranker, build_sparse_retriever};
use hybrid_rag_vector_store::InMemoryVectorStore;
use std::sync::Arc;

/// Assemble the configured backends around a JSON document store and
/// reload the persisted corpus.
pub async fn open_retriever(config: &AppConfig) -> hybrid_rag_core::Result<PersistentRetriever> {
    let embedder = build_embedder(&config.embedder).await?;
    let vector_store = Arc::new(InMemoryVectorStore::new(embedder.dimension()));
    let sparse = build_sparse_retriever(&config.sparse)?;
    let reranker = build_reranker(&config.reranker).await?;

    let retriever = HybridRetriever::builder(embedder, vector_store)
        .maybe_sparse_retriever(sparse)
        .maybe_reranker(reranker)
        .config(config.rag.clone())
        .build();
    let store = Arc::new(JsonDocumentStore::new(&config.store_path));

    let persistent = PersistentRetriever::new(retriever, store);
    persistent.initialize().await?;
    Ok(persistent)
}
