use crate::store::DocumentStore;
use hybrid_rag_core::{Document, Metadata, RagError, Result, SearchResult};
use hybrid_rag_retrieval::HybridRetriever;
use log::{info, warn};
use std::sync::Arc;

/// [`HybridRetriever`] backed by a durable [`DocumentStore`].
///
/// Ingested documents are saved together with their embeddings, and
/// [`PersistentRetriever::initialize`] rebuilds the in-memory indexes from
/// the store without calling the embedder again.
pub struct PersistentRetriever {
    retriever: HybridRetriever,
    store: Arc<dyn DocumentStore>,
}

impl PersistentRetriever {
    pub fn new(retriever: HybridRetriever, store: Arc<dyn DocumentStore>) -> Self {
        Self { retriever, store }
    }

    pub fn retriever(&self) -> &HybridRetriever {
        &self.retriever
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Open the store and load every persisted document into the vector
    /// store and the sparse index.
    pub async fn initialize(&self) -> Result<()> {
        let store_name = self.store.name();
        self.store
            .initialize()
            .await
            .map_err(|e| RagError::store(store_name, e))?;
        let documents = self
            .store
            .load_all()
            .await
            .map_err(|e| RagError::store(store_name, e))?;

        if documents.is_empty() {
            info!("No persisted documents found; starting with an empty index");
            return Ok(());
        }

        let (embedded, missing): (Vec<&Document>, Vec<&Document>) =
            documents.iter().partition(|doc| doc.embedding.is_some());
        if !missing.is_empty() {
            warn!(
                "{} persisted documents have no embedding and are left out of dense search: {}",
                missing.len(),
                missing
                    .iter()
                    .map(|doc| doc.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        if !embedded.is_empty() {
            let embedded: Vec<Document> = embedded.into_iter().cloned().collect();
            let vector_store = self.retriever.vector_store();
            vector_store
                .upsert(&embedded)
                .await
                .map_err(|e| RagError::backend(vector_store.name(), e))?;
        }

        if let Some(sparse) = self.retriever.sparse_retriever() {
            sparse
                .index(&documents)
                .await
                .map_err(|e| RagError::backend(sparse.name(), e))?;
        }

        info!(
            "Rebuilt in-memory indexes from {} persisted documents",
            documents.len()
        );
        Ok(())
    }

    /// Index `documents`, then persist the embedded copies.
    ///
    /// If the save fails the documents stay searchable until restart.
    pub async fn ingest(&self, documents: &[Document]) -> Result<Vec<Document>> {
        let embedded = self.retriever.ingest(documents).await?;
        if embedded.is_empty() {
            return Ok(embedded);
        }

        self.store
            .save(&embedded)
            .await
            .map_err(|e| RagError::backend(self.store.name(), e))?;
        Ok(embedded)
    }

    pub async fn retrieve(
        &self,
        query: &str,
        top_k: Option<usize>,
        filters: Option<&Metadata>,
    ) -> Result<Vec<SearchResult>> {
        self.retriever.retrieve(query, top_k, filters).await
    }

    /// Remove `ids` from the indexes and then from the store.
    ///
    /// A store failure after the indexes were updated is reported as
    /// [`RagError::Inconsistent`]; the ids will reappear on the next
    /// `initialize` unless the delete is retried.
    pub async fn delete(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        self.retriever.delete(ids).await?;
        self.store
            .delete(ids)
            .await
            .map_err(|source| RagError::Inconsistent {
                store: self.store.name().to_string(),
                ids: ids.to_vec(),
                source,
            })
    }

    pub async fn document_count(&self) -> Result<usize> {
        self.store
            .count()
            .await
            .map_err(|e| RagError::backend(self.store.name(), e))
    }

    pub async fn close(&self) -> Result<()> {
        self.store
            .close()
            .await
            .map_err(|e| RagError::backend(self.store.name(), e))
    }
}
