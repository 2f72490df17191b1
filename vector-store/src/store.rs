use crate::error::VectorStoreError;
use async_trait::async_trait;
use hybrid_rag_core::{
    BackendResult, Document, Metadata, ResultSource, SearchResult, VectorStore,
    sort_by_score_desc,
};
use indexmap::IndexMap;
use log::{debug, info};
use tokio::sync::RwLock;

/// In-memory vector store with exact cosine-similarity search.
///
/// Documents keep their first-insertion order; re-upserting an id replaces the
/// document in place.
pub struct InMemoryVectorStore {
    dimension: usize,
    documents: RwLock<IndexMap<String, Document>>,
}

impl InMemoryVectorStore {
    pub const NAME: &'static str = "in-memory";

    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            documents: RwLock::new(IndexMap::new()),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Stored copy of a document, embedding included.
    pub async fn get(&self, id: &str) -> Option<Document> {
        self.documents.read().await.get(id).cloned()
    }

    fn check_dimension(&self, id: &str, vector: &[f32]) -> Result<(), VectorStoreError> {
        if vector.len() != self.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                id: id.to_string(),
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn upsert(&self, documents: &[Document]) -> BackendResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        // Validate the whole batch before touching state.
        for doc in documents {
            let embedding = doc
                .embedding
                .as_deref()
                .ok_or_else(|| VectorStoreError::MissingEmbedding(doc.id.clone()))?;
            self.check_dimension(&doc.id, embedding)?;
        }

        info!("Adding {} documents to vector store", documents.len());

        let mut stored = self.documents.write().await;
        for doc in documents {
            stored.insert(doc.id.clone(), doc.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        filters: Option<&Metadata>,
    ) -> BackendResult<Vec<SearchResult>> {
        self.check_dimension("query", vector)?;

        let stored = self.documents.read().await;
        let mut results: Vec<SearchResult> = stored
            .values()
            .filter(|doc| doc.matches_filters(filters))
            .filter_map(|doc| {
                let embedding = doc.embedding.as_deref()?;
                let score = cosine_similarity(vector, embedding);
                Some(SearchResult::new(doc.clone(), score, ResultSource::Dense))
            })
            .collect();
        drop(stored);

        sort_by_score_desc(&mut results);
        results.truncate(top_k);

        debug!("Found {} dense results", results.len());
        Ok(results)
    }

    async fn delete(&self, ids: &[String]) -> BackendResult<()> {
        let mut stored = self.documents.write().await;
        let before = stored.len();
        for id in ids {
            stored.shift_remove(id);
        }
        debug!("Deleted {} documents from vector store", before - stored.len());
        Ok(())
    }

    async fn list_documents(&self, limit: usize, offset: usize) -> BackendResult<Vec<Document>> {
        let stored = self.documents.read().await;
        Ok(stored.values().skip(offset).take(limit).cloned().collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}
