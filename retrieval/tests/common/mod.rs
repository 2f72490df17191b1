#![allow(dead_code)]

use async_trait::async_trait;
use hybrid_rag_core::{
    BackendResult, Document, Embedder, Metadata, Reranker, ResultSource, SearchResult,
    SparseRetriever, VectorStore,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Embeds every text as `[len, 0.1, 0.2]`.
#[derive(Default)]
pub struct StubEmbedder {
    pub calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    fn name(&self) -> &str {
        "stub-embedder"
    }

    fn dimension(&self) -> usize {
        3
    }

    async fn embed(&self, texts: &[String]) -> BackendResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| vec![text.chars().count() as f32, 0.1, 0.2])
            .collect())
    }
}

/// Embedder that always fails.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    fn name(&self) -> &str {
        "failing-embedder"
    }

    fn dimension(&self) -> usize {
        3
    }

    async fn embed(&self, _texts: &[String]) -> BackendResult<Vec<Vec<f32>>> {
        Err("model server unreachable".into())
    }
}

/// Embedder that drops the last vector of every batch.
pub struct ShortEmbedder;

#[async_trait]
impl Embedder for ShortEmbedder {
    fn name(&self) -> &str {
        "short-embedder"
    }

    fn dimension(&self) -> usize {
        3
    }

    async fn embed(&self, texts: &[String]) -> BackendResult<Vec<Vec<f32>>> {
        Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0, 0.0]).collect())
    }
}

/// Returns stored documents in insertion order with scores 1.0, 0.9, ...
#[derive(Default)]
pub struct StubVectorStore {
    pub docs: Mutex<Vec<Document>>,
    pub upsert_calls: AtomicUsize,
}

impl StubVectorStore {
    pub fn stored(&self) -> Vec<Document> {
        self.docs.lock().unwrap().clone()
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for StubVectorStore {
    fn name(&self) -> &str {
        "stub-vector-store"
    }

    async fn upsert(&self, documents: &[Document]) -> BackendResult<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock().unwrap();
        for doc in documents {
            match docs.iter_mut().find(|stored| stored.id == doc.id) {
                Some(stored) => *stored = doc.clone(),
                None => docs.push(doc.clone()),
            }
        }
        Ok(())
    }

    async fn search(
        &self,
        _vector: &[f32],
        top_k: usize,
        filters: Option<&Metadata>,
    ) -> BackendResult<Vec<SearchResult>> {
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .iter()
            .filter(|doc| doc.matches_filters(filters))
            .take(top_k)
            .enumerate()
            .map(|(i, doc)| SearchResult::new(doc.clone(), 1.0 - i as f32 * 0.1, ResultSource::Dense))
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> BackendResult<()> {
        self.docs.lock().unwrap().retain(|doc| !ids.contains(&doc.id));
        Ok(())
    }
}

/// Case-insensitive substring match with a flat 0.8 score.
#[derive(Default)]
pub struct StubSparseRetriever {
    pub docs: Mutex<Vec<Document>>,
    pub index_calls: AtomicUsize,
}

impl StubSparseRetriever {
    pub fn stored(&self) -> Vec<Document> {
        self.docs.lock().unwrap().clone()
    }

    pub fn index_calls(&self) -> usize {
        self.index_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SparseRetriever for StubSparseRetriever {
    fn name(&self) -> &str {
        "stub-sparse"
    }

    async fn index(&self, documents: &[Document]) -> BackendResult<()> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock().unwrap();
        for doc in documents {
            docs.retain(|stored| stored.id != doc.id);
            docs.push(doc.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        top_k: usize,
        filters: Option<&Metadata>,
    ) -> BackendResult<Vec<SearchResult>> {
        let query = query.to_lowercase();
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .iter()
            .filter(|doc| doc.matches_filters(filters))
            .filter(|doc| doc.content.to_lowercase().contains(&query))
            .take(top_k)
            .map(|doc| SearchResult::new(doc.clone(), 0.8, ResultSource::Sparse))
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> BackendResult<()> {
        self.docs.lock().unwrap().retain(|doc| !ids.contains(&doc.id));
        Ok(())
    }
}

/// Adds 0.05 to every score and tags results as reranked.
#[derive(Default)]
pub struct StubReranker {
    pub calls: AtomicUsize,
    pub last_top_k: AtomicUsize,
}

impl StubReranker {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_top_k(&self) -> usize {
        self.last_top_k.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reranker for StubReranker {
    fn name(&self) -> &str {
        "stub-reranker"
    }

    async fn rerank(
        &self,
        _query: &str,
        results: Vec<SearchResult>,
        top_k: usize,
    ) -> BackendResult<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_top_k.store(top_k, Ordering::SeqCst);
        let mut reranked: Vec<SearchResult> = results
            .into_iter()
            .take(top_k)
            .map(|r| SearchResult::new(r.document, r.score + 0.05, ResultSource::Reranked))
            .collect();
        reranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(reranked)
    }
}

/// Ignores the contract: returns everything, ascending, with the original source.
pub struct SloppyReranker;

#[async_trait]
impl Reranker for SloppyReranker {
    fn name(&self) -> &str {
        "sloppy-reranker"
    }

    async fn rerank(
        &self,
        _query: &str,
        mut results: Vec<SearchResult>,
        _top_k: usize,
    ) -> BackendResult<Vec<SearchResult>> {
        results.reverse();
        Ok(results)
    }
}

pub fn sample_docs() -> Vec<Document> {
    vec![
        Document::new("d1", "Python is great"),
        Document::new("d2", "FastAPI is fast"),
        Document::new("d3", "Pydantic validates data"),
    ]
}

pub fn ids(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(SearchResult::id).collect()
}

/// Vector store, sparse retriever and reranker that fail on every call.
pub struct Unavailable(pub &'static str);

#[async_trait]
impl VectorStore for Unavailable {
    fn name(&self) -> &str {
        self.0
    }

    async fn upsert(&self, _documents: &[Document]) -> BackendResult<()> {
        Err("upsert refused".into())
    }

    async fn search(
        &self,
        _vector: &[f32],
        _top_k: usize,
        _filters: Option<&Metadata>,
    ) -> BackendResult<Vec<SearchResult>> {
        Err("search timed out".into())
    }

    async fn delete(&self, _ids: &[String]) -> BackendResult<()> {
        Err("delete refused".into())
    }
}

#[async_trait]
impl SparseRetriever for Unavailable {
    fn name(&self) -> &str {
        self.0
    }

    async fn index(&self, _documents: &[Document]) -> BackendResult<()> {
        Err("index refused".into())
    }

    async fn search(
        &self,
        _query: &str,
        _top_k: usize,
        _filters: Option<&Metadata>,
    ) -> BackendResult<Vec<SearchResult>> {
        Err("search timed out".into())
    }

    async fn delete(&self, _ids: &[String]) -> BackendResult<()> {
        Err("delete refused".into())
    }
}

#[async_trait]
impl Reranker for Unavailable {
    fn name(&self) -> &str {
        self.0
    }

    async fn rerank(
        &self,
        _query: &str,
        _results: Vec<SearchResult>,
        _top_k: usize,
    ) -> BackendResult<Vec<SearchResult>> {
        Err("model not loaded".into())
    }
}
