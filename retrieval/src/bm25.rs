use async_trait::async_trait;
use hybrid_rag_core::{
    BackendResult, Document, Metadata, ResultSource, SearchResult, SparseRetriever,
    sort_by_score_desc,
};
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

const STOP_WORDS: &[&str] = &[
    "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it", "no",
    "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these", "they",
    "this", "to", "was", "will", "with",
];

/// BM25 Okapi parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Config {
    /// Term-frequency saturation
    #[serde(default = "default_k1")]
    pub k1: f32,

    /// Document-length normalisation, in [0.0, 1.0]
    #[serde(default = "default_b")]
    pub b: f32,
}

fn default_k1() -> f32 {
    1.5
}

fn default_b() -> f32 {
    0.75
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self {
            k1: default_k1(),
            b: default_b(),
        }
    }
}

impl Bm25Config {
    pub fn validate(&self) -> Result<(), String> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(format!("k1 must be >= 0, got {}", self.k1));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(format!("b must be in [0.0, 1.0], got {}", self.b));
        }
        Ok(())
    }
}

/// Lowercase alphanumeric terms, dropping single characters and stop words.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() > 1)
        .map(str::to_lowercase)
        .filter(|term| !STOP_WORDS.contains(&term.as_str()))
        .collect()
}

#[derive(Default)]
struct Bm25Index {
    documents: IndexMap<String, Document>,
    /// Per-slot term frequencies, parallel to `documents`
    term_frequencies: Vec<HashMap<String, u32>>,
    doc_lengths: Vec<usize>,
    /// term -> number of documents containing it
    document_frequency: HashMap<String, usize>,
    average_length: f32,
}

impl Bm25Index {
    fn rebuild(&mut self) {
        self.term_frequencies.clear();
        self.doc_lengths.clear();
        self.document_frequency.clear();

        for doc in self.documents.values() {
            let tokens = tokenize(&doc.content);
            let mut frequencies: HashMap<String, u32> = HashMap::new();
            for token in &tokens {
                *frequencies.entry(token.clone()).or_default() += 1;
            }
            for term in frequencies.keys() {
                *self.document_frequency.entry(term.clone()).or_default() += 1;
            }
            self.doc_lengths.push(tokens.len());
            self.term_frequencies.push(frequencies);
        }

        let total: usize = self.doc_lengths.iter().sum();
        self.average_length = if self.doc_lengths.is_empty() {
            0.0
        } else {
            total as f32 / self.doc_lengths.len() as f32
        };
    }

    fn score(&self, query_terms: &[String], slot: usize, config: &Bm25Config) -> f32 {
        let n = self.documents.len() as f32;
        let dl = self.doc_lengths[slot] as f32;
        // Guards the all-empty corpus; the tf check below skips it anyway.
        let avgdl = self.average_length.max(f32::EPSILON);
        let frequencies = &self.term_frequencies[slot];

        query_terms
            .iter()
            .filter_map(|term| {
                let tf = *frequencies.get(term)? as f32;
                let df = *self.document_frequency.get(term)? as f32;
                // IDF: ln((N - df + 0.5) / (df + 0.5) + 1), always positive
                let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
                let length_norm = 1.0 - config.b + config.b * dl / avgdl;
                let tf_norm = (tf * (config.k1 + 1.0)) / (tf + config.k1 * length_norm);
                Some(idf * tf_norm)
            })
            .sum()
    }
}

/// In-memory BM25 keyword retriever.
///
/// Index statistics are rebuilt from scratch on every `index` and `delete`.
pub struct Bm25Retriever {
    config: Bm25Config,
    index: RwLock<Bm25Index>,
}

impl Bm25Retriever {
    pub const NAME: &'static str = "bm25";

    pub fn new(config: Bm25Config) -> Self {
        Self {
            config,
            index: RwLock::new(Bm25Index::default()),
        }
    }

    pub fn config(&self) -> &Bm25Config {
        &self.config
    }

    /// Number of indexed documents
    pub async fn len(&self) -> usize {
        self.index.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.index.read().await.documents.is_empty()
    }
}

impl Default for Bm25Retriever {
    fn default() -> Self {
        Self::new(Bm25Config::default())
    }
}

#[async_trait]
impl SparseRetriever for Bm25Retriever {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn index(&self, documents: &[Document]) -> BackendResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut index = self.index.write().await;
        for doc in documents {
            index.documents.insert(doc.id.clone(), doc.without_embedding());
        }
        index.rebuild();

        info!(
            "Indexed {} documents for BM25 ({} total)",
            documents.len(),
            index.documents.len()
        );
        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        top_k: usize,
        filters: Option<&Metadata>,
    ) -> BackendResult<Vec<SearchResult>> {
        let query_terms = tokenize(query);
        let index = self.index.read().await;
        if query_terms.is_empty() || index.documents.is_empty() {
            return Ok(Vec::new());
        }

        let mut results: Vec<SearchResult> = index
            .documents
            .values()
            .enumerate()
            .filter(|(_, doc)| doc.matches_filters(filters))
            .filter_map(|(slot, doc)| {
                let score = index.score(&query_terms, slot, &self.config);
                (score > 0.0).then(|| SearchResult::new(doc.clone(), score, ResultSource::Sparse))
            })
            .collect();
        drop(index);

        sort_by_score_desc(&mut results);
        results.truncate(top_k);

        debug!("Found {} sparse results", results.len());
        Ok(results)
    }

    async fn delete(&self, ids: &[String]) -> BackendResult<()> {
        let mut index = self.index.write().await;
        let before = index.documents.len();
        for id in ids {
            index.documents.shift_remove(id);
        }
        if index.documents.len() != before {
            index.rebuild();
        }
        debug!("Deleted {} documents from BM25 index", before - index.documents.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new("0", "rust programming systems language fast"),
            Document::new("1", "python programming scripting easy"),
            Document::new("2", "java enterprise programming verbose"),
            Document::new("3", "rust memory safety zero cost abstractions"),
        ]
    }

    async fn retriever() -> Bm25Retriever {
        let retriever = Bm25Retriever::default();
        retriever.index(&corpus()).await.unwrap();
        retriever
    }

    fn ids(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(SearchResult::id).collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("The Quick-brown fox, a DOG!"),
            vec!["quick", "brown", "fox", "dog"]
        );
    }

    #[tokio::test]
    async fn test_finds_matching_documents() {
        let retriever = retriever().await;
        let results = retriever.search("rust", 10, None).await.unwrap();

        let mut found = ids(&results);
        found.sort_unstable();
        assert_eq!(found, vec!["0", "3"]);
        assert!(results.iter().all(|r| r.source == ResultSource::Sparse));
        assert!(results.iter().all(|r| r.score > 0.0));
    }

    #[tokio::test]
    async fn test_higher_term_frequency_ranks_first() {
        let retriever = Bm25Retriever::default();
        retriever
            .index(&[
                Document::new("many", "rust rust rust"),
                Document::new("once", "rust programming"),
            ])
            .await
            .unwrap();

        let results = retriever.search("rust", 10, None).await.unwrap();
        assert_eq!(ids(&results), vec!["many", "once"]);
    }

    #[tokio::test]
    async fn test_excludes_non_matching_and_truncates() {
        let retriever = retriever().await;
        assert!(retriever.search("nonexistent", 10, None).await.unwrap().is_empty());
        assert!(retriever.search("", 10, None).await.unwrap().is_empty());

        let results = retriever.search("programming", 2, None).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_rebuilds_index() {
        let retriever = retriever().await;
        retriever
            .delete(&["0".to_string(), "unknown".to_string()])
            .await
            .unwrap();

        assert_eq!(retriever.len().await, 3);
        let results = retriever.search("rust", 10, None).await.unwrap();
        assert_eq!(ids(&results), vec!["3"]);
    }

    #[tokio::test]
    async fn test_reindex_replaces_document() {
        let retriever = retriever().await;
        retriever
            .index(&[Document::new("3", "gardening tips")])
            .await
            .unwrap();

        assert_eq!(retriever.len().await, 4);
        let results = retriever.search("rust", 10, None).await.unwrap();
        assert_eq!(ids(&results), vec!["0"]);
    }

    #[tokio::test]
    async fn test_filters() {
        let retriever = Bm25Retriever::default();
        let tagged = |id: &str, lang: &str| {
            Document::new(id, "shared keyword")
                .with_metadata(json!({ "lang": lang }).as_object().cloned().unwrap())
        };
        retriever
            .index(&[tagged("a", "en"), tagged("b", "de")])
            .await
            .unwrap();

        let filters = json!({"lang": "de"}).as_object().cloned().unwrap();
        let results = retriever.search("keyword", 10, Some(&filters)).await.unwrap();
        assert_eq!(ids(&results), vec!["b"]);
    }

    #[test]
    fn test_config_validation() {
        assert!(Bm25Config::default().validate().is_ok());
        assert!(Bm25Config { k1: -1.0, b: 0.5 }.validate().is_err());
        assert!(Bm25Config { k1: 1.2, b: 1.5 }.validate().is_err());
    }
}
