use crate::document::Document;
use serde::{Deserialize, Serialize};

/// Which stage produced a result's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// Vector similarity search
    Dense,
    /// Keyword relevance search
    Sparse,
    /// Re-scored by a reranker
    Reranked,
}

impl ResultSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultSource::Dense => "dense",
            ResultSource::Sparse => "sparse",
            ResultSource::Reranked => "reranked",
        }
    }
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored document. Higher scores are more relevant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub document: Document,
    pub score: f32,
    pub source: ResultSource,
}

impl SearchResult {
    pub fn new(document: Document, score: f32, source: ResultSource) -> Self {
        Self {
            document,
            score,
            source,
        }
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }
}

/// Stable sort by score, highest first. Ties keep their incoming order and
/// NaN scores sink to the end.
pub fn sort_by_score_desc(results: &mut [SearchResult]) {
    results.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
        (false, false) => b.score.total_cmp(&a.score),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    });
}
