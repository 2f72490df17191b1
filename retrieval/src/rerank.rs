use crate::bm25::tokenize;
use async_trait::async_trait;
use hybrid_rag_core::{BackendResult, Reranker, ResultSource, SearchResult, sort_by_score_desc};
use log::debug;
use std::collections::HashSet;

/// Reranker that boosts candidates by how well their text covers the query.
///
/// The incoming (fused) score is multiplied by a boost built from the share of
/// query terms present in the document and an exact-phrase bonus, so the
/// first-stage ranking still dominates when the text gives no extra signal.
#[derive(Debug, Clone, Default)]
pub struct LexicalReranker;

impl LexicalReranker {
    pub const NAME: &'static str = "lexical";

    pub fn new() -> Self {
        Self
    }

    fn extract_features(
        query: &str,
        query_terms: &HashSet<String>,
        result: &SearchResult,
    ) -> LexicalFeatures {
        let content_lower = result.document.content.to_lowercase();
        let content_terms: HashSet<String> = tokenize(&content_lower).into_iter().collect();

        let coverage = if query_terms.is_empty() {
            0.0
        } else {
            query_terms.intersection(&content_terms).count() as f32 / query_terms.len() as f32
        };

        LexicalFeatures {
            exact_match: !query.is_empty() && content_lower.contains(query),
            coverage,
        }
    }

    fn calculate_boost(features: &LexicalFeatures) -> f32 {
        let mut boost = 1.0 + 0.5 * features.coverage;
        if features.exact_match {
            boost *= 1.3;
        }
        boost
    }
}

#[derive(Debug)]
struct LexicalFeatures {
    exact_match: bool,
    /// Fraction of distinct query terms found in the document, in [0, 1]
    coverage: f32,
}

#[async_trait]
impl Reranker for LexicalReranker {
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
        debug!("Lexical reranking {} results", results.len());

        let query_lower = query.trim().to_lowercase();
        let query_terms: HashSet<String> = tokenize(&query_lower).into_iter().collect();

        let mut reranked: Vec<SearchResult> = results
            .into_iter()
            .map(|result| {
                let features = Self::extract_features(&query_lower, &query_terms, &result);
                let score = result.score * Self::calculate_boost(&features);
                SearchResult::new(result.document, score, ResultSource::Reranked)
            })
            .collect();

        sort_by_score_desc(&mut reranked);
        reranked.truncate(top_k);
        Ok(reranked)
    }
}
