use crate::error::EmbeddingError;
use async_trait::async_trait;
use hybrid_rag_core::{BackendResult, Embedder};
use log::debug;
use std::collections::HashMap;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Deterministic feature-hashing embedder.
///
/// Terms are hashed into `dimension` buckets with FNV-1a and weighted by
/// log-scaled term frequency; the vector is L2 normalised so a dot product is
/// a cosine similarity. Needs no model files, which makes it the offline
/// default and a predictable backend for tests.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub const NAME: &'static str = "hashing";

    /// Fails with [`EmbeddingError::InvalidConfig`] when `dimension` is 0.
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "hashing embedder dimension must be greater than 0".to_string(),
            ));
        }
        debug!("Hashing embedder with {dimension} buckets");
        Ok(Self { dimension })
    }

    fn bucket(&self, term: &str) -> usize {
        let mut hash = FNV_OFFSET_BASIS;
        for byte in term.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        (hash % self.dimension as u64) as usize
    }

    /// Embed one text synchronously.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for term in tokenize(text) {
            *counts.entry(term).or_default() += 1;
        }

        let mut vector = vec![0.0f32; self.dimension];
        for (term, count) in &counts {
            vector[self.bucket(term)] += 1.0 + (*count as f32).ln();
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

/// Lowercase alphanumeric terms of at least two characters.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() >= 2)
        .map(str::to_lowercase)
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> BackendResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
