/*!
# Hybrid RAG Retrieval

Hybrid retrieval pipeline combining:
- **Dense search** over a [`VectorStore`](hybrid_rag_core::VectorStore) with query embeddings
- **Sparse search** via in-memory BM25 ([`Bm25Retriever`])
- **Weighted Reciprocal Rank Fusion** ([`reciprocal_rank_fusion`])
- **Reranking** ([`LexicalReranker`], or a fastembed cross-encoder with the
  `fastembed` feature)

## Architecture

```text
Query
  ├─> Embedder ─> Dense search (dense_top_k)
  │                    └─> ranked list ─┐
  ├─> Sparse search (sparse_top_k)      │
  │        └─> ranked list ─────────────┤
  │                                     └─> RRF (dense first, then sparse)
  │                                           └─> Reranker / cut to cap
  └───────────────────────────────────────────────> final top_k
```

## Example

```rust,no_run
use std::sync::Arc;
use hybrid_rag_core::{Document, RagConfig};
use hybrid_rag_embeddings::HashingEmbedder;
use hybrid_rag_retrieval::{Bm25Retriever, HybridRetriever, LexicalReranker};
use hybrid_rag_vector_store::InMemoryVectorStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let retriever = HybridRetriever::builder(
        Arc::new(HashingEmbedder::new(256)?),
        Arc::new(InMemoryVectorStore::new(256)),
    )
    .sparse_retriever(Arc::new(Bm25Retriever::default()))
    .reranker(Arc::new(LexicalReranker::new()))
    .config(RagConfig::builder().rerank_top_k(3).build()?)
    .build();

    retriever
        .ingest(&[Document::new("d1", "Python is great")])
        .await?;
    for (i, result) in retriever.retrieve("python", None, None).await?.iter().enumerate() {
        println!("{}. {} (score: {:.3})", i + 1, result.document.id, result.score);
    }
    Ok(())
}
```
*/

mod bm25;
mod config;
#[cfg(feature = "fastembed")]
mod cross_encoder;
mod error;
mod fusion;
mod rerank;
mod retrieval;

pub use bm25::{Bm25Config, Bm25Retriever};
pub use config::{
    FastEmbedRerankerConfig, RerankerConfig, RerankerModelType, SparseConfig, build_reranker,
    build_sparse_retriever,
};
#[cfg(feature = "fastembed")]
pub use cross_encoder::FastEmbedReranker;
pub use error::RerankError;
pub use fusion::{RRF_K, reciprocal_rank_fusion};
pub use retrieval::{HybridRetriever, HybridRetrieverBuilder};
pub use rerank::LexicalReranker;
