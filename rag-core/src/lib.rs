//! # Hybrid RAG Core
//!
//! Shared vocabulary of the hybrid retrieval pipeline: the document and
//! result model, the pipeline configuration, the error type and the four
//! capability traits every backend implements.
//!
//! ```text
//!            ┌──────────┐
//! text ────> │ Embedder │ ──> vectors ──> VectorStore ──┐
//!            └──────────┘                               ├──> fusion ──> Reranker ──> results
//! text ──────────────────────────────> SparseRetriever ─┘
//! ```
//!
//! Backends return [`BackendResult`]; the pipeline wraps failures into
//! [`RagError`] together with the backend's name.

mod config;
mod document;
mod error;
mod result;
mod traits;

pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Document, Metadata};
pub use error::{BackendError, BackendResult, RagError, Result};
pub use result::{ResultSource, SearchResult, sort_by_score_desc};
pub use traits::{Embedder, Reranker, SparseRetriever, VectorStore};
