//! # Hybrid RAG Embeddings
//!
//! [`Embedder`](hybrid_rag_core::Embedder) backends.
//!
//! - [`HashingEmbedder`]: FNV-1a feature hashing, no model files, always built
//! - `FastEmbedEmbedder`: local ONNX models via fastembed-rs, behind the
//!   `fastembed` cargo feature, with Matryoshka truncation to the configured
//!   dimension
//!
//! Use [`build_embedder`] to construct one from an [`EmbedderConfig`].
//!
//! ## Example
//!
//! ```no_run
//! use hybrid_rag_embeddings::{EmbedderConfig, build_embedder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let embedder = build_embedder(&EmbedderConfig::default()).await?;
//!     let vectors = embedder.embed(&["fn main() {}".to_string()]).await?;
//!     println!("Generated {} embeddings", vectors.len());
//!     Ok(())
//! }
//! ```

mod config;
mod error;
#[cfg(feature = "fastembed")]
mod fastembed_embedder;
mod hashing;

pub use config::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_HASHING_DIM, EmbedderConfig, EmbeddingModelType,
    FastEmbedConfig, build_embedder,
};
pub use error::EmbeddingError;
#[cfg(feature = "fastembed")]
pub use fastembed_embedder::FastEmbedEmbedder;
pub use hashing::HashingEmbedder;
