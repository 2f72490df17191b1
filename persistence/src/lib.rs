//! # Hybrid RAG Persistence
//!
//! Durable storage for the hybrid retriever. [`PersistentRetriever`] saves
//! every ingested document with its embedding to a [`DocumentStore`] and
//! rebuilds the in-memory indexes from it at startup, so restarts never
//! re-embed the corpus.
//!
//! [`JsonDocumentStore`] keeps the documents in one versioned JSON file.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hybrid_rag_core::Document;
//! use hybrid_rag_embeddings::HashingEmbedder;
//! use hybrid_rag_persistence::{JsonDocumentStore, PersistentRetriever};
//! use hybrid_rag_retrieval::{Bm25Retriever, HybridRetriever};
//! use hybrid_rag_vector_store::InMemoryVectorStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let retriever = HybridRetriever::builder(
//!         Arc::new(HashingEmbedder::new(256)?),
//!         Arc::new(InMemoryVectorStore::new(256)),
//!     )
//!     .sparse_retriever(Arc::new(Bm25Retriever::default()))
//!     .build();
//!     let store = Arc::new(JsonDocumentStore::new(".hybrid-rag/documents.json"));
//!
//!     let persistent = PersistentRetriever::new(retriever, store);
//!     persistent.initialize().await?;
//!     persistent
//!         .ingest(&[Document::new("d1", "Python is great")])
//!         .await?;
//!     persistent.close().await?;
//!     Ok(())
//! }
//! ```

mod codec;
mod error;
mod json_store;
mod persistent;
mod store;

pub use error::{DocumentStoreError, Result};
pub use json_store::JsonDocumentStore;
pub use persistent::PersistentRetriever;
pub use store::DocumentStore;
