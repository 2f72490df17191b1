//! # Hybrid RAG Vector Store
//!
//! In-memory [`VectorStore`](hybrid_rag_core::VectorStore) backend with exact
//! cosine-similarity search, metadata filters and paged listing.
//!
//! ## Example
//!
//! ```no_run
//! use hybrid_rag_core::{Document, VectorStore};
//! use hybrid_rag_vector_store::InMemoryVectorStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let store = InMemoryVectorStore::new(3);
//!     store
//!         .upsert(&[Document::new("d1", "hello").with_embedding(vec![1.0, 0.0, 0.0])])
//!         .await?;
//!
//!     let results = store.search(&[1.0, 0.0, 0.0], 5, None).await?;
//!     println!("Found {} similar documents", results.len());
//!     Ok(())
//! }
//! ```

mod error;
mod store;

pub use error::VectorStoreError;
pub use store::InMemoryVectorStore;
