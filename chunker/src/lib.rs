//! # Hybrid RAG Chunker
//!
//! Fixed-size, overlapping text chunking. Each chunk becomes a
//! [`Document`](hybrid_rag_core::Document) ready for ingestion.
//!
//! ```text
//! |<------ chunk_size ------>|
//! [ chunk 0                  ]
//!                  [ chunk 1                  ]
//! |<--- step --->|<-overlap->|
//! ```
//!
//! ## Example
//!
//! ```
//! use hybrid_rag_chunker::{Chunker, ChunkerConfig};
//! use hybrid_rag_core::Metadata;
//!
//! # fn main() -> Result<(), hybrid_rag_chunker::ChunkerError> {
//! let chunker = Chunker::new(ChunkerConfig::new(100, 20))?;
//! let docs = chunker.chunk(&"Hello world. ".repeat(50), "greeting", &Metadata::new());
//! assert_eq!(docs[0].id, "greeting-0");
//! # Ok(())
//! # }
//! ```

mod chunker;
mod config;
mod error;

pub use chunker::Chunker;
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
