use async_trait::async_trait;
use hybrid_rag_core::{BackendResult, Document};

/// Durable home for documents and their embeddings.
///
/// The in-memory indexes are rebuilt from [`DocumentStore::load_all`] at
/// startup, so `save` must keep whatever embedding a document carries.
/// Every operation other than `initialize` and `close` fails until
/// `initialize` has succeeded.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &str;

    /// Open the store, creating its backing storage when missing.
    async fn initialize(&self) -> BackendResult<()>;

    /// Upsert by id. Re-saving an id keeps its original position in
    /// [`DocumentStore::load_all`].
    async fn save(&self, documents: &[Document]) -> BackendResult<()>;

    /// Every stored document, in first-insertion order.
    async fn load_all(&self) -> BackendResult<Vec<Document>>;

    /// Remove `ids`; unknown ids are ignored.
    async fn delete(&self, ids: &[String]) -> BackendResult<()>;

    async fn count(&self) -> BackendResult<usize>;

    /// Release resources. Safe to call more than once.
    async fn close(&self) -> BackendResult<()>;
}
