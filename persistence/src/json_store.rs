use crate::codec::{decode_embedding, encode_embedding};
use crate::error::{DocumentStoreError, Result};
use crate::store::DocumentStore;
use async_trait::async_trait;
use hybrid_rag_core::{BackendResult, Document, Metadata};
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

type Documents = IndexMap<String, Document>;

/// On-disk layout of the store file
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// Version of the file format
    version: u32,

    /// Documents in first-insertion order
    documents: Vec<StoredDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    id: String,
    content: String,
    #[serde(default)]
    metadata: Metadata,
    /// Base64 of the little-endian `f32` bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    embedding: Option<String>,
}

impl From<&Document> for StoredDocument {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            content: doc.content.clone(),
            metadata: doc.metadata.clone(),
            embedding: doc.embedding.as_deref().map(encode_embedding),
        }
    }
}

impl TryFrom<StoredDocument> for Document {
    type Error = DocumentStoreError;

    fn try_from(stored: StoredDocument) -> Result<Self> {
        let embedding = stored
            .embedding
            .map(|encoded| decode_embedding(&encoded))
            .transpose()
            .map_err(|reason| DocumentStoreError::InvalidEmbedding {
                id: stored.id.clone(),
                reason,
            })?;
        Ok(Document {
            id: stored.id,
            content: stored.content,
            metadata: stored.metadata,
            embedding,
        })
    }
}

/// Single-file JSON [`DocumentStore`].
///
/// The whole document set is held in memory and rewritten on every change
/// through a temporary file and a rename, so a crash mid-write leaves the
/// previous file intact.
pub struct JsonDocumentStore {
    path: PathBuf,
    /// `None` until `initialize`, and again after `close`
    documents: Mutex<Option<Documents>>,
}

impl JsonDocumentStore {
    pub const NAME: &'static str = "json";
    const CURRENT_VERSION: u32 = 1;

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            documents: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&self) -> Result<()> {
        let mut state = self.documents.lock().await;
        if state.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let documents = match fs::read_to_string(&self.path).await {
            Ok(content) => Self::parse(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let documents = Documents::new();
                self.write(&documents).await?;
                documents
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "Opened document store {} ({} documents)",
            self.path.display(),
            documents.len()
        );
        *state = Some(documents);
        Ok(())
    }

    fn parse(content: &str) -> Result<Documents> {
        let file: StoreFile = serde_json::from_str(content)?;
        if file.version != Self::CURRENT_VERSION {
            return Err(DocumentStoreError::VersionMismatch {
                found: file.version,
                expected: Self::CURRENT_VERSION,
            });
        }

        let mut documents = Documents::with_capacity(file.documents.len());
        for stored in file.documents {
            let doc = Document::try_from(stored)?;
            documents.insert(doc.id.clone(), doc);
        }
        Ok(documents)
    }

    async fn write(&self, documents: &Documents) -> Result<()> {
        let file = StoreFile {
            version: Self::CURRENT_VERSION,
            documents: documents.values().map(StoredDocument::from).collect(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let mut tmp_path = OsString::from(self.path.as_os_str());
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    async fn upsert(&self, documents: &[Document]) -> Result<()> {
        let mut state = self.documents.lock().await;
        let current = state.as_mut().ok_or(DocumentStoreError::NotInitialized)?;
        if documents.is_empty() {
            return Ok(());
        }

        // Only swap in the new set once it is on disk.
        let mut next = current.clone();
        for doc in documents {
            next.insert(doc.id.clone(), doc.clone());
        }
        self.write(&next).await?;
        *current = next;

        debug!("Saved {} documents to {}", documents.len(), self.path.display());
        Ok(())
    }

    async fn remove(&self, ids: &[String]) -> Result<()> {
        let mut state = self.documents.lock().await;
        let current = state.as_mut().ok_or(DocumentStoreError::NotInitialized)?;
        if !ids.iter().any(|id| current.contains_key(id)) {
            return Ok(());
        }

        let mut next = current.clone();
        for id in ids {
            next.shift_remove(id);
        }
        self.write(&next).await?;

        debug!(
            "Deleted {} documents from {}",
            current.len() - next.len(),
            self.path.display()
        );
        *current = next;
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<Document>> {
        let state = self.documents.lock().await;
        let current = state.as_ref().ok_or(DocumentStoreError::NotInitialized)?;
        Ok(current.values().cloned().collect())
    }

    async fn len(&self) -> Result<usize> {
        let state = self.documents.lock().await;
        state
            .as_ref()
            .map(IndexMap::len)
            .ok_or(DocumentStoreError::NotInitialized)
    }
}

#[async_trait]
impl DocumentStore for JsonDocumentStore {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn initialize(&self) -> BackendResult<()> {
        self.open().await.map_err(Into::into)
    }

    async fn save(&self, documents: &[Document]) -> BackendResult<()> {
        self.upsert(documents).await.map_err(Into::into)
    }

    async fn load_all(&self) -> BackendResult<Vec<Document>> {
        self.snapshot().await.map_err(Into::into)
    }

    async fn delete(&self, ids: &[String]) -> BackendResult<()> {
        self.remove(ids).await.map_err(Into::into)
    }

    async fn count(&self) -> BackendResult<usize> {
        self.len().await.map_err(Into::into)
    }

    async fn close(&self) -> BackendResult<()> {
        self.documents.lock().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(id: &str, content: &str, embedding: Vec<f32>) -> Document {
        Document::new(id, content).with_embedding(embedding)
    }

    fn not_initialized(err: hybrid_rag_core::BackendError) -> bool {
        matches!(
            err.downcast_ref::<DocumentStoreError>(),
            Some(DocumentStoreError::NotInitialized)
        )
    }

    #[tokio::test]
    async fn test_operations_require_initialize() {
        let dir = TempDir::new().unwrap();
        let store = JsonDocumentStore::new(dir.path().join("docs.json"));

        assert!(not_initialized(store.save(&[]).await.unwrap_err()));
        assert!(not_initialized(store.load_all().await.unwrap_err()));
        assert!(not_initialized(store.count().await.unwrap_err()));
        assert!(not_initialized(store.delete(&[]).await.unwrap_err()));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_initialize_creates_file_and_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("docs.json");
        let store = JsonDocumentStore::new(&path);

        store.initialize().await.unwrap();
        // Idempotent.
        store.initialize().await.unwrap();

        assert!(path.exists());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), json!("notes.md"));
        let first = doc("a", "alpha", vec![0.1, 0.2, 0.3]).with_metadata(metadata);
        let second = Document::new("b", "beta");

        let store = JsonDocumentStore::new(&path);
        store.initialize().await.unwrap();
        store.save(&[first.clone(), second.clone()]).await.unwrap();
        store.close().await.unwrap();
        assert!(not_initialized(store.count().await.unwrap_err()));

        let reopened = JsonDocumentStore::new(&path);
        reopened.initialize().await.unwrap();
        assert_eq!(reopened.load_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_upsert_keeps_first_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = JsonDocumentStore::new(dir.path().join("docs.json"));
        store.initialize().await.unwrap();

        store
            .save(&[doc("a", "one", vec![1.0]), doc("b", "two", vec![2.0])])
            .await
            .unwrap();
        store.save(&[doc("a", "one, revised", vec![3.0])]).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        let ids: Vec<&str> = loaded.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(loaded[0].content, "one, revised");
        assert_eq!(loaded[0].embedding, Some(vec![3.0]));
    }

    #[tokio::test]
    async fn test_delete_ignores_unknown_ids() {
        let dir = TempDir::new().unwrap();
        let store = JsonDocumentStore::new(dir.path().join("docs.json"));
        store.initialize().await.unwrap();
        store
            .save(&[doc("a", "one", vec![1.0]), doc("b", "two", vec![2.0])])
            .await
            .unwrap();

        store
            .delete(&["a".to_string(), "missing".to_string()])
            .await
            .unwrap();
        store.delete(&["missing".to_string()]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.load_all().await.unwrap()[0].id, "b");
    }

    #[tokio::test]
    async fn test_rejects_unknown_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, r#"{"version": 99, "documents": []}"#).unwrap();

        let store = JsonDocumentStore::new(&path);
        let err = store.initialize().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DocumentStoreError>(),
            Some(DocumentStoreError::VersionMismatch {
                found: 99,
                expected: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_rejects_corrupt_embedding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(
            &path,
            r#"{"version": 1, "documents": [{"id": "a", "content": "x", "embedding": "AAA="}]}"#,
        )
        .unwrap();

        let store = JsonDocumentStore::new(&path);
        let err = store.initialize().await.unwrap_err();
        assert!(err.to_string().contains("document `a`"));
    }
}
