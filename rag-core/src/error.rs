use thiserror::Error;

/// Error type returned by capability backends. Each backend keeps its own
/// typed error and boxes it at the trait boundary.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Backend `{backend}` unavailable: {source}")]
    BackendUnavailable {
        backend: String,
        #[source]
        source: BackendError,
    },

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Document store `{store}` unavailable: {source}")]
    StoreUnavailable {
        store: String,
        #[source]
        source: BackendError,
    },

    #[error(
        "Document store `{store}` is out of sync: {} ids were removed from the index but not from the store: {source}",
        ids.len()
    )]
    Inconsistent {
        store: String,
        ids: Vec<String>,
        #[source]
        source: BackendError,
    },

    #[error("Unsupported backend `{backend}`: {reason}")]
    UnsupportedBackend { backend: String, reason: String },
}

impl RagError {
    pub fn backend(backend: impl Into<String>, source: impl Into<BackendError>) -> Self {
        Self::BackendUnavailable {
            backend: backend.into(),
            source: source.into(),
        }
    }

    pub fn store(store: impl Into<String>, source: impl Into<BackendError>) -> Self {
        Self::StoreUnavailable {
            store: store.into(),
            source: source.into(),
        }
    }

    /// The in-memory index and the durable store disagree after a delete.
    pub fn is_consistency_warning(&self) -> bool {
        matches!(self, Self::Inconsistent { .. })
    }

    /// Name of the backend or store that failed, if the error carries one.
    pub fn backend_name(&self) -> Option<&str> {
        match self {
            Self::BackendUnavailable { backend, .. } | Self::UnsupportedBackend { backend, .. } => {
                Some(backend)
            }
            Self::StoreUnavailable { store, .. } | Self::Inconsistent { store, .. } => Some(store),
            Self::Validation(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
