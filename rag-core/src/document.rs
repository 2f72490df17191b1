use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form document metadata. Keys keep their insertion order.
pub type Metadata = serde_json::Map<String, Value>;

/// A unit of retrievable text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique within a store
    pub id: String,

    /// The text that gets embedded and keyword-indexed
    pub content: String,

    /// Opaque to the pipeline except for filter matching
    #[serde(default)]
    pub metadata: Metadata,

    /// Present only after the document went through an embedder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: Metadata::new(),
            embedding: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Copy of this document without its embedding.
    pub fn without_embedding(&self) -> Self {
        Self {
            embedding: None,
            ..self.clone()
        }
    }

    /// Length of the attached embedding, if any.
    pub fn embedding_dimension(&self) -> Option<usize> {
        self.embedding.as_ref().map(Vec::len)
    }

    /// True when every filter key is present in the metadata with an equal value.
    /// An absent or empty filter matches everything.
    pub fn matches_filters(&self, filters: Option<&Metadata>) -> bool {
        let Some(filters) = filters else {
            return true;
        };
        filters
            .iter()
            .all(|(key, expected)| self.metadata.get(key) == Some(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn metadata(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_filters_require_every_key() {
        let doc = Document::new("a", "alpha")
            .with_metadata(metadata(json!({"lang": "rust", "year": 2024})));

        assert!(doc.matches_filters(None));
        assert!(doc.matches_filters(Some(&Metadata::new())));
        assert!(doc.matches_filters(Some(&metadata(json!({"lang": "rust"})))));
        assert!(!doc.matches_filters(Some(&metadata(json!({"lang": "go"})))));
        assert!(!doc.matches_filters(Some(&metadata(
            json!({"lang": "rust", "missing": true})
        ))));
    }

    #[test]
    fn test_serde_skips_missing_embedding() {
        let doc = Document::new("a", "alpha");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json, json!({"id": "a", "content": "alpha", "metadata": {}}));

        let embedded = doc.with_embedding(vec![0.5, 1.0]);
        assert_eq!(embedded.embedding_dimension(), Some(2));
        assert_eq!(embedded.without_embedding().embedding, None);
    }
}
