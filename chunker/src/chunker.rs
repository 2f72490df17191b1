use crate::config::ChunkerConfig;
use crate::error::Result;
use hybrid_rag_core::{Document, Metadata};
use log::debug;
use serde_json::Value;

/// Splits text into overlapping fixed-size chunks.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Id prefix used when callers have no natural one
    pub const DEFAULT_ID_PREFIX: &'static str = "chunk";

    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk `text` into documents with ids `"{id_prefix}-{index}"`.
    ///
    /// Surrounding whitespace is trimmed first; blank input yields no chunks.
    /// Each chunk's metadata is `base_metadata` plus `chunk_index` and
    /// `total_chunks`. Lengths are counted in characters.
    pub fn chunk(&self, text: &str, id_prefix: &str, base_metadata: &Metadata) -> Vec<Document> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every char, plus the end of the string.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = boundaries.len() - 1;

        let chunk_size = self.config.chunk_size;
        let step = self.config.step();

        let mut pieces = Vec::new();
        let mut start = 0;
        while start < char_count {
            let end = (start + chunk_size).min(char_count);
            pieces.push(&text[boundaries[start]..boundaries[end]]);
            start += step;
        }

        let total_chunks = pieces.len();
        debug!(
            "Chunked {char_count} chars into {total_chunks} chunks (size {chunk_size}, step {step})"
        );

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, piece)| {
                let mut metadata = base_metadata.clone();
                metadata.insert("chunk_index".to_string(), Value::from(index));
                metadata.insert("total_chunks".to_string(), Value::from(total_chunks));
                Document::new(format!("{id_prefix}-{index}"), piece).with_metadata(metadata)
            })
            .collect()
    }
}
