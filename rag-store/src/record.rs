//! Core data models used by the library.

use doc_indexer::{Chunk, DocumentKind};
use serde::{Deserialize, Serialize};

/// One stored chunk: the text that was embedded plus where it came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RagRecord {
    pub text: String,
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentKind>,
    #[serde(default)]
    pub chunk_index: usize,
}

impl From<Chunk> for RagRecord {
    fn from(c: Chunk) -> Self {
        Self {
            text: c.text,
            source: Some(c.metadata.source),
            kind: Some(c.metadata.kind),
            chunk_index: c.chunk_index,
        }
    }
}

/// Query parameters for RAG retrieval.
pub struct RagQuery<'a> {
    pub text: &'a str,
    pub top_k: usize,
}

/// A single retrieval hit: distance score (lower is closer), text and source.
#[derive(Clone, Debug, PartialEq)]
pub struct RagHit {
    pub score: f32,
    pub text: String,
    pub source: Option<String>,
}
