//! High-level RAG facade: ingestion into and retrieval from a local LanceDB index.
//!
//! This crate provides a small API to:
//! - Load a folder of documents, chunk and embed them, and persist the index
//! - Load the persisted index and retrieve top-K context for a textual query
//!
//! The design is flat (no deep nesting) and splits responsibilities into focused modules.

mod config;
pub mod embed;
mod errors;
mod index;
mod ingest;
mod progress;
mod record;
mod retrieve;

pub use config::{DEFAULT_EMBED_BATCH, DEFAULT_INDEX_DIR, DistanceKind, RagConfig};
pub use embed::{EmbedFuture, EmbeddingsProvider, llm_embedder::LlmEmbedder};
pub use errors::{RagError, Result};
pub use index::VectorIndex;
pub use ingest::{IngestReport, build_index, ingest_folder};
pub use progress::{IndicatifProgress, NoopProgress, Progress};
pub use record::{RagHit, RagQuery, RagRecord};

use tracing::{debug, trace};

/// Read-only handle over a loaded index.
///
/// This is the single entry point recommended for query-time code.
pub struct RagStore {
    cfg: RagConfig,
    index: VectorIndex,
}

impl RagStore {
    /// Loads the index found in `cfg.index_dir`.
    ///
    /// # Errors
    /// Returns `RagError::IndexNotFound` when no index has been written yet.
    pub async fn open(cfg: RagConfig) -> Result<Self> {
        cfg.validate()?;
        debug!("RagStore::open dir={}", cfg.index_dir.display());
        let index = VectorIndex::open(&cfg.index_dir).await?;
        Ok(Self { cfg, index })
    }

    /// Wraps an already built index.
    pub fn from_index(cfg: RagConfig, index: VectorIndex) -> Self {
        Self { cfg, index }
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Builds RAG context for a textual query using the provided embedding provider.
    ///
    /// # Errors
    /// Returns embedding errors or a dimension mismatch.
    pub async fn rag_context(
        &self,
        query: RagQuery<'_>,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Vec<RagHit>> {
        trace!("RagStore::rag_context top_k={}", query.top_k);
        retrieve::rag_context(&self.index, query, provider).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AxisEmbedder;

    impl EmbeddingsProvider for AxisEmbedder {
        fn model_name(&self) -> &str {
            "axis"
        }

        fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
            let v = if text.contains("tax") {
                vec![1.0, 0.0]
            } else {
                vec![0.0, 1.0]
            };
            Box::pin(async move { Ok(v) })
        }
    }

    fn rec(text: &str, source: Option<&str>) -> RagRecord {
        RagRecord {
            text: text.into(),
            source: source.map(str::to_string),
            kind: None,
            chunk_index: 0,
        }
    }

    #[tokio::test]
    async fn rag_context_returns_closest_first() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![
            (vec![0.0, 1.0], rec("pensions", Some("p.txt"))),
            (vec![1.0, 0.0], rec("tax bands", None)),
        ];
        let index = VectorIndex::create(dir.path(), "axis", DistanceKind::L2, rows)
            .await
            .unwrap();
        let store = RagStore::from_index(RagConfig::new_default(dir.path()), index);

        let hits = store
            .rag_context(RagQuery { text: "income tax", top_k: 3 }, &AxisEmbedder)
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "tax bands");
        assert_eq!(hits[0].score, 0.0);
        assert_eq!(hits[0].source, None);
        assert_eq!(hits[1].source.as_deref(), Some("p.txt"));
    }

    #[tokio::test]
    async fn open_without_index_fails_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        let err = RagStore::open(RagConfig::new_default(dir.path().join("missing")))
            .await
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("No vector index found at"));
    }
}
