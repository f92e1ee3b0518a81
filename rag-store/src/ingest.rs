//! Ingestion pipeline: load folder → split → embed in batches → write index.

use std::path::{Path, PathBuf};
use std::time::Instant;

use doc_indexer::{Chunk, TextSplitter, load_documents};
use tracing::{debug, info, warn};

use crate::config::RagConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::{RagError, Result};
use crate::index::VectorIndex;
use crate::progress::Progress;
use crate::record::RagRecord;

/// Summary of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    /// Files skipped because of an unsupported extension.
    pub skipped: Vec<String>,
    /// Files whose parser failed, with the reason.
    pub failed: Vec<(String, String)>,
    /// Where the index was written; `None` when there was nothing to index.
    pub index_dir: Option<PathBuf>,
}

/// Builds a fresh index from every supported file in `data_dir` and writes
/// it to `cfg.index_dir`, replacing any previous one.
///
/// When no document (or no non-empty chunk) is found, nothing is written and
/// the report has `index_dir == None`.
///
/// # Errors
/// - [`RagError::Documents`] if `data_dir` does not exist
/// - [`RagError::Embedding`] / [`RagError::VectorSizeMismatch`] from the provider
/// - I/O and LanceDB errors while writing
pub async fn ingest_folder(
    cfg: &RagConfig,
    data_dir: &Path,
    splitter: &TextSplitter,
    provider: &dyn EmbeddingsProvider,
    progress: &dyn Progress,
) -> Result<IngestReport> {
    cfg.validate()?;
    let started = Instant::now();
    info!(data_dir = %data_dir.display(), index_dir = %cfg.index_dir.display(), "ingestion started");

    let loaded = load_documents(data_dir).await?;
    let mut report = IngestReport {
        documents: loaded.documents.len(),
        skipped: loaded.skipped,
        failed: loaded.failed,
        ..IngestReport::default()
    };

    if loaded.documents.is_empty() {
        warn!(data_dir = %data_dir.display(), "no documents found; index not written");
        return Ok(report);
    }

    let chunks = splitter.split_documents(&loaded.documents);
    report.chunks = chunks.len();
    if chunks.is_empty() {
        warn!("documents contained no text; index not written");
        return Ok(report);
    }
    info!(
        documents = report.documents,
        chunks = report.chunks,
        chunk_size = splitter.chunk_size(),
        chunk_overlap = splitter.chunk_overlap(),
        "documents split"
    );

    let index = build_index(cfg, chunks, provider, progress).await?;
    report.index_dir = Some(cfg.index_dir.clone());

    info!(
        vectors = index.len(),
        dim = index.dim(),
        elapsed_ms = started.elapsed().as_millis(),
        "ingestion finished"
    );
    Ok(report)
}

/// Embeds `chunks` in order, `cfg.embed_batch` at a time, and writes them as
/// a new index in `cfg.index_dir`. Nothing is written if embedding fails.
/// The index dimension is taken from the first vector returned.
pub async fn build_index(
    cfg: &RagConfig,
    chunks: Vec<Chunk>,
    provider: &dyn EmbeddingsProvider,
    progress: &dyn Progress,
) -> Result<VectorIndex> {
    let batch = cfg.embed_batch.max(1);
    progress.set_total(chunks.len() as u64);
    progress.message("embedding chunks");

    let mut rows = Vec::with_capacity(chunks.len());
    let mut chunks = chunks.into_iter().peekable();
    while chunks.peek().is_some() {
        let group: Vec<Chunk> = chunks.by_ref().take(batch).collect();
        let n = group.len();
        let vectors = {
            let texts: Vec<&str> = group.iter().map(|c| c.text.as_str()).collect();
            provider.embed_batch(&texts).await?
        };
        if vectors.len() != n {
            return Err(RagError::Embedding(format!(
                "expected {n} embeddings, got {}",
                vectors.len()
            )));
        }
        debug!(batch = n, "embedded batch");

        rows.extend(vectors.into_iter().zip(group.into_iter().map(RagRecord::from)));
        progress.advance(n as u64);
    }

    progress.finish("embedding complete");
    VectorIndex::create(&cfg.index_dir, provider.model_name(), cfg.distance, rows).await
}
