//! Unified error types for the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// LanceDB connection, table and query errors.
    #[error("vector store error: {0}")]
    LanceDb(#[from] lancedb::Error),

    /// Arrow record batch construction errors.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// No persisted index at the configured location.
    #[error("No vector index found at '{}'. Run ingestion first", .0.display())]
    IndexNotFound(PathBuf),

    /// Index tables exist but their metadata or columns are unusable.
    #[error("corrupt index: {0}")]
    Corrupt(String),

    /// Mismatch in vector dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Embedding backend failures.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Document loading failures (missing data folder, bad splitter settings).
    #[error(transparent)]
    Documents(#[from] doc_indexer::Error),
}

pub type Result<T> = std::result::Result<T, RagError>;
