use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data directory not found: {0}")]
    DataDirMissing(PathBuf),

    #[error("unsupported file extension: {0}")]
    Unsupported(String),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("pdf extraction error: {0}")]
    Pdf(String),

    #[error("missing archive entry: {0}")]
    MissingEntry(&'static str),

    #[error("invalid splitter config: {0}")]
    InvalidSplitter(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
