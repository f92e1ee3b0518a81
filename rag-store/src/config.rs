//! Runtime configuration for the vector index and ingestion.

use std::{fmt, path::PathBuf, str::FromStr};

use crate::errors::RagError;

pub const DEFAULT_INDEX_DIR: &str = "embeddings/wealth_kb_index";
pub const DEFAULT_EMBED_BATCH: usize = 64;

/// Distance function used for ranking. Lower is closer for both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceKind {
    /// Squared Euclidean distance.
    #[default]
    L2,
    /// `1 - cosine similarity`.
    Cosine,
}

impl fmt::Display for DistanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::L2 => "l2",
            Self::Cosine => "cosine",
        })
    }
}

impl FromStr for DistanceKind {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l2" | "euclid" | "euclidean" => Ok(Self::L2),
            "cosine" | "cos" => Ok(Self::Cosine),
            other => Err(RagError::Config(format!(
                "unknown distance '{other}' (expected l2 or cosine)"
            ))),
        }
    }
}

/// Where the index lives and how ingestion builds it.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Folder holding the LanceDB tables.
    pub index_dir: PathBuf,
    /// Distance used when a new index is built. A loaded index keeps its own.
    pub distance: DistanceKind,
    /// Chunks per embedding request during ingestion.
    pub embed_batch: usize,
}

impl RagConfig {
    /// Creates a default config rooted at `index_dir`.
    pub fn new_default(index_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_dir: index_dir.into(),
            distance: DistanceKind::L2,
            embed_batch: DEFAULT_EMBED_BATCH,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.index_dir.as_os_str().is_empty() {
            return Err(RagError::Config("index_dir is empty".into()));
        }
        if self.embed_batch == 0 {
            return Err(RagError::Config("embed_batch must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_parses_aliases() {
        assert_eq!("L2".parse::<DistanceKind>().unwrap(), DistanceKind::L2);
        assert_eq!(" cosine ".parse::<DistanceKind>().unwrap(), DistanceKind::Cosine);
        assert!("dot".parse::<DistanceKind>().is_err());
        for d in [DistanceKind::L2, DistanceKind::Cosine] {
            assert_eq!(d.to_string().parse::<DistanceKind>().unwrap(), d);
        }
    }

    #[test]
    fn validate_rejects_zero_knobs() {
        let mut cfg = RagConfig::new_default("idx");
        assert!(cfg.validate().is_ok());
        cfg.embed_batch = 0;
        assert!(cfg.validate().is_err());
        assert!(RagConfig::new_default("").validate().is_err());
    }
}
