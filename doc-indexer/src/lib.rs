//! Document loading and chunking for the knowledge base.
//!
//! [`load_documents`] reads every supported file directly under a folder
//! (PDF, TXT, HTML, DOCX, PPTX) and [`TextSplitter`] cuts the extracted text
//! into overlapping chunks ready to be embedded.

pub mod errors;
pub mod loaders;
pub mod types;
pub mod util;

use std::path::Path;

use tracing::{debug, info, warn};

pub use errors::{Error, Result};
pub use types::{Chunk, Document, DocumentKind, DocumentMetadata, LoadReport};
pub use util::splitter::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, TextSplitter};

/// Loads every supported file directly under `dir`, in file-name order.
///
/// Each file is parsed on a blocking thread. Files with an unsupported
/// extension are skipped with a warning; files whose parser fails (or
/// panics) are logged and recorded in [`LoadReport::failed`] without
/// aborting the run.
///
/// # Errors
/// [`Error::DataDirMissing`] if `dir` does not exist or is not a directory.
pub async fn load_documents(dir: &Path) -> Result<LoadReport> {
    if !dir.is_dir() {
        return Err(Error::DataDirMissing(dir.to_path_buf()));
    }

    let files = util::fs_scan::scan_data_dir(dir);
    info!(dir = %dir.display(), files = files.len(), "scanning data directory");

    let mut report = LoadReport::default();
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Err(e) = loaders::kind_of(&path) {
            warn!(file = %name, "{e}; skipping");
            report.skipped.push(name);
            continue;
        }

        match tokio::task::spawn_blocking(move || loaders::load_file(&path)).await {
            Ok(Ok(doc)) => {
                debug!(file = %name, chars = doc.text.chars().count(), "loaded");
                report.documents.push(doc);
            }
            Ok(Err(e)) => {
                warn!(file = %name, error = %e, "failed to load file; skipping");
                report.failed.push((name, e.to_string()));
            }
            Err(join) => {
                warn!(file = %name, error = %join, "loader crashed; skipping");
                report.failed.push((name, format!("loader crashed: {join}")));
            }
        }
    }

    info!(
        loaded = report.documents.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "document loading finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::office_fixtures::docx;

    #[tokio::test]
    async fn missing_folder_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_documents(&dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, Error::DataDirMissing(_)));
    }

    #[tokio::test]
    async fn loads_supported_skips_unsupported_and_survives_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_notes.txt"), "Pay yourself first.").unwrap();
        std::fs::write(dir.path().join("b_page.html"), "<p>Index funds</p>").unwrap();
        std::fs::write(dir.path().join("c_plan.docx"), docx(&["Budget 50/30/20"])).unwrap();
        std::fs::write(dir.path().join("d_broken.docx"), b"not a zip").unwrap();
        std::fs::write(dir.path().join("e_readme.md"), "# ignored").unwrap();

        let report = load_documents(dir.path()).await.unwrap();

        let sources: Vec<&str> = report
            .documents
            .iter()
            .map(|d| d.metadata.source.as_str())
            .collect();
        assert_eq!(sources, vec!["a_notes.txt", "b_page.html", "c_plan.docx"]);
        assert_eq!(report.documents[2].text, "Budget 50/30/20");
        assert_eq!(report.skipped, vec!["e_readme.md".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "d_broken.docx");
    }

    #[tokio::test]
    async fn empty_folder_yields_no_documents() {
        let dir = tempfile::tempdir().unwrap();
        let report = load_documents(dir.path()).await.unwrap();
        assert!(report.documents.is_empty());
    }
}
