//! Per-format text extraction. Every loader is synchronous and is expected
//! to run on a blocking thread.

mod html;
mod office;
mod pdf;
mod text;

#[cfg(test)]
pub(crate) use office::fixtures as office_fixtures;
#[cfg(test)]
pub(crate) use pdf::fixtures as pdf_fixtures;

use std::path::Path;

use crate::errors::{Error, Result};
use crate::types::{Document, DocumentKind, DocumentMetadata};

/// Resolves the loader for `path` from its extension.
///
/// # Errors
/// [`Error::Unsupported`] when the extension is not one of
/// [`DocumentKind::SUPPORTED_EXTENSIONS`].
pub fn kind_of(path: &Path) -> Result<DocumentKind> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    DocumentKind::from_extension(&ext).ok_or(Error::Unsupported(ext))
}

/// Reads one file and returns its text as a single [`Document`].
pub fn load_file(path: &Path) -> Result<Document> {
    let kind = kind_of(path)?;
    let bytes = std::fs::read(path)?;

    let text = match kind {
        DocumentKind::Pdf => pdf::extract(&bytes)?,
        DocumentKind::Txt => text::extract(&bytes),
        DocumentKind::Html => html::extract(&bytes),
        DocumentKind::Docx => office::extract_docx(&bytes)?,
        DocumentKind::Pptx => office::extract_pptx(&bytes)?,
    };

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Document {
        text,
        metadata: DocumentMetadata { source, kind },
    })
}
