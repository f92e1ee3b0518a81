use serde::{Deserialize, Serialize};

/// Supported document formats, keyed by lower-cased file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Txt,
    Html,
    Docx,
    Pptx,
}

impl DocumentKind {
    /// Every extension the loaders understand.
    pub const SUPPORTED_EXTENSIONS: [&'static str; 5] = ["pdf", "txt", "html", "docx", "pptx"];

    /// Maps an extension (with or without the leading dot, any case) to a kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            "html" => Some(Self::Html),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Lower-case extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Html => "html",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
        }
    }
}

/// Metadata carried from a file to every chunk cut from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// File name (no directory part) the text was extracted from.
    pub source: String,
    pub kind: DocumentKind,
}

/// Extracted text of one loaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Bounded, overlapping slice of a document's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: DocumentMetadata,
    /// Position of the chunk within its document (0-based).
    pub chunk_index: usize,
}

/// Outcome of loading a folder: what was loaded and what was left out.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<Document>,
    /// Files skipped because of an unsupported extension.
    pub skipped: Vec<String>,
    /// Files whose parser failed, with the failure message.
    pub failed: Vec<(String, String)>,
}
