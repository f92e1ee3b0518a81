//! Recursive character splitter.
//!
//! Text is cut on the coarsest separator that occurs in it (`"\n\n"`, then
//! `"\n"`, then `" "`, then between characters). Pieces that are still too
//! long are split again with the finer separators; short pieces are merged
//! greedily up to `chunk_size`, and each new chunk starts with the tail
//! (at most `chunk_overlap` characters) of the previous one.
//!
//! Lengths are counted in `char`s. Separators stay attached to the start of
//! the piece that follows them, and every chunk is trimmed.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::errors::{Error, Result};
use crate::types::{Chunk, Document};

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits documents into bounded, overlapping chunks.
#[derive(Debug, Clone, Copy)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextSplitter {
    /// # Errors
    /// [`Error::InvalidSplitter`] if `chunk_size == 0` or `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidSplitter("chunk_size must be > 0"));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::InvalidSplitter(
                "chunk_overlap must be smaller than chunk_size",
            ));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Splits every document; chunks inherit their document's metadata.
    pub fn split_documents(&self, docs: &[Document]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = docs
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.text)
                    .into_iter()
                    .enumerate()
                    .map(|(chunk_index, text)| Chunk {
                        text,
                        metadata: doc.metadata.clone(),
                        chunk_index,
                    })
            })
            .collect();
        debug!(
            documents = docs.len(),
            chunks = chunks.len(),
            "split_documents"
        );
        chunks
    }

    /// Splits one text into trimmed, non-empty chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = separators.last().copied().unwrap_or("");
        let mut finer: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = sep;
                break;
            }
            if text.contains(sep) {
                separator = sep;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut out = Vec::new();
        let mut short: Vec<&str> = Vec::new();
        for piece in split_keep_start(text, separator) {
            if char_len(piece) < self.chunk_size {
                short.push(piece);
                continue;
            }
            if !short.is_empty() {
                out.extend(self.merge(&short));
                short.clear();
            }
            if finer.is_empty() {
                out.push(piece.trim().to_string());
            } else {
                out.extend(self.split_recursive(piece, finer));
            }
        }
        if !short.is_empty() {
            out.extend(self.merge(&short));
        }
        out.retain(|c| !c.is_empty());
        out
    }

    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        total,
                        chunk_size = self.chunk_size,
                        "created a chunk longer than the configured size"
                    );
                }
                if !current.is_empty() {
                    if let Some(doc) = join(&current) {
                        docs.push(doc);
                    }
                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some(front) => total -= char_len(front),
                            None => break,
                        }
                    }
                }
            }
            current.push_back(piece);
            total += len;
        }
        if let Some(doc) = join(&current) {
            docs.push(doc);
        }
        docs
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn join(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Splits `text` on `separator`, keeping the separator at the start of the
/// following piece. An empty separator splits between characters.
fn split_keep_start<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }
    let mut out = Vec::new();
    let mut last = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > last {
            out.push(&text[last..idx]);
        }
        last = idx;
    }
    if last < text.len() {
        out.push(&text[last..]);
    }
    out
}
