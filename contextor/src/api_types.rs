//! Public API types re-used by external crates (the HTTP layer and the CLI).

use crate::prompt::PromptStyle;

/// Shown in place of a chunk's source when the metadata has none.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Options for a single question.
///
/// # Example
/// ```
/// use contextor::{AskOptions, PromptStyle};
/// let opts = AskOptions { top_k: 0, temperature: Some(0.7), style: PromptStyle::Concise };
/// assert_eq!(opts.top_k, 0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct AskOptions {
    /// Chunks to retrieve. If `0`, the service's configured K is used.
    pub top_k: usize,
    /// Generation temperature; `None` keeps the provider default.
    pub temperature: Option<f32>,
    /// Prompt template.
    pub style: PromptStyle,
}

/// A context chunk that was fed to the LLM.
#[derive(Clone, Debug, PartialEq)]
pub struct UsedChunk {
    /// Distance to the question; lower is closer.
    pub score: f32,
    pub source: Option<String>,
    pub text: String,
}

/// Final answer together with the exact context passed to the model.
#[derive(Clone, Debug)]
pub struct QaAnswer {
    pub answer: String,
    /// Distinct source names of the context chunks, first occurrence first.
    pub sources: Vec<String>,
    pub context: Vec<UsedChunk>,
}

/// Distinct sources in first-seen order; missing ones become [`UNKNOWN_SOURCE`].
pub fn dedup_sources<'a>(sources: impl IntoIterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for s in sources {
        let s = s.unwrap_or(UNKNOWN_SOURCE);
        if !out.iter().any(|seen| seen == s) {
            out.push(s.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_and_fills_unknown() {
        let got = dedup_sources([Some("a.pdf"), None, Some("a.pdf"), Some("b.txt"), None]);
        assert_eq!(got, vec!["a.pdf", "Unknown", "b.txt"]);
    }
}
