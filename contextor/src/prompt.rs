//! Prompt builder: one of two fixed templates around a plain context block.

use rag_store::RagHit;

/// Which grounded template to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PromptStyle {
    /// Interactive CLI: answer strictly from the context.
    #[default]
    Strict,
    /// HTTP API: helpful, accurate and concise.
    Concise,
}

const STRICT_TEMPLATE: &str = "You are a professional financial adviser assistant.
Answer the user's question using the context below.
Use only the context to answer questions. Do not rely on your own parametric memory.

Context:
{context}

Question: {query}
Answer:";

const CONCISE_TEMPLATE: &str = "You are a professional financial adviser assistant.
Answer the user's question using the context below. Be helpful, accurate, and concise.

Context:
{context}

Question: {query}

Answer:";

/// Joins the retrieved chunk texts, in ranking order, with a blank line.
pub fn build_context(hits: &[RagHit]) -> String {
    hits.iter()
        .map(|h| h.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fills the template for `style` with `context` and `query`.
///
/// # Example
/// ```
/// use contextor::prompt::{build_prompt, PromptStyle};
/// let p = build_prompt(PromptStyle::Concise, "ISAs are tax-free.", "What is an ISA?");
/// assert!(p.contains("Question: What is an ISA?"));
/// assert!(p.ends_with("Answer:"));
/// ```
pub fn build_prompt(style: PromptStyle, context: &str, query: &str) -> String {
    let template = match style {
        PromptStyle::Strict => STRICT_TEMPLATE,
        PromptStyle::Concise => CONCISE_TEMPLATE,
    };
    // Query first, so a `{query}` inside the retrieved context stays literal.
    template
        .replacen("{query}", query, 1)
        .replacen("{context}", context, 1)
}

/// First `max_chars` characters of `text` followed by `...`.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
