//! Retrieval helpers: low-level vector search and high-level RAG context.

use tracing::trace;

use crate::embed::EmbeddingsProvider;
use crate::errors::Result;
use crate::index::VectorIndex;
use crate::record::{RagHit, RagQuery};

/// Searches the index with a ready query vector.
///
/// # Errors
/// Returns `RagError::VectorSizeMismatch` when the vector does not match the index.
pub async fn search_by_vector(
    index: &VectorIndex,
    query_vector: &[f32],
    top_k: usize,
) -> Result<Vec<RagHit>> {
    trace!("retrieve::search_by_vector top_k={top_k}");
    index.search(query_vector, top_k).await
}

/// Embeds the query text and returns the closest chunks, best first.
///
/// # Errors
/// Returns embedding/provider errors or a dimension mismatch.
pub async fn rag_context(
    index: &VectorIndex,
    query: RagQuery<'_>,
    provider: &dyn EmbeddingsProvider,
) -> Result<Vec<RagHit>> {
    trace!("retrieve::rag_context top_k={}", query.top_k);

    let qv = provider.embed(query.text).await?;
    let out = search_by_vector(index, &qv, query.top_k).await?;

    trace!("retrieve::rag_context hits={}", out.len());
    Ok(out)
}
