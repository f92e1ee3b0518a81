use serde::{Deserialize, Serialize};

/// Request payload for /api/query. A missing `query` is treated as empty.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

/// Response payload for /api/query.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    /// Distinct source file names of the retrieved chunks.
    pub sources: Vec<String>,
    pub context_chunks: Vec<ContextChunk>,
}

/// One retrieved chunk as shown to the client.
#[derive(Debug, Serialize)]
pub struct ContextChunk {
    /// First 300 characters followed by `...`.
    pub content: String,
    pub source: String,
    /// Distance to the query; lower is closer.
    pub score: f32,
}
