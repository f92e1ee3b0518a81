pub mod ingest;
pub mod query;
pub mod serve;

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use contextor::{Contextor, ContextorConfig};
use rag_store::RagConfig;

use crate::cli::IndexArgs;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Loads the persisted index and both LLM profiles. Fails when no index exists.
pub(crate) async fn open_contextor(
    index: &IndexArgs,
    top_k: usize,
) -> Result<Arc<Contextor>, Box<dyn std::error::Error>> {
    let rag_cfg = RagConfig::new_default(&index.index_dir);

    let mut cfg = ContextorConfig::from_env()?;
    cfg.top_k = top_k;

    let svc = Arc::new(LlmServiceProfiles::from_env()?);
    Ok(Arc::new(Contextor::open(rag_cfg, cfg, svc).await?))
}
