//! RAG answer service.
//!
//! [`Contextor`] embeds the question, retrieves the top-K chunks from the
//! loaded [`RagStore`], fills a grounded prompt template with their text and
//! asks the generation model for an answer.

mod api_types;
pub mod cfg;
mod error;
mod generator;
pub mod prompt;

pub use api_types::{AskOptions, QaAnswer, UNKNOWN_SOURCE, UsedChunk, dedup_sources};
pub use cfg::{ContextorConfig, DEFAULT_TOP_K};
pub use error::ContextorError;
pub use generator::{GenerateFuture, LlmGenerator, TextGenerator};
pub use prompt::PromptStyle;

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use rag_store::{EmbeddingsProvider, LlmEmbedder, RagConfig, RagHit, RagQuery, RagStore};
use tracing::{debug, info};

/// Shared, read-only RAG service. Wrap in `Arc` and clone freely.
pub struct Contextor {
    store: RagStore,
    embedder: Arc<dyn EmbeddingsProvider>,
    generator: Arc<dyn TextGenerator>,
    cfg: ContextorConfig,
}

impl Contextor {
    pub fn new(
        store: RagStore,
        embedder: Arc<dyn EmbeddingsProvider>,
        generator: Arc<dyn TextGenerator>,
        cfg: ContextorConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            generator,
            cfg,
        }
    }

    /// Loads the persisted index and wires both LLM profiles of `svc`.
    ///
    /// # Errors
    /// `ContextorError::Rag(RagError::IndexNotFound)` when ingestion has not run yet.
    pub async fn open(
        rag_cfg: RagConfig,
        cfg: ContextorConfig,
        svc: Arc<LlmServiceProfiles>,
    ) -> Result<Self, ContextorError> {
        let store = RagStore::open(rag_cfg).await?;
        let embedder = LlmEmbedder::new(svc.clone());
        store.index().warn_on_model_mismatch(embedder.model_name());
        info!(chunks = store.len(), top_k = cfg.top_k, "knowledge base loaded");
        Ok(Self::new(
            store,
            Arc::new(embedder),
            Arc::new(LlmGenerator::new(svc)),
            cfg,
        ))
    }

    pub fn config(&self) -> &ContextorConfig {
        &self.cfg
    }

    pub fn store(&self) -> &RagStore {
        &self.store
    }

    /// Top-K chunks for `question`, closest first. `top_k == 0` uses the configured K.
    ///
    /// # Errors
    /// [`ContextorError::EmptyQuery`] for a blank question; embedding errors otherwise.
    pub async fn retrieve(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<RagHit>, ContextorError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ContextorError::EmptyQuery);
        }
        let top_k = if top_k == 0 { self.cfg.top_k } else { top_k };

        let hits = self
            .store
            .rag_context(
                RagQuery {
                    text: question,
                    top_k,
                },
                self.embedder.as_ref(),
            )
            .await?;
        debug!(top_k, hits = hits.len(), "retrieved context");
        Ok(hits)
    }

    /// Generates an answer to `question` grounded on already retrieved `hits`.
    ///
    /// # Errors
    /// Propagates generation failures unchanged.
    pub async fn answer(
        &self,
        question: &str,
        hits: &[RagHit],
        style: PromptStyle,
        temperature: Option<f32>,
    ) -> Result<String, ContextorError> {
        let context = prompt::build_context(hits);
        let prompt = prompt::build_prompt(style, &context, question.trim());
        debug!(
            prompt_chars = prompt.chars().count(),
            ?style,
            ?temperature,
            "generating answer"
        );
        self.generator.generate(&prompt, temperature).await
    }

    /// Retrieval followed by generation.
    ///
    /// # Errors
    /// [`ContextorError::EmptyQuery`] for a blank question, else any retrieval
    /// or generation failure.
    pub async fn ask(&self, question: &str, opts: AskOptions) -> Result<QaAnswer, ContextorError> {
        let hits = self.retrieve(question, opts.top_k).await?;
        let answer = self
            .answer(question, &hits, opts.style, opts.temperature)
            .await?;

        let sources = dedup_sources(hits.iter().map(|h| h.source.as_deref()));
        let context = hits
            .into_iter()
            .map(|h| UsedChunk {
                score: h.score,
                source: h.source,
                text: h.text,
            })
            .collect();

        Ok(QaAnswer {
            answer,
            sources,
            context,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rag_store::{DistanceKind, EmbedFuture, RagRecord, VectorIndex};
    use tempfile::TempDir;

    use super::*;

    struct KeywordEmbedder;

    impl EmbeddingsProvider for KeywordEmbedder {
        fn model_name(&self) -> &str {
            "keyword"
        }

        fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
            let t = text.to_lowercase();
            let v = vec![
                t.contains("pension") as u8 as f32,
                t.contains("mortgage") as u8 as f32,
            ];
            Box::pin(async move { Ok(v) })
        }
    }

    #[derive(Default)]
    struct RecordingGenerator {
        calls: Mutex<Vec<(String, Option<f32>)>>,
    }

    impl TextGenerator for RecordingGenerator {
        fn generate<'a>(&'a self, prompt: &'a str, temperature: Option<f32>) -> GenerateFuture<'a> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), temperature));
            Box::pin(async move { Ok("grounded answer".to_string()) })
        }
    }

    /// The returned directory must outlive the service: it holds the index.
    async fn contextor(generator: Arc<RecordingGenerator>) -> (TempDir, Contextor) {
        let dir = tempfile::tempdir().unwrap();
        let rows = [
            ([1.0, 0.0], "Pensions grow tax-free.", Some("pensions.pdf")),
            ([0.0, 1.0], "Mortgages are secured loans.", Some("home.docx")),
            ([1.0, 0.0], "Pension drawdown rules.", Some("pensions.pdf")),
            ([0.5, 0.5], "General budgeting.", None),
        ]
        .into_iter()
        .map(|(v, text, source)| {
            let record = RagRecord {
                text: text.into(),
                source: source.map(str::to_string),
                kind: None,
                chunk_index: 0,
            };
            (v.to_vec(), record)
        })
        .collect();
        let index = VectorIndex::create(dir.path(), "keyword", DistanceKind::L2, rows)
            .await
            .unwrap();
        let svc = Contextor::new(
            RagStore::from_index(RagConfig::new_default(dir.path()), index),
            Arc::new(KeywordEmbedder),
            generator,
            ContextorConfig::default(),
        );
        (dir, svc)
    }

    #[tokio::test]
    async fn ask_uses_top_k_context_and_dedups_sources() {
        let generator = Arc::new(RecordingGenerator::default());
        let (_dir, svc) = contextor(generator.clone()).await;

        let opts = AskOptions {
            top_k: 0,
            temperature: Some(0.7),
            style: PromptStyle::Concise,
        };
        let qa = svc.ask("  How do pensions work? ", opts).await.unwrap();

        assert_eq!(qa.answer, "grounded answer");
        assert_eq!(qa.context.len(), 3);
        assert_eq!(qa.context[0].text, "Pensions grow tax-free.");
        assert_eq!(qa.context[1].text, "Pension drawdown rules.");
        assert_eq!(qa.sources, vec!["pensions.pdf", "Unknown"]);

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (prompt, temperature) = &calls[0];
        assert_eq!(*temperature, Some(0.7));
        assert!(prompt.contains(
            "Pensions grow tax-free.\n\nPension drawdown rules.\n\nGeneral budgeting."
        ));
        assert!(prompt.contains("Question: How do pensions work?\n\nAnswer:"));
    }

    #[tokio::test]
    async fn blank_question_is_rejected_before_retrieval() {
        let generator = Arc::new(RecordingGenerator::default());
        let (_dir, svc) = contextor(generator.clone()).await;
        let err = svc.ask(" \t", AskOptions::default()).await.unwrap_err();
        assert!(matches!(err, ContextorError::EmptyQuery));
        assert!(generator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn retrieve_honours_explicit_k_and_small_indexes() {
        let (_dir, svc) = contextor(Arc::new(RecordingGenerator::default())).await;
        assert_eq!(svc.retrieve("mortgage", 1).await.unwrap().len(), 1);
        assert_eq!(svc.retrieve("mortgage", 50).await.unwrap().len(), 4);
        let top = svc.retrieve("mortgage", 0).await.unwrap();
        assert_eq!(top[0].source.as_deref(), Some("home.docx"));
    }
}
