//! Ingest a folder, reopen the persisted index and answer from it, with
//! in-process embedding and generation backends.

use std::sync::{Arc, Mutex};

use contextor::{AskOptions, Contextor, ContextorConfig, GenerateFuture, PromptStyle, TextGenerator};
use doc_indexer::TextSplitter;
use rag_store::{
    EmbedFuture, EmbeddingsProvider, NoopProgress, RagConfig, RagStore, ingest_folder,
};

/// Bag-of-keywords embedding; good enough to make retrieval deterministic.
struct KeywordEmbedder;

const KEYWORDS: [&str; 4] = ["pension", "mortgage", "isa", "budget"];

impl EmbeddingsProvider for KeywordEmbedder {
    fn model_name(&self) -> &str {
        "keywords-v1"
    }

    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        let lower = text.to_lowercase();
        let v: Vec<f32> = KEYWORDS
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect();
        Box::pin(async move { Ok(v) })
    }
}

#[derive(Default)]
struct CapturingGenerator {
    prompts: Mutex<Vec<String>>,
}

impl TextGenerator for CapturingGenerator {
    fn generate<'a>(&'a self, prompt: &'a str, _t: Option<f32>) -> GenerateFuture<'a> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Box::pin(async { Ok("Keep three to six months of expenses.".to_string()) })
    }
}

#[tokio::test]
async fn ingested_documents_answer_questions_after_reload() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::write(
        data.path().join("pensions.txt"),
        "A pension is a long-term savings plan. Pension contributions get tax relief.",
    )
    .unwrap();
    std::fs::write(
        data.path().join("home.html"),
        "<html><body><p>A mortgage is a loan secured on property.</p></body></html>",
    )
    .unwrap();
    std::fs::write(data.path().join("budget.txt"), "Write a monthly budget.").unwrap();
    std::fs::write(data.path().join("notes.csv"), "ignored,file").unwrap();

    let cfg = RagConfig::new_default(out.path().join("kb_index"));
    let report = ingest_folder(
        &cfg,
        data.path(),
        &TextSplitter::default(),
        &KeywordEmbedder,
        &NoopProgress,
    )
    .await
    .unwrap();
    assert_eq!(report.documents, 3);
    assert_eq!(report.chunks, 3);
    assert_eq!(report.skipped, vec!["notes.csv".to_string()]);

    let store = RagStore::open(cfg).await.unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.index().embedding_model(), "keywords-v1");

    let generator = Arc::new(CapturingGenerator::default());
    let contextor = Contextor::new(
        store,
        Arc::new(KeywordEmbedder),
        generator.clone(),
        ContextorConfig::default(),
    );

    let hits = contextor.retrieve("How does a pension work?", 1).await.unwrap();
    assert_eq!(hits[0].source.as_deref(), Some("pensions.txt"));

    let qa = contextor
        .ask(
            "What is a mortgage?",
            AskOptions {
                top_k: 0,
                temperature: None,
                style: PromptStyle::Strict,
            },
        )
        .await
        .unwrap();
    assert_eq!(qa.context.len(), 3);
    assert_eq!(qa.context[0].source.as_deref(), Some("home.html"));
    assert_eq!(qa.context[0].text, "A mortgage is a loan secured on property.");
    assert_eq!(qa.sources.len(), 3);

    let prompts = generator.prompts.lock().unwrap();
    assert!(prompts[0].starts_with("You are a professional financial adviser assistant."));
    assert!(prompts[0].contains("Context:\nA mortgage is a loan secured on property.\n\n"));
    assert!(prompts[0].ends_with("Question: What is a mortgage?\nAnswer:"));
}
