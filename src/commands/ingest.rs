use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use colored::Colorize;
use doc_indexer::TextSplitter;
use rag_store::{IndicatifProgress, IngestReport, LlmEmbedder, RagConfig, ingest_folder};
use tracing::info;

use crate::cli::IngestArgs;
use crate::commands::CmdResult;

pub async fn run(args: IngestArgs) -> CmdResult {
    let splitter = TextSplitter::new(args.chunk_size, args.chunk_overlap)?;
    let mut cfg = RagConfig::new_default(&args.index.index_dir);
    cfg.distance = args.distance.parse()?;
    cfg.embed_batch = args.embed_batch;
    cfg.validate()?;

    let svc = Arc::new(LlmServiceProfiles::from_env()?);
    let embedder = LlmEmbedder::new(svc);

    println!(
        "{}",
        format!("Loading documents from '{}'...", args.data_dir.display()).cyan()
    );
    let progress = IndicatifProgress::spinner();
    let report = ingest_folder(&cfg, &args.data_dir, &splitter, &embedder, &progress).await?;

    print_report(&report, &args);
    info!(
        documents = report.documents,
        chunks = report.chunks,
        "ingest command done"
    );
    Ok(())
}

fn print_report(report: &IngestReport, args: &IngestArgs) {
    for name in &report.skipped {
        println!("{} {name}", "Skipped unsupported file:".yellow());
    }
    for (name, reason) in &report.failed {
        println!("{} {name}: {reason}", "Error loading".red());
    }

    if report.documents == 0 {
        println!(
            "{}",
            format!(
                "No documents found. Please place files in the '{}' folder.",
                args.data_dir.display()
            )
            .yellow()
        );
        return;
    }

    println!("Loaded {} documents.", report.documents);
    println!("Split into {} chunks.", report.chunks);
    match &report.index_dir {
        Some(dir) => println!(
            "{}",
            format!("Vector index saved to '{}'.", dir.display()).green()
        ),
        None => println!("{}", "Documents contained no text; no index written.".yellow()),
    }
}
