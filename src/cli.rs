//! Command-line interface. Every flag can also be set through the
//! environment (or `.env`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use doc_indexer::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use contextor::DEFAULT_TOP_K;
use rag_store::{DEFAULT_EMBED_BATCH, DEFAULT_INDEX_DIR};

#[derive(Debug, Parser)]
#[command(name = "wealth-kb", version, about = "Ask questions about your own documents")]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the vector index from a folder of documents.
    Ingest(IngestArgs),
    /// Interactive question loop in the terminal.
    Query(QueryArgs),
    /// HTTP API and web page.
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Folder holding the LanceDB index tables.
    #[arg(long, env = "INDEX_DIR", default_value = DEFAULT_INDEX_DIR)]
    pub index_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Folder with the PDF/TXT/HTML/DOCX/PPTX files to index.
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub index: IndexArgs,

    #[arg(long, env = "CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    #[arg(long, env = "CHUNK_OVERLAP", default_value_t = DEFAULT_CHUNK_OVERLAP)]
    pub chunk_overlap: usize,

    /// Chunks sent per embedding request.
    #[arg(long, env = "EMBED_BATCH", default_value_t = DEFAULT_EMBED_BATCH)]
    pub embed_batch: usize,

    /// `l2` or `cosine`.
    #[arg(long, env = "RAG_DISTANCE", default_value = "l2")]
    pub distance: String,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub index: IndexArgs,

    /// Chunks retrieved per question.
    #[arg(long, env = "RAG_TOP_K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub index: IndexArgs,

    #[arg(long, env = "RAG_TOP_K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Address to bind, e.g. 127.0.0.1:5000.
    #[arg(long, env = "API_ADDRESS", default_value = "127.0.0.1:5000")]
    pub address: String,
}
