use crate::config::AppConfig;
use crate::pipeline::open_retriever;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hybrid_rag_chunker::Chunker;
use hybrid_rag_core::{Document, Metadata, SearchResult};
use hybrid_rag_persistence::PersistentRetriever;
use owo_colors::OwoColorize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Hybrid dense + keyword retrieval over a local document store.
#[derive(Debug, Parser)]
#[command(name = "hybrid-rag", version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./hybrid-rag.toml when present)
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chunk a text file and add it to the index
    Ingest(IngestArgs),

    /// Search the index
    Query(QueryArgs),

    /// Remove documents by id
    Delete(DeleteArgs),

    /// Show the store location and document count
    Status,
}

#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Text file to ingest
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Chunk id prefix (defaults to the file stem)
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,
}

#[derive(Debug, Parser)]
pub struct QueryArgs {
    /// Search query
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Number of results to return (defaults to rerank_top_k)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Print the full text of each result
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Document ids
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = AppConfig::load(self.config.as_deref())?;
        match self.command {
            Command::Ingest(args) => run_ingest(&config, args).await,
            Command::Query(args) => run_query(&config, args).await,
            Command::Delete(args) => run_delete(&config, args).await,
            Command::Status => run_status(&config).await,
        }
    }
}

/// Chunk id prefix for `file`: the explicit prefix, else the file stem.
pub fn id_prefix(file: &Path, prefix: Option<String>) -> String {
    prefix
        .or_else(|| {
            file.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| Chunker::DEFAULT_ID_PREFIX.to_string())
}

async fn run_ingest(config: &AppConfig, args: IngestArgs) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let chunker = Chunker::new(config.chunker.clone()).context("Invalid chunker config")?;

    let mut metadata = Metadata::new();
    metadata.insert(
        "source".to_string(),
        Value::String(args.file.display().to_string()),
    );
    let prefix = id_prefix(&args.file, args.prefix);
    let documents = chunker.chunk(&text, &prefix, &metadata);
    if documents.is_empty() {
        println!("{} {} is empty", "✗".bright_red(), args.file.display());
        return Ok(());
    }

    let retriever = open_retriever(config).await.context("Failed to open index")?;
    let embedded = ingest_documents(&retriever, &documents).await?;

    println!(
        "{} Ingested {} chunks from {} ({}-0..{}-{})",
        "✓".bright_green(),
        embedded.len().bright_cyan(),
        args.file.display(),
        prefix,
        prefix,
        embedded.len() - 1
    );
    Ok(())
}

async fn run_query(config: &AppConfig, args: QueryArgs) -> Result<()> {
    let retriever = open_retriever(config).await.context("Failed to open index")?;
    let outcome = retriever
        .retrieve(&args.query, args.limit, None)
        .await
        .context("Search failed");
    let results = close_after(&retriever, outcome).await?;

    if results.is_empty() {
        println!("{} No results found", "✗".bright_red());
        return Ok(());
    }

    println!(
        "{} Found {} results\n",
        "✓".bright_green(),
        results.len().to_string().bright_cyan()
    );
    for (i, result) in results.iter().enumerate() {
        print_result(i + 1, result, args.verbose);
    }
    Ok(())
}

fn print_result(rank: usize, result: &SearchResult, verbose: bool) {
    println!(
        "{}. {} {} {:.4} {} {}",
        rank.to_string().bright_yellow(),
        result.document.id.bright_cyan(),
        "score:".bright_black(),
        result.score,
        "source:".bright_black(),
        result.source
    );

    if verbose {
        for line in result.document.content.lines() {
            println!("   {}", line.dimmed());
        }
    } else {
        let preview: String = result.document.content.chars().take(120).collect();
        let ellipsis = if preview.len() < result.document.content.len() {
            "..."
        } else {
            ""
        };
        println!("   {}{}", preview.replace('\n', " ").dimmed(), ellipsis);
    }
    println!();
}

async fn run_delete(config: &AppConfig, args: DeleteArgs) -> Result<()> {
    let retriever = open_retriever(config).await.context("Failed to open index")?;
    delete_documents(&retriever, &args.ids).await?;

    println!(
        "{} Deleted {} ids",
        "✓".bright_green(),
        args.ids.len().bright_cyan()
    );
    Ok(())
}

/// Ingest `documents` and close the store, whether or not the ingest succeeded.
pub async fn ingest_documents(
    retriever: &PersistentRetriever,
    documents: &[Document],
) -> Result<Vec<Document>> {
    let outcome = retriever
        .ingest(documents)
        .await
        .context("Failed to ingest documents");
    close_after(retriever, outcome).await
}

/// Delete `ids` and close the store. A half-applied delete is reported as
/// the underlying [`hybrid_rag_core::RagError::Inconsistent`].
pub async fn delete_documents(retriever: &PersistentRetriever, ids: &[String]) -> Result<()> {
    let outcome = match retriever.delete(ids).await {
        Err(err) if err.is_consistency_warning() => {
            eprintln!(
                "{} Removed from the index but not from the store; rerun the delete",
                "!".bright_yellow()
            );
            Err(err.into())
        }
        other => other.context("Failed to delete documents"),
    };
    close_after(retriever, outcome).await
}

/// Close the store, then return `outcome`. An operation error takes
/// precedence over a close error, which is only logged in that case.
async fn close_after<T>(retriever: &PersistentRetriever, outcome: Result<T>) -> Result<T> {
    let closed = retriever.close().await;
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err).context("Failed to close document store"),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!("Failed to close document store: {close_err}");
            Err(err)
        }
    }
}

async fn run_status(config: &AppConfig) -> Result<()> {
    let retriever = open_retriever(config).await.context("Failed to open index")?;
    let outcome = retriever
        .document_count()
        .await
        .context("Failed to count documents");
    let count = close_after(&retriever, outcome).await?;
    let inner = retriever.retriever();

    println!("{} Index Status", "▶".bright_blue());
    println!(
        "  Store: {}",
        config.store_path.display().to_string().bright_cyan()
    );
    println!("  Documents: {}", count.bright_cyan());
    println!(
        "  Embedder: {} ({} dims)",
        inner.embedder().name(),
        inner.embedder().dimension()
    );
    println!("  Vector store: {}", inner.vector_store().name());
    println!(
        "  Sparse: {}",
        inner.sparse_retriever().map_or("none", |s| s.name())
    );
    println!(
        "  Reranker: {}{}",
        inner.reranker().map_or("none", |r| r.name()),
        if inner.config().enable_reranker() {
            ""
        } else {
            " (disabled)"
        }
    );
    Ok(())
}
