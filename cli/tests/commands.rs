use clap::Parser;
use hybrid_rag_cli::pipeline::open_retriever;
use hybrid_rag_cli::{AppConfig, Cli};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let store = dir.join("store").join("documents.json");
    let config = format!(
        "store_path = {:?}\n\n[chunker]\nchunk_size = 40\noverlap = 10\n\n[embedder]\nkind = \"hashing\"\ndimension = 64\n",
        store.display().to_string()
    );
    let path = dir.join("hybrid-rag.toml");
    std::fs::write(&path, config).unwrap();
    path
}

async fn run(args: &[&str]) -> anyhow::Result<()> {
    Cli::parse_from(std::iter::once("hybrid-rag").chain(args.iter().copied()))
        .run()
        .await
}

#[tokio::test]
async fn ingest_query_delete_roundtrip() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path());
    let config_arg = config_path.to_str().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(
        &notes,
        "Tokio is an asynchronous runtime for Rust. Serde serializes Rust data structures.",
    )
    .unwrap();

    run(&["--config", config_arg, "ingest", notes.to_str().unwrap()])
        .await
        .unwrap();

    let config = AppConfig::load(Some(config_path.as_path())).unwrap();
    let retriever = open_retriever(&config).await.unwrap();
    let count = retriever.document_count().await.unwrap();
    assert!(count > 1);
    let results = retriever.retrieve("tokio runtime", Some(1), None).await.unwrap();
    assert_eq!(results[0].document.id, "notes-0");
    assert_eq!(results[0].document.metadata["chunk_index"], 0);
    retriever.close().await.unwrap();

    run(&["--config", config_arg, "query", "serde", "-n", "2"])
        .await
        .unwrap();
    run(&["--config", config_arg, "delete", "notes-0"]).await.unwrap();
    run(&["--config", config_arg, "status"]).await.unwrap();

    let retriever = open_retriever(&config).await.unwrap();
    assert_eq!(retriever.document_count().await.unwrap(), count - 1);
}

#[tokio::test]
async fn missing_input_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path());
    let missing = dir.path().join("missing.txt");

    let err = run(&[
        "--config",
        config_path.to_str().unwrap(),
        "ingest",
        missing.to_str().unwrap(),
    ])
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Failed to read"));
}
