//! Command-line front end for the hybrid retriever: `ingest`, `query`,
//! `delete` and `status` over a persistent JSON document store.

pub mod commands;
pub mod config;
pub mod pipeline;

pub use commands::Cli;
pub use config::AppConfig;
