//! # amfiq server binary
//!
//! Parses CLI flags, reads backend credentials from the environment, wires
//! the query pipeline, and serves the HTTP API.
//!
//! ## Environment
//!
//! - `GEMINI_API_URL` / `GEMINI_API_KEY` for the Gemini backend
//! - `OLLAMA_ENDPOINT` / `OLLAMA_MODEL` for the Ollama backend
//! - `RUST_LOG` for log filtering

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use amfiq::config::{self, AppConfig, BackendConfig};
use amfiq::llm;
use amfiq::pipeline::QueryPipeline;
use amfiq::server;

#[derive(Parser, Debug)]
#[command(author, version, about = "Answers questions about Indian mutual funds from live AMFI data", long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Seed site to crawl
    #[arg(long, default_value = config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Maximum crawl depth
    #[arg(short = 'd', long, default_value_t = config::DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Maximum number of visited URLs per query, NAV feeds included
    #[arg(short = 'p', long, default_value_t = config::DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// LLM backend answering the queries
    #[arg(long, default_value = "gemini", value_parser = ["gemini", "ollama"])]
    backend: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let backend_config = match cli.backend.as_str() {
        "ollama" => BackendConfig::ollama_from_env(),
        _ => BackendConfig::gemini_from_env()?,
    };

    let mut app_config = AppConfig::new(backend_config);
    app_config.base_url = cli.base_url;
    app_config.max_depth = cli.max_depth;
    app_config.max_pages = cli.max_pages;

    let backend = llm::from_config(&app_config.backend);
    let pipeline = Arc::new(QueryPipeline::new(&app_config, backend)?);

    server::serve(pipeline, cli.bind).await?;
    Ok(())
}
