//! # amfiq - AMFI mutual fund question answering
//!
//! This crate implements a small web service that answers natural-language
//! questions about Indian mutual funds. For every query it gathers a fresh
//! context from the AMFI website and forwards an assembled prompt to a
//! configured LLM backend, returning the model's answer.
//!
//! ## Pipeline
//!
//! 1. Fetch the four fixed AMFI NAV data feeds (plain text)
//! 2. Run a bounded crawl of the AMFI site, collecting visible page text
//! 3. Assemble feed and page text into a size-capped prompt
//! 4. Ask the configured backend (Gemini cloud API or a local Ollama server)
//!
//! ## Example
//!
//! ```rust,no_run
//! use amfiq::config::{AppConfig, BackendConfig};
//! use amfiq::llm;
//! use amfiq::pipeline::QueryPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::new(BackendConfig::Ollama {
//!         endpoint: "http://localhost:11434".to_string(),
//!         model: "llama3".to_string(),
//!     });
//!     let backend = llm::from_config(&config.backend);
//!     let pipeline = QueryPipeline::new(&config, backend)?;
//!     let outcome = pipeline.run("What is the NAV of fund X?").await;
//!     println!("{}", outcome.response);
//!     Ok(())
//! }
//! ```

mod error;

pub mod config;
pub mod context;
pub mod crawler;
pub mod feeds;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod transport;

pub use error::Error;

/// Re-export of common types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
