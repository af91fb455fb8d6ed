//! Application configuration
//!
//! Holds everything the query pipeline needs: the seed site and crawl caps,
//! the fixed NAV feed list, and the LLM backend selection with its endpoint
//! and credentials. Credentials come from environment variables; everything
//! else has sensible defaults overridable from the CLI.

use std::env;

use crate::error::{Error, Result};
use crate::feeds;

/// Seed site for the crawl
pub const DEFAULT_BASE_URL: &str = "https://www.amfiindia.com";

/// Default maximum crawl depth
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Default maximum number of visited URLs per query (NAV feeds included)
pub const DEFAULT_MAX_PAGES: usize = 30;

/// Default Gemini generateContent endpoint
pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Default Ollama server endpoint
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// Default Ollama model name
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Which LLM backend answers queries, and how to reach it
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Gemini cloud API, authenticated with an API key query parameter
    Gemini {
        /// Full generateContent endpoint URL
        api_url: String,
        /// API key
        api_key: String,
    },

    /// Self-hosted Ollama server
    Ollama {
        /// Server base URL
        endpoint: String,
        /// Model name passed in the generate request
        model: String,
    },
}

impl BackendConfig {
    /// Gemini configuration from `GEMINI_API_URL` (optional) and
    /// `GEMINI_API_KEY` (required).
    pub fn gemini_from_env() -> Result<Self> {
        let api_url =
            env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string());
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            Error::Config("GEMINI_API_KEY environment variable must be set".to_string())
        })?;
        Ok(Self::Gemini { api_url, api_key })
    }

    /// Ollama configuration from `OLLAMA_ENDPOINT` and `OLLAMA_MODEL`,
    /// falling back to a local default server.
    pub fn ollama_from_env() -> Self {
        let endpoint =
            env::var("OLLAMA_ENDPOINT").unwrap_or_else(|_| DEFAULT_OLLAMA_ENDPOINT.to_string());
        let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());
        Self::Ollama { endpoint, model }
    }
}

/// Application configuration for the query pipeline
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Seed site; crawled links must stay under this URL
    pub base_url: String,

    /// Maximum crawl depth (seed page is depth 0)
    pub max_depth: u32,

    /// Maximum number of visited URLs per query
    pub max_pages: usize,

    /// Plain-text NAV feeds fetched before the crawl
    pub nav_feeds: Vec<String>,

    /// LLM backend selection
    pub backend: BackendConfig,
}

impl AppConfig {
    /// Create a configuration with AMFI defaults for the given backend
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
            nav_feeds: feeds::NAV_FEED_URLS.iter().map(|s| s.to_string()).collect(),
            backend,
        }
    }
}
