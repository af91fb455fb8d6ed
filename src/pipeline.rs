//! Per-request query orchestration
//!
//! One [`QueryPipeline::run`] call owns the whole answer path: a fresh
//! visited set and context buffer, the NAV feed fetch, the bounded crawl,
//! prompt assembly, and the backend call. Every failure mode ends up as text
//! in the `response` field; the HTTP layer always answers with the full
//! record, elapsed time included.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::context;
use crate::crawler::{ContextBuffer, Crawler, CrawlerConfig, VisitedSet};
use crate::error::Result;
use crate::feeds;
use crate::llm::AnswerBackend;
use crate::transport;

/// Number of visited URLs reported back to the caller
const SOURCES_SAMPLE_SIZE: usize = 5;

/// Result of one query
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    /// Answer text, or a descriptive error string
    pub response: String,

    /// Comma-joined sample of visited URLs
    pub sources: String,

    /// Elapsed wall-clock time, e.g. `"1234 ms"`
    pub time: String,
}

/// The feed-fetch, crawl, assemble, ask pipeline
pub struct QueryPipeline {
    crawler: Crawler,
    feed_client: reqwest::Client,
    nav_feeds: Vec<String>,
    base_url: String,
    backend: Arc<dyn AnswerBackend>,
}

impl QueryPipeline {
    /// Build the pipeline for the given configuration and backend
    pub fn new(config: &AppConfig, backend: Arc<dyn AnswerBackend>) -> Result<Self> {
        let crawler_config = CrawlerConfig::builder()
            .base_url(config.base_url.clone())
            .max_depth(config.max_depth)
            .max_pages(config.max_pages)
            .build();

        let client = transport::crawler_client(
            &crawler_config.user_agent,
            crawler_config.fetch_timeout,
        )?;
        let feed_client = transport::insecure_feed_client()?;

        Ok(Self {
            crawler: Crawler::new(client, crawler_config),
            feed_client,
            nav_feeds: config.nav_feeds.clone(),
            base_url: config.base_url.clone(),
            backend,
        })
    }

    /// Answer one user prompt.
    ///
    /// Never fails: errors become the `response` text, and `time` is always
    /// populated.
    pub async fn run(&self, prompt: &str) -> QueryOutcome {
        let started = Instant::now();
        let visited = VisitedSet::new();
        let buffer = ContextBuffer::new();

        let response = match self.answer(prompt, &visited, &buffer).await {
            Ok(answer) => answer,
            Err(e) => format!("Error processing query: {}", e),
        };

        let sources = format_sources(&visited.sample(SOURCES_SAMPLE_SIZE).await);
        let time = format!("{} ms", started.elapsed().as_millis());
        info!("Query answered in {}", time);

        QueryOutcome {
            response,
            sources,
            time,
        }
    }

    async fn answer(
        &self,
        prompt: &str,
        visited: &VisitedSet,
        buffer: &ContextBuffer,
    ) -> Result<String> {
        feeds::fetch_nav_feeds(&self.feed_client, &self.nav_feeds, visited, buffer).await;
        self.crawler.crawl(&self.base_url, visited, buffer).await?;

        let entries = buffer.entries().await;
        let rendered = context::render_context(&entries);
        let full_prompt = context::assemble_prompt(&rendered, prompt);
        info!(
            "Assembled prompt from {} sources ({} chars), asking {}",
            entries.len(),
            full_prompt.chars().count(),
            self.backend.name()
        );

        // The LLM call's uniform failure contract: transport and parse
        // problems come back as answer text, never as a fault
        match self.backend.ask(&full_prompt).await {
            Ok(answer) => Ok(answer),
            Err(e) => Ok(format!("Error calling {} API: {}", self.backend.name(), e)),
        }
    }
}

fn format_sources(urls: &[String]) -> String {
    format!("{} (and others)", urls.join(", "))
}
