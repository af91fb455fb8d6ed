//! # Crawler Configuration Module
//!
//! Configuration options for the site crawler: the seed URL that anchors the
//! same-site check, depth and page ceilings, and per-page fetch behavior.
//! Uses a builder pattern for flexible configuration.

use std::time::Duration;

use crate::transport;

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Seed site; followed links must start with this URL
    pub base_url: String,

    /// Maximum depth to crawl (the seed page is depth 0)
    pub max_depth: u32,

    /// Maximum number of visited URLs, shared with the feed fetcher
    pub max_pages: usize,

    /// User agent to use for requests
    pub user_agent: String,

    /// Timeout applied to each page fetch
    pub fetch_timeout: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            max_depth: crate::config::DEFAULT_MAX_DEPTH,
            max_pages: crate::config::DEFAULT_MAX_PAGES,
            user_agent: transport::DESKTOP_USER_AGENT.to_string(),
            fetch_timeout: transport::FETCH_TIMEOUT,
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the seed site URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the maximum depth to crawl
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the maximum number of visited URLs
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the per-page fetch timeout
    pub fn fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.config.fetch_timeout = fetch_timeout;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = CrawlerConfig::builder()
            .base_url("https://example.com")
            .max_depth(1)
            .max_pages(2)
            .user_agent("test-agent")
            .fetch_timeout(Duration::from_secs(1))
            .build();

        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(config.max_depth, 1);
        assert_eq!(config.max_pages, 2);
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.fetch_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.base_url, "https://www.amfiindia.com");
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }
}
