//! Site crawler module
//!
//! This module performs the bounded depth-first traversal of the seed site.
//! Traversal uses an explicit work stack of `(url, depth)` pairs rather than
//! recursion, and the visited set and context buffer are mutex-guarded so
//! sibling branches could be fetched concurrently without corrupting either.
//!
//! A branch terminates when its depth exceeds the configured maximum, the
//! page ceiling has been reached, or its URL has already been visited. Fetch
//! and parse failures prune the branch and never fail the crawl.

mod config;
mod error;
mod extract;

pub use config::{CrawlerConfig, CrawlerConfigBuilder};
pub use error::CrawlError;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// File extensions that never contain crawlable text
const SKIP_EXTENSIONS: [&str; 6] = [".pdf", ".xls", ".xlsx", ".zip", ".jpg", ".png"];

/// A piece of gathered context: the text of one page or feed, tagged with
/// the URL it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    /// URL the text was fetched from
    pub source: String,

    /// Extracted text
    pub text: String,
}

/// Set of URLs already fetched or claimed, in insertion order.
///
/// Shared between the feed fetcher and the crawler for the duration of one
/// query. Claim operations are atomic, so a URL is never fetched twice even
/// if branches run concurrently.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    inner: Arc<Mutex<VisitedInner>>,
}

#[derive(Debug, Default)]
struct VisitedInner {
    set: HashSet<String>,
    order: Vec<String>,
}

impl VisitedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a URL unconditionally. Returns false if it was already present.
    pub async fn insert(&self, url: String) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.set.insert(url.clone()) {
            inner.order.push(url);
            true
        } else {
            false
        }
    }

    /// Atomically insert a URL only while the set holds fewer than `cap`
    /// entries. Returns false when the URL was already present or the cap
    /// has been reached.
    pub async fn insert_within(&self, url: String, cap: usize) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.set.len() >= cap || inner.set.contains(&url) {
            return false;
        }
        inner.set.insert(url.clone());
        inner.order.push(url);
        true
    }

    /// Whether the URL has been visited
    pub async fn contains(&self, url: &str) -> bool {
        self.inner.lock().await.set.contains(url)
    }

    /// Number of visited URLs
    pub async fn len(&self) -> usize {
        self.inner.lock().await.set.len()
    }

    /// Whether no URL has been visited yet
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.set.is_empty()
    }

    /// The first `n` visited URLs in insertion order
    pub async fn sample(&self, n: usize) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner.order.iter().take(n).cloned().collect()
    }
}

/// Append-only buffer of gathered context, owned by one in-flight query.
///
/// Appends take the lock for the whole record so entries never interleave.
#[derive(Debug, Clone, Default)]
pub struct ContextBuffer {
    inner: Arc<Mutex<Vec<ContextEntry>>>,
}

impl ContextBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a (source, text) record
    pub async fn push(&self, source: impl Into<String>, text: impl Into<String>) {
        let entry = ContextEntry {
            source: source.into(),
            text: text.into(),
        };
        self.inner.lock().await.push(entry);
    }

    /// Snapshot of the entries in insertion order
    pub async fn entries(&self) -> Vec<ContextEntry> {
        self.inner.lock().await.clone()
    }
}

/// Bounded same-site crawler
pub struct Crawler {
    client: reqwest::Client,
    config: CrawlerConfig,
}

impl Crawler {
    /// Create a crawler using the given HTTP client
    pub fn new(client: reqwest::Client, config: CrawlerConfig) -> Self {
        Self { client, config }
    }

    /// The crawler configuration
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawl the site starting at `seed`, appending each page's visible text
    /// to `buffer` and recording every claimed URL in `visited`.
    ///
    /// URLs already present in `visited` (for example the NAV feeds) count
    /// against the page ceiling.
    pub async fn crawl(
        &self,
        seed: &str,
        visited: &VisitedSet,
        buffer: &ContextBuffer,
    ) -> Result<(), CrawlError> {
        let base = Url::parse(&self.config.base_url)?;
        let base_host = base
            .host_str()
            .ok_or_else(|| CrawlError::Other("Base URL has no host".to_string()))?
            .to_string();

        let mut stack: Vec<(String, u32)> = vec![(seed.to_string(), 0)];

        while let Some((url, depth)) = stack.pop() {
            if depth > self.config.max_depth {
                continue;
            }
            if !visited.insert_within(url.clone(), self.config.max_pages).await {
                continue;
            }

            info!("Scraping: {}", url);

            let html = match self.fetch_page(&url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Failed to scrape {}: {}", url, e);
                    continue;
                }
            };

            let (text, links) = match extract::page_content(&html, &url) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to extract content from {}: {}", url, e);
                    continue;
                }
            };

            buffer.push(url.as_str(), text).await;

            let candidates: Vec<String> = links
                .into_iter()
                .filter(|link| self.should_follow(link, &base_host))
                .collect();
            debug!("{}: {} candidate links", url, candidates.len());

            // Reversed so the stack pops links in document order
            for link in candidates.into_iter().rev() {
                stack.push((link, depth + 1));
            }
        }

        Ok(())
    }

    async fn fetch_page(&self, url: &str) -> Result<String, CrawlError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Whether a discovered link should be pushed onto the work stack.
    ///
    /// The link must start with the configured base URL and resolve to the
    /// same host (the host comparison hardens the plain prefix test against
    /// lookalike domains), must carry no fragment, and must not point at a
    /// known binary file type.
    fn should_follow(&self, link: &str, base_host: &str) -> bool {
        if !link.starts_with(&self.config.base_url) {
            return false;
        }
        if link.contains('#') {
            return false;
        }
        if has_skipped_extension(link) {
            return false;
        }
        match Url::parse(link) {
            Ok(parsed) => parsed.host_str() == Some(base_host),
            Err(_) => false,
        }
    }
}

fn has_skipped_extension(url: &str) -> bool {
    let lower = url.to_lowercase();
    SKIP_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport;

    fn test_crawler(base_url: &str, max_depth: u32, max_pages: usize) -> Crawler {
        let config = CrawlerConfig::builder()
            .base_url(base_url)
            .max_depth(max_depth)
            .max_pages(max_pages)
            .user_agent("amfiq-test")
            .build();
        let client = transport::crawler_client(&config.user_agent, config.fetch_timeout).unwrap();
        Crawler::new(client, config)
    }

    #[test]
    fn test_skipped_extensions() {
        assert!(has_skipped_extension("https://example.com/report.PDF"));
        assert!(has_skipped_extension("https://example.com/nav.xlsx"));
        assert!(!has_skipped_extension("https://example.com/nav-history"));
    }

    #[test]
    fn test_should_follow_filters() {
        let crawler = test_crawler("https://example.com", 2, 10);

        assert!(crawler.should_follow("https://example.com/funds", "example.com"));
        // Off-site and lookalike hosts
        assert!(!crawler.should_follow("https://other.example.net/funds", "example.com"));
        assert!(!crawler.should_follow("https://example.com.evil.net/funds", "example.com"));
        // Fragments and binary files
        assert!(!crawler.should_follow("https://example.com/funds#nav", "example.com"));
        assert!(!crawler.should_follow("https://example.com/report.pdf", "example.com"));
    }

    #[tokio::test]
    async fn test_visited_set_is_insertion_ordered() {
        let visited = VisitedSet::new();
        assert!(visited.insert("a".to_string()).await);
        assert!(visited.insert("b".to_string()).await);
        assert!(!visited.insert("a".to_string()).await);

        assert_eq!(visited.len().await, 2);
        assert_eq!(visited.sample(5).await, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_insert_within_enforces_cap() {
        let visited = VisitedSet::new();
        assert!(visited.insert_within("a".to_string(), 1).await);
        assert!(!visited.insert_within("b".to_string(), 1).await);
        assert!(!visited.insert_within("a".to_string(), 5).await);
        assert_eq!(visited.len().await, 1);
    }

    #[tokio::test]
    async fn test_crawl_respects_page_cap() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let home = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(format!(
                r#"<html><body>Home <a href="{base}/one">one</a> <a href="{base}/two">two</a></body></html>"#
            ))
            .create_async()
            .await;
        let one = server
            .mock("GET", "/one")
            .with_status(200)
            .with_body("<html><body>One</body></html>")
            .expect(1)
            .create_async()
            .await;
        let two = server
            .mock("GET", "/two")
            .with_status(200)
            .with_body("<html><body>Two</body></html>")
            .expect(0)
            .create_async()
            .await;

        let crawler = test_crawler(&base, 3, 2);
        let visited = VisitedSet::new();
        let buffer = ContextBuffer::new();
        crawler.crawl(&base, &visited, &buffer).await.unwrap();

        assert_eq!(visited.len().await, 2);
        home.assert_async().await;
        one.assert_async().await;
        two.assert_async().await;
    }

    #[tokio::test]
    async fn test_crawl_respects_depth_cap() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let home = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(format!(
                r#"<html><body><a href="{base}/mid">mid</a></body></html>"#
            ))
            .create_async()
            .await;
        let mid = server
            .mock("GET", "/mid")
            .with_status(200)
            .with_body(format!(
                r#"<html><body><a href="{base}/deep">deep</a></body></html>"#
            ))
            .expect(1)
            .create_async()
            .await;
        let deep = server
            .mock("GET", "/deep")
            .with_status(200)
            .with_body("<html><body>Deep</body></html>")
            .expect(0)
            .create_async()
            .await;

        let crawler = test_crawler(&base, 1, 10);
        let visited = VisitedSet::new();
        let buffer = ContextBuffer::new();
        crawler.crawl(&base, &visited, &buffer).await.unwrap();

        home.assert_async().await;
        mid.assert_async().await;
        deep.assert_async().await;
    }

    #[tokio::test]
    async fn test_crawl_never_refetches_a_url() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        // Home and page link back to each other
        let home = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(format!(
                r#"<html><body><a href="{base}/page">page</a></body></html>"#
            ))
            .expect(1)
            .create_async()
            .await;
        let page = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body(format!(
                r#"<html><body><a href="{base}/">home</a> <a href="{base}/page">self</a></body></html>"#
            ))
            .expect(1)
            .create_async()
            .await;

        let crawler = test_crawler(&base, 5, 10);
        let visited = VisitedSet::new();
        let buffer = ContextBuffer::new();
        crawler.crawl(&base, &visited, &buffer).await.unwrap();

        home.assert_async().await;
        page.assert_async().await;
    }

    #[tokio::test]
    async fn test_crawl_skips_fragment_binary_and_offsite_links() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let home = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(format!(
                r#"<html><body>
                    <a href="{base}/funds#top">fragment</a>
                    <a href="{base}/report.pdf">report</a>
                    <a href="https://elsewhere.invalid/page">offsite</a>
                </body></html>"#
            ))
            .create_async()
            .await;
        let funds = server
            .mock("GET", "/funds")
            .expect(0)
            .create_async()
            .await;
        let report = server
            .mock("GET", "/report.pdf")
            .expect(0)
            .create_async()
            .await;

        let crawler = test_crawler(&base, 3, 10);
        let visited = VisitedSet::new();
        let buffer = ContextBuffer::new();
        crawler.crawl(&base, &visited, &buffer).await.unwrap();

        assert_eq!(visited.len().await, 1);
        home.assert_async().await;
        funds.assert_async().await;
        report.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_failure_prunes_branch_only() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let home = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(format!(
                r#"<html><body><a href="{base}/broken">broken</a> <a href="{base}/ok">ok</a></body></html>"#
            ))
            .create_async()
            .await;
        let broken = server
            .mock("GET", "/broken")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        let ok = server
            .mock("GET", "/ok")
            .with_status(200)
            .with_body("<html><body>Still here</body></html>")
            .expect(1)
            .create_async()
            .await;

        let crawler = test_crawler(&base, 3, 10);
        let visited = VisitedSet::new();
        let buffer = ContextBuffer::new();
        crawler.crawl(&base, &visited, &buffer).await.unwrap();

        let entries = buffer.entries().await;
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.text == "Still here"));
        // The failed URL still counts as visited
        assert!(visited.contains(&format!("{base}/broken")).await);

        home.assert_async().await;
        broken.assert_async().await;
        ok.assert_async().await;
    }
}
