//! Seed feed fetcher
//!
//! Before the crawl, the four fixed AMFI NAV feeds are fetched directly as
//! plain text and prepended to the context buffer. They go through the
//! injected insecure client because the NAV portal's certificate chain does
//! not validate. Each feed URL is marked visited whether or not the fetch
//! succeeded; a failed feed is logged and skipped.

use tracing::{debug, warn};

use crate::crawler::{ContextBuffer, VisitedSet};
use crate::error::Result;

/// The fixed AMFI NAV data feeds
pub const NAV_FEED_URLS: [&str; 4] = [
    "https://portal.amfiindia.com/spages/NAVAll.txt",
    "https://portal.amfiindia.com/spages/NAVOpen.txt",
    "https://portal.amfiindia.com/spages/NAVClose.txt",
    "https://portal.amfiindia.com/spages/NAVInterval.txt",
];

/// Fetch every feed in order, appending raw bodies to the buffer.
///
/// One failed feed never aborts the rest.
pub async fn fetch_nav_feeds(
    client: &reqwest::Client,
    urls: &[String],
    visited: &VisitedSet,
    buffer: &ContextBuffer,
) {
    for url in urls {
        visited.insert(url.clone()).await;
        match fetch_feed(client, url).await {
            Ok(body) => {
                debug!("Fetched NAV feed {} ({} bytes)", url, body.len());
                buffer.push(url.clone(), body).await;
            }
            Err(e) => {
                warn!("Failed to fetch NAV feed {}: {}", url, e);
            }
        }
    }
}

async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}
