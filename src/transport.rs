//! Outbound HTTP client construction
//!
//! Two clients leave this process: the crawler client (short per-page
//! timeout, desktop browser user agent) and the feed client, which accepts
//! invalid certificates and hostnames because the AMFI NAV portal serves
//! plain-text feeds behind a broken certificate chain. The insecure client
//! is constructed explicitly and injected only into the feed fetcher; there
//! is no process-wide TLS toggle.

use std::time::Duration;

use crate::error::Result;

/// Per-page fetch timeout for the crawler
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent sent with crawler requests, matching a desktop browser to
/// avoid basic bot blocking
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Build the client used for crawling HTML pages
pub fn crawler_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Build the client used for the fixed NAV feeds.
///
/// Certificate and hostname verification are skipped. Use this only for the
/// trusted-but-misconfigured feed endpoints, never for general crawling.
pub fn insecure_feed_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .timeout(FETCH_TIMEOUT)
        .build()?;
    Ok(client)
}
