//! Content extraction functionality for the crawler module

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::crawler::error::CrawlError;

fn whitespace_runs() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Extract the visible text and the absolute link targets of a page
///
/// # Arguments
///
/// * `html` - The page HTML
/// * `page_url` - The URL the page was fetched from, used to resolve
///   relative links
///
/// # Returns
///
/// The whitespace-collapsed body text and all absolute hyperlink targets in
/// document order
pub fn page_content(html: &str, page_url: &str) -> Result<(String, Vec<String>), CrawlError> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);
    let text = visible_text(&document)?;
    let links = absolute_links(&document, &base)?;
    Ok((text, links))
}

/// Visible body text with whitespace runs collapsed to single spaces
fn visible_text(document: &Html) -> Result<String, CrawlError> {
    let body_selector = Selector::parse("body")
        .map_err(|e| CrawlError::HtmlParse(format!("Failed to parse body selector: {}", e)))?;

    let mut raw = String::new();
    if let Some(body) = document.select(&body_selector).next() {
        collect_visible(body, &mut raw);
    }

    Ok(whitespace_runs().replace_all(&raw, " ").trim().to_string())
}

/// Append the text of an element's subtree, skipping non-rendered elements
fn collect_visible(element: ElementRef<'_>, out: &mut String) {
    if matches!(element.value().name(), "script" | "style" | "noscript") {
        return;
    }

    for node in element.children() {
        if let Some(text) = node.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child) = ElementRef::wrap(node) {
            collect_visible(child, out);
        }
    }
}

/// All hyperlink targets resolved against the page URL
fn absolute_links(document: &Html, base: &Url) -> Result<Vec<String>, CrawlError> {
    let link_selector = Selector::parse("a[href]")
        .map_err(|e| CrawlError::HtmlParse(format!("Failed to parse link selector: {}", e)))?;

    let mut links = Vec::new();
    for element in document.select(&link_selector) {
        if let Some(href) = element.value().attr("href") {
            // mailto:, javascript: and malformed hrefs are not candidate pages
            if let Ok(resolved) = base.join(href) {
                if matches!(resolved.scheme(), "http" | "https") {
                    links.push(resolved.to_string());
                }
            }
        }
    }

    Ok(links)
}
