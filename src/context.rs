//! Context assembly
//!
//! Turns the gathered (source, text) records into the final prompt: render
//! the records in insertion order, cap the rendered context at a fixed
//! character budget, then wrap it with the instruction preamble and the
//! user's question.

use crate::crawler::ContextEntry;

/// Character budget for the rendered context
pub const MAX_CONTEXT_CHARS: usize = 30_000;

/// Marker appended when the context was cut at the budget
pub const TRUNCATION_MARKER: &str = "\n...(truncated due to size limit)...";

const SYSTEM_INSTRUCTION: &str = "You are an AI assistant specialized in Indian Mutual Funds. \
    Strictly answer the query using ONLY the following context scraped from the official AMFI website (www.amfiindia.com). \
    If the answer is not in the context, state that you cannot find the information on the AMFI website. \
    Do not use outside knowledge. \
    Format your response using Markdown. Use tables for presenting numerical data or comparisons, and bullet points for lists.";

/// Render buffer entries as `Source:`/`Content:` records and truncate the
/// result to [`MAX_CONTEXT_CHARS`] characters.
pub fn render_context(entries: &[ContextEntry]) -> String {
    let mut rendered = String::new();
    for entry in entries {
        rendered.push_str("Source: ");
        rendered.push_str(&entry.source);
        rendered.push_str("\nContent: ");
        rendered.push_str(&entry.text);
        rendered.push_str("\n\n");
    }
    truncate_chars(rendered, MAX_CONTEXT_CHARS)
}

/// Wrap the rendered context and the user query with the fixed instruction
/// preamble.
pub fn assemble_prompt(context: &str, user_query: &str) -> String {
    format!("{SYSTEM_INSTRUCTION}\n\nContext:\n{context}\n\nUser Query: {user_query}")
}

/// Cut a string to at most `max` characters, appending the truncation marker
/// when anything was removed. Operates on char boundaries, never splitting a
/// code point.
fn truncate_chars(s: String, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_index, _)) => {
            let mut truncated = s[..byte_index].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str, text: &str) -> ContextEntry {
        ContextEntry {
            source: source.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_render_format_and_order() {
        let entries = vec![
            entry("https://example.com/a", "first"),
            entry("https://example.com/b", "second"),
        ];
        let rendered = render_context(&entries);
        assert_eq!(
            rendered,
            "Source: https://example.com/a\nContent: first\n\n\
             Source: https://example.com/b\nContent: second\n\n"
        );
    }

    #[test]
    fn test_small_context_is_not_truncated() {
        let rendered = render_context(&[entry("https://example.com", "short")]);
        assert!(!rendered.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncation_bounds_context_length() {
        let huge = "x".repeat(MAX_CONTEXT_CHARS * 2);
        let rendered = render_context(&[entry("https://example.com", &huge)]);

        assert!(rendered.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            rendered.chars().count(),
            MAX_CONTEXT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn test_truncation_never_splits_a_code_point() {
        let multibyte = "₹".repeat(MAX_CONTEXT_CHARS * 2);
        let rendered = render_context(&[entry("https://example.com", &multibyte)]);
        assert!(rendered.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_assembled_prompt_shape() {
        let prompt = assemble_prompt("Source: s\nContent: c\n\n", "What is the NAV of fund X?");

        assert!(prompt.starts_with("You are an AI assistant specialized in Indian Mutual Funds."));
        assert!(prompt.contains("Context:\nSource: s\nContent: c\n\n"));
        assert!(prompt.ends_with("User Query: What is the NAV of fund X?"));
    }
}
