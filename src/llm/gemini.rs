//! Gemini backend
//!
//! Posts the prompt as a generateContent request with the API key as a query
//! parameter, and extracts the answer from the nested candidates path. A
//! moderation block is surfaced with its reason; any other unusable payload
//! yields a fixed fallback message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::llm::AnswerBackend;

const NO_RESPONSE_MESSAGE: &str = "Error: Could not extract a valid response from Gemini.";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

/// Client for the Gemini generateContent API
pub struct GeminiClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client for the given generateContent endpoint
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    /// Set the endpoint URL (for testing only)
    #[cfg(test)]
    pub fn set_api_url(&mut self, api_url: String) {
        self.api_url = api_url;
    }
}

#[async_trait]
impl AnswerBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Sending generateContent request ({} prompt chars)", prompt.chars().count());
        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload = response.text().await?;
        Ok(extract_answer(&payload))
    }
}

/// Pull the answer text out of a generateContent response body
fn extract_answer(payload: &str) -> String {
    let parsed: GenerateContentResponse = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Failed to parse Gemini response: {}", e);
            return NO_RESPONSE_MESSAGE.to_string();
        }
    };

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text);

    if let Some(text) = text {
        return text;
    }

    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return format!(
            "Error: The request was blocked by Gemini for the following reason: {}",
            reason
        );
    }

    NO_RESPONSE_MESSAGE.to_string()
}
