//! Ollama backend
//!
//! Posts the prompt to a self-hosted Ollama server's generate endpoint with
//! streaming disabled and a low temperature, and reads the flat `response`
//! field back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::llm::AnswerBackend;

const EMPTY_RESPONSE_MESSAGE: &str = "Error: Received an empty response from the model server.";
const NO_RESPONSE_MESSAGE: &str =
    "Error: Could not extract a valid response from the model server.";

/// Deterministic, context-bound answers want a low temperature
const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Client for a self-hosted Ollama server
pub struct OllamaClient {
    client: reqwest::Client,
    generate_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a client for the given server endpoint and model
    pub fn new(endpoint: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            generate_url: format!("{}/api/generate", endpoint.trim_end_matches('/')),
            model,
        }
    }
}

#[async_trait]
impl AnswerBackend for OllamaClient {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
            },
        };

        debug!("Sending generate request to {}", self.generate_url);
        let response = self
            .client
            .post(&self.generate_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload = response.text().await?;
        if payload.trim().is_empty() {
            return Ok(EMPTY_RESPONSE_MESSAGE.to_string());
        }

        Ok(extract_answer(&payload))
    }
}

fn extract_answer(payload: &str) -> String {
    match serde_json::from_str::<GenerateResponse>(payload) {
        Ok(GenerateResponse {
            response: Some(text),
        }) => text,
        Ok(GenerateResponse { response: None }) => {
            warn!("Ollama response carried no response field");
            NO_RESPONSE_MESSAGE.to_string()
        }
        Err(e) => {
            warn!("Failed to parse Ollama response: {}", e);
            NO_RESPONSE_MESSAGE.to_string()
        }
    }
}
