//! LLM gateway
//!
//! One capability interface over the two interchangeable backends: the
//! Gemini cloud API and a self-hosted Ollama server. Both take the fully
//! assembled prompt and return answer text. Responses the model declined or
//! that cannot be parsed come back as fixed error strings in the answer
//! position; only transport failures surface as `Err`, and the pipeline
//! converts those to user-visible text as well.

mod gemini;
mod ollama;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::BackendConfig;
use crate::error::Result;

/// A backend that can answer an assembled prompt
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Human-readable backend name, used in error strings and logs
    fn name(&self) -> &'static str;

    /// Send the prompt and return the answer text.
    ///
    /// Unusable response payloads are reported as `Ok` error strings;
    /// `Err` means the request itself failed.
    async fn ask(&self, prompt: &str) -> Result<String>;
}

/// Build the configured backend
pub fn from_config(config: &BackendConfig) -> Arc<dyn AnswerBackend> {
    match config {
        BackendConfig::Gemini { api_url, api_key } => {
            Arc::new(GeminiClient::new(api_url.clone(), api_key.clone()))
        }
        BackendConfig::Ollama { endpoint, model } => {
            Arc::new(OllamaClient::new(endpoint.clone(), model.clone()))
        }
    }
}
