/// LLM Client: the single point of entry for all generative backend calls.
///
/// ARCHITECTURAL RULE: No other module may call the Ollama API directly.
/// All LLM interactions MUST go through this module.
///
/// One bounded attempt per call. Callers decide what to do on failure; the
/// question generator falls straight through to its static bank.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const GENERATE_PATH: &str = "/api/generate";
const TEMPERATURE: f32 = 0.6;
const TOP_P: f32 = 0.8;
const NUM_PREDICT: u32 = 100;
/// Stop sequences keep the model to a single question line.
const STOP_SEQUENCES: &[&str] = &["\n\n", "Answer:", "Response:", "Follow-up Question:"];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can turn a prompt into raw text. `LlmClient` is the production
/// implementation; tests substitute canned backends.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

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
    top_p: f32,
    num_predict: u32,
    stop: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Client for a local Ollama-compatible `/api/generate` endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: &str, model: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{GENERATE_PATH}", base_url.trim_end_matches('/')),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                num_predict: NUM_PREDICT,
                stop: STOP_SEQUENCES,
            },
        }
    }
}

#[async_trait]
impl GenerativeBackend for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<OllamaError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        let text = parsed.response.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        debug!("LLM call succeeded: {} chars from {}", text.len(), self.model);
        Ok(text.to_string())
    }
}
