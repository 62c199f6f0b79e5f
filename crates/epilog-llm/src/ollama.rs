//! Ollama Oracle Implementation
//!
//! Date-oracle backend running against a local Ollama instance.
//!
//! Every request runs in Ollama's JSON mode with sampling disabled, so
//! the model is constrained to emit the single JSON object the
//! response parser expects (`completion_date` / `confidence` /
//! `evidence`) and repeated calls on the same document are stable.
//!
//! Retry with exponential backoff lives here, inside the collaborator;
//! the coordination core never retries on its own and treats a surfaced
//! error as one failed extraction attempt. Only transport faults are
//! retried: a missing model or an undecodable payload will not improve
//! on a second attempt and is surfaced immediately.

use crate::OracleError;
use epilog_domain::traits::DateOracle as DateOracleTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for oracle requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API oracle for local LLM inference
pub struct OllamaOracle {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
    temperature: f32,
}

/// Request body for the Ollama generate API
///
/// `format: "json"` puts Ollama into constrained JSON mode; without it
/// models routinely wrap the payload in prose and the extraction is
/// wasted as an `InvalidResponse` failure.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
    options: serde_json::Value,
}

/// Response from the Ollama generate API
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaOracle {
    /// Create a new Ollama oracle
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama2", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: 0.0,
        }
    }

    /// Create an oracle against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the sampling temperature (default 0.0 for stable extraction)
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
            options: serde_json::json!({ "temperature": self.temperature }),
        }
    }

    /// Ask the model for a date payload, retrying transport faults with
    /// exponential backoff
    ///
    /// # Errors
    ///
    /// Returns an error if Ollama stays unreachable across all retry
    /// attempts, the model is missing, or the response body does not
    /// decode.
    pub async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = self.request_body(prompt);

        let mut delay = Duration::from_secs(1);
        let mut attempt = 1;
        loop {
            match self.request_once(&url, &body).await {
                Ok(payload) => return Ok(payload),
                Err(e) if !retryable(&e) => return Err(e),
                Err(e) => {
                    if attempt >= self.max_retries.max(1) {
                        return Err(e);
                    }
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
            }
        }
    }

    async fn request_once(
        &self,
        url: &str,
        body: &GenerateRequest<'_>,
    ) -> Result<String, OracleError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| OracleError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let payload: GenerateResponse = response.json().await.map_err(|e| {
                OracleError::InvalidResponse(format!("Failed to decode response: {}", e))
            })?;
            Ok(payload.response)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(OracleError::ModelNotAvailable(self.model.clone()))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(OracleError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )))
        }
    }
}

/// Whether a second attempt could plausibly succeed
fn retryable(error: &OracleError) -> bool {
    matches!(error, OracleError::Communication(_))
}

impl DateOracleTrait for OllamaOracle {
    type Error = OracleError;

    fn extract(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper for the async client; the scheduler calls this
        // from spawn_blocking so a fresh runtime per call is safe
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async { self.generate(prompt).await })
    }
}
