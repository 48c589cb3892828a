// netoptimize-gateway-rs/src/llm_client.rs
//
// HTTP client for the Google Gemini `generateContent` API
//
// This module provides:
// - The `ChatModel` seam the HTTP handlers depend on
// - A reqwest-backed `GeminiClient` sending one user-role message per call
// - Classification of upstream failures into `LLMError`
//
// There is no retry loop: every failure is reported to the caller as-is.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::GatewayConfig;

/// A text-generation backend that turns one prompt into one reply
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LLMError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    /// 400, 401, 403, 404 - client-side problems such as a bad key or unknown model
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// 500, 502, 503, 504
    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Prompt blocked by provider: {0}")]
    Blocked(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: Option<f32>,
}

impl GeminiClient {
    /// Build a client from the gateway configuration
    ///
    /// The underlying connection pool is created once here and reused for every call.
    pub fn new(config: &GatewayConfig) -> Result<Self, LLMError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| LLMError::NetworkError(format!("Failed to build HTTP client: {}", err)))?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        );

        tracing::info!(model = %config.model, endpoint = %endpoint, "Gemini client initialized");

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: self
                .temperature
                .map(|temperature| GenerationConfig { temperature }),
        }
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LLMError> {
        let request_body = self.build_request(prompt);

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, text));
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| LLMError::ParseError(format!("Failed to parse response: {}", err)))?;

        if let Some(usage) = data.usage_metadata.as_ref().and_then(|u| u.total_token_count) {
            tracing::info!("LLM request completed. Used {} tokens", usage);
        }

        extract_text(data)
    }
}

fn classify_transport_error(err: reqwest::Error) -> LLMError {
    if err.is_timeout() {
        LLMError::NetworkError(format!("Request timed out: {}", err))
    } else if err.is_connect() {
        LLMError::NetworkError(format!("Connection failed: {}", err))
    } else {
        LLMError::NetworkError(err.to_string())
    }
}

fn classify_status(status: StatusCode, text: String) -> LLMError {
    match status.as_u16() {
        400 => LLMError::InvalidRequest(format!("Bad request: {}", text)),
        401 => LLMError::InvalidRequest(format!("Unauthorized: {}", text)),
        403 => LLMError::InvalidRequest(format!("Forbidden: {}", text)),
        404 => LLMError::InvalidRequest(format!("Not found: {}", text)),
        429 => LLMError::RateLimitExceeded(text),
        500 | 502 | 503 | 504 => LLMError::ServerError(format!("({}) {}", status, text)),
        _ => LLMError::UnknownError(format!("({}) {}", status, text)),
    }
}

fn extract_text(data: GenerateContentResponse) -> Result<String, LLMError> {
    if let Some(reason) = data.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LLMError::Blocked(reason));
    }

    let content = data
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .ok_or_else(|| LLMError::ParseError("No candidates returned in response".to_string()))?;

    Ok(content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .concat())
}
