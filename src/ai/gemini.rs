//! Gemini `generateContent` adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::AiError;
use super::service::{GenerationOptions, GenerativeTextService};

/// Default Gemini REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const OVERLOADED_MARKER: &str = "overloaded";

/// Configuration for [`GeminiTextService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// Base API URL (e.g., `https://generativelanguage.googleapis.com/v1`).
    pub base_url: String,
    /// Model identifier placed in the request path.
    pub model: String,
    /// API key sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// HTTP timeout.
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    /// Constructs configuration with required API settings.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            timeout,
        }
    }
}

/// Gemini-backed text generation.
#[derive(Debug, Clone, Default)]
pub struct GeminiTextService {
    config: GeminiConfig,
}

impl GeminiTextService {
    /// Creates a service from explicit configuration.
    #[must_use]
    pub const fn new(config: GeminiConfig) -> Self {
        Self { config }
    }

    fn extract_api_key(&self) -> Result<&str, AiError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AiError::MissingApiKey)
    }

    fn create_http_client(&self) -> Result<Client, AiError> {
        Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|error| AiError::Configuration {
                message: format!("failed to configure AI HTTP client: {error}"),
            })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl GenerativeTextService for GeminiTextService {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, AiError> {
        let api_key = self.extract_api_key()?;
        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            },
        };
        let client = self.create_http_client()?;

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "calling Gemini");
        let response = client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await
            .map_err(|error| map_transport_error(&error))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body));
        }

        let response_payload: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|error| AiError::InvalidResponse {
                    message: format!("response JSON decoding failed: {error}"),
                })?;

        response_payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| AiError::InvalidResponse {
                message: "response did not contain candidate text".to_owned(),
            })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
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
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn map_transport_error(error: &reqwest::Error) -> AiError {
    if error.is_timeout() {
        return AiError::Timeout {
            message: error.to_string(),
        };
    }
    AiError::Network {
        message: error.to_string(),
    }
}

fn map_status_error(status: StatusCode, body: &str) -> AiError {
    let message = serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| truncate_for_message(body, 160),
        |envelope| envelope.error.message,
    );
    let code = status.as_u16();

    match status {
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited { message },
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => AiError::Unavailable {
            status: code,
            message,
        },
        _ if message.to_lowercase().contains(OVERLOADED_MARKER) => AiError::Unavailable {
            status: code,
            message,
        },
        _ => AiError::InvalidRequest {
            status: code,
            message,
        },
    }
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}

#[cfg(test)]
#[path = "gemini_tests.rs"]
mod tests;
