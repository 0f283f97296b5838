//! Generative text service contract.

use async_trait::async_trait;

use crate::retry::{RetryFailure, RetryPolicy, retry_with_backoff};

use super::error::AiError;

/// Sampling temperature sent with every request.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Output budget sent with every request.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4_000;

/// Generation parameters passed through to the service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum number of output tokens.
    pub max_output_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

/// A remote service that turns a prompt into free text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeTextService: Send + Sync {
    /// Generate text for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] when the request fails or the response carries no
    /// text.
    async fn generate(&self, prompt: &str, options: &GenerationOptions)
    -> Result<String, AiError>;
}

/// Calls `service` under the retry policy.
///
/// # Errors
///
/// Returns the last [`AiError`] with its attempt count once the policy gives
/// up or a permanent error is seen.
pub async fn generate_with_retry<S>(
    service: &S,
    policy: &RetryPolicy,
    prompt: &str,
    options: &GenerationOptions,
) -> Result<String, RetryFailure<AiError>>
where
    S: GenerativeTextService + ?Sized,
{
    retry_with_backoff(policy, "generate text", move |_| {
        service.generate(prompt, options)
    })
    .await
}
