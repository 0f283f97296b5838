//! Reachability check for the generative text service.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::retry::{RetryPolicy, retry_with_backoff};

use super::error::AiError;
use super::service::{GenerationOptions, GenerativeTextService};

/// Prompt sent to the service by [`check_health`].
pub const HEALTH_CHECK_PROMPT: &str =
    "Hello, this is a test. Please respond with \"OK\" if you can process this request.";

const RESPONSE_PREVIEW_CHARS: usize = 100;

/// Outcome category of a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// The service answered the prompt.
    Healthy,
    /// The service is overloaded, down or timing out.
    TemporarilyUnavailable,
    /// The service rejected the request or is misconfigured.
    Unhealthy,
}

impl HealthStatus {
    /// Stable lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
            Self::Unhealthy => "unhealthy",
        }
    }

    fn for_error(error: &AiError) -> Self {
        if error.is_service_unavailable() || matches!(error, AiError::Timeout { .. }) {
            Self::TemporarilyUnavailable
        } else {
            Self::Unhealthy
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Result of [`check_health`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    /// Overall status.
    pub status: HealthStatus,
    /// Start of the service's answer, cut to 100 characters.
    pub response_preview: Option<String>,
    /// Last error seen when the check failed.
    pub error: Option<AiError>,
    /// Requests made, including retries.
    pub attempts: u32,
}

impl HealthReport {
    /// Offline templates stand in whenever the service is not healthy.
    #[must_use]
    pub const fn fallback_available(&self) -> bool {
        !matches!(self.status, HealthStatus::Healthy)
    }
}

/// Sends [`HEALTH_CHECK_PROMPT`] under `policy` and classifies the outcome.
pub async fn check_health<S>(service: &S, policy: &RetryPolicy) -> HealthReport
where
    S: GenerativeTextService + ?Sized,
{
    let options = GenerationOptions::default();
    let last_attempt = AtomicU32::new(0);
    let outcome = retry_with_backoff(policy, "check AI health", |attempt| {
        last_attempt.store(attempt, Ordering::Relaxed);
        service.generate(HEALTH_CHECK_PROMPT, &options)
    })
    .await;
    match outcome {
        Ok(response) => HealthReport {
            status: HealthStatus::Healthy,
            response_preview: Some(preview(&response)),
            error: None,
            attempts: last_attempt.load(Ordering::Relaxed),
        },
        Err(failure) => HealthReport {
            status: HealthStatus::for_error(&failure.error),
            response_preview: None,
            attempts: failure.attempts,
            error: Some(failure.error),
        },
    }
}

fn preview(response: &str) -> String {
    let trimmed = response.trim();
    let mut chars = trimmed.chars();
    let head: String = chars.by_ref().take(RESPONSE_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
