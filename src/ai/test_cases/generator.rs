//! Summary and code generation with offline fallback.

use tracing::{info, warn};

use crate::ai::error::AiError;
use crate::ai::service::{GenerationOptions, GenerativeTextService, generate_with_retry};
use crate::retry::{RetryFailure, RetryPolicy};

use super::fallback::{fallback_summaries, fallback_test_code};
use super::frameworks::{DEFAULT_FRAMEWORK, default_framework};
use super::model::{GeneratedTestCode, SourceSnippet, TestSummaryReport};
use super::parse::{parse_code_response, parse_summary_response};
use super::prompts::{code_prompt, summary_prompt};

/// Produces test summaries and test code through a generative service.
pub struct TestCaseGenerator<'service, Service>
where
    Service: GenerativeTextService + ?Sized,
{
    service: &'service Service,
    retry_policy: RetryPolicy,
    options: GenerationOptions,
}

impl<'service, Service> TestCaseGenerator<'service, Service>
where
    Service: GenerativeTextService + ?Sized,
{
    /// Create a generator with the default retry policy and options.
    #[must_use]
    pub fn new(service: &'service Service) -> Self {
        Self {
            service,
            retry_policy: RetryPolicy::DEFAULT,
            options: GenerationOptions::default(),
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Summarises what to test in `files`.
    ///
    /// Snippets without a path or content are skipped. When the service is
    /// unavailable after retries, a locally built summary marked
    /// `is_fallback` is returned instead.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::NoValidFiles`] when no snippet is usable, or the
    /// service error for any failure other than unavailability.
    pub async fn summarise(&self, files: &[SourceSnippet]) -> Result<TestSummaryReport, AiError> {
        let usable = usable_snippets(files)?;
        let prompt = summary_prompt(&usable);

        match self.generate(&prompt).await {
            Ok(response) => Ok(parse_summary_response(&response)),
            Err(failure) if failure.error.is_service_unavailable() => {
                warn!("AI service unavailable, providing fallback summaries");
                Ok(fallback_summaries(&usable))
            }
            Err(failure) => Err(failure.into_error()),
        }
    }

    /// Generates test code for `files` guided by `summary`.
    ///
    /// Without an explicit `framework` the default for the first usable
    /// file's extension is used.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::NoValidFiles`] when no snippet is usable, or the
    /// service error for any failure other than unavailability.
    pub async fn generate_code(
        &self,
        summary: &TestSummaryReport,
        files: &[SourceSnippet],
        framework: Option<&str>,
    ) -> Result<GeneratedTestCode, AiError> {
        let usable = usable_snippets(files)?;
        let chosen = framework
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| {
                let inferred = usable
                    .first()
                    .map_or(DEFAULT_FRAMEWORK, |file| default_framework(&file.extension()));
                inferred.to_owned()
            });
        let prompt = code_prompt(summary, &usable, &chosen);

        match self.generate(&prompt).await {
            Ok(response) => Ok(GeneratedTestCode {
                blocks: parse_code_response(&response),
                framework: chosen,
                is_fallback: false,
            }),
            Err(failure) if failure.error.is_service_unavailable() => {
                warn!("AI service unavailable, providing fallback test code");
                Ok(GeneratedTestCode {
                    blocks: fallback_test_code(&usable, &chosen),
                    framework: chosen,
                    is_fallback: true,
                })
            }
            Err(failure) => Err(failure.into_error()),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, RetryFailure<AiError>> {
        let result =
            generate_with_retry(self.service, &self.retry_policy, prompt, &self.options).await;
        if let Ok(response) = &result {
            info!(response_chars = response.len(), "AI response received");
        }
        result
    }
}

fn usable_snippets(files: &[SourceSnippet]) -> Result<Vec<SourceSnippet>, AiError> {
    let usable: Vec<SourceSnippet> = files
        .iter()
        .filter(|file| file.is_usable())
        .cloned()
        .collect();
    if usable.is_empty() {
        return Err(AiError::NoValidFiles);
    }
    Ok(usable)
}
