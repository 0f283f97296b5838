//! AI service health check operation.

use std::io::{self, Write};

use casewright::ai::check_health;
use casewright::{
    CasewrightConfig, CliError, GeminiTextService, GenerativeTextService, RetryPolicy,
};

use super::output::write_health_report;

/// Sends a trivial prompt to the configured Gemini model and reports whether
/// it answered.
///
/// # Errors
///
/// Returns [`CliError::Ai`] with the last service error when the check does
/// not come back healthy.
pub async fn run(config: &CasewrightConfig) -> Result<(), CliError> {
    let service = GeminiTextService::new(config.gemini_config());
    let mut stdout = io::stdout().lock();
    run_with(&service, RetryPolicy::DEFAULT, &mut stdout).await
}

/// Runs the health check against a custom text service.
pub async fn run_with<S, W>(
    service: &S,
    retry_policy: RetryPolicy,
    writer: &mut W,
) -> Result<(), CliError>
where
    S: GenerativeTextService + ?Sized,
    W: Write,
{
    let report = check_health(service, &retry_policy).await;
    write_health_report(writer, &report)?;
    match report.error {
        Some(error) => Err(CliError::Ai(error)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use casewright::ai::health::HEALTH_CHECK_PROMPT;
    use casewright::{AiError, CliError, RetryPolicy};

    use super::run_with;
    use crate::cli::test_utils::ScriptedTextService;

    fn quick_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::ZERO, 2)
    }

    async fn check(service: &ScriptedTextService) -> (Result<(), CliError>, String) {
        let mut buffer = Vec::new();
        let result = run_with(service, quick_policy(), &mut buffer).await;
        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");
        (result, output)
    }

    #[tokio::test]
    async fn answered_prompt_reports_healthy_with_preview() {
        let service = ScriptedTextService::new([Ok("OK".to_owned())]);

        let (result, output) = check(&service).await;

        assert_eq!(result, Ok(()));
        assert_eq!(output, "Gemini AI: healthy\nResponse: OK\n");
        assert_eq!(
            *service.prompts.lock().expect("prompts mutex should be available"),
            vec![HEALTH_CHECK_PROMPT]
        );
    }

    #[tokio::test]
    async fn overloaded_service_is_temporarily_unavailable() {
        let overloaded = AiError::Unavailable {
            status: 503,
            message: "The model is overloaded.".to_owned(),
        };
        let service = ScriptedTextService::new((0..3).map(|_| Err(overloaded.clone())));

        let (result, output) = check(&service).await;

        assert_eq!(result, Err(CliError::Ai(overloaded)));
        assert_eq!(
            output,
            "Gemini AI: temporarily_unavailable after 3 attempt(s)\n\
             Offline test templates remain available.\n"
        );
    }

    #[tokio::test]
    async fn rejected_request_is_unhealthy_without_retry() {
        let rejected = AiError::InvalidRequest {
            status: 400,
            message: "API key not valid".to_owned(),
        };
        let service = ScriptedTextService::new([Err(rejected.clone())]);

        let (result, output) = check(&service).await;

        assert_eq!(result, Err(CliError::Ai(rejected)));
        assert!(
            output.starts_with("Gemini AI: unhealthy after 1 attempt(s)\n"),
            "{output}"
        );
        assert_eq!(
            service
                .prompts
                .lock()
                .expect("prompts mutex should be available")
                .len(),
            1
        );
    }
}
