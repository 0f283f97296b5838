//! Bounded retry with exponential backoff for outbound calls.
//!
//! Every remote operation in casewright (GitHub writes, Gemini generation)
//! goes through [`retry_with_backoff`]. Errors classify themselves as
//! transient or permanent via [`Classify`]; only transient failures are
//! retried, and each retry waits `base_delay * multiplier^(attempt - 1)`.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// Whether a failure is expected to clear up on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Rate limiting, overload, timeouts, connection resets, 5xx responses.
    Transient,
    /// Validation, missing resources, permissions and everything else.
    Permanent,
}

impl FailureClass {
    /// Stable lowercase label for logs and messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Permanent => "permanent",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Errors that know whether retrying the identical request could succeed.
pub trait Classify {
    /// Returns the retry classification for this error.
    fn failure_class(&self) -> FailureClass;
}

/// Retry schedule shared by every outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Three attempts, waiting one second then two seconds.
    pub const DEFAULT: Self = Self {
        max_attempts: 3,
        base_delay: Duration::from_millis(1_000),
        backoff_multiplier: 2,
    };

    /// Creates a policy. A zero attempt budget is raised to one so the
    /// operation always runs at least once.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration, backoff_multiplier: u32) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            base_delay,
            backoff_multiplier,
        }
    }

    /// Total attempts allowed, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the first retry.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Factor applied to the delay after each failed attempt.
    #[must_use]
    pub const fn backoff_multiplier(&self) -> u32 {
        self.backoff_multiplier
    }

    /// Wait applied after the given failed attempt (1-indexed).
    ///
    /// With the default policy attempt 1 yields one second and attempt 2
    /// yields two seconds.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.backoff_multiplier.saturating_pow(exponent);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Final failure after the retry loop gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error} ({class} failure after {attempts} attempt(s))")]
pub struct RetryFailure<E> {
    /// Classification of the last observed error.
    pub class: FailureClass,
    /// The last observed error.
    pub error: E,
    /// Number of attempts made, including the first.
    pub attempts: u32,
}

impl<E> RetryFailure<E> {
    /// Discards the attempt metadata and returns the underlying error.
    #[must_use]
    pub fn into_error(self) -> E {
        self.error
    }
}

/// Runs `attempt` until it succeeds, fails permanently, or the policy's
/// attempt budget is spent.
///
/// The closure receives the 1-indexed attempt number. Retried calls re-issue
/// the identical request; callers own idempotence.
///
/// # Errors
///
/// Returns [`RetryFailure`] carrying the last error, its classification and
/// the number of attempts made.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt: F,
) -> Result<T, RetryFailure<E>>
where
    E: Classify + fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt_number = 1;

    loop {
        let error = match attempt(attempt_number).await {
            Ok(value) => {
                if attempt_number > 1 {
                    debug!(operation, attempt = attempt_number, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        let class = error.failure_class();
        if class == FailureClass::Permanent || attempt_number >= max_attempts {
            warn!(
                operation,
                attempt = attempt_number,
                max_attempts,
                class = class.label(),
                "giving up: {error}"
            );
            return Err(RetryFailure {
                class,
                error,
                attempts: attempt_number,
            });
        }

        let delay = policy.delay_after(attempt_number);
        warn!(
            operation,
            attempt = attempt_number,
            max_attempts,
            delay_ms = delay.as_millis(),
            "retrying after transient failure: {error}"
        );
        tokio::time::sleep(delay).await;
        attempt_number += 1;
    }
}
