//! Errors raised while talking to the generative text service.

use thiserror::Error;

use crate::retry::{Classify, FailureClass};

/// Failures of a generation request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AiError {
    /// No API key was configured.
    #[error("Gemini API key is required (use --gemini-api-key, CASEWRIGHT_GEMINI_API_KEY, or GEMINI_API_KEY)")]
    MissingApiKey,

    /// The HTTP client or request could not be set up.
    #[error("AI configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// The service is throttling requests (429).
    #[error("Gemini API rate limited: {message}")]
    RateLimited {
        /// Error message returned by the service.
        message: String,
    },

    /// The service is overloaded or failing (5xx).
    #[error("Gemini API unavailable ({status}): {message}")]
    Unavailable {
        /// HTTP status code.
        status: u16,
        /// Error message returned by the service.
        message: String,
    },

    /// The service rejected the request.
    #[error("Gemini API error ({status}): {message}")]
    InvalidRequest {
        /// HTTP status code.
        status: u16,
        /// Error message returned by the service.
        message: String,
    },

    /// The request did not complete in time.
    #[error("Gemini API request timed out: {message}")]
    Timeout {
        /// Transport error description.
        message: String,
    },

    /// The connection failed or was reset.
    #[error("Gemini API transport failed: {message}")]
    Network {
        /// Transport error description.
        message: String,
    },

    /// The response did not carry generated text.
    #[error("invalid response from Gemini API: {message}")]
    InvalidResponse {
        /// What was wrong with the response.
        message: String,
    },

    /// Every supplied file lacked a path or content.
    #[error("no valid files provided")]
    NoValidFiles,
}

impl AiError {
    /// Returns `true` when the service itself is down or overloaded, which is
    /// when callers switch to offline templates.
    #[must_use]
    pub const fn is_service_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl Classify for AiError {
    fn failure_class(&self) -> FailureClass {
        match self {
            Self::RateLimited { .. }
            | Self::Unavailable { .. }
            | Self::Timeout { .. }
            | Self::Network { .. } => FailureClass::Transient,
            Self::MissingApiKey
            | Self::Configuration { .. }
            | Self::InvalidRequest { .. }
            | Self::InvalidResponse { .. }
            | Self::NoValidFiles => FailureClass::Permanent,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::AiError;
    use crate::retry::{Classify, FailureClass};

    fn text() -> String {
        "boom".to_owned()
    }

    #[rstest]
    #[case(AiError::RateLimited { message: text() }, FailureClass::Transient)]
    #[case(AiError::Unavailable { status: 503, message: text() }, FailureClass::Transient)]
    #[case(AiError::Timeout { message: text() }, FailureClass::Transient)]
    #[case(AiError::Network { message: text() }, FailureClass::Transient)]
    #[case(AiError::InvalidRequest { status: 400, message: text() }, FailureClass::Permanent)]
    #[case(AiError::MissingApiKey, FailureClass::Permanent)]
    #[case(AiError::InvalidResponse { message: text() }, FailureClass::Permanent)]
    fn classifies_errors(#[case] error: AiError, #[case] expected: FailureClass) {
        assert_eq!(error.failure_class(), expected);
    }

    #[test]
    fn only_unavailable_triggers_fallback() {
        assert!(AiError::Unavailable { status: 503, message: text() }.is_service_unavailable());
        assert!(!AiError::RateLimited { message: text() }.is_service_unavailable());
    }
}
