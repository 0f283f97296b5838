//! Error types exposed by the GitHub gateway layer.

use thiserror::Error;

use crate::retry::{Classify, FailureClass};

/// Errors surfaced while validating input or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitHubError {
    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// Repository owner or name was blank.
    #[error("repository must be given as a non-empty owner and name")]
    MissingRepository,

    /// A configured URL could not be parsed.
    #[error("GitHub API URL is invalid: {0}")]
    InvalidUrl(String),

    /// The token was rejected (401).
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401 response.
        message: String,
    },

    /// The token lacks permission for the operation (403).
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// GitHub error message returned with the 403 response.
        message: String,
    },

    /// The repository, branch or path does not exist (404).
    #[error("not found: {message}")]
    NotFound {
        /// GitHub error message returned with the 404 response.
        message: String,
    },

    /// The branch name is already taken.
    #[error("branch already exists: {message}")]
    BranchExists {
        /// GitHub error message describing the clash.
        message: String,
    },

    /// The branch head moved while a file write was in flight (409).
    #[error("SHA conflict: {message}")]
    StaleRevision {
        /// GitHub error message returned with the 409 response.
        message: String,
    },

    /// The file path was rejected by the contents API.
    #[error("invalid file path: {message}")]
    InvalidPath {
        /// GitHub error message describing the rejection.
        message: String,
    },

    /// GitHub rejected the request payload (422).
    #[error("validation failed: {message}")]
    Validation {
        /// GitHub error message returned with the 422 response.
        message: String,
    },

    /// Rate limit exceeded (429, or 403 with a rate limit message).
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// GitHub reported a server-side failure (5xx).
    #[error("GitHub server error {status}: {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response message from GitHub.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// GitHub returned a response that could not be interpreted.
    #[error("unexpected GitHub response: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// Any other GitHub API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },
}

impl Classify for GitHubError {
    fn failure_class(&self) -> FailureClass {
        match self {
            Self::RateLimitExceeded { .. }
            | Self::ServerError { .. }
            | Self::Network { .. }
            | Self::StaleRevision { .. } => FailureClass::Transient,
            _ => FailureClass::Permanent,
        }
    }
}
