//! Top-level error surfaced by the command-line entrypoint.

use thiserror::Error;

use crate::ai::AiError;
use crate::github::GitHubError;
use crate::publish::{AccessCheckError, PublishFailure};

/// Errors reported to the user before the process exits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// A GitHub call failed outside the publish workflow.
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// The generative text service failed.
    #[error(transparent)]
    Ai(#[from] AiError),

    /// The push access pre-check refused to continue.
    #[error(transparent)]
    Access(#[from] AccessCheckError),

    /// The publish workflow stopped early.
    #[error("failed to create pull request: {0}")]
    Publish(#[from] PublishFailure),

    /// Writing output failed.
    #[error("failed to write output: {message}")]
    Io {
        /// Description of the I/O failure.
        message: String,
    },
}

impl CliError {
    /// Builds a [`CliError::Configuration`] from a message.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
