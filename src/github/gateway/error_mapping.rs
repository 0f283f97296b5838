//! Maps Octocrab failures onto [`GitHubError`] variants.

use http::StatusCode;

use crate::github::error::GitHubError;

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the GitHub error represents a rate limit error based on the
/// HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    source.status_code == StatusCode::TOO_MANY_REQUESTS
        || (is_rate_limit_status && message_indicates_rate_limit)
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> GitHubError {
    if let octocrab::Error::GitHub { source, .. } = error {
        if is_rate_limit_error(source) {
            return GitHubError::RateLimitExceeded {
                message: format!("{operation} failed: {}", source.message),
            };
        }
        return map_status(operation, source.status_code, &source.message);
    }

    if is_network_error(error) {
        return GitHubError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    if matches!(error, octocrab::Error::Serde { .. } | octocrab::Error::Json { .. }) {
        return GitHubError::Decode {
            message: format!("{operation} failed: {error}"),
        };
    }

    GitHubError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

fn map_status(operation: &str, status: StatusCode, github_message: &str) -> GitHubError {
    let message = format!("{operation} failed: {github_message}");
    match status {
        StatusCode::UNAUTHORIZED => GitHubError::Authentication { message },
        StatusCode::FORBIDDEN => GitHubError::PermissionDenied { message },
        StatusCode::NOT_FOUND => GitHubError::NotFound { message },
        StatusCode::CONFLICT => GitHubError::StaleRevision { message },
        StatusCode::UNPROCESSABLE_ENTITY => GitHubError::Validation { message },
        server if server.is_server_error() => GitHubError::ServerError {
            status: server.as_u16(),
            message,
        },
        other => GitHubError::Api {
            message: format!("{operation} failed with status {other}: {github_message}"),
        },
    }
}
