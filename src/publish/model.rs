//! Inputs to the publish workflow.

use std::time::Duration;

use crate::github::{GitHubError, PullRequestRequest, RepositoryLocator};
use crate::retry::RetryPolicy;

/// Title used when the caller does not supply one.
pub const DEFAULT_PULL_REQUEST_TITLE: &str = "Auto-generated test cases";

/// Body used when the caller does not supply one.
pub const DEFAULT_PULL_REQUEST_BODY: &str =
    "This PR contains automatically generated test cases for the selected files.";

/// Pause between consecutive file writes on the same branch.
pub const DEFAULT_INTER_WRITE_PAUSE: Duration = Duration::from_millis(500);

/// Target repository plus the base and working branch names.
///
/// The working branch name is used exactly as given. A name that is already
/// taken fails the workflow; it is never altered and retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRequest {
    locator: RepositoryLocator,
    base_branch: String,
    new_branch: String,
}

impl BranchRequest {
    /// Creates a request.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Validation`] when either branch name is blank or
    /// both names are the same.
    pub fn new(
        locator: RepositoryLocator,
        base_branch: impl Into<String>,
        new_branch: impl Into<String>,
    ) -> Result<Self, GitHubError> {
        let base = base_branch.into().trim().to_owned();
        let new = new_branch.into().trim().to_owned();
        if base.is_empty() || new.is_empty() {
            return Err(GitHubError::Validation {
                message: "branch names must not be empty".to_owned(),
            });
        }
        if base == new {
            return Err(GitHubError::Validation {
                message: format!("new branch must differ from base branch `{base}`"),
            });
        }
        Ok(Self {
            locator,
            base_branch: base,
            new_branch: new,
        })
    }

    /// Repository the branch lives in.
    #[must_use]
    pub const fn locator(&self) -> &RepositoryLocator {
        &self.locator
    }

    /// Branch the work starts from and merges back into.
    #[must_use]
    pub const fn base_branch(&self) -> &str {
        self.base_branch.as_str()
    }

    /// Branch created to hold the new files.
    #[must_use]
    pub const fn new_branch(&self) -> &str {
        self.new_branch.as_str()
    }

    /// `owner/name` of the target repository.
    #[must_use]
    pub fn repository_label(&self) -> String {
        format!(
            "{}/{}",
            self.locator.owner().as_str(),
            self.locator.repository().as_str()
        )
    }

    /// Builds the pull request that merges the working branch into the base.
    ///
    /// Blank `title` and `body` fall back to [`DEFAULT_PULL_REQUEST_TITLE`]
    /// and [`DEFAULT_PULL_REQUEST_BODY`].
    ///
    /// # Errors
    ///
    /// Propagates [`PullRequestRequest::new`] validation failures.
    pub fn pull_request(
        &self,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<PullRequestRequest, GitHubError> {
        let chosen_title = title
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_PULL_REQUEST_TITLE);
        let chosen_body = body
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_PULL_REQUEST_BODY);
        PullRequestRequest::new(
            chosen_title,
            chosen_body,
            self.new_branch.as_str(),
            self.base_branch.as_str(),
        )
    }
}

/// Timing knobs for a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOptions {
    /// Pause between consecutive file writes. Not applied after the last one.
    pub inter_write_pause: Duration,
    /// Retry policy for branch creation, file writes and pull request creation.
    pub retry_policy: RetryPolicy,
}

impl PublishOptions {
    /// Creates options from explicit values.
    #[must_use]
    pub const fn new(inter_write_pause: Duration, retry_policy: RetryPolicy) -> Self {
        Self {
            inter_write_pause,
            retry_policy,
        }
    }
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self::new(DEFAULT_INTER_WRITE_PAUSE, RetryPolicy::DEFAULT)
    }
}
