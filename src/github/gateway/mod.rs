//! Gateways for talking to GitHub through Octocrab.
//!
//! The traits here are the seams the publish workflow and the CLI depend on.
//! Octocrab-backed implementations perform real HTTP requests while tests
//! substitute mockall doubles.

mod client;
mod error_mapping;
mod repository;

pub use repository::OctocrabRepositoryGateway;

use async_trait::async_trait;

use crate::github::error::GitHubError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{
    CommitResult, ContentEntry, FileContent, GitHubUser, PullRequestRequest, PullRequestResult,
    RemoteFile, RepositoryPermissions, RepositorySummary, RevisionId,
};

/// Branch, commit and pull request mutations on a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Resolve the commit a branch currently points at.
    async fn branch_head(
        &self,
        locator: &RepositoryLocator,
        branch: &str,
    ) -> Result<RevisionId, GitHubError>;

    /// Create `branch` pointing at `from`.
    async fn create_branch(
        &self,
        locator: &RepositoryLocator,
        branch: &str,
        from: &RevisionId,
    ) -> Result<(), GitHubError>;

    /// Create or update a single file on `branch`.
    async fn write_file(
        &self,
        locator: &RepositoryLocator,
        branch: &str,
        file: &RemoteFile,
        commit_message: &str,
    ) -> Result<CommitResult, GitHubError>;

    /// Open a pull request.
    async fn create_pull_request(
        &self,
        locator: &RepositoryLocator,
        request: &PullRequestRequest,
    ) -> Result<PullRequestResult, GitHubError>;
}

/// Read-only queries used to pick files and check access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrowseGateway: Send + Sync {
    /// Repositories of the authenticated user, most recently updated first.
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, GitHubError>;

    /// Entries of a directory. An empty `path` lists the repository root.
    async fn list_contents(
        &self,
        locator: &RepositoryLocator,
        path: &str,
    ) -> Result<Vec<ContentEntry>, GitHubError>;

    /// Decoded content of a single file.
    async fn file_content(
        &self,
        locator: &RepositoryLocator,
        path: &str,
    ) -> Result<FileContent, GitHubError>;

    /// The user that owns the token.
    async fn current_user(&self) -> Result<GitHubUser, GitHubError>;

    /// Visibility and push permission of the repository.
    async fn repository_permissions(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<RepositoryPermissions, GitHubError>;
}
