//! Octocrab-backed repository gateway.
//!
//! One client serves both the mutation calls used by the publish workflow and
//! the read-only browse calls used by the CLI.

use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::debug;

use crate::github::error::GitHubError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};
use crate::github::models::{
    ApiBranch, ApiContentEntry, ApiCreatePull, ApiCreateRef, ApiFileContent, ApiGitRef,
    ApiPullRequest, ApiPutContent, ApiPutContentResponse, ApiRepository, ApiUser, CommitResult,
    ContentEntry, FileContent, GitHubUser, PullRequestRequest, PullRequestResult, RemoteFile,
    RepositoryPermissions, RepositorySummary, RevisionId,
};

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;
use super::{BrowseGateway, RepositoryGateway};

/// Octocrab-backed repository gateway.
pub struct OctocrabRepositoryGateway {
    client: Octocrab,
}

impl OctocrabRepositoryGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and repository locator.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when the base URI cannot be parsed or
    /// `GitHubError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &RepositoryLocator,
    ) -> Result<Self, GitHubError> {
        Self::for_api_base(token, locator.api_base().as_str())
    }

    /// Builds a gateway for calls that are not tied to one repository.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when `api_base` cannot be parsed or
    /// `GitHubError::Api` when Octocrab fails to construct a client.
    pub fn for_api_base(token: &PersonalAccessToken, api_base: &str) -> Result<Self, GitHubError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl RepositoryGateway for OctocrabRepositoryGateway {
    async fn branch_head(
        &self,
        locator: &RepositoryLocator,
        branch: &str,
    ) -> Result<RevisionId, GitHubError> {
        let response: ApiBranch = self
            .client
            .get(locator.branch_path(branch), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("resolve branch", &error))?;
        Ok(RevisionId::new(response.commit.sha))
    }

    async fn create_branch(
        &self,
        locator: &RepositoryLocator,
        branch: &str,
        from: &RevisionId,
    ) -> Result<(), GitHubError> {
        let body = ApiCreateRef {
            name: format!("refs/heads/{branch}"),
            sha: from.as_str(),
        };
        let created: ApiGitRef = self
            .client
            .post(locator.refs_path(), Some(&body))
            .await
            .map_err(|error| match map_octocrab_error("create branch", &error) {
                GitHubError::Validation { message } if names_existing_reference(&message) => {
                    GitHubError::BranchExists { message }
                }
                other => other,
            })?;
        debug!(reference = %created.name, "created branch");
        Ok(())
    }

    async fn write_file(
        &self,
        locator: &RepositoryLocator,
        branch: &str,
        file: &RemoteFile,
        commit_message: &str,
    ) -> Result<CommitResult, GitHubError> {
        let body = ApiPutContent::encode(file, commit_message, branch);
        let response: ApiPutContentResponse = self
            .client
            .put(locator.contents_path(file.path()), Some(&body))
            .await
            .map_err(|error| match map_octocrab_error("write file", &error) {
                GitHubError::Validation { message } => GitHubError::InvalidPath { message },
                other => other,
            })?;
        Ok(CommitResult {
            path: file.path().to_owned(),
            remote_revision_id: response.commit.sha,
        })
    }

    async fn create_pull_request(
        &self,
        locator: &RepositoryLocator,
        request: &PullRequestRequest,
    ) -> Result<PullRequestResult, GitHubError> {
        let body = ApiCreatePull::from(request);
        let created: ApiPullRequest = self
            .client
            .post(locator.pulls_path(), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create pull request", &error))?;
        Ok(PullRequestResult::from(created))
    }
}

#[async_trait]
impl BrowseGateway for OctocrabRepositoryGateway {
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, GitHubError> {
        let query_params = [("sort", "updated"), ("per_page", "100")];
        let repositories: Vec<ApiRepository> = self
            .client
            .get("/user/repos", Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list repositories", &error))?;
        Ok(repositories
            .into_iter()
            .map(RepositorySummary::from)
            .collect())
    }

    async fn list_contents(
        &self,
        locator: &RepositoryLocator,
        path: &str,
    ) -> Result<Vec<ContentEntry>, GitHubError> {
        let entries: Vec<ApiContentEntry> = self
            .client
            .get(locator.contents_path(path), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("list contents", &error))?;
        Ok(entries.into_iter().map(ContentEntry::from).collect())
    }

    async fn file_content(
        &self,
        locator: &RepositoryLocator,
        path: &str,
    ) -> Result<FileContent, GitHubError> {
        let file: ApiFileContent = self
            .client
            .get(locator.contents_path(path), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("fetch file", &error))?;
        FileContent::try_from(file)
    }

    async fn current_user(&self) -> Result<GitHubUser, GitHubError> {
        self.client
            .get::<ApiUser, _, _>("/user", None::<&()>)
            .await
            .map(GitHubUser::from)
            .map_err(|error| map_octocrab_error("fetch user", &error))
    }

    async fn repository_permissions(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<RepositoryPermissions, GitHubError> {
        let repository: ApiRepository = self
            .client
            .get(locator.repository_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("fetch repository", &error))?;
        Ok(RepositoryPermissions::from(&repository))
    }
}

/// GitHub answers 422 "Reference already exists" for taken names and 422
/// "... is not a valid ref name" for malformed ones.
fn names_existing_reference(message: &str) -> bool {
    message.to_ascii_lowercase().contains("already exists")
}
