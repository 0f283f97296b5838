//! Data models for repository browsing and mutation.
//!
//! Types prefixed with `Api` are internal (de)serialisation targets for the
//! GitHub REST API that convert into public domain types.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::error::GitHubError;

/// Opaque commit SHA a branch head points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionId(String);

impl RevisionId {
    /// Wraps a revision string returned by GitHub.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the revision value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A file to place on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    path: String,
    content: String,
}

impl RemoteFile {
    /// Creates a file from a repository-relative path and UTF-8 content.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidPath`] when the path is blank.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Result<Self, GitHubError> {
        let raw_path = path.into();
        let trimmed = raw_path.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(GitHubError::InvalidPath {
                message: "file path must not be empty".to_owned(),
            });
        }
        Ok(Self {
            path: trimmed.to_owned(),
            content: content.into(),
        })
    }

    /// Repository-relative path.
    #[must_use]
    pub const fn path(&self) -> &str {
        self.path.as_str()
    }

    /// File content.
    #[must_use]
    pub const fn content(&self) -> &str {
        self.content.as_str()
    }
}

/// Result of a successful file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    /// Path that was written.
    pub path: String,
    /// Commit SHA created by the write.
    pub remote_revision_id: String,
}

/// Parameters for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRequest {
    title: String,
    body: String,
    head_branch: String,
    base_branch: String,
}

impl PullRequestRequest {
    /// Creates a request, rejecting a blank title.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Validation`] when `title` is blank.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        head_branch: impl Into<String>,
        base_branch: impl Into<String>,
    ) -> Result<Self, GitHubError> {
        let title_value = title.into();
        if title_value.trim().is_empty() {
            return Err(GitHubError::Validation {
                message: "pull request title must not be empty".to_owned(),
            });
        }
        Ok(Self {
            title: title_value,
            body: body.into(),
            head_branch: head_branch.into(),
            base_branch: base_branch.into(),
        })
    }

    /// Pull request title.
    #[must_use]
    pub const fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Pull request description.
    #[must_use]
    pub const fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Branch holding the changes.
    #[must_use]
    pub const fn head_branch(&self) -> &str {
        self.head_branch.as_str()
    }

    /// Branch the changes merge into.
    #[must_use]
    pub const fn base_branch(&self) -> &str {
        self.base_branch.as_str()
    }
}

/// Pull request returned by GitHub after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestResult {
    /// Global pull request identifier.
    pub id: u64,
    /// Repository-scoped pull request number.
    pub number: u64,
    /// Browser URL.
    pub url: Option<String>,
    /// State such as `open`.
    pub state: Option<String>,
    /// Title as stored by GitHub.
    pub title: Option<String>,
}

/// Repository visible to the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    /// Repository identifier.
    pub id: u64,
    /// Short name.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Owner login.
    pub owner: Option<String>,
    /// Description, if any.
    pub description: Option<String>,
    /// Primary language reported by GitHub.
    pub language: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
    /// Whether the repository is private.
    pub private: bool,
    /// Whether the repository is a fork.
    pub fork: bool,
    /// Star count.
    pub stargazers_count: u64,
    /// Fork count.
    pub forks_count: u64,
}

/// Kind of a directory entry returned by the contents API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Symlink, submodule or anything else.
    Other,
}

/// Directory entry returned by the contents API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// File or directory name.
    pub name: String,
    /// Repository-relative path.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Entry kind.
    pub kind: ContentKind,
}

/// Source file discovered while walking a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Repository-relative path.
    pub path: String,
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

impl From<ContentEntry> for SourceFile {
    fn from(entry: ContentEntry) -> Self {
        Self {
            path: entry.path,
            name: entry.name,
            size: entry.size,
        }
    }
}

/// Decoded content of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Repository-relative path.
    pub path: String,
    /// File name.
    pub name: String,
    /// Blob SHA.
    pub sha: String,
    /// UTF-8 content.
    pub content: String,
}

/// Authenticated GitHub user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubUser {
    /// Login name.
    pub login: String,
    /// Display name.
    pub name: Option<String>,
    /// Public email.
    pub email: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
}

/// Visibility and permissions of a repository for the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryPermissions {
    /// Whether the repository is private.
    pub private: bool,
    /// Whether the token may push. `None` when GitHub omitted permissions.
    pub push: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranch {
    pub(crate) commit: ApiCommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitRef {
    pub(crate) sha: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiCreateRef<'a> {
    #[serde(rename = "ref")]
    pub(crate) name: String,
    pub(crate) sha: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitRef {
    #[serde(rename = "ref")]
    pub(crate) name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiPutContent<'a> {
    pub(crate) message: &'a str,
    pub(crate) content: String,
    pub(crate) branch: &'a str,
}

impl<'a> ApiPutContent<'a> {
    pub(crate) fn encode(file: &RemoteFile, message: &'a str, branch: &'a str) -> Self {
        Self {
            message,
            content: STANDARD.encode(file.content()),
            branch,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPutContentResponse {
    pub(crate) commit: ApiCommitRef,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiCreatePull<'a> {
    pub(crate) title: &'a str,
    pub(crate) body: &'a str,
    pub(crate) head: &'a str,
    pub(crate) base: &'a str,
}

impl<'a> From<&'a PullRequestRequest> for ApiCreatePull<'a> {
    fn from(request: &'a PullRequestRequest) -> Self {
        Self {
            title: request.title(),
            body: request.body(),
            head: request.head_branch(),
            base: request.base_branch(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) id: u64,
    pub(crate) number: u64,
    pub(crate) html_url: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) title: Option<String>,
}

impl From<ApiPullRequest> for PullRequestResult {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            id: value.id,
            number: value.number,
            url: value.html_url,
            state: value.state,
            title: value.title,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: String,
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) avatar_url: Option<String>,
}

impl From<ApiUser> for GitHubUser {
    fn from(value: ApiUser) -> Self {
        Self {
            login: value.login,
            name: value.name,
            email: value.email,
            avatar_url: value.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiOwner {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) owner: Option<ApiOwner>,
    pub(crate) description: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) updated_at: Option<String>,
    #[serde(default)]
    pub(crate) private: bool,
    #[serde(default)]
    pub(crate) fork: bool,
    #[serde(default)]
    pub(crate) stargazers_count: u64,
    #[serde(default)]
    pub(crate) forks_count: u64,
    pub(crate) permissions: Option<ApiPermissions>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct ApiPermissions {
    #[serde(default)]
    pub(crate) push: bool,
}

impl From<ApiRepository> for RepositorySummary {
    fn from(value: ApiRepository) -> Self {
        Self {
            id: value.id,
            name: value.name,
            full_name: value.full_name,
            owner: value.owner.and_then(|owner| owner.login),
            description: value.description,
            language: value.language,
            updated_at: value.updated_at,
            private: value.private,
            fork: value.fork,
            stargazers_count: value.stargazers_count,
            forks_count: value.forks_count,
        }
    }
}

impl From<&ApiRepository> for RepositoryPermissions {
    fn from(value: &ApiRepository) -> Self {
        Self {
            private: value.private,
            push: value.permissions.map(|permissions| permissions.push),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiContentEntry {
    pub(crate) name: String,
    pub(crate) path: String,
    #[serde(default)]
    pub(crate) size: u64,
    #[serde(rename = "type")]
    pub(crate) kind: String,
}

impl From<ApiContentEntry> for ContentEntry {
    fn from(value: ApiContentEntry) -> Self {
        let kind = match value.kind.as_str() {
            "file" => ContentKind::File,
            "dir" => ContentKind::Dir,
            _ => ContentKind::Other,
        };
        Self {
            name: value.name,
            path: value.path,
            size: value.size,
            kind,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiFileContent {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) sha: String,
    #[serde(default)]
    pub(crate) content: String,
}

impl TryFrom<ApiFileContent> for FileContent {
    type Error = GitHubError;

    fn try_from(value: ApiFileContent) -> Result<Self, Self::Error> {
        // The contents API wraps base64 at 60 columns.
        let compact: String = value
            .content
            .chars()
            .filter(|character| !character.is_ascii_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|error| GitHubError::Decode {
                message: format!("{}: invalid base64 content: {error}", value.path),
            })?;
        let content = String::from_utf8(bytes).map_err(|error| GitHubError::Decode {
            message: format!("{}: content is not UTF-8: {error}", value.path),
        })?;

        Ok(Self {
            path: value.path,
            name: value.name,
            sha: value.sha,
            content,
        })
    }
}
