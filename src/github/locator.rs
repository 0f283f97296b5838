//! Identity wrappers for repositories and tokens.

use url::Url;

use super::error::GitHubError;

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, GitHubError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(GitHubError::MissingRepository);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, GitHubError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(GitHubError::MissingRepository);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, GitHubError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(GitHubError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Owner/repository pair plus the API base it lives behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a locator for a repository on `github.com`.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::MissingRepository` when owner or name is blank.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, GitHubError> {
        let api_base =
            Url::parse(DEFAULT_API_BASE).map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;

        Ok(Self {
            api_base,
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// Points the locator at a different API base, such as a GitHub
    /// Enterprise `https://host/api/v3` endpoint.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when `api_base` cannot be parsed.
    pub fn with_api_base(mut self, api_base: &str) -> Result<Self, GitHubError> {
        self.api_base =
            Url::parse(api_base).map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;
        Ok(self)
    }

    /// GitHub API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    pub(crate) fn repository_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    pub(crate) fn branch_path(&self, branch: &str) -> String {
        format!("{}/branches/{branch}", self.repository_path())
    }

    pub(crate) fn refs_path(&self) -> String {
        format!("{}/git/refs", self.repository_path())
    }

    /// Contents route for `path`, with each segment percent-encoded.
    pub(crate) fn contents_path(&self, path: &str) -> String {
        let file_segments = path.split('/').filter(|segment| !segment.is_empty());
        let mut route = self.api_base.clone();
        match route.path_segments_mut() {
            Ok(mut segments) => {
                segments
                    .clear()
                    .extend([
                        "repos",
                        self.owner.as_str(),
                        self.repository.as_str(),
                        "contents",
                    ])
                    .extend(file_segments);
            }
            Err(()) => {
                let joined: Vec<&str> = file_segments.collect();
                return format!("{}/contents/{}", self.repository_path(), joined.join("/"));
            }
        }
        route.path().to_owned()
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("{}/pulls", self.repository_path())
    }
}
