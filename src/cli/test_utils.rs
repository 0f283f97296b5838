//! Shared test utilities for CLI tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use casewright::ai::GenerationOptions;
use casewright::github::{
    CommitResult, ContentEntry, FileContent, GitHubUser, PullRequestRequest, PullRequestResult,
    RepositoryPermissions, RepositorySummary, RevisionId,
};
use casewright::{
    AiError, BrowseGateway, GenerativeTextService, GitHubError, RemoteFile, RepositoryGateway,
    RepositoryLocator,
};

/// In-memory GitHub double that records every mutation.
#[derive(Clone)]
pub struct FakeGitHub {
    /// Repositories returned by `list_repositories`.
    pub repositories: Vec<RepositorySummary>,
    /// Directory listings keyed by path.
    pub directories: HashMap<String, Vec<ContentEntry>>,
    /// File bodies keyed by path.
    pub files: HashMap<String, String>,
    /// Permissions reported for the repository.
    pub permissions: RepositoryPermissions,
    /// Branches created, in call order.
    pub created_branches: Arc<Mutex<Vec<String>>>,
    /// Paths written, in call order.
    pub written: Arc<Mutex<Vec<String>>>,
    /// Pull requests opened.
    pub pull_requests: Arc<Mutex<Vec<PullRequestRequest>>>,
}

impl Default for FakeGitHub {
    fn default() -> Self {
        Self {
            repositories: Vec::new(),
            directories: HashMap::new(),
            files: HashMap::new(),
            permissions: RepositoryPermissions {
                private: false,
                push: Some(true),
            },
            created_branches: Arc::default(),
            written: Arc::default(),
            pull_requests: Arc::default(),
        }
    }
}

impl FakeGitHub {
    /// Adds a file that `file_content` can return.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_owned(), content.to_owned());
        self
    }

    fn not_found(path: &str) -> GitHubError {
        GitHubError::NotFound {
            message: format!("{path} does not exist"),
        }
    }
}

#[async_trait]
impl BrowseGateway for FakeGitHub {
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, GitHubError> {
        Ok(self.repositories.clone())
    }

    async fn list_contents(
        &self,
        _locator: &RepositoryLocator,
        path: &str,
    ) -> Result<Vec<ContentEntry>, GitHubError> {
        self.directories
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    async fn file_content(
        &self,
        _locator: &RepositoryLocator,
        path: &str,
    ) -> Result<FileContent, GitHubError> {
        let content = self.files.get(path).ok_or_else(|| Self::not_found(path))?;
        Ok(FileContent {
            path: path.to_owned(),
            name: path.rsplit('/').next().unwrap_or(path).to_owned(),
            sha: "blob-sha".to_owned(),
            content: content.clone(),
        })
    }

    async fn current_user(&self) -> Result<GitHubUser, GitHubError> {
        Ok(GitHubUser {
            login: "octocat".to_owned(),
            name: None,
            email: None,
            avatar_url: None,
        })
    }

    async fn repository_permissions(
        &self,
        _locator: &RepositoryLocator,
    ) -> Result<RepositoryPermissions, GitHubError> {
        Ok(self.permissions)
    }
}

#[async_trait]
impl RepositoryGateway for FakeGitHub {
    async fn branch_head(
        &self,
        _locator: &RepositoryLocator,
        _branch: &str,
    ) -> Result<RevisionId, GitHubError> {
        Ok(RevisionId::new("base-sha"))
    }

    async fn create_branch(
        &self,
        _locator: &RepositoryLocator,
        branch: &str,
        _from: &RevisionId,
    ) -> Result<(), GitHubError> {
        self.created_branches
            .lock()
            .expect("branches mutex should be available")
            .push(branch.to_owned());
        Ok(())
    }

    async fn write_file(
        &self,
        _locator: &RepositoryLocator,
        _branch: &str,
        file: &RemoteFile,
        _commit_message: &str,
    ) -> Result<CommitResult, GitHubError> {
        self.written
            .lock()
            .expect("written mutex should be available")
            .push(file.path().to_owned());
        Ok(CommitResult {
            path: file.path().to_owned(),
            remote_revision_id: "commit-sha".to_owned(),
        })
    }

    async fn create_pull_request(
        &self,
        _locator: &RepositoryLocator,
        request: &PullRequestRequest,
    ) -> Result<PullRequestResult, GitHubError> {
        self.pull_requests
            .lock()
            .expect("pull requests mutex should be available")
            .push(request.clone());
        Ok(PullRequestResult {
            id: 1,
            number: 42,
            url: Some("https://github.com/acme/widgets/pull/42".to_owned()),
            state: Some("open".to_owned()),
            title: Some(request.title().to_owned()),
        })
    }
}

/// Text service that replays queued responses and records prompts.
#[derive(Default)]
pub struct ScriptedTextService {
    responses: Mutex<VecDeque<Result<String, AiError>>>,
    /// Prompts received, in call order.
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedTextService {
    /// Creates a service that answers with `responses` in order.
    pub fn new(responses: impl IntoIterator<Item = Result<String, AiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            prompts: Mutex::default(),
        }
    }
}

#[async_trait]
impl GenerativeTextService for ScriptedTextService {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, AiError> {
        self.prompts
            .lock()
            .expect("prompts mutex should be available")
            .push(prompt.to_owned());
        self.responses
            .lock()
            .expect("responses mutex should be available")
            .pop_front()
            .expect("a response should be queued for every call")
    }
}
