//! Workflow steps, failure causes and the terminal outcome.

use std::fmt;

use thiserror::Error;

use crate::github::{GitHubError, PullRequestResult};

/// Steps of the publish workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    /// Read the commit the base branch points at.
    ResolveBase,
    /// Create the working branch at that commit.
    CreateBranch,
    /// Commit each file to the working branch.
    WriteFiles,
    /// Open the pull request.
    OpenPullRequest,
}

impl WorkflowStep {
    /// Stable snake_case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ResolveBase => "resolve_base",
            Self::CreateBranch => "create_branch",
            Self::WriteFiles => "write_files",
            Self::OpenPullRequest => "open_pull_request",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Why a single file write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFailureKind {
    /// The branch head moved under the write on every attempt.
    StaleRevision,
    /// The repository or branch disappeared.
    NotFound,
    /// The token may not push to the repository.
    PermissionDenied,
    /// GitHub refused the path.
    InvalidPath,
    /// Anything else, including exhausted transient failures.
    Other,
}

impl WriteFailureKind {
    /// Stable tag for this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::StaleRevision => "sha_conflict",
            Self::NotFound => "file_target_not_found",
            Self::PermissionDenied => "write_permission_denied",
            Self::InvalidPath => "invalid_path",
            Self::Other => "file_write_failed",
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::StaleRevision => "SHA conflict",
            Self::NotFound => "repository or branch not found",
            Self::PermissionDenied => "insufficient write permission",
            Self::InvalidPath => "invalid file path",
            Self::Other => "write failed",
        }
    }
}

impl From<&GitHubError> for WriteFailureKind {
    fn from(error: &GitHubError) -> Self {
        match error {
            GitHubError::StaleRevision { .. } => Self::StaleRevision,
            GitHubError::NotFound { .. } => Self::NotFound,
            GitHubError::PermissionDenied { .. } | GitHubError::Authentication { .. } => {
                Self::PermissionDenied
            }
            GitHubError::InvalidPath { .. } | GitHubError::Validation { .. } => Self::InvalidPath,
            _ => Self::Other,
        }
    }
}

/// Machine-distinguishable reason the workflow stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The base branch could not be resolved.
    BaseBranchNotFound,
    /// The working branch name is already taken.
    BranchNameConflict,
    /// GitHub answered 404 while creating the branch.
    RepositoryNotFound,
    /// GitHub answered 403 while creating the branch.
    PermissionDenied,
    /// Branch creation failed for another reason.
    BranchCreationFailed,
    /// A file write failed after retries.
    FileWriteFailed {
        /// Path of the file that could not be written.
        path: String,
        /// Classification of the write failure.
        kind: WriteFailureKind,
    },
    /// The pull request could not be opened.
    PullRequestCreationFailed,
}

impl FailureCause {
    /// Stable tag, such as `name_conflict` or `sha_conflict`.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::BaseBranchNotFound => "base_branch_not_found",
            Self::BranchNameConflict => "name_conflict",
            Self::RepositoryNotFound => "repository_not_found",
            Self::PermissionDenied => "permission_denied",
            Self::BranchCreationFailed => "branch_creation_failed",
            Self::FileWriteFailed { kind, .. } => kind.tag(),
            Self::PullRequestCreationFailed => "pull_request_creation_failed",
        }
    }

    /// Maps a branch creation error onto a cause.
    #[must_use]
    pub const fn for_branch_creation(error: &GitHubError) -> Self {
        match error {
            GitHubError::BranchExists { .. } => Self::BranchNameConflict,
            GitHubError::NotFound { .. } => Self::RepositoryNotFound,
            GitHubError::PermissionDenied { .. } => Self::PermissionDenied,
            _ => Self::BranchCreationFailed,
        }
    }

    /// Maps a file write error onto a cause.
    #[must_use]
    pub fn for_file_write(path: &str, error: &GitHubError) -> Self {
        Self::FileWriteFailed {
            path: path.to_owned(),
            kind: WriteFailureKind::from(error),
        }
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseBranchNotFound => formatter.write_str("base branch not found"),
            Self::BranchNameConflict => {
                formatter.write_str("name conflict, choose another branch name")
            }
            Self::RepositoryNotFound => {
                formatter.write_str("repository or base branch not found")
            }
            Self::PermissionDenied => formatter.write_str("insufficient write permission"),
            Self::BranchCreationFailed => formatter.write_str("branch creation failed"),
            Self::FileWriteFailed { path, kind } => {
                write!(formatter, "failed to add file {path}: {}", kind.description())
            }
            Self::PullRequestCreationFailed => {
                formatter.write_str("pull request creation failed")
            }
        }
    }
}

/// The first unrecoverable failure of a workflow run.
///
/// Remote side effects of earlier steps (the branch, files already written)
/// are left in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cause} ({step}, {attempts} attempt(s)): {message}")]
pub struct PublishFailure {
    /// Step that failed.
    pub step: WorkflowStep,
    /// Classified cause.
    pub cause: FailureCause,
    /// Message of the underlying error.
    pub message: String,
    /// Attempts made on the failing step.
    pub attempts: u32,
}

/// Terminal state of a workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The pull request is open.
    Succeeded(PullRequestResult),
    /// A step failed and the run stopped there.
    Failed(PublishFailure),
}

impl PublishOutcome {
    /// Converts the outcome into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`PublishFailure`] of a failed run.
    pub fn into_result(self) -> Result<PullRequestResult, PublishFailure> {
        match self {
            Self::Succeeded(result) => Ok(result),
            Self::Failed(failure) => Err(failure),
        }
    }

    /// Returns `true` for [`PublishOutcome::Succeeded`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}
