//! GitHub repository access.
//!
//! This module wraps Octocrab to resolve branches, create branches, write
//! files and open pull requests, plus the read-only browsing calls used to
//! pick source files. Errors are mapped into classified variants so that the
//! retry layer and the publish workflow can act on them without seeing
//! Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod source_files;

pub use error::GitHubError;
pub use gateway::{BrowseGateway, OctocrabRepositoryGateway, RepositoryGateway};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{
    CommitResult, ContentEntry, ContentKind, FileContent, GitHubUser, PullRequestRequest,
    PullRequestResult, RemoteFile, RepositoryPermissions, RepositorySummary, RevisionId,
    SourceFile,
};
pub use source_files::{FileFetchError, collect_source_files, fetch_files, is_source_file};

#[cfg(test)]
pub use gateway::{MockBrowseGateway, MockRepositoryGateway};
