//! Casewright library crate for generating and publishing test cases.
//!
//! The library browses GitHub repositories through Octocrab, asks a
//! generative text service for test case summaries and test code, and
//! publishes the generated files to a fresh branch with a pull request.
//! Remote calls go through a bounded exponential backoff that retries only
//! transient failures.

pub mod ai;
pub mod config;
pub mod error;
pub mod github;
pub mod publish;
pub mod retry;
pub mod telemetry;

pub use ai::{AiError, GeminiTextService, GenerativeTextService, TestCaseGenerator};
pub use config::{CasewrightConfig, OperationMode};
pub use error::CliError;
pub use github::{
    BrowseGateway, GitHubError, OctocrabRepositoryGateway, PersonalAccessToken, RemoteFile,
    RepositoryGateway, RepositoryLocator,
};
pub use publish::{BranchRequest, PublishOutcome, PullRequestPublisher};
pub use retry::{Classify, FailureClass, RetryFailure, RetryPolicy, retry_with_backoff};
pub use telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink};
