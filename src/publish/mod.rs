//! Publishing generated files as a pull request.
//!
//! [`PullRequestPublisher`] resolves the base branch, creates a working
//! branch, writes each file in order and opens a pull request. It stops at
//! the first failure and reports which step failed and why. Work already
//! applied on the remote (the branch, earlier files) is not undone.

pub mod branch_name;
pub mod model;
pub mod outcome;
pub mod permissions;
pub mod workflow;

pub use branch_name::{DEFAULT_BRANCH_PREFIX, branch_name_at, unique_branch_name};
pub use model::{
    BranchRequest, DEFAULT_INTER_WRITE_PAUSE, DEFAULT_PULL_REQUEST_BODY,
    DEFAULT_PULL_REQUEST_TITLE, PublishOptions,
};
pub use outcome::{FailureCause, PublishFailure, PublishOutcome, WorkflowStep, WriteFailureKind};
pub use permissions::{AccessCheckError, ensure_push_access};
pub use workflow::PullRequestPublisher;
