//! Branch, commit and pull request sequence.
//!
//! The run is a forward-only walk over [`Stage`]s. Each stage either hands
//! over to the next one or ends the run; nothing is rolled back.

use tracing::{info, warn};

use crate::github::{
    GitHubError, PullRequestRequest, PullRequestResult, RemoteFile, RepositoryGateway, RevisionId,
};
use crate::retry::{RetryFailure, retry_with_backoff};
use crate::telemetry::{TelemetryEvent, TelemetrySink};

use super::model::{BranchRequest, PublishOptions};
use super::outcome::{FailureCause, PublishFailure, PublishOutcome, WorkflowStep};

#[derive(Debug)]
enum Stage {
    ResolveBase,
    CreateBranch { base: RevisionId },
    WriteFiles { next: usize },
    OpenPullRequest,
}

enum Transition {
    Continue(Stage),
    Done(PullRequestResult),
}

/// Everything a single run needs, borrowed for its duration.
struct Run<'run> {
    branch: &'run BranchRequest,
    files: &'run [RemoteFile],
    pull_request: &'run PullRequestRequest,
}

/// Publishes files to a fresh branch and opens a pull request.
pub struct PullRequestPublisher<'client, Gateway>
where
    Gateway: RepositoryGateway + ?Sized,
{
    client: &'client Gateway,
    telemetry: &'client dyn TelemetrySink,
    options: PublishOptions,
}

impl<'client, Gateway> PullRequestPublisher<'client, Gateway>
where
    Gateway: RepositoryGateway + ?Sized,
{
    /// Create a publisher with the default pause and retry policy.
    #[must_use]
    pub fn new(client: &'client Gateway, telemetry: &'client dyn TelemetrySink) -> Self {
        Self {
            client,
            telemetry,
            options: PublishOptions::default(),
        }
    }

    /// Replaces the timing options.
    #[must_use]
    pub const fn with_options(mut self, options: PublishOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the workflow.
    ///
    /// Files are written strictly in the order given. The first failure
    /// ends the run; the branch and any files already written stay on the
    /// remote.
    pub async fn publish(
        &self,
        branch: &BranchRequest,
        files: &[RemoteFile],
        pull_request: &PullRequestRequest,
    ) -> PublishOutcome {
        let run = Run {
            branch,
            files,
            pull_request,
        };
        info!(
            repository = %branch.repository_label(),
            branch = branch.new_branch(),
            base = branch.base_branch(),
            files = files.len(),
            "publishing generated tests"
        );

        let mut stage = Stage::ResolveBase;
        loop {
            match self.advance(&run, stage).await {
                Ok(Transition::Continue(next)) => stage = next,
                Ok(Transition::Done(result)) => {
                    self.telemetry.record(TelemetryEvent::PullRequestOpened {
                        repository: branch.repository_label(),
                        number: result.number,
                        url: result.url.clone(),
                    });
                    return PublishOutcome::Succeeded(result);
                }
                Err(failure) => {
                    warn!(
                        step = failure.step.label(),
                        cause = failure.cause.tag(),
                        attempts = failure.attempts,
                        "publish failed: {}",
                        failure.message
                    );
                    self.telemetry.record(TelemetryEvent::PublishFailed {
                        repository: branch.repository_label(),
                        step: failure.step.label().to_owned(),
                        cause: failure.cause.tag().to_owned(),
                        attempts: failure.attempts,
                    });
                    return PublishOutcome::Failed(failure);
                }
            }
        }
    }

    async fn advance(&self, run: &Run<'_>, stage: Stage) -> Result<Transition, PublishFailure> {
        match stage {
            Stage::ResolveBase => self.resolve_base(run).await,
            Stage::CreateBranch { base } => self.create_branch(run, &base).await,
            Stage::WriteFiles { next } => self.write_file(run, next).await,
            Stage::OpenPullRequest => self.open_pull_request(run).await,
        }
    }

    async fn resolve_base(&self, run: &Run<'_>) -> Result<Transition, PublishFailure> {
        let base = self
            .client
            .branch_head(run.branch.locator(), run.branch.base_branch())
            .await
            .map_err(|error| PublishFailure {
                step: WorkflowStep::ResolveBase,
                cause: FailureCause::BaseBranchNotFound,
                message: error.to_string(),
                attempts: 1,
            })?;
        Ok(Transition::Continue(Stage::CreateBranch { base }))
    }

    async fn create_branch(
        &self,
        run: &Run<'_>,
        base: &RevisionId,
    ) -> Result<Transition, PublishFailure> {
        let client = self.client;
        let locator = run.branch.locator();
        let new_branch = run.branch.new_branch();

        retry_with_backoff(&self.options.retry_policy, "create branch", move |_| {
            client.create_branch(locator, new_branch, base)
        })
        .await
        .map_err(|failure| {
            step_failure(
                WorkflowStep::CreateBranch,
                FailureCause::for_branch_creation(&failure.error),
                failure,
            )
        })?;

        info!(branch = new_branch, "branch created");
        self.telemetry.record(TelemetryEvent::BranchCreated {
            repository: run.branch.repository_label(),
            branch: new_branch.to_owned(),
            base_branch: run.branch.base_branch().to_owned(),
        });
        Ok(Transition::Continue(Stage::WriteFiles { next: 0 }))
    }

    async fn write_file(&self, run: &Run<'_>, index: usize) -> Result<Transition, PublishFailure> {
        let Some(file) = run.files.get(index) else {
            return Ok(Transition::Continue(Stage::OpenPullRequest));
        };
        if index > 0 {
            tokio::time::sleep(self.options.inter_write_pause).await;
        }

        let client = self.client;
        let locator = run.branch.locator();
        let branch = run.branch.new_branch();
        let commit_message = format!("Add test file: {}", file.path());
        let message = commit_message.as_str();

        let mut attempts = 0;
        retry_with_backoff(&self.options.retry_policy, "write file", |attempt| {
            attempts = attempt;
            client.write_file(locator, branch, file, message)
        })
        .await
        .map_err(|failure| {
            step_failure(
                WorkflowStep::WriteFiles,
                FailureCause::for_file_write(file.path(), &failure.error),
                failure,
            )
        })?;

        info!(
            path = file.path(),
            position = index + 1,
            total = run.files.len(),
            "file written"
        );
        self.telemetry.record(TelemetryEvent::FileWritten {
            branch: branch.to_owned(),
            path: file.path().to_owned(),
            attempts,
        });
        Ok(Transition::Continue(Stage::WriteFiles { next: index + 1 }))
    }

    async fn open_pull_request(&self, run: &Run<'_>) -> Result<Transition, PublishFailure> {
        let client = self.client;
        let locator = run.branch.locator();
        let request = run.pull_request;

        let result = retry_with_backoff(&self.options.retry_policy, "create pull request", move |_| {
            client.create_pull_request(locator, request)
        })
        .await
        .map_err(|failure| {
            step_failure(
                WorkflowStep::OpenPullRequest,
                FailureCause::PullRequestCreationFailed,
                failure,
            )
        })?;

        info!(number = result.number, "pull request opened");
        Ok(Transition::Done(result))
    }
}

fn step_failure(
    step: WorkflowStep,
    cause: FailureCause,
    failure: RetryFailure<GitHubError>,
) -> PublishFailure {
    PublishFailure {
        step,
        cause,
        message: failure.error.to_string(),
        attempts: failure.attempts,
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
