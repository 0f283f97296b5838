//! Tests for the publish workflow.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mockall::Sequence;
use rstest::{fixture, rstest};
use tokio::time::Instant;

use super::PullRequestPublisher;
use crate::github::{
    CommitResult, GitHubError, MockRepositoryGateway, PullRequestRequest, PullRequestResult,
    RemoteFile, RepositoryLocator, RevisionId,
};
use crate::publish::model::{BranchRequest, PublishOptions};
use crate::publish::outcome::{FailureCause, PublishOutcome, WorkflowStep, WriteFailureKind};
use crate::retry::RetryPolicy;
use crate::telemetry::TelemetryEvent;
use crate::telemetry::test_support::RecordingTelemetrySink;

type WriteLog = Arc<Mutex<Vec<(String, Instant)>>>;

#[fixture]
fn branch() -> BranchRequest {
    let locator =
        RepositoryLocator::from_owner_repo("acme", "widgets").expect("locator should build");
    BranchRequest::new(locator, "main", "auto-1").expect("branch request should build")
}

fn files(paths: &[&str]) -> Vec<RemoteFile> {
    paths
        .iter()
        .map(|path| RemoteFile::new(*path, format!("// tests for {path}")).expect("file"))
        .collect()
}

fn pull_request(branch: &BranchRequest) -> PullRequestRequest {
    branch
        .pull_request(Some("Auto-generated test cases"), None)
        .expect("pull request should build")
}

fn opened(number: u64) -> PullRequestResult {
    PullRequestResult {
        id: 1000 + number,
        number,
        url: Some(format!("https://github.com/acme/widgets/pull/{number}")),
        state: Some("open".to_owned()),
        title: Some("Auto-generated test cases".to_owned()),
    }
}

fn commit_for(file: &RemoteFile) -> CommitResult {
    CommitResult {
        path: file.path().to_owned(),
        remote_revision_id: format!("commit-{}", file.path()),
    }
}

fn stale() -> GitHubError {
    GitHubError::StaleRevision {
        message: "write file failed: is at abc but expected def".to_owned(),
    }
}

fn expect_base_and_branch(gateway: &mut MockRepositoryGateway, seq: &mut Sequence) {
    gateway
        .expect_branch_head()
        .withf(|_, branch| branch == "main")
        .times(1)
        .in_sequence(seq)
        .returning(|_, _| Ok(RevisionId::new("abc123")));
    gateway
        .expect_create_branch()
        .withf(|_, branch, from| branch == "auto-1" && from.as_str() == "abc123")
        .times(1)
        .in_sequence(seq)
        .returning(|_, _, _| Ok(()));
}

fn logging_write(log: &WriteLog) -> impl Fn(&RemoteFile) + Send + 'static {
    let log = Arc::clone(log);
    move |file: &RemoteFile| {
        log.lock()
            .expect("log mutex should be available")
            .push((file.path().to_owned(), Instant::now()));
    }
}

fn logged(log: &WriteLog) -> Vec<(String, Instant)> {
    log.lock().expect("log mutex should be available").clone()
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn writes_files_in_order_then_opens_pull_request(branch: BranchRequest) {
    let mut gateway = MockRepositoryGateway::new();
    let mut seq = Sequence::new();
    let log: WriteLog = Arc::default();
    expect_base_and_branch(&mut gateway, &mut seq);
    for path in ["t1.js", "t2.js"] {
        let record = logging_write(&log);
        gateway
            .expect_write_file()
            .withf(move |_, branch, file, message| {
                branch == "auto-1"
                    && file.path() == path
                    && *message == format!("Add test file: {path}")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _, file, _| {
                record(file);
                Ok(commit_for(file))
            });
    }
    gateway
        .expect_create_pull_request()
        .withf(|_, request| request.head_branch() == "auto-1" && request.base_branch() == "main")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(opened(7)));
    let telemetry = RecordingTelemetrySink::default();
    let to_publish = files(&["t1.js", "t2.js"]);

    let outcome = PullRequestPublisher::new(&gateway, &telemetry)
        .publish(&branch, &to_publish, &pull_request(&branch))
        .await;

    assert_eq!(outcome, PublishOutcome::Succeeded(opened(7)));
    let writes = logged(&log);
    let [(first, first_at), (second, second_at)] = writes.as_slice() else {
        panic!("expected two writes, got {writes:?}");
    };
    assert_eq!((first.as_str(), second.as_str()), ("t1.js", "t2.js"));
    assert_eq!(*second_at - *first_at, Duration::from_millis(500));
    assert_eq!(
        telemetry.take(),
        vec![
            TelemetryEvent::BranchCreated {
                repository: "acme/widgets".to_owned(),
                branch: "auto-1".to_owned(),
                base_branch: "main".to_owned(),
            },
            TelemetryEvent::FileWritten {
                branch: "auto-1".to_owned(),
                path: "t1.js".to_owned(),
                attempts: 1,
            },
            TelemetryEvent::FileWritten {
                branch: "auto-1".to_owned(),
                path: "t2.js".to_owned(),
                attempts: 1,
            },
            TelemetryEvent::PullRequestOpened {
                repository: "acme/widgets".to_owned(),
                number: 7,
                url: Some("https://github.com/acme/widgets/pull/7".to_owned()),
            },
        ]
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn persistent_stale_revision_stops_before_pull_request(branch: BranchRequest) {
    let mut gateway = MockRepositoryGateway::new();
    let mut seq = Sequence::new();
    let log: WriteLog = Arc::default();
    expect_base_and_branch(&mut gateway, &mut seq);
    let record_first = logging_write(&log);
    gateway
        .expect_write_file()
        .withf(|_, _, file, _| file.path() == "t1.js")
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_, _, file, _| {
            record_first(file);
            Ok(commit_for(file))
        });
    let record_second = logging_write(&log);
    gateway
        .expect_write_file()
        .withf(|_, _, file, _| file.path() == "t2.js")
        .times(3)
        .in_sequence(&mut seq)
        .returning(move |_, _, file, _| {
            record_second(file);
            Err(stale())
        });
    gateway.expect_create_pull_request().never();
    let telemetry = RecordingTelemetrySink::default();
    let to_publish = files(&["t1.js", "t2.js"]);

    let outcome = PullRequestPublisher::new(&gateway, &telemetry)
        .publish(&branch, &to_publish, &pull_request(&branch))
        .await;

    let PublishOutcome::Failed(failure) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(failure.step, WorkflowStep::WriteFiles);
    assert_eq!(
        failure.cause,
        FailureCause::FileWriteFailed {
            path: "t2.js".to_owned(),
            kind: WriteFailureKind::StaleRevision,
        }
    );
    assert_eq!(failure.cause.tag(), "sha_conflict");
    assert_eq!(failure.attempts, 3);
    assert!(failure.message.contains("SHA conflict"));

    let times: Vec<Instant> = logged(&log).into_iter().map(|(_, at)| at).collect();
    let gaps: Vec<Duration> = times
        .iter()
        .zip(times.iter().skip(1))
        .map(|(earlier, later)| *later - *earlier)
        .collect();
    assert_eq!(
        gaps,
        vec![
            Duration::from_millis(500),
            Duration::from_secs(1),
            Duration::from_secs(2),
        ]
    );
    assert_eq!(
        telemetry.take().last(),
        Some(&TelemetryEvent::PublishFailed {
            repository: "acme/widgets".to_owned(),
            step: "write_files".to_owned(),
            cause: "sha_conflict".to_owned(),
            attempts: 3,
        })
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn permanent_write_failure_skips_remaining_files(branch: BranchRequest) {
    let mut gateway = MockRepositoryGateway::new();
    let mut seq = Sequence::new();
    expect_base_and_branch(&mut gateway, &mut seq);
    gateway
        .expect_write_file()
        .withf(|_, _, file, _| file.path() == "a.js")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, file, _| Ok(commit_for(file)));
    gateway
        .expect_write_file()
        .withf(|_, _, file, _| file.path() == "b.js")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _, _| {
            Err(GitHubError::InvalidPath {
                message: "write file failed: path is invalid".to_owned(),
            })
        });
    gateway
        .expect_write_file()
        .withf(|_, _, file, _| file.path() == "c.js")
        .never();
    gateway.expect_create_pull_request().never();
    let telemetry = RecordingTelemetrySink::default();
    let to_publish = files(&["a.js", "b.js", "c.js"]);

    let outcome = PullRequestPublisher::new(&gateway, &telemetry)
        .publish(&branch, &to_publish, &pull_request(&branch))
        .await;

    let failure = outcome.into_result().expect_err("write should fail");
    assert_eq!(failure.cause.tag(), "invalid_path");
    assert_eq!(failure.attempts, 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn branch_name_conflict_is_not_retried(branch: BranchRequest) {
    let mut gateway = MockRepositoryGateway::new();
    gateway
        .expect_branch_head()
        .returning(|_, _| Ok(RevisionId::new("abc123")));
    gateway
        .expect_create_branch()
        .times(1)
        .returning(|_, _, _| {
            Err(GitHubError::BranchExists {
                message: "create branch failed: Reference already exists".to_owned(),
            })
        });
    gateway.expect_write_file().never();
    gateway.expect_create_pull_request().never();
    let telemetry = RecordingTelemetrySink::default();
    let started = Instant::now();

    let outcome = PullRequestPublisher::new(&gateway, &telemetry)
        .publish(&branch, &files(&["t1.js"]), &pull_request(&branch))
        .await;

    let failure = outcome.into_result().expect_err("conflict should fail");
    assert_eq!(failure.step, WorkflowStep::CreateBranch);
    assert_eq!(failure.cause, FailureCause::BranchNameConflict);
    assert_eq!(failure.cause.tag(), "name_conflict");
    assert_eq!(failure.attempts, 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[rstest]
#[case(GitHubError::NotFound { message: "Not Found".to_owned() }, FailureCause::RepositoryNotFound)]
#[case(GitHubError::PermissionDenied { message: "Forbidden".to_owned() }, FailureCause::PermissionDenied)]
#[case(GitHubError::Validation { message: "bad".to_owned() }, FailureCause::BranchCreationFailed)]
#[tokio::test(start_paused = true)]
async fn branch_creation_failures_map_to_causes(
    branch: BranchRequest,
    #[case] error: GitHubError,
    #[case] expected: FailureCause,
) {
    let mut gateway = MockRepositoryGateway::new();
    gateway
        .expect_branch_head()
        .returning(|_, _| Ok(RevisionId::new("abc123")));
    gateway
        .expect_create_branch()
        .times(1)
        .returning(move |_, _, _| Err(error.clone()));
    gateway.expect_write_file().never();
    let telemetry = RecordingTelemetrySink::default();

    let outcome = PullRequestPublisher::new(&gateway, &telemetry)
        .publish(&branch, &files(&["t1.js"]), &pull_request(&branch))
        .await;

    let failure = outcome.into_result().expect_err("branch creation should fail");
    assert_eq!(failure.cause, expected);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn transient_branch_failure_is_retried(branch: BranchRequest) {
    let mut gateway = MockRepositoryGateway::new();
    let mut seq = Sequence::new();
    gateway
        .expect_branch_head()
        .returning(|_, _| Ok(RevisionId::new("abc123")));
    gateway
        .expect_create_branch()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| {
            Err(GitHubError::ServerError {
                status: 502,
                message: "Bad Gateway".to_owned(),
            })
        });
    gateway
        .expect_create_branch()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    gateway
        .expect_create_pull_request()
        .times(1)
        .returning(|_, _| Ok(opened(3)));
    let telemetry = RecordingTelemetrySink::default();
    let started = Instant::now();

    let outcome = PullRequestPublisher::new(&gateway, &telemetry)
        .publish(&branch, &[], &pull_request(&branch))
        .await;

    assert!(outcome.is_success());
    assert_eq!(started.elapsed(), Duration::from_secs(1));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn missing_base_branch_aborts_before_branch_creation(branch: BranchRequest) {
    let mut gateway = MockRepositoryGateway::new();
    gateway.expect_branch_head().times(1).returning(|_, _| {
        Err(GitHubError::NotFound {
            message: "resolve branch failed: Branch not found".to_owned(),
        })
    });
    gateway.expect_create_branch().never();
    gateway.expect_write_file().never();
    gateway.expect_create_pull_request().never();
    let telemetry = RecordingTelemetrySink::default();

    let outcome = PullRequestPublisher::new(&gateway, &telemetry)
        .publish(&branch, &files(&["t1.js"]), &pull_request(&branch))
        .await;

    let failure = outcome.into_result().expect_err("resolution should fail");
    assert_eq!(failure.step, WorkflowStep::ResolveBase);
    assert_eq!(failure.cause, FailureCause::BaseBranchNotFound);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn empty_file_list_still_opens_pull_request(branch: BranchRequest) {
    let mut gateway = MockRepositoryGateway::new();
    let mut seq = Sequence::new();
    expect_base_and_branch(&mut gateway, &mut seq);
    gateway.expect_write_file().never();
    gateway
        .expect_create_pull_request()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(opened(1)));
    let telemetry = RecordingTelemetrySink::default();

    let outcome = PullRequestPublisher::new(&gateway, &telemetry)
        .publish(&branch, &[], &pull_request(&branch))
        .await;

    assert_eq!(outcome, PublishOutcome::Succeeded(opened(1)));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn duplicate_paths_are_written_in_order(branch: BranchRequest) {
    let mut gateway = MockRepositoryGateway::new();
    let mut seq = Sequence::new();
    expect_base_and_branch(&mut gateway, &mut seq);
    for content in ["first", "second"] {
        gateway
            .expect_write_file()
            .withf(move |_, _, file, _| file.path() == "t.js" && file.content() == content)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, file, _| Ok(commit_for(file)));
    }
    gateway
        .expect_create_pull_request()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(opened(2)));
    let telemetry = RecordingTelemetrySink::default();
    let to_publish = vec![
        RemoteFile::new("t.js", "first").expect("file"),
        RemoteFile::new("t.js", "second").expect("file"),
    ];

    let outcome = PullRequestPublisher::new(&gateway, &telemetry)
        .with_options(PublishOptions::new(Duration::ZERO, RetryPolicy::DEFAULT))
        .publish(&branch, &to_publish, &pull_request(&branch))
        .await;

    assert!(outcome.is_success());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn pull_request_failure_is_reported_after_files_written(branch: BranchRequest) {
    let mut gateway = MockRepositoryGateway::new();
    let mut seq = Sequence::new();
    expect_base_and_branch(&mut gateway, &mut seq);
    gateway
        .expect_write_file()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, file, _| Ok(commit_for(file)));
    gateway
        .expect_create_pull_request()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| {
            Err(GitHubError::Validation {
                message: "create pull request failed: No commits between main and auto-1"
                    .to_owned(),
            })
        });
    let telemetry = RecordingTelemetrySink::default();

    let outcome = PullRequestPublisher::new(&gateway, &telemetry)
        .publish(&branch, &files(&["t1.js"]), &pull_request(&branch))
        .await;

    let failure = outcome.into_result().expect_err("pull request should fail");
    assert_eq!(failure.step, WorkflowStep::OpenPullRequest);
    assert_eq!(failure.cause, FailureCause::PullRequestCreationFailed);
    assert!(failure.message.contains("No commits"));
    let events = telemetry.take();
    assert!(events.iter().any(|event| matches!(
        event,
        TelemetryEvent::FileWritten { path, .. } if path == "t1.js"
    )));
}
