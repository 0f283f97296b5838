//! Test generation and pull request publishing operation.

use std::io::{self, Write};

use casewright::publish::{PublishOptions, ensure_push_access, unique_branch_name};
use casewright::{
    BranchRequest, BrowseGateway, CasewrightConfig, CliError, GeminiTextService,
    GenerativeTextService, GitHubError, NoopTelemetrySink, OctocrabRepositoryGateway,
    PersonalAccessToken, PullRequestPublisher, RepositoryGateway, RepositoryLocator,
    StderrJsonlTelemetrySink, TelemetrySink,
};
use tracing::info;

use super::output::write_publish_summary;
use super::test_generation::generate_test_code;
use super::{connect, load_snippets};

/// Generates tests for the selected files and opens a pull request with them.
///
/// # Errors
///
/// Returns [`CliError::Access`] when the token cannot push to the
/// repository, [`CliError::Ai`] when test generation fails and
/// [`CliError::Publish`] when the branch, file or pull request step fails.
pub async fn run(config: &CasewrightConfig) -> Result<(), CliError> {
    let service = GeminiTextService::new(config.gemini_config());
    let telemetry: Box<dyn TelemetrySink> = if config.telemetry {
        Box::new(StderrJsonlTelemetrySink)
    } else {
        Box::new(NoopTelemetrySink)
    };
    let mut stdout = io::stdout().lock();
    run_with(
        config,
        OctocrabRepositoryGateway::for_token,
        &service,
        telemetry.as_ref(),
        PublishOptions::default(),
        &mut stdout,
    )
    .await
}

/// Publishes using custom collaborators.
///
/// `options` governs both the AI retries and the publish workflow timing.
pub async fn run_with<G, F, S, W>(
    config: &CasewrightConfig,
    build_gateway: F,
    service: &S,
    telemetry: &dyn TelemetrySink,
    options: PublishOptions,
    writer: &mut W,
) -> Result<(), CliError>
where
    G: BrowseGateway + RepositoryGateway,
    F: FnOnce(&PersonalAccessToken, &RepositoryLocator) -> Result<G, GitHubError>,
    S: GenerativeTextService + ?Sized,
    W: Write,
{
    let (locator, gateway) = connect(config, build_gateway)?;
    ensure_push_access(&gateway, &locator).await?;

    let snippets = load_snippets(&gateway, &locator, &config.require_selected_files()?).await;
    let code = generate_test_code(config, service, options.retry_policy, &snippets).await?;
    let files = code.to_remote_files(config.test_dir())?;
    info!(
        files = files.len(),
        fallback = code.is_fallback,
        "generated test files"
    );

    let branch_name = unique_branch_name(config.branch_prefix.as_deref());
    let branch = BranchRequest::new(locator, config.base_branch(), branch_name)?;
    let pull_request = branch.pull_request(config.title.as_deref(), config.body.as_deref())?;

    let result = PullRequestPublisher::new(&gateway, telemetry)
        .with_options(options)
        .publish(&branch, &files, &pull_request)
        .await
        .into_result()?;
    write_publish_summary(writer, &branch, files.len(), &result)
}
