//! Test case summary and code generation operations.

use std::io::{self, Write};

use casewright::ai::{GeneratedTestCode, SourceSnippet};
use casewright::{
    BrowseGateway, CasewrightConfig, CliError, GeminiTextService, GenerativeTextService,
    GitHubError, OctocrabRepositoryGateway, PersonalAccessToken, RepositoryLocator, RetryPolicy,
    TestCaseGenerator,
};

use super::output::{write_generated_code, write_summary_report};
use super::{connect, load_snippets};

/// Prints test case summaries for the selected files.
///
/// # Errors
///
/// Returns [`CliError::Configuration`] when the repository or files are not
/// configured, [`CliError::GitHub`] for GitHub failures and [`CliError::Ai`]
/// when the AI service fails for a reason other than being unavailable.
pub async fn summarise(config: &CasewrightConfig) -> Result<(), CliError> {
    let service = GeminiTextService::new(config.gemini_config());
    let mut stdout = io::stdout().lock();
    summarise_with(
        config,
        OctocrabRepositoryGateway::for_token,
        &service,
        &mut stdout,
    )
    .await
}

/// Summarises using a custom gateway builder and text service.
pub async fn summarise_with<G, F, S, W>(
    config: &CasewrightConfig,
    build_gateway: F,
    service: &S,
    writer: &mut W,
) -> Result<(), CliError>
where
    G: BrowseGateway,
    F: FnOnce(&PersonalAccessToken, &RepositoryLocator) -> Result<G, GitHubError>,
    S: GenerativeTextService + ?Sized,
    W: Write,
{
    let (locator, gateway) = connect(config, build_gateway)?;
    let snippets = load_snippets(&gateway, &locator, &config.require_selected_files()?).await;

    let report = TestCaseGenerator::new(service).summarise(&snippets).await?;
    write_summary_report(writer, &report)
}

/// Prints generated test files for the selected files.
///
/// # Errors
///
/// Same as [`summarise`], plus [`CliError::GitHub`] when a generated file
/// path is invalid.
pub async fn generate(config: &CasewrightConfig) -> Result<(), CliError> {
    let service = GeminiTextService::new(config.gemini_config());
    let mut stdout = io::stdout().lock();
    generate_with(
        config,
        OctocrabRepositoryGateway::for_token,
        &service,
        &mut stdout,
    )
    .await
}

/// Generates test code using a custom gateway builder and text service.
pub async fn generate_with<G, F, S, W>(
    config: &CasewrightConfig,
    build_gateway: F,
    service: &S,
    writer: &mut W,
) -> Result<(), CliError>
where
    G: BrowseGateway,
    F: FnOnce(&PersonalAccessToken, &RepositoryLocator) -> Result<G, GitHubError>,
    S: GenerativeTextService + ?Sized,
    W: Write,
{
    let (locator, gateway) = connect(config, build_gateway)?;
    let snippets = load_snippets(&gateway, &locator, &config.require_selected_files()?).await;

    let code = generate_test_code(config, service, RetryPolicy::DEFAULT, &snippets).await?;
    let files = code.to_remote_files(config.test_dir())?;
    write_generated_code(writer, &code, &files)
}

/// Summarises `snippets` and turns the summary into test code.
///
/// # Errors
///
/// Returns [`CliError::Ai`] when either request fails for a reason other
/// than the service being unavailable.
pub async fn generate_test_code<S>(
    config: &CasewrightConfig,
    service: &S,
    retry_policy: RetryPolicy,
    snippets: &[SourceSnippet],
) -> Result<GeneratedTestCode, CliError>
where
    S: GenerativeTextService + ?Sized,
{
    let generator = TestCaseGenerator::new(service).with_retry_policy(retry_policy);
    let summary = generator.summarise(snippets).await?;
    let code = generator
        .generate_code(&summary, snippets, config.framework.as_deref())
        .await?;
    Ok(code)
}
