//! Repository listing operation.

use std::io::{self, Write};

use casewright::{
    BrowseGateway, CasewrightConfig, CliError, GitHubError, OctocrabRepositoryGateway,
    PersonalAccessToken,
};

use super::output::write_repository_listing;

/// Lists the authenticated user's repositories, most recently updated first.
///
/// # Errors
///
/// Returns [`CliError::GitHub`] if the token is missing or the API request
/// fails.
pub async fn run(config: &CasewrightConfig) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, OctocrabRepositoryGateway::for_api_base, &mut stdout).await
}

/// Lists repositories using a custom gateway builder.
///
/// This function is exposed for testing with fake gateways.
pub async fn run_with_gateway_builder<G, F, W>(
    config: &CasewrightConfig,
    build_gateway: F,
    writer: &mut W,
) -> Result<(), CliError>
where
    G: BrowseGateway,
    F: FnOnce(&PersonalAccessToken, &str) -> Result<G, GitHubError>,
    W: Write,
{
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let gateway = build_gateway(&token, config.github_api_base())?;

    let repositories = gateway.list_repositories().await?;
    write_repository_listing(writer, &repositories)
}
