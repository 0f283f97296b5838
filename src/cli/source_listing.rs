//! Source file listing operation.

use std::io::{self, Write};

use casewright::github::collect_source_files;
use casewright::{
    BrowseGateway, CasewrightConfig, CliError, GitHubError, OctocrabRepositoryGateway,
    PersonalAccessToken, RepositoryLocator,
};

use super::connect;
use super::output::write_source_listing;

/// Lists source files below the configured path, recursing into directories.
///
/// # Errors
///
/// Returns [`CliError::Configuration`] if the repository is not configured.
/// Returns [`CliError::GitHub`] if the API request fails.
pub async fn run(config: &CasewrightConfig) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, OctocrabRepositoryGateway::for_token, &mut stdout).await
}

/// Lists source files using a custom gateway builder.
pub async fn run_with_gateway_builder<G, F, W>(
    config: &CasewrightConfig,
    build_gateway: F,
    writer: &mut W,
) -> Result<(), CliError>
where
    G: BrowseGateway,
    F: FnOnce(&PersonalAccessToken, &RepositoryLocator) -> Result<G, GitHubError>,
    W: Write,
{
    let (locator, gateway) = connect(config, build_gateway)?;

    let files = collect_source_files(&gateway, &locator, config.listing_path()).await?;
    write_source_listing(writer, &locator, &files)
}
