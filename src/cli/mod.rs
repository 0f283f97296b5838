//! CLI operation mode handlers.
//!
//! This module contains the implementations for different operation modes:
//! - [`repository_listing`]: List the authenticated user's repositories
//! - [`source_listing`]: List source files in a repository directory
//! - [`test_generation`]: Summarise files and generate test code
//! - [`publish`]: Generate tests and open a pull request with them
//! - [`ai_health`]: Check that the AI service answers
//!
//! Output formatting utilities are in [`output`].

use casewright::ai::SourceSnippet;
use casewright::github::fetch_files;
use casewright::{
    BrowseGateway, CasewrightConfig, CliError, GitHubError, PersonalAccessToken,
    RepositoryLocator,
};

pub mod ai_health;
pub mod output;
pub mod publish;
pub mod repository_listing;
pub mod source_listing;
pub mod test_generation;

#[cfg(test)]
pub mod test_utils;

/// Resolves the token and locator from `config` and builds a gateway for them.
///
/// # Errors
///
/// Returns [`CliError::Configuration`] when the repository is not configured
/// and [`CliError::GitHub`] when the token is missing or the gateway cannot
/// be built.
pub fn connect<G, F>(
    config: &CasewrightConfig,
    build_gateway: F,
) -> Result<(RepositoryLocator, G), CliError>
where
    F: FnOnce(&PersonalAccessToken, &RepositoryLocator) -> Result<G, GitHubError>,
{
    let locator = config.repository_locator()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let gateway = build_gateway(&token, &locator)?;
    Ok((locator, gateway))
}

/// Fetches the selected files as snippets, skipping any that fail to load.
pub async fn load_snippets<G>(
    gateway: &G,
    locator: &RepositoryLocator,
    paths: &[String],
) -> Vec<SourceSnippet>
where
    G: BrowseGateway + ?Sized,
{
    fetch_files(gateway, locator, paths)
        .await
        .into_iter()
        .filter_map(Result::ok)
        .map(SourceSnippet::from)
        .collect()
}
