//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.casewright.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `CASEWRIGHT_TOKEN`, `CASEWRIGHT_OWNER`, and
//!    so on, plus the legacy `GITHUB_TOKEN` and `GEMINI_API_KEY`
//! 4. **Command-line arguments** – `--token`/`-t`, `--owner`/`-o`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! gemini_api_key = "example-key"
//! owner = "acme"
//! repo = "widgets"
//! files = "src/a.js,src/b.js"
//! base_branch = "main"
//! branch_prefix = "auto-generated-tests"
//! test_dir = "tests"
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::ai::GeminiConfig;
use crate::ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::CliError;
use crate::github::{GitHubError, RepositoryLocator};

/// GitHub REST endpoint used when `github_api_base` is unset.
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

/// Branch the pull request targets when `base_branch` is unset.
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Directory generated test files are written to when `test_dir` is unset.
pub const DEFAULT_TEST_DIR: &str = "tests";

const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// List the authenticated user's repositories.
    ListRepositories,
    /// List source files in a repository directory.
    ListSourceFiles,
    /// Ask the AI service for test case summaries of the selected files.
    Summarise,
    /// Generate test code for the selected files.
    GenerateTests,
    /// Generate test code and open a pull request with it.
    PublishTests,
    /// Check that the AI service answers a trivial prompt.
    CheckAi,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use casewright::CasewrightConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = CasewrightConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "CASEWRIGHT",
    discovery(
        dotfile_name = ".casewright.toml",
        config_file_name = "casewright.toml",
        app_name = "casewright"
    )
)]
pub struct CasewrightConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `CASEWRIGHT_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// API key for the Gemini generative text service.
    ///
    /// Can be provided via:
    /// - CLI: `--gemini-api-key <KEY>`
    /// - Environment: `CASEWRIGHT_GEMINI_API_KEY` or `GEMINI_API_KEY`
    /// - Config file: `gemini_api_key = "..."`
    #[ortho_config(cli_short = 'k')]
    pub gemini_api_key: Option<String>,

    /// Gemini model identifier. Defaults to `gemini-1.5-flash`.
    #[ortho_config(cli_short = 'm')]
    pub gemini_model: Option<String>,

    /// Gemini REST base URL, mainly for pointing at a local stub.
    #[ortho_config(cli_short = 'G')]
    pub gemini_base_url: Option<String>,

    /// GitHub REST base URL, e.g. `https://ghe.example.com/api/v3`.
    #[ortho_config(cli_short = 'a')]
    pub github_api_base: Option<String>,

    /// Repository owner (e.g., "acme").
    ///
    /// Can be provided via:
    /// - CLI: `--owner <OWNER>` or `-o <OWNER>`
    /// - Environment: `CASEWRIGHT_OWNER`
    /// - Config file: `owner = "..."`
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name (e.g., "widgets").
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `CASEWRIGHT_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Directory to list source files from. Empty means the repository root.
    #[ortho_config(cli_short = 'p')]
    pub path: Option<String>,

    /// Comma-separated repository paths of the files to work on.
    ///
    /// Can be provided via:
    /// - CLI: `--files <PATHS>` or `-f <PATHS>`
    /// - Environment: `CASEWRIGHT_FILES`
    /// - Config file: `files = "src/a.js,src/b.js"`
    #[ortho_config(cli_short = 'f')]
    pub files: Option<String>,

    /// Test framework to generate code for. Inferred from the first file's
    /// extension when unset.
    #[ortho_config(cli_short = 'F')]
    pub framework: Option<String>,

    /// Lists the authenticated user's repositories.
    ///
    /// Note: booleans are read from the CLI and config file only because
    /// `ortho_config` does not load boolean values from the environment.
    #[ortho_config(cli_short = 'l')]
    pub list_repositories: bool,

    /// Prints test case summaries for the selected files.
    #[ortho_config(cli_short = 's')]
    pub summarise: bool,

    /// Prints generated test code for the selected files.
    #[ortho_config(cli_short = 'g')]
    pub generate: bool,

    /// Generates test code and opens a pull request with it.
    #[ortho_config(cli_short = 'P')]
    pub publish: bool,

    /// Branch the pull request targets. Defaults to `main`.
    #[ortho_config(cli_short = 'b')]
    pub base_branch: Option<String>,

    /// Prefix for the working branch name. Defaults to
    /// `auto-generated-tests`.
    #[ortho_config(cli_short = 'B')]
    pub branch_prefix: Option<String>,

    /// Pull request title.
    #[ortho_config(cli_short = 'T')]
    pub title: Option<String>,

    /// Pull request body.
    #[ortho_config(cli_short = 'd')]
    pub body: Option<String>,

    /// Directory generated test files are written to. Defaults to `tests`.
    #[ortho_config(cli_short = 'D')]
    pub test_dir: Option<String>,

    /// Emits publish telemetry to stderr as JSON lines.
    #[ortho_config(cli_short = 'e')]
    pub telemetry: bool,

    /// Checks whether the AI service is reachable, then exits.
    #[ortho_config(cli_short = 'c')]
    pub check_ai: bool,
}

impl CasewrightConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, CliError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(CliError::GitHub(GitHubError::MissingToken))
    }

    /// Resolves the Gemini API key from configuration or `GEMINI_API_KEY`.
    #[must_use]
    pub fn resolve_gemini_api_key(&self) -> Option<String> {
        self.gemini_api_key
            .clone()
            .or_else(|| env::var("GEMINI_API_KEY").ok())
    }

    /// Gemini adapter settings with defaults filled in.
    #[must_use]
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig::new(
            self.gemini_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            self.gemini_model.as_deref().unwrap_or(DEFAULT_MODEL),
            self.resolve_gemini_api_key(),
            Duration::from_secs(DEFAULT_GEMINI_TIMEOUT_SECS),
        )
    }

    /// Determines the operation mode based on provided configuration.
    ///
    /// `check_ai` needs no repository and wins over everything else.
    /// Without both `owner` and `repo` only repository listing is possible.
    /// With them, `publish` wins over `generate`, which wins over
    /// `summarise`; with no action flag the source files are listed.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.check_ai {
            OperationMode::CheckAi
        } else if self.list_repositories || self.owner.is_none() || self.repo.is_none() {
            OperationMode::ListRepositories
        } else if self.publish {
            OperationMode::PublishTests
        } else if self.generate {
            OperationMode::GenerateTests
        } else if self.summarise {
            OperationMode::Summarise
        } else {
            OperationMode::ListSourceFiles
        }
    }

    /// Returns owner and repo if both are configured.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Configuration`] when owner or repo is missing.
    pub fn require_repository_info(&self) -> Result<(&str, &str), CliError> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) => Ok((owner.as_str(), repo.as_str())),
            (None, _) => Err(CliError::configuration(
                "repository owner is required (use --owner or -o)",
            )),
            (_, None) => Err(CliError::configuration(
                "repository name is required (use --repo or -r)",
            )),
        }
    }

    /// Builds the locator for the configured repository.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Configuration`] when owner or repo is missing and
    /// [`CliError::GitHub`] when they are blank or the API base is invalid.
    pub fn repository_locator(&self) -> Result<RepositoryLocator, CliError> {
        let (owner, repo) = self.require_repository_info()?;
        let locator = RepositoryLocator::from_owner_repo(owner, repo)?;
        match &self.github_api_base {
            Some(api_base) => Ok(locator.with_api_base(api_base)?),
            None => Ok(locator),
        }
    }

    /// GitHub REST base URL with the default filled in.
    #[must_use]
    pub fn github_api_base(&self) -> &str {
        self.github_api_base
            .as_deref()
            .unwrap_or(DEFAULT_GITHUB_API_BASE)
    }

    /// Paths listed in `files`, trimmed, blanks dropped, order kept.
    #[must_use]
    pub fn selected_files(&self) -> Vec<String> {
        self.files
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Selected files, or an error when none were given.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Configuration`] when `files` is empty.
    pub fn require_selected_files(&self) -> Result<Vec<String>, CliError> {
        let files = self.selected_files();
        if files.is_empty() {
            return Err(CliError::configuration(
                "at least one file is required (use --files or -f)",
            ));
        }
        Ok(files)
    }

    /// Directory to list, trimmed of surrounding slashes.
    #[must_use]
    pub fn listing_path(&self) -> &str {
        self.path.as_deref().unwrap_or_default().trim_matches('/')
    }

    /// Base branch with the default filled in.
    #[must_use]
    pub fn base_branch(&self) -> &str {
        non_blank(self.base_branch.as_deref()).unwrap_or(DEFAULT_BASE_BRANCH)
    }

    /// Test directory with the default filled in.
    #[must_use]
    pub fn test_dir(&self) -> &str {
        non_blank(self.test_dir.as_deref()).unwrap_or(DEFAULT_TEST_DIR)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests;
