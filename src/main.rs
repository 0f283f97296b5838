//! Casewright CLI entrypoint.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use casewright::{CasewrightConfig, CliError, OperationMode};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "casewright=info";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), CliError> {
    let config = load_config()?;

    match config.operation_mode() {
        OperationMode::ListRepositories => cli::repository_listing::run(&config).await,
        OperationMode::ListSourceFiles => cli::source_listing::run(&config).await,
        OperationMode::Summarise => cli::test_generation::summarise(&config).await,
        OperationMode::GenerateTests => cli::test_generation::generate(&config).await,
        OperationMode::PublishTests => cli::publish::run(&config).await,
        OperationMode::CheckAi => cli::ai_health::run(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`CliError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<CasewrightConfig, CliError> {
    CasewrightConfig::load().map_err(|error| CliError::configuration(error.to_string()))
}

/// Installs a stderr subscriber filtered by `RUST_LOG`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _already_set = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
