//! Alarmdesk CLI entrypoint: prints one page of a list view.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use alarmdesk::{AlarmdeskConfig, ApiError, HttpPageGateway, StaticTokenProvider, TableError};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

mod cli;

const LOG_ENV: &str = "ALARMDESK_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(code) => code,
        Err(error) => {
            let _ignored = writeln!(io::stderr().lock(), "{error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<ExitCode, TableError> {
    let config = load_config()?;

    let token = config.resolve_token()?;
    let gateway = HttpPageGateway::new(
        config.require_api_url()?,
        Arc::new(StaticTokenProvider::new(token)),
        Some(config.request_timeout()),
    )?;

    let (resource, view) = cli::listing::load_page(&config, Arc::new(gateway)).await?;
    cli::output::write_view(resource.columns(), &view)?;

    Ok(if view.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<AlarmdeskConfig, ApiError> {
    AlarmdeskConfig::load().map_err(|error| ApiError::Configuration {
        message: error.to_string(),
    })
}
