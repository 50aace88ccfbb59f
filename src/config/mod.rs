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
//! 2. **Configuration file** – `.alarmdesk.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `ALARMDESK_API_URL`, `ALARMDESK_TOKEN`, or
//!    `KINDE_ACCESS_TOKEN`
//! 4. **Command-line arguments** – `--api-url`/`-a`, `--token`/`-t`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! api_url = "https://alarms.example.com/api/"
//! resource = "properties"
//! page_size = 25
//! sort = "-next_service_date"
//! filters = "status=overdue;next_service=2024-01-01..2024-03-31"
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::api::{AccessToken, ApiError};
use crate::resources::Resource;
use crate::table::{PageSize, Sort};

/// Environment variable holding a token issued by the sign-in flow.
pub const SESSION_TOKEN_ENV: &str = "KINDE_ACCESS_TOKEN";

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 400;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 20;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use alarmdesk::AlarmdeskConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = AlarmdeskConfig::load().expect("failed to load configuration");
/// let api_url = config.require_api_url().expect("API URL required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "ALARMDESK",
    discovery(
        dotfile_name = ".alarmdesk.toml",
        config_file_name = "alarmdesk.toml",
        app_name = "alarmdesk"
    )
)]
pub struct AlarmdeskConfig {
    /// Base URL of the REST API.
    ///
    /// Can be provided via:
    /// - CLI: `--api-url <URL>` or `-a <URL>`
    /// - Environment: `ALARMDESK_API_URL`
    /// - Config file: `api_url = "..."`
    #[ortho_config(cli_short = 'a')]
    pub api_url: Option<String>,

    /// Bearer token for the API.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `ALARMDESK_TOKEN` or `KINDE_ACCESS_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// List to show: `properties`, `jobs`, `beeping-alarms` or `agencies`.
    #[ortho_config(cli_short = 'r')]
    pub resource: Option<String>,

    /// Search text.
    #[ortho_config(cli_short = 's')]
    pub search: Option<String>,

    /// 1-based page to show.
    #[ortho_config(cli_short = 'p')]
    pub page: u32,

    /// Rows per page: 10, 25, 50, 100 or 200.
    #[ortho_config()]
    pub page_size: u32,

    /// Sort column, prefixed with `-` for descending.
    #[ortho_config()]
    pub sort: Option<String>,

    /// Filters as `id=value` pairs separated by `;`. Date filters take
    /// `YYYY-MM-DD` or `FROM..TO`.
    #[ortho_config(cli_short = 'f')]
    pub filters: Option<String>,

    /// Quiet period before typed search text is sent, in milliseconds.
    #[ortho_config()]
    pub search_debounce_ms: u64,

    /// HTTP request timeout, in seconds.
    #[ortho_config()]
    pub request_timeout_seconds: u64,

    /// Writes fetch telemetry to stderr as JSON lines.
    ///
    /// Environment variables are not supported for this flag because
    /// `ortho_config` does not load boolean values from the environment.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for AlarmdeskConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            token: None,
            resource: None,
            search: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            filters: None,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            telemetry: false,
        }
    }
}

impl AlarmdeskConfig {
    /// Returns the API base URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingBaseUrl`] when no URL is configured.
    pub fn require_api_url(&self) -> Result<&str, ApiError> {
        self.api_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ApiError::MissingBaseUrl)
    }

    /// Resolves the token from configuration or `KINDE_ACCESS_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<AccessToken, ApiError> {
        let raw = self
            .token
            .clone()
            .or_else(|| env::var(SESSION_TOKEN_ENV).ok())
            .ok_or(ApiError::MissingToken)?;
        AccessToken::new(raw)
    }

    /// The configured resource, defaulting to properties.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] for unknown resource names.
    pub fn resource_kind(&self) -> Result<Resource, ApiError> {
        self.resource
            .as_deref()
            .map_or(Ok(Resource::Properties), |raw| {
                raw.parse().map_err(|error: crate::resources::UnknownResource| {
                    ApiError::Configuration {
                        message: error.to_string(),
                    }
                })
            })
    }

    /// The configured page size.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] for sizes outside the offered set.
    pub fn page_size(&self) -> Result<PageSize, ApiError> {
        PageSize::from_rows(self.page_size).ok_or_else(|| ApiError::Configuration {
            message: format!(
                "page size {} is not supported (use 10, 25, 50, 100 or 200)",
                self.page_size
            ),
        })
    }

    /// The configured sort, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when the value names no field.
    pub fn sort_request(&self) -> Result<Option<Sort>, ApiError> {
        let Some(raw) = self.sort.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        Sort::parse(raw)
            .map(Some)
            .ok_or_else(|| ApiError::Configuration {
                message: format!("sort {raw:?} does not name a column"),
            })
    }

    /// Filter assignments as `(id, raw value)` pairs, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] for entries without `=` or with a
    /// blank id.
    pub fn filter_assignments(&self) -> Result<Vec<(String, String)>, ApiError> {
        let Some(raw) = self.filters.as_deref() else {
            return Ok(Vec::new());
        };

        raw.split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('=') {
                Some((id, value)) if !id.trim().is_empty() => {
                    Ok((id.trim().to_owned(), value.trim().to_owned()))
                }
                _ => Err(ApiError::Configuration {
                    message: format!("filter {entry:?} must look like id=value"),
                }),
            })
            .collect()
    }

    /// Search quiet period.
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests;
