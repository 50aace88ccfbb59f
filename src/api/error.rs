//! Error types exposed by the REST API layer.

use thiserror::Error;

/// Errors surfaced while configuring the client or talking to the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No API base URL was configured.
    #[error("API base URL is required")]
    MissingBaseUrl,

    /// The base URL or an endpoint path could not be parsed.
    #[error("API URL is invalid: {0}")]
    InvalidUrl(String),

    /// No access token was available for an authenticated request.
    #[error("access token is required")]
    MissingToken,

    /// The backend rejected the credentials (401/403).
    #[error("the API rejected the access token: {message}")]
    Authentication {
        /// Detail returned with the 401/403 response.
        message: String,
    },

    /// The backend answered with a non-success, non-authentication status.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Detail extracted from the response body.
        message: String,
    },

    /// The request never completed.
    #[error("network error talking to the API: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response from the API: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl ApiError {
    /// Short message suitable for an inline error banner.
    ///
    /// List views show these instead of the full error so that transport
    /// detail never leaks into the page.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Authentication { .. } | Self::MissingToken => {
                "Session expired, please sign in again"
            }
            Self::Configuration { .. } | Self::MissingBaseUrl | Self::InvalidUrl(_) => {
                "The application is not configured correctly"
            }
            Self::Network { .. } | Self::Api { .. } | Self::Decode { .. } | Self::Io { .. } => {
                "Failed to load data"
            }
        }
    }
}
